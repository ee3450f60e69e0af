//! Native playback bridge traits.
//!
//! These abstractions let the playback core drive a platform media engine
//! (an AVFoundation queue player, a browser media element, a desktop audio
//! backend) without knowing which one is bound. Each host ships:
//!
//! - a [`NativePlayerAdapter`] translating transport verbs into native calls,
//! - a [`NativePlayer`] handle exposing the live engine state the core reads
//!   through on every access,
//! - a [`MediaExtractor`] resolving URIs into [`MediaItem`]s,
//! - a [`VolumeController`] bound to the native player's output.
//!
//! Native times are reported as `f64` seconds, mirroring the engines they
//! wrap. Values may be NaN (e.g., the duration of a live stream); converting
//! them into `Duration` is the core's responsibility.

use crate::{error::Result, media::MediaItem, platform::PlatformSendSync};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

/// Playback lifecycle state reported by the native player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum MediaPlayerState {
    #[default]
    Stopped,
    Loading,
    Buffering,
    Playing,
    Paused,
    Failed,
}

impl MediaPlayerState {
    /// Returns `true` while media is actively rendering.
    pub fn is_playing(&self) -> bool {
        matches!(self, MediaPlayerState::Playing)
    }
}

/// Contiguous span of buffered media, in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeRange {
    pub start: f64,
    pub duration: f64,
}

impl TimeRange {
    pub fn new(start: f64, duration: f64) -> Self {
        Self { start, duration }
    }

    /// Furthest point covered by this range.
    pub fn end(&self) -> f64 {
        self.start + self.duration
    }
}

/// Item currently loaded into a native player.
pub trait NativeItem: PlatformSendSync {
    /// Elapsed playback time in seconds.
    fn current_time(&self) -> f64;

    /// Total duration in seconds; NaN while the engine does not know it.
    fn duration(&self) -> f64;

    /// Buffered ranges for this item. Ranges may be discontiguous.
    fn loaded_time_ranges(&self) -> Vec<TimeRange>;
}

/// Handle to the live native player object.
pub trait NativePlayer: PlatformSendSync {
    /// Item the engine is currently positioned on, if any.
    fn current_item(&self) -> Option<Arc<dyn NativeItem>>;

    /// Playback rate (0.0 = paused, 1.0 = normal speed).
    fn rate(&self) -> f32;

    fn set_rate(&self, rate: f32);

    /// Drop the current item and move to the next one in the native queue.
    fn advance_to_next_item(&self);

    /// Output volume in `0.0..=1.0`.
    fn volume(&self) -> f32;

    fn set_volume(&self, volume: f32);

    fn is_muted(&self) -> bool;

    fn set_muted(&self, muted: bool);
}

/// Trait for platform-specific adapters that own one native queue player.
///
/// Control methods must not block the calling thread beyond what the native
/// call requires; long-running native work (loading assets, seeking) is
/// awaited by the caller.
#[cfg_attr(target_arch = "wasm32", async_trait::async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait::async_trait)]
pub trait NativePlayerAdapter: PlatformSendSync {
    /// Create and configure the native player. Until this succeeds
    /// [`native`](Self::native) may return `None`.
    fn initialize(&self) -> Result<()>;

    /// Replace whatever the native player holds with `item` and start it.
    async fn play_item(&self, item: &MediaItem) -> Result<()>;

    /// Start or resume the item the native player currently holds.
    async fn play(&self) -> Result<()>;

    /// Pause without releasing the current item.
    async fn pause(&self) -> Result<()>;

    /// Stop playback and rewind the current item.
    async fn stop(&self) -> Result<()>;

    /// Seek within the current item. Adapters clamp `position` to the valid
    /// range of the item.
    async fn seek(&self, position: Duration) -> Result<()>;

    /// Project the core's playback queue onto the native player's queue.
    async fn replace_queue(&self, items: &[MediaItem]) -> Result<()>;

    /// Repeat the current item when it reaches its end.
    fn set_repeat(&self, repeat: bool);

    fn repeat(&self) -> bool;

    /// Current native state.
    fn state(&self) -> MediaPlayerState;

    /// Live native player handle, `None` before initialization.
    fn native(&self) -> Option<Arc<dyn NativePlayer>>;
}

/// Resolves a URI into a playable [`MediaItem`] with metadata.
#[cfg_attr(target_arch = "wasm32", async_trait::async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait::async_trait)]
pub trait MediaExtractor: PlatformSendSync {
    /// Resolve `uri`. Fails when the URI cannot be resolved.
    async fn create_media_item(&self, uri: &str) -> Result<MediaItem>;
}

/// Output volume control bound to a native player.
pub trait VolumeController: PlatformSendSync {
    /// Current volume in `0.0..=max_volume()`.
    fn volume(&self) -> f32;

    /// Set the volume. Values outside `0.0..=max_volume()` are rejected with
    /// [`BridgeError::InvalidArgument`](crate::error::BridgeError::InvalidArgument).
    fn set_volume(&self, volume: f32) -> Result<()>;

    fn max_volume(&self) -> f32 {
        1.0
    }

    fn is_muted(&self) -> bool;

    fn set_muted(&self, muted: bool);
}

/// Constructs the default native player adapter on first use.
pub type PlayerFactory = Arc<dyn Fn() -> Arc<dyn NativePlayerAdapter> + Send + Sync>;

/// Constructs the default media extractor on first use.
pub type ExtractorFactory = Arc<dyn Fn() -> Arc<dyn MediaExtractor> + Send + Sync>;

/// Constructs the default volume controller from the live native player handle.
pub type VolumeFactory =
    Arc<dyn Fn(Option<Arc<dyn NativePlayer>>) -> Arc<dyn VolumeController> + Send + Sync>;
