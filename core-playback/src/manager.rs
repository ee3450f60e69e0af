//! # Media Manager
//!
//! Single entry point for transport control, queue management and live
//! playback state on top of a platform [`NativePlayerAdapter`].
//!
//! ## Overview
//!
//! - **Components**: the adapter, the [`MediaExtractor`] and the
//!   [`VolumeController`] are built from the factories in [`CoreConfig`] on
//!   first use and can be replaced at any time.
//! - **Derived state**: state, position, duration, buffered time and speed
//!   are read from the native player on every access and never cached.
//! - **Queue**: `play_*` calls that accept new media clear the
//!   [`SharedQueue`], refill it, project it onto the adapter and start
//!   playback. Each replacement bumps a queue epoch so a slow multi-URI call
//!   overtaken by a newer one stops instead of appending into the newer queue.
//!
//! ## Usage
//!
//! ```ignore
//! use core_playback::MediaManager;
//! use core_runtime::config::CoreConfig;
//!
//! let manager = MediaManager::new(CoreConfig::builder().build()?);
//! manager.init()?;
//!
//! let items = manager
//!     .play_uris(["https://example.com/a.mp3", "https://example.com/b.mp3"])
//!     .await?;
//! assert_eq!(manager.queue().read().len(), items.len());
//! ```

use crate::error::{Operation, PlaybackError, Result};
use crate::lazy::LazyComponent;
use crate::queue::{MediaQueue, SharedQueue};
use bridge_traits::{
    MediaExtractor, MediaItem, MediaItemId, MediaPlayerState, NativeItem, NativePlayer,
    NativePlayerAdapter, VolumeController,
};
use core_runtime::config::{CoreConfig, ExtractionFailurePolicy, PlaybackSettings};
use core_runtime::events::{CoreEvent, EventBus, EventStream, PlaybackEvent};
use core_runtime::logging::redact_uri;
use std::path::Path;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

/// Playback core bound to one native player adapter.
pub struct MediaManager {
    player: Arc<LazyComponent<dyn NativePlayerAdapter>>,
    extractor: LazyComponent<dyn MediaExtractor>,
    volume: LazyComponent<dyn VolumeController>,
    queue: SharedQueue,
    initialized: AtomicBool,
    repeat: AtomicBool,
    epoch: AtomicU64,
    events: EventBus,
    settings: PlaybackSettings,
}

impl MediaManager {
    pub fn new(config: CoreConfig) -> Self {
        let CoreConfig {
            player_factory,
            extractor_factory,
            volume_factory,
            event_bus,
            settings,
        } = config;

        let player: Arc<LazyComponent<dyn NativePlayerAdapter>> =
            Arc::new(LazyComponent::new(move || player_factory()));
        let extractor = LazyComponent::new(move || extractor_factory());

        let volume_player = Arc::clone(&player);
        let volume = LazyComponent::new(move || volume_factory(volume_player.get().native()));

        Self {
            player,
            extractor,
            volume,
            queue: MediaQueue::shared(),
            initialized: AtomicBool::new(false),
            repeat: AtomicBool::new(false),
            epoch: AtomicU64::new(0),
            events: event_bus,
            settings,
        }
    }

    // ------------------------------------------------------------------
    // Components
    // ------------------------------------------------------------------

    pub fn media_player(&self) -> Arc<dyn NativePlayerAdapter> {
        self.player.get()
    }

    pub fn set_media_player(&self, player: Arc<dyn NativePlayerAdapter>) {
        self.player.set(player);
    }

    pub fn media_extractor(&self) -> Arc<dyn MediaExtractor> {
        self.extractor.get()
    }

    pub fn set_media_extractor(&self, extractor: Arc<dyn MediaExtractor>) {
        self.extractor.set(extractor);
    }

    /// Volume controller, built from the current native player handle on
    /// first use.
    pub fn volume_controller(&self) -> Arc<dyn VolumeController> {
        self.volume.get()
    }

    pub fn set_volume_controller(&self, controller: Arc<dyn VolumeController>) {
        self.volume.set(controller);
    }

    pub fn queue(&self) -> SharedQueue {
        Arc::clone(&self.queue)
    }

    pub fn events(&self) -> &EventBus {
        &self.events
    }

    /// Subscribe to playback events.
    pub fn subscribe(&self) -> EventStream {
        EventStream::new(self.events.subscribe())
    }

    pub fn settings(&self) -> &PlaybackSettings {
        &self.settings
    }

    // ------------------------------------------------------------------
    // Initialization
    // ------------------------------------------------------------------

    /// Create the native player and reset repeat to off.
    pub fn init(&self) -> Result<()> {
        self.media_player().initialize()?;
        self.initialized.store(true, Ordering::SeqCst);
        self.repeat.store(false, Ordering::SeqCst);
        debug!("Media manager initialized");
        Ok(())
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized.load(Ordering::SeqCst)
    }

    // ------------------------------------------------------------------
    // Derived state
    // ------------------------------------------------------------------

    pub fn state(&self) -> MediaPlayerState {
        self.media_player().state()
    }

    pub fn position(&self) -> Duration {
        self.current_native_item()
            .map(|item| seconds_to_duration(item.current_time()))
            .unwrap_or(Duration::ZERO)
    }

    pub fn duration(&self) -> Duration {
        self.current_native_item()
            .map(|item| seconds_to_duration(item.duration()))
            .unwrap_or(Duration::ZERO)
    }

    /// Furthest buffered point of the current item.
    pub fn buffered(&self) -> Duration {
        self.current_native_item()
            .map(|item| {
                let furthest = item
                    .loaded_time_ranges()
                    .iter()
                    .map(|range| range.end())
                    .fold(0.0_f64, f64::max);
                seconds_to_duration(furthest)
            })
            .unwrap_or(Duration::ZERO)
    }

    /// Native playback rate, 0 without a native player.
    pub fn speed(&self) -> f32 {
        self.native_player()
            .map(|native| native.rate())
            .unwrap_or(0.0)
    }

    /// Set the native playback rate. Ignored without a native player.
    pub fn set_speed(&self, speed: f32) {
        match self.native_player() {
            Some(native) => native.set_rate(speed),
            None => debug!(speed, "No native player, ignoring speed change"),
        }
    }

    pub fn repeat(&self) -> bool {
        self.repeat.load(Ordering::SeqCst)
    }

    pub fn volume(&self) -> f32 {
        self.volume_controller().volume()
    }

    pub fn set_volume(&self, volume: f32) -> Result<()> {
        self.volume_controller().set_volume(volume)?;
        Ok(())
    }

    // ------------------------------------------------------------------
    // Transport
    // ------------------------------------------------------------------

    /// Hand `item` straight to the native player. The queue is not touched.
    ///
    /// Marks the manager initialized without calling `init()`.
    pub async fn play_item(&self, item: &MediaItem) -> Result<()> {
        self.initialized.store(true, Ordering::SeqCst);
        debug!(uri = %redact_uri(item.uri()), "Playing single item");
        self.media_player()
            .play_item(item)
            .await
            .map_err(|e| self.report(e.into()))?;
        self.emit(PlaybackEvent::PlayRequested);
        Ok(())
    }

    /// Replace the queue with the item resolved from `uri` and play it.
    pub async fn play_uri(&self, uri: &str) -> Result<MediaItem> {
        let mut items = self.play_uris([uri]).await?;
        items.pop().ok_or(PlaybackError::Superseded)
    }

    /// Replace the queue with `items`, in order, and play.
    #[instrument(skip_all, fields(count = items.len()))]
    pub async fn play_items(&self, items: Vec<MediaItem>) -> Result<()> {
        let epoch = {
            let mut queue = self.queue.write();
            let epoch = self.next_epoch();
            queue.clear();
            queue.extend(items);
            epoch
        };

        self.project_and_play(epoch).await
    }

    /// Resolve each URI in order, appending items to a fresh queue as they
    /// resolve, then play. Returns the resolved items in input order.
    ///
    /// # Errors
    ///
    /// - [`PlaybackError::ExtractionFailed`] when a URI cannot be resolved;
    ///   playback is not started and already appended items are kept or
    ///   removed according to [`ExtractionFailurePolicy`].
    /// - [`PlaybackError::Superseded`] when a newer call replaced the queue
    ///   while this one was resolving.
    pub async fn play_uris<I, S>(&self, uris: I) -> Result<Vec<MediaItem>>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let epoch = {
            let mut queue = self.queue.write();
            let epoch = self.next_epoch();
            queue.clear();
            epoch
        };

        let extractor = self.media_extractor();
        let mut resolved = Vec::new();

        for uri in uris {
            let uri = uri.as_ref();
            let item = match extractor.create_media_item(uri).await {
                Ok(item) => item,
                Err(_) if self.is_stale(epoch) => return Err(PlaybackError::Superseded),
                Err(source) => {
                    warn!(uri = %redact_uri(uri), error = %source, "Failed to resolve media item");
                    self.handle_extraction_failure(&resolved);
                    return Err(self.report(PlaybackError::ExtractionFailed {
                        uri: uri.to_string(),
                        source,
                    }));
                }
            };

            {
                let mut queue = self.queue.write();
                if self.is_stale(epoch) {
                    warn!(uri = %redact_uri(uri), "Queue replaced while resolving, abandoning");
                    return Err(PlaybackError::Superseded);
                }
                queue.add(item.clone());
            }

            self.emit(PlaybackEvent::ItemResolved {
                uri: item.uri().to_string(),
            });
            resolved.push(item);
        }

        self.project_and_play(epoch).await?;
        Ok(resolved)
    }

    /// Resume the item the native player holds.
    pub async fn play(&self) -> Result<()> {
        self.media_player()
            .play()
            .await
            .map_err(|e| self.report(e.into()))?;
        self.emit(PlaybackEvent::PlayRequested);
        Ok(())
    }

    pub async fn pause(&self) -> Result<()> {
        self.media_player()
            .pause()
            .await
            .map_err(|e| self.report(e.into()))?;
        self.emit(PlaybackEvent::Paused);
        Ok(())
    }

    pub async fn stop(&self) -> Result<()> {
        self.media_player()
            .stop()
            .await
            .map_err(|e| self.report(e.into()))?;
        self.emit(PlaybackEvent::Stopped);
        Ok(())
    }

    pub async fn seek_to(&self, position: Duration) -> Result<()> {
        let position_ms = u64::try_from(position.as_millis()).unwrap_or(u64::MAX);
        debug!(position_ms, "Seeking");
        self.media_player()
            .seek(position)
            .await
            .map_err(|e| self.report(e.into()))?;
        self.emit(PlaybackEvent::SeekRequested { position_ms });
        Ok(())
    }

    /// Advance the native player to its next item.
    ///
    /// Only the native queue moves; the manager's queue still lists the item
    /// that was playing.
    pub async fn play_next(&self) -> Result<()> {
        let native = self
            .native_player()
            .ok_or_else(|| self.report(PlaybackError::AdapterNotInitialized))?;
        native.advance_to_next_item();
        self.emit(PlaybackEvent::Advanced);
        Ok(())
    }

    pub async fn play_previous(&self) -> Result<()> {
        self.unsupported(Operation::PlayPrevious)
    }

    pub async fn step_backward(&self) -> Result<()> {
        self.unsupported(Operation::StepBackward)
    }

    pub async fn step_forward(&self) -> Result<()> {
        self.unsupported(Operation::StepForward)
    }

    pub async fn toggle_shuffle(&self) -> Result<()> {
        self.unsupported(Operation::ToggleShuffle)
    }

    pub async fn play_file(&self, _file: &Path) -> Result<MediaItem> {
        self.unsupported(Operation::PlayFile)
    }

    pub async fn play_directory(&self, _directory: &Path) -> Result<Vec<MediaItem>> {
        self.unsupported(Operation::PlayDirectory)
    }

    /// Flip repeat and push it to the adapter. Returns the new value.
    pub fn toggle_repeat(&self) -> bool {
        let enabled = !self.repeat.fetch_xor(true, Ordering::SeqCst);
        self.media_player().set_repeat(enabled);
        self.emit(PlaybackEvent::RepeatChanged { enabled });
        enabled
    }

    // ------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------

    fn native_player(&self) -> Option<Arc<dyn NativePlayer>> {
        self.media_player().native()
    }

    fn current_native_item(&self) -> Option<Arc<dyn NativeItem>> {
        self.native_player()?.current_item()
    }

    fn next_epoch(&self) -> u64 {
        self.epoch.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn is_stale(&self, epoch: u64) -> bool {
        self.settings.discard_stale_resolutions && self.epoch.load(Ordering::SeqCst) != epoch
    }

    async fn project_and_play(&self, epoch: u64) -> Result<()> {
        let snapshot = {
            let queue = self.queue.read();
            if self.is_stale(epoch) {
                return Err(PlaybackError::Superseded);
            }
            queue.items()
        };

        info!(count = snapshot.len(), "Playback queue replaced");
        self.emit(PlaybackEvent::QueueReplaced {
            count: snapshot.len(),
        });

        let player = self.media_player();
        player
            .replace_queue(&snapshot)
            .await
            .map_err(|e| self.report(e.into()))?;
        player.play().await.map_err(|e| self.report(e.into()))?;
        self.emit(PlaybackEvent::PlayRequested);
        Ok(())
    }

    fn handle_extraction_failure(&self, resolved: &[MediaItem]) {
        if self.settings.extraction_failure_policy != ExtractionFailurePolicy::RollBack {
            return;
        }

        let ids: Vec<MediaItemId> = resolved.iter().map(|item| item.id()).collect();
        let mut queue = self.queue.write();
        for id in ids {
            queue.remove_id(id);
        }
        debug!(removed = resolved.len(), "Rolled back partially resolved queue");
    }

    fn unsupported<T>(&self, operation: Operation) -> Result<T> {
        debug!(%operation, "Unsupported operation requested");
        Err(self.report(PlaybackError::NotImplemented(operation)))
    }

    fn report(&self, error: PlaybackError) -> PlaybackError {
        self.emit(PlaybackEvent::Error {
            message: error.to_string(),
            unsupported: error.is_unsupported(),
        });
        error
    }

    fn emit(&self, event: PlaybackEvent) {
        // No subscribers is not an error.
        let _ = self.events.emit(CoreEvent::Playback(event));
    }
}

impl std::fmt::Debug for MediaManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MediaManager")
            .field("initialized", &self.is_initialized())
            .field("repeat", &self.repeat())
            .field("queue_len", &self.queue.read().len())
            .field("settings", &self.settings)
            .finish()
    }
}

/// Convert native seconds to a `Duration`. NaN, infinite and negative values
/// become zero.
pub(crate) fn seconds_to_duration(seconds: f64) -> Duration {
    Duration::try_from_secs_f64(seconds).unwrap_or(Duration::ZERO)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seconds_to_duration_normalizes_invalid_values() {
        assert_eq!(seconds_to_duration(f64::NAN), Duration::ZERO);
        assert_eq!(seconds_to_duration(-1.0), Duration::ZERO);
        assert_eq!(seconds_to_duration(f64::INFINITY), Duration::ZERO);
        assert_eq!(seconds_to_duration(2.5), Duration::from_millis(2500));
    }
}
