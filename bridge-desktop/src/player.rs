//! Headless queue player.
//!
//! A [`NativePlayer`] that keeps a native queue, a playback clock, rate and
//! volume without producing any audio. Desktop hosts without a platform media
//! engine (CI, servers, CLI front ends) use it as the default backend; time
//! only moves when the host calls [`HeadlessQueuePlayer::advance_clock`].

use async_trait::async_trait;
use bridge_traits::{
    error::{BridgeError, Result},
    media::MediaItem,
    player::{MediaPlayerState, NativeItem, NativePlayer, NativePlayerAdapter, TimeRange},
};
use parking_lot::{Mutex, RwLock};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, trace};

/// Item loaded into a [`HeadlessQueuePlayer`].
#[derive(Debug)]
pub struct HeadlessItem {
    uri: String,
    duration: f64,
    remote: bool,
    elapsed: Mutex<f64>,
    buffered: Mutex<Vec<TimeRange>>,
}

impl HeadlessItem {
    /// Build a native item for `item`. Unknown durations become NaN, the way
    /// a platform engine reports an indefinite duration.
    pub fn from_media(item: &MediaItem) -> Self {
        let duration = item
            .metadata()
            .duration
            .map(|d| d.as_secs_f64())
            .unwrap_or(f64::NAN);

        Self {
            uri: item.uri().to_string(),
            duration,
            remote: item.location().is_remote(),
            elapsed: Mutex::new(0.0),
            buffered: Mutex::new(Vec::new()),
        }
    }

    pub fn uri(&self) -> &str {
        &self.uri
    }

    pub fn is_remote(&self) -> bool {
        self.remote
    }

    /// Record a buffered span for a remote item.
    pub fn mark_buffered(&self, range: TimeRange) {
        self.buffered.lock().push(range);
    }

    fn set_elapsed(&self, seconds: f64) {
        *self.elapsed.lock() = seconds;
    }

    fn is_starved(&self) -> bool {
        if !self.remote {
            return false;
        }
        let elapsed = *self.elapsed.lock();
        let furthest = self
            .buffered
            .lock()
            .iter()
            .map(TimeRange::end)
            .fold(0.0_f64, f64::max);
        furthest <= elapsed
    }
}

impl NativeItem for HeadlessItem {
    fn current_time(&self) -> f64 {
        *self.elapsed.lock()
    }

    fn duration(&self) -> f64 {
        self.duration
    }

    fn loaded_time_ranges(&self) -> Vec<TimeRange> {
        if self.remote {
            return self.buffered.lock().clone();
        }

        if self.duration.is_finite() {
            vec![TimeRange::new(0.0, self.duration)]
        } else {
            Vec::new()
        }
    }
}

#[derive(Debug)]
struct PlayerInner {
    queue: VecDeque<Arc<HeadlessItem>>,
    rate: f32,
    volume: f32,
    muted: bool,
    repeat: bool,
}

impl Default for PlayerInner {
    fn default() -> Self {
        Self {
            queue: VecDeque::new(),
            rate: 0.0,
            volume: 1.0,
            muted: false,
            repeat: false,
        }
    }
}

/// Native queue player without audio output.
#[derive(Debug, Default)]
pub struct HeadlessQueuePlayer {
    inner: Mutex<PlayerInner>,
}

impl HeadlessQueuePlayer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the native queue.
    pub fn load(&self, items: Vec<Arc<HeadlessItem>>) {
        let mut inner = self.inner.lock();
        inner.queue = items.into();
    }

    /// URIs in the native queue, current item first.
    pub fn queued_uris(&self) -> Vec<String> {
        self.inner
            .lock()
            .queue
            .iter()
            .map(|item| item.uri.clone())
            .collect()
    }

    /// The concrete current item, for hosts that need to record buffering.
    pub fn current_headless_item(&self) -> Option<Arc<HeadlessItem>> {
        self.inner.lock().queue.front().cloned()
    }

    pub fn set_repeat(&self, repeat: bool) {
        self.inner.lock().repeat = repeat;
    }

    /// Move the current item to `seconds`, clamped to its bounds.
    pub fn seek_to(&self, seconds: f64) {
        let inner = self.inner.lock();
        let Some(item) = inner.queue.front() else {
            return;
        };

        let mut target = seconds.max(0.0);
        if item.duration.is_finite() {
            target = target.min(item.duration);
        }
        item.set_elapsed(target);
    }

    /// Progress playback by `elapsed` wall-clock time scaled by the rate.
    ///
    /// Reaching the end of an item wraps it to zero when repeat is on and
    /// otherwise advances to the next native item. The player stops once the
    /// native queue runs out.
    pub fn advance_clock(&self, elapsed: Duration) {
        let mut inner = self.inner.lock();
        if inner.rate <= 0.0 {
            return;
        }

        let mut remaining = elapsed.as_secs_f64() * f64::from(inner.rate);
        while remaining > 0.0 {
            let Some(item) = inner.queue.front().cloned() else {
                inner.rate = 0.0;
                break;
            };

            let position = item.current_time() + remaining;
            if !item.duration.is_finite() || position < item.duration {
                item.set_elapsed(position);
                break;
            }

            remaining = position - item.duration;
            if inner.repeat {
                if item.duration <= 0.0 {
                    item.set_elapsed(0.0);
                    break;
                }
                item.set_elapsed(remaining % item.duration);
                break;
            }

            trace!(uri = %item.uri, "Headless item finished");
            inner.queue.pop_front();
            if inner.queue.is_empty() {
                inner.rate = 0.0;
                break;
            }
        }
    }
}

impl NativePlayer for HeadlessQueuePlayer {
    fn current_item(&self) -> Option<Arc<dyn NativeItem>> {
        self.inner
            .lock()
            .queue
            .front()
            .map(|item| Arc::clone(item) as Arc<dyn NativeItem>)
    }

    fn rate(&self) -> f32 {
        self.inner.lock().rate
    }

    fn set_rate(&self, rate: f32) {
        self.inner.lock().rate = rate.max(0.0);
    }

    fn advance_to_next_item(&self) {
        let mut inner = self.inner.lock();
        inner.queue.pop_front();
        if inner.queue.is_empty() {
            inner.rate = 0.0;
        }
    }

    fn volume(&self) -> f32 {
        self.inner.lock().volume
    }

    fn set_volume(&self, volume: f32) {
        self.inner.lock().volume = volume.clamp(0.0, 1.0);
    }

    fn is_muted(&self) -> bool {
        self.inner.lock().muted
    }

    fn set_muted(&self, muted: bool) {
        self.inner.lock().muted = muted;
    }
}

/// [`NativePlayerAdapter`] driving a [`HeadlessQueuePlayer`].
///
/// The native player is created by [`initialize`](NativePlayerAdapter::initialize);
/// transport calls made before that fail with [`BridgeError::NotAvailable`].
#[derive(Debug, Default)]
pub struct HeadlessPlayerAdapter {
    player: RwLock<Option<Arc<HeadlessQueuePlayer>>>,
    repeat: AtomicBool,
    paused: AtomicBool,
}

impl HeadlessPlayerAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Concrete native player, `None` before initialization.
    pub fn headless_player(&self) -> Option<Arc<HeadlessQueuePlayer>> {
        self.player.read().clone()
    }

    fn require_player(&self) -> Result<Arc<HeadlessQueuePlayer>> {
        self.headless_player().ok_or_else(|| {
            BridgeError::NotAvailable(
                "HeadlessQueuePlayer is not initialized. Call initialize() first.".to_string(),
            )
        })
    }
}

#[async_trait]
impl NativePlayerAdapter for HeadlessPlayerAdapter {
    fn initialize(&self) -> Result<()> {
        let mut slot = self.player.write();
        if slot.is_none() {
            let player = HeadlessQueuePlayer::new();
            player.set_repeat(self.repeat.load(Ordering::SeqCst));
            *slot = Some(Arc::new(player));
            debug!("Headless queue player initialized");
        }
        Ok(())
    }

    async fn play_item(&self, item: &MediaItem) -> Result<()> {
        let player = self.require_player()?;
        player.load(vec![Arc::new(HeadlessItem::from_media(item))]);
        player.set_rate(1.0);
        self.paused.store(false, Ordering::SeqCst);
        Ok(())
    }

    async fn play(&self) -> Result<()> {
        let player = self.require_player()?;
        player.set_rate(1.0);
        self.paused.store(false, Ordering::SeqCst);
        Ok(())
    }

    async fn pause(&self) -> Result<()> {
        let player = self.require_player()?;
        player.set_rate(0.0);
        self.paused.store(true, Ordering::SeqCst);
        Ok(())
    }

    async fn stop(&self) -> Result<()> {
        let player = self.require_player()?;
        player.set_rate(0.0);
        player.seek_to(0.0);
        self.paused.store(false, Ordering::SeqCst);
        Ok(())
    }

    async fn seek(&self, position: Duration) -> Result<()> {
        let player = self.require_player()?;
        player.seek_to(position.as_secs_f64());
        Ok(())
    }

    async fn replace_queue(&self, items: &[MediaItem]) -> Result<()> {
        let player = self.require_player()?;
        player.load(
            items
                .iter()
                .map(|item| Arc::new(HeadlessItem::from_media(item)))
                .collect(),
        );
        Ok(())
    }

    fn set_repeat(&self, repeat: bool) {
        self.repeat.store(repeat, Ordering::SeqCst);
        if let Some(player) = self.headless_player() {
            player.set_repeat(repeat);
        }
    }

    fn repeat(&self) -> bool {
        self.repeat.load(Ordering::SeqCst)
    }

    fn state(&self) -> MediaPlayerState {
        let Some(player) = self.headless_player() else {
            return MediaPlayerState::Stopped;
        };
        let Some(item) = player.current_headless_item() else {
            return MediaPlayerState::Stopped;
        };

        if player.rate() > 0.0 {
            if item.is_starved() {
                MediaPlayerState::Buffering
            } else {
                MediaPlayerState::Playing
            }
        } else if self.paused.load(Ordering::SeqCst) {
            MediaPlayerState::Paused
        } else {
            MediaPlayerState::Stopped
        }
    }

    fn native(&self) -> Option<Arc<dyn NativePlayer>> {
        self.headless_player()
            .map(|player| player as Arc<dyn NativePlayer>)
    }
}
