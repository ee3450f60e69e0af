//! Volume controller bound to a native player handle.

use bridge_traits::{
    error::{BridgeError, Result},
    player::{NativePlayer, VolumeController},
};
use parking_lot::Mutex;
use std::sync::Arc;

/// [`VolumeController`] reading and writing the native player's output level.
///
/// When constructed without a native player (the adapter was not initialized
/// yet) the controller keeps a detached level so reads and writes still
/// succeed; they are not forwarded to any player created later.
pub struct NativeVolumeController {
    native: Option<Arc<dyn NativePlayer>>,
    detached: Mutex<(f32, bool)>,
}

impl NativeVolumeController {
    pub fn new(native: Option<Arc<dyn NativePlayer>>) -> Self {
        Self {
            native,
            detached: Mutex::new((1.0, false)),
        }
    }

    /// Returns `true` when bound to a live native player.
    pub fn is_attached(&self) -> bool {
        self.native.is_some()
    }
}

impl VolumeController for NativeVolumeController {
    fn volume(&self) -> f32 {
        match &self.native {
            Some(native) => native.volume(),
            None => self.detached.lock().0,
        }
    }

    fn set_volume(&self, volume: f32) -> Result<()> {
        if !(0.0..=self.max_volume()).contains(&volume) {
            return Err(BridgeError::InvalidArgument(format!(
                "volume {} outside 0.0..={}",
                volume,
                self.max_volume()
            )));
        }

        match &self.native {
            Some(native) => native.set_volume(volume),
            None => self.detached.lock().0 = volume,
        }
        Ok(())
    }

    fn is_muted(&self) -> bool {
        match &self.native {
            Some(native) => native.is_muted(),
            None => self.detached.lock().1,
        }
    }

    fn set_muted(&self, muted: bool) {
        match &self.native {
            Some(native) => native.set_muted(muted),
            None => self.detached.lock().1 = muted,
        }
    }
}
