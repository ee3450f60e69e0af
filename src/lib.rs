//! Workspace facade crate.
//!
//! Re-exports the playback core together with the host bridge contracts so a
//! host application can depend on `media-manager` alone. With the default
//! `desktop-shims` feature the desktop bridge implementations are re-exported
//! as well and become the lazily-constructed defaults of [`MediaManager`].

pub use bridge_traits as bridge;
pub use core_playback as playback;
pub use core_runtime as runtime;

#[cfg(feature = "desktop-shims")]
pub use bridge_desktop as desktop;

pub use bridge_traits::media::MediaItem;
pub use bridge_traits::player::MediaPlayerState;
pub use core_playback::{MediaManager, MediaQueue, PlaybackError, SharedQueue};
pub use core_runtime::config::CoreConfig;
