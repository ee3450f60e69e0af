//! # Playback Core
//!
//! Platform-neutral media manager driving a native queue player.
//!
//! ## Overview
//!
//! This crate handles:
//! - Transport control (play, pause, stop, seek, next, repeat)
//! - The playback queue and its projection onto the native player
//! - Live state read through from the native player (state, position,
//!   duration, buffered time, speed)
//! - Lazy construction of the native adapter, media extractor and volume
//!   controller from the factories in `CoreConfig`

pub mod error;
pub mod lazy;
pub mod manager;
pub mod queue;

pub use error::{Operation, PlaybackError, Result};
pub use lazy::LazyComponent;
pub use manager::MediaManager;
pub use queue::{MediaQueue, SharedQueue};
