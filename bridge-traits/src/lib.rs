//! # Host Bridge Traits
//!
//! Platform abstraction traits that must be implemented by each host platform.
//!
//! ## Overview
//!
//! This crate defines the contract between the playback core and the
//! platform-specific media engines. Each trait represents a capability the
//! core requires but that must be implemented differently per platform
//! (AVFoundation on Apple targets, a media element on the web, a desktop
//! backend elsewhere).
//!
//! ## Traits
//!
//! ### Playback
//! - [`NativePlayerAdapter`](player::NativePlayerAdapter) - Transport verbs over one native queue player
//! - [`NativePlayer`](player::NativePlayer) - Live native player handle (current item, rate, advance)
//! - [`NativeItem`](player::NativeItem) - Timing and buffering of the loaded item
//! - [`MediaExtractor`](player::MediaExtractor) - URI to [`MediaItem`](media::MediaItem) resolution
//! - [`VolumeController`](player::VolumeController) - Output volume and mute
//!
//! ### Utilities
//! - [`LoggerSink`](log::LoggerSink) - Forward structured logs to host logging
//!
//! ## Platform Requirements
//!
//! | Platform | Implementation Crate | Status |
//! |----------|---------------------|--------|
//! | Desktop  | `bridge-desktop`    | ✅ Headless player, lofty extractor |
//! | iOS/macOS| TBD                 | 📋 Planned (AVQueuePlayer) |
//! | Android  | TBD                 | 📋 Planned |
//! | Web      | TBD                 | 📋 Planned |
//!
//! ## Error Handling
//!
//! All bridge traits use the [`BridgeError`](error::BridgeError) type. Platform
//! implementations should convert native failures into `BridgeError` with an
//! actionable message (e.g., the URI that failed to resolve).
//!
//! ## Thread Safety
//!
//! Bridge traits require `Send + Sync` on native targets (see
//! [`PlatformSendSync`](platform::PlatformSendSync)) so a single adapter can
//! be shared by the core and its consumers.

pub mod error;
pub mod log;
pub mod media;
pub mod platform;
pub mod player;

pub use error::BridgeError;

// Re-export commonly used types
pub use log::{ConsoleLogger, LogEntry, LogLevel, LoggerSink};
pub use media::{MediaItem, MediaItemId, MediaLocation, MediaMetadata, MediaType};
pub use player::{
    ExtractorFactory, MediaExtractor, MediaPlayerState, NativeItem, NativePlayer,
    NativePlayerAdapter, PlayerFactory, TimeRange, VolumeController, VolumeFactory,
};
