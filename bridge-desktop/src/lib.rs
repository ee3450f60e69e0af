//! # Desktop Bridge Implementations
//!
//! Default implementations of the playback bridge traits for desktop
//! platforms (macOS, Windows, Linux).
//!
//! ## Overview
//!
//! - `HeadlessPlayerAdapter` driving a `HeadlessQueuePlayer`, an in-process
//!   queue player with a manually advanced clock
//! - `LoftyMediaExtractor` resolving local files with `lofty` and remote URIs
//!   from the URL itself
//! - `NativeVolumeController` bound to the native player's output level
//!
//! The headless player renders nothing. It models the native engine's
//! observable state (queue, rate, elapsed time, buffered ranges) so the core
//! can run unchanged on hosts without a media engine and in tests.
//!
//! ## Usage
//!
//! ```ignore
//! use bridge_desktop::{HeadlessPlayerAdapter, LoftyMediaExtractor};
//! use bridge_traits::{MediaExtractor, NativePlayerAdapter};
//!
//! #[tokio::main]
//! async fn main() {
//!     let adapter = HeadlessPlayerAdapter::new();
//!     adapter.initialize().unwrap();
//!
//!     let extractor = LoftyMediaExtractor::new();
//!     let item = extractor.create_media_item("https://example.com/a.mp3").await.unwrap();
//!     adapter.play_item(&item).await.unwrap();
//! }
//! ```

mod extractor;
mod player;
mod volume;

pub use extractor::LoftyMediaExtractor;
pub use player::{HeadlessItem, HeadlessPlayerAdapter, HeadlessQueuePlayer};
pub use volume::NativeVolumeController;
