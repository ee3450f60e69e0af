//! # Core Runtime Module
//!
//! Provides foundational runtime infrastructure for the media manager:
//! - Logging and tracing infrastructure
//! - Configuration management with capability injection
//! - Event bus system
//!
//! ## Overview
//!
//! This crate contains the runtime utilities the playback core depends on.
//! It establishes the logging conventions, the configuration builder that
//! binds platform capabilities, and the event broadcasting used to notify
//! UI layers.

pub mod config;
pub mod error;
pub mod events;
pub mod logging;

pub use config::{CoreConfig, ExtractionFailurePolicy, PlaybackSettings};
pub use error::{Error, Result};
pub use events::{CoreEvent, EventBus, EventStream, PlaybackEvent};
