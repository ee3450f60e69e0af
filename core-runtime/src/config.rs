//! # Core Configuration Module
//!
//! Provides configuration management for the media manager.
//!
//! ## Overview
//!
//! The configuration system uses a builder pattern to construct a `CoreConfig`
//! instance holding the platform capabilities the manager resolves lazily and
//! the playback settings that tune its behaviour.
//!
//! ## Capabilities (with platform defaults)
//!
//! - `PlayerFactory` - Builds the native player adapter (desktop default: headless queue player)
//! - `ExtractorFactory` - Builds the media extractor (desktop default: lofty)
//! - `VolumeFactory` - Builds the volume controller from the native player handle
//! - `EventBus` - Broadcast channel for playback events (created from settings)
//!
//! When the `desktop-shims` feature is enabled, `bridge-desktop` factories are
//! injected for any capability not provided. Without it, `build()` fails fast
//! with [`Error::CapabilityMissing`].
//!
//! ## Usage
//!
//! ```ignore
//! use core_runtime::config::{CoreConfig, ExtractionFailurePolicy, PlaybackSettings};
//! use std::sync::Arc;
//!
//! let config = CoreConfig::builder()
//!     .player_factory(Arc::new(|| Arc::new(MyAvQueuePlayerAdapter::new())))
//!     .extractor_factory(Arc::new(|| Arc::new(MyAvAssetExtractor::new())))
//!     .settings(PlaybackSettings {
//!         extraction_failure_policy: ExtractionFailurePolicy::RollBack,
//!         ..Default::default()
//!     })
//!     .build()?;
//! ```

use crate::error::{Error, Result};
use crate::events::{EventBus, DEFAULT_EVENT_BUFFER_SIZE};
use bridge_traits::{ExtractorFactory, PlayerFactory, VolumeFactory};
use serde::{Deserialize, Serialize};

/// What happens to items already appended to the queue when resolving a later
/// URI of the same `play_uris` call fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionFailurePolicy {
    /// Leave the resolved prefix queued.
    #[default]
    KeepResolved,
    /// Remove every item appended by the failed call.
    RollBack,
}

/// Tunables for the media manager.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaybackSettings {
    /// Partial-failure handling for multi-URI playback.
    ///
    /// Default: `KeepResolved`.
    #[serde(default)]
    pub extraction_failure_policy: ExtractionFailurePolicy,

    /// Abandon a multi-URI playback once a newer call has replaced the queue.
    ///
    /// Default: true.
    #[serde(default = "default_discard_stale_resolutions")]
    pub discard_stale_resolutions: bool,

    /// Buffer size of the event bus created when none is injected.
    ///
    /// Default: 100 events.
    #[serde(default = "default_event_capacity")]
    pub event_capacity: usize,
}

impl Default for PlaybackSettings {
    fn default() -> Self {
        Self {
            extraction_failure_policy: ExtractionFailurePolicy::default(),
            discard_stale_resolutions: default_discard_stale_resolutions(),
            event_capacity: default_event_capacity(),
        }
    }
}

impl PlaybackSettings {
    /// Parse settings from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let settings: Self = serde_json::from_str(json)
            .map_err(|e| Error::Config(format!("Invalid playback settings: {}", e)))?;
        settings.validate()?;
        Ok(settings)
    }

    /// Validate settings.
    pub fn validate(&self) -> Result<()> {
        if self.event_capacity == 0 {
            return Err(Error::Config("event_capacity must be > 0".to_string()));
        }

        Ok(())
    }
}

fn default_discard_stale_resolutions() -> bool {
    true
}

fn default_event_capacity() -> usize {
    DEFAULT_EVENT_BUFFER_SIZE
}

/// Core configuration for the media manager.
///
/// Use [`CoreConfigBuilder`] to construct instances.
#[derive(Clone)]
pub struct CoreConfig {
    /// Builds the native player adapter on first use
    pub player_factory: PlayerFactory,

    /// Builds the media extractor on first use
    pub extractor_factory: ExtractorFactory,

    /// Builds the volume controller from the live native player handle
    pub volume_factory: VolumeFactory,

    /// Event bus the manager publishes playback events on
    pub event_bus: EventBus,

    pub settings: PlaybackSettings,
}

impl std::fmt::Debug for CoreConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CoreConfig")
            .field("player_factory", &"PlayerFactory { ... }")
            .field("extractor_factory", &"ExtractorFactory { ... }")
            .field("volume_factory", &"VolumeFactory { ... }")
            .field("event_bus", &self.event_bus)
            .field("settings", &self.settings)
            .finish()
    }
}

impl CoreConfig {
    /// Creates a new configuration builder.
    pub fn builder() -> CoreConfigBuilder {
        CoreConfigBuilder::default()
    }

    /// Validates the configuration and returns an error if invalid.
    pub fn validate(&self) -> Result<()> {
        self.settings.validate()
    }
}

#[cfg(not(feature = "desktop-shims"))]
fn capability_missing_error(capability: &str, purpose: &str) -> Error {
    Error::CapabilityMissing {
        capability: capability.to_string(),
        message: format!(
            "{} implementation is required to {}. \
             Desktop: ensure the 'desktop-shims' feature is enabled to use the bridge-desktop default. \
             Apple: inject an AVFoundation-backed implementation. \
             Web: inject a media-element-backed implementation.",
            capability, purpose
        ),
    }
}

#[cfg(feature = "desktop-shims")]
fn provide_default_player_factory() -> Result<PlayerFactory> {
    use bridge_desktop::HeadlessPlayerAdapter;
    use bridge_traits::NativePlayerAdapter;
    use std::sync::Arc;

    let factory: PlayerFactory =
        Arc::new(|| Arc::new(HeadlessPlayerAdapter::new()) as Arc<dyn NativePlayerAdapter>);
    Ok(factory)
}

#[cfg(not(feature = "desktop-shims"))]
fn provide_default_player_factory() -> Result<PlayerFactory> {
    Err(capability_missing_error("NativePlayerAdapter", "drive playback"))
}

#[cfg(feature = "desktop-shims")]
fn provide_default_extractor_factory() -> Result<ExtractorFactory> {
    use bridge_desktop::LoftyMediaExtractor;
    use bridge_traits::MediaExtractor;
    use std::sync::Arc;

    let factory: ExtractorFactory =
        Arc::new(|| Arc::new(LoftyMediaExtractor::new()) as Arc<dyn MediaExtractor>);
    Ok(factory)
}

#[cfg(not(feature = "desktop-shims"))]
fn provide_default_extractor_factory() -> Result<ExtractorFactory> {
    Err(capability_missing_error("MediaExtractor", "resolve media URIs"))
}

#[cfg(feature = "desktop-shims")]
fn provide_default_volume_factory() -> Result<VolumeFactory> {
    use bridge_desktop::NativeVolumeController;
    use bridge_traits::{NativePlayer, VolumeController};
    use std::sync::Arc;

    let factory: VolumeFactory = Arc::new(|native: Option<Arc<dyn NativePlayer>>| {
        Arc::new(NativeVolumeController::new(native)) as Arc<dyn VolumeController>
    });
    Ok(factory)
}

#[cfg(not(feature = "desktop-shims"))]
fn provide_default_volume_factory() -> Result<VolumeFactory> {
    Err(capability_missing_error("VolumeController", "control output volume"))
}

/// Builder for constructing [`CoreConfig`] instances.
///
/// Call [`build()`](CoreConfigBuilder::build) to validate settings and fill
/// in platform defaults.
#[derive(Default)]
pub struct CoreConfigBuilder {
    player_factory: Option<PlayerFactory>,
    extractor_factory: Option<ExtractorFactory>,
    volume_factory: Option<VolumeFactory>,
    event_bus: Option<EventBus>,
    settings: Option<PlaybackSettings>,
}

impl CoreConfigBuilder {
    /// Sets the factory building the native player adapter.
    ///
    /// Optional when the `desktop-shims` feature is enabled.
    pub fn player_factory(mut self, factory: PlayerFactory) -> Self {
        self.player_factory = Some(factory);
        self
    }

    /// Sets the factory building the media extractor.
    ///
    /// Optional when the `desktop-shims` feature is enabled.
    pub fn extractor_factory(mut self, factory: ExtractorFactory) -> Self {
        self.extractor_factory = Some(factory);
        self
    }

    /// Sets the factory building the volume controller.
    ///
    /// Optional when the `desktop-shims` feature is enabled.
    pub fn volume_factory(mut self, factory: VolumeFactory) -> Self {
        self.volume_factory = Some(factory);
        self
    }

    /// Share an existing event bus instead of creating one.
    pub fn event_bus(mut self, event_bus: EventBus) -> Self {
        self.event_bus = Some(event_bus);
        self
    }

    pub fn settings(mut self, settings: PlaybackSettings) -> Self {
        self.settings = Some(settings);
        self
    }

    /// Builds the final configuration.
    ///
    /// # Errors
    ///
    /// - [`Error::Config`] if the settings are invalid
    /// - [`Error::CapabilityMissing`] if a factory is missing and the
    ///   `desktop-shims` feature is disabled
    pub fn build(self) -> Result<CoreConfig> {
        let settings = self.settings.unwrap_or_default();
        settings.validate()?;

        let player_factory = match self.player_factory {
            Some(factory) => factory,
            None => provide_default_player_factory()?,
        };

        let extractor_factory = match self.extractor_factory {
            Some(factory) => factory,
            None => provide_default_extractor_factory()?,
        };

        let volume_factory = match self.volume_factory {
            Some(factory) => factory,
            None => provide_default_volume_factory()?,
        };

        let event_bus = self
            .event_bus
            .unwrap_or_else(|| EventBus::new(settings.event_capacity));

        let config = CoreConfig {
            player_factory,
            extractor_factory,
            volume_factory,
            event_bus,
            settings,
        };

        config.validate()?;

        Ok(config)
    }
}
