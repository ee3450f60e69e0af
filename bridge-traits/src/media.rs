//! Media item model shared by the playback core and host bridges.
//!
//! A [`MediaItem`] is the unit that flows through the playback queue. Items
//! are produced either by a [`MediaExtractor`](crate::player::MediaExtractor)
//! (metadata resolved) or directly from a URI by a consumer that only wants to
//! enqueue a location (metadata left empty). Once created an item is never
//! mutated; the builder methods consume `self` and are meant for construction
//! only.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;
use uuid::Uuid;

/// Unique identifier for a media item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MediaItemId(Uuid);

impl MediaItemId {
    /// Generate a new item identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Construct an identifier from an existing UUID.
    pub fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    /// Borrow the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for MediaItemId {
    fn default() -> Self {
        Self::new()
    }
}

/// Kind of media an item carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Audio,
    Video,
    /// Not determined (e.g., unresolved items).
    #[default]
    Default,
}

/// Where the bytes behind a URI live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MediaLocation {
    /// File accessible to the host runtime.
    Local(PathBuf),
    /// Resource fetched by the native player over a URL scheme.
    Remote(String),
}

impl MediaLocation {
    /// Classify a URI. `file://` URIs and bare paths are local; anything else
    /// carrying a scheme is remote.
    ///
    /// The path of a `file://` URI is percent-decoded and an empty or
    /// `localhost` authority is accepted. Bare paths are taken verbatim.
    pub fn from_uri(uri: &str) -> Self {
        if let Some(rest) = uri.strip_prefix("file://") {
            let path = rest
                .strip_prefix("localhost")
                .filter(|path| path.starts_with('/'))
                .unwrap_or(rest);
            let path = urlencoding::decode(path)
                .map(|decoded| decoded.into_owned())
                .unwrap_or_else(|_| path.to_string());
            return MediaLocation::Local(PathBuf::from(path));
        }

        if uri.contains("://") {
            MediaLocation::Remote(uri.to_string())
        } else {
            MediaLocation::Local(PathBuf::from(uri))
        }
    }

    /// Returns `true` if the native player has to fetch this resource remotely.
    pub fn is_remote(&self) -> bool {
        matches!(self, MediaLocation::Remote(_))
    }
}

/// Descriptive metadata resolved for a media item.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MediaMetadata {
    /// Display title.
    pub title: Option<String>,
    /// Display artist string.
    pub artist: Option<String>,
    /// Album or collection name.
    pub album: Option<String>,
    /// Album artist (compilations).
    pub album_artist: Option<String>,
    /// Genre classification.
    pub genre: Option<String>,
    /// Release year.
    pub year: Option<u32>,
    /// Track number on the album.
    pub track_number: Option<u32>,
    /// Total playing time, when the extractor could determine it.
    pub duration: Option<Duration>,
    /// MIME type of the underlying resource.
    pub mime_type: Option<String>,
    /// Audio, video or undetermined.
    pub media_type: MediaType,
    /// Arbitrary extra fields (e.g., artwork URI, bitrate).
    pub extra: HashMap<String, String>,
}

/// One playable unit: a URI plus resolved metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaItem {
    id: MediaItemId,
    uri: String,
    metadata: MediaMetadata,
    metadata_extracted: bool,
}

impl MediaItem {
    /// Create an unresolved item pointing at `uri`.
    pub fn new(uri: impl Into<String>) -> Self {
        Self {
            id: MediaItemId::new(),
            uri: uri.into(),
            metadata: MediaMetadata::default(),
            metadata_extracted: false,
        }
    }

    /// Create an item whose metadata has been resolved by an extractor.
    pub fn extracted(uri: impl Into<String>, metadata: MediaMetadata) -> Self {
        Self::new(uri).with_metadata(metadata)
    }

    /// Attach resolved metadata.
    pub fn with_metadata(mut self, metadata: MediaMetadata) -> Self {
        self.metadata = metadata;
        self.metadata_extracted = true;
        self
    }

    /// Use a specific identifier instead of a generated one.
    pub fn with_id(mut self, id: MediaItemId) -> Self {
        self.id = id;
        self
    }

    pub fn id(&self) -> MediaItemId {
        self.id
    }

    pub fn uri(&self) -> &str {
        &self.uri
    }

    pub fn metadata(&self) -> &MediaMetadata {
        &self.metadata
    }

    /// Returns `true` once an extractor resolved this item.
    pub fn is_metadata_extracted(&self) -> bool {
        self.metadata_extracted
    }

    /// Title for display, falling back to the last URI segment.
    pub fn display_title(&self) -> &str {
        if let Some(title) = self.metadata.title.as_deref() {
            return title;
        }

        self.uri
            .trim_end_matches('/')
            .rsplit('/')
            .next()
            .unwrap_or(&self.uri)
    }

    pub fn location(&self) -> MediaLocation {
        MediaLocation::from_uri(&self.uri)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_item_is_unresolved() {
        let item = MediaItem::new("https://example.com/audio/track.mp3");
        assert!(!item.is_metadata_extracted());
        assert_eq!(item.metadata(), &MediaMetadata::default());
        assert_eq!(item.display_title(), "track.mp3");
    }

    #[test]
    fn extracted_item_keeps_metadata() {
        let metadata = MediaMetadata {
            title: Some("Intro".to_string()),
            duration: Some(Duration::from_secs(95)),
            media_type: MediaType::Audio,
            ..Default::default()
        };
        let item = MediaItem::extracted("file:///music/intro.flac", metadata);

        assert!(item.is_metadata_extracted());
        assert_eq!(item.display_title(), "Intro");
        assert_eq!(item.metadata().duration, Some(Duration::from_secs(95)));
    }

    #[test]
    fn item_ids_are_unique() {
        let a = MediaItem::new("a.mp3");
        let b = MediaItem::new("a.mp3");
        assert_ne!(a.id(), b.id());
        assert_eq!(a.id(), MediaItemId::from_uuid(*a.id().as_uuid()));
    }

    #[test]
    fn location_classification() {
        assert_eq!(
            MediaLocation::from_uri("file:///tmp/song.mp3"),
            MediaLocation::Local(PathBuf::from("/tmp/song.mp3"))
        );
        assert_eq!(
            MediaLocation::from_uri("/tmp/song.mp3"),
            MediaLocation::Local(PathBuf::from("/tmp/song.mp3"))
        );
        assert_eq!(
            MediaLocation::from_uri("file:///tmp/my%20dir/My%20Song%231.mp3"),
            MediaLocation::Local(PathBuf::from("/tmp/my dir/My Song#1.mp3"))
        );
        assert_eq!(
            MediaLocation::from_uri("file://localhost/tmp/My%20Song.mp3"),
            MediaLocation::Local(PathBuf::from("/tmp/My Song.mp3"))
        );
        assert_eq!(
            MediaLocation::from_uri("/tmp/100%25.mp3"),
            MediaLocation::Local(PathBuf::from("/tmp/100%25.mp3"))
        );
        assert!(MediaLocation::from_uri("https://example.com/a.mp3").is_remote());
        assert!(MediaLocation::from_uri("rtsp://example.com/live").is_remote());
    }

    #[test]
    fn media_type_serializes_lowercase() {
        let json = serde_json::to_string(&MediaType::Video).unwrap();
        assert_eq!(json, "\"video\"");
    }
}
