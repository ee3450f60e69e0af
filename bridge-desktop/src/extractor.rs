//! Media Extractor Implementation using `lofty`
//!
//! Local files (bare paths and `file://` URIs) are probed with `lofty` for
//! tags and audio properties. Remote URIs are not fetched; their metadata is
//! derived from the URL itself and the native player resolves the rest when
//! it loads the stream.

use async_trait::async_trait;
use bridge_traits::{
    error::{BridgeError, Result},
    media::{MediaItem, MediaLocation, MediaMetadata, MediaType},
    player::MediaExtractor,
};
use lofty::config::ParseOptions;
use lofty::file::{AudioFile, FileType, TaggedFileExt};
use lofty::probe::Probe;
use lofty::tag::{Accessor, ItemKey};
use std::io::Cursor;
use std::path::Path;
use tracing::{debug, warn};

/// Extractor for desktop hosts.
pub struct LoftyMediaExtractor {
    parse_options: ParseOptions,
}

impl LoftyMediaExtractor {
    pub fn new() -> Self {
        Self {
            parse_options: ParseOptions::new(),
        }
    }

    /// Create extractor with custom parse options
    pub fn with_options(parse_options: ParseOptions) -> Self {
        Self { parse_options }
    }

    async fn extract_local(&self, uri: &str, path: &Path) -> Result<MediaItem> {
        debug!(file = %file_name(path), "Extracting local media item");

        let data = tokio::fs::read(path).await.map_err(|e| {
            BridgeError::OperationFailed(format!("Failed to read {}: {}", path.display(), e))
        })?;

        let tagged_file = Probe::new(Cursor::new(&data))
            .options(self.parse_options)
            .guess_file_type()
            .map_err(|e| BridgeError::OperationFailed(format!("Failed to probe file: {}", e)))?
            .read()
            .map_err(|e| BridgeError::OperationFailed(format!("Failed to parse file: {}", e)))?;

        let properties = tagged_file.properties();
        let mime_type = file_type_to_mime_type(tagged_file.file_type());

        let mut metadata = MediaMetadata {
            duration: Some(properties.duration()),
            media_type: media_type_for_mime(mime_type),
            mime_type: Some(mime_type.to_string()),
            ..Default::default()
        };

        if let Some(bitrate) = properties.audio_bitrate() {
            metadata
                .extra
                .insert("bitrate_kbps".to_string(), bitrate.to_string());
        }
        if let Some(sample_rate) = properties.sample_rate() {
            metadata
                .extra
                .insert("sample_rate".to_string(), sample_rate.to_string());
        }

        let tag = tagged_file
            .primary_tag()
            .or_else(|| tagged_file.first_tag());

        match tag {
            Some(tag) => {
                metadata.title = tag.title().map(|s| normalize_text(s.as_ref()));
                metadata.artist = tag.artist().map(|s| normalize_text(s.as_ref()));
                metadata.album = tag.album().map(|s| normalize_text(s.as_ref()));
                metadata.album_artist = tag.get_string(&ItemKey::AlbumArtist).map(normalize_text);
                metadata.genre = tag.genre().map(|s| normalize_text(s.as_ref()));
                metadata.year = tag.year();
                metadata.track_number = tag.track();
            }
            None => {
                warn!(file = %file_name(path), "No tags found, using file name as title");
            }
        }

        if metadata.title.is_none() {
            metadata.title = path
                .file_stem()
                .and_then(|s| s.to_str())
                .map(normalize_text);
        }

        Ok(MediaItem::extracted(uri, metadata))
    }

    fn extract_remote(&self, uri: &str) -> MediaItem {
        let path = uri
            .split(['?', '#'])
            .next()
            .unwrap_or(uri)
            .trim_end_matches('/');
        let segment = path.rsplit('/').next().unwrap_or(path);

        let title = urlencoding::decode(segment)
            .map(|decoded| decoded.into_owned())
            .unwrap_or_else(|_| segment.to_string());
        let stem = title
            .rsplit_once('.')
            .map(|(stem, _)| stem.to_string())
            .unwrap_or_else(|| title.clone());

        let mime_type = segment
            .rsplit_once('.')
            .and_then(|(_, ext)| mime_type_for_extension(ext));

        let metadata = MediaMetadata {
            title: (!stem.is_empty()).then_some(stem),
            media_type: mime_type.map(media_type_for_mime).unwrap_or_default(),
            mime_type: mime_type.map(str::to_string),
            ..Default::default()
        };

        MediaItem::extracted(uri, metadata)
    }
}

impl Default for LoftyMediaExtractor {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MediaExtractor for LoftyMediaExtractor {
    async fn create_media_item(&self, uri: &str) -> Result<MediaItem> {
        if uri.trim().is_empty() {
            return Err(BridgeError::InvalidArgument("empty media URI".to_string()));
        }

        match MediaLocation::from_uri(uri) {
            MediaLocation::Local(path) => self.extract_local(uri, &path).await,
            MediaLocation::Remote(_) => Ok(self.extract_remote(uri)),
        }
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .and_then(|s| s.to_str())
        .unwrap_or_default()
        .to_string()
}

/// Trim and collapse whitespace, dropping control characters.
fn normalize_text(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .chars()
        .filter(|c| !c.is_control())
        .collect()
}

fn file_type_to_mime_type(file_type: FileType) -> &'static str {
    match file_type {
        FileType::Aac => "audio/aac",
        FileType::Aiff => "audio/aiff",
        FileType::Ape => "audio/ape",
        FileType::Flac => "audio/flac",
        FileType::Mpeg => "audio/mpeg",
        FileType::Mp4 => "audio/mp4",
        FileType::Mpc => "audio/musepack",
        FileType::Opus => "audio/opus",
        FileType::Vorbis => "audio/vorbis",
        FileType::Speex => "audio/speex",
        FileType::Wav => "audio/wav",
        FileType::WavPack => "audio/wavpack",
        _ => "application/octet-stream",
    }
}

fn mime_type_for_extension(extension: &str) -> Option<&'static str> {
    let mime = match extension.to_ascii_lowercase().as_str() {
        "mp3" => "audio/mpeg",
        "aac" => "audio/aac",
        "m4a" => "audio/mp4",
        "flac" => "audio/flac",
        "ogg" | "oga" => "audio/ogg",
        "opus" => "audio/opus",
        "wav" => "audio/wav",
        "mp4" => "video/mp4",
        "m4v" => "video/x-m4v",
        "mov" => "video/quicktime",
        "webm" => "video/webm",
        "m3u8" => "application/vnd.apple.mpegurl",
        _ => return None,
    };
    Some(mime)
}

fn media_type_for_mime(mime_type: &str) -> MediaType {
    if mime_type.starts_with("audio/") {
        MediaType::Audio
    } else if mime_type.starts_with("video/") {
        MediaType::Video
    } else {
        MediaType::Default
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_text() {
        assert_eq!(normalize_text("  Hello   World  "), "Hello World");
        assert_eq!(
            normalize_text("Title\nWith\tWhitespace"),
            "Title With Whitespace"
        );
    }

    #[test]
    fn test_file_type_to_mime_type() {
        assert_eq!(file_type_to_mime_type(FileType::Mpeg), "audio/mpeg");
        assert_eq!(file_type_to_mime_type(FileType::Flac), "audio/flac");
        assert_eq!(file_type_to_mime_type(FileType::Opus), "audio/opus");
    }

    #[test]
    fn test_media_type_for_mime() {
        assert_eq!(media_type_for_mime("audio/mpeg"), MediaType::Audio);
        assert_eq!(media_type_for_mime("video/mp4"), MediaType::Video);
        assert_eq!(
            media_type_for_mime("application/vnd.apple.mpegurl"),
            MediaType::Default
        );
    }

    #[tokio::test]
    async fn test_remote_uri_metadata_from_url() {
        let extractor = LoftyMediaExtractor::new();
        let item = extractor
            .create_media_item("https://cdn.example.com/audio/Some%20Song.mp3?token=abc")
            .await
            .unwrap();

        assert!(item.is_metadata_extracted());
        assert_eq!(item.metadata().title.as_deref(), Some("Some Song"));
        assert_eq!(item.metadata().mime_type.as_deref(), Some("audio/mpeg"));
        assert_eq!(item.metadata().media_type, MediaType::Audio);
        assert_eq!(
            item.uri(),
            "https://cdn.example.com/audio/Some%20Song.mp3?token=abc"
        );
    }

    #[tokio::test]
    async fn test_remote_uri_without_extension() {
        let extractor = LoftyMediaExtractor::new();
        let item = extractor
            .create_media_item("https://radio.example.com/live")
            .await
            .unwrap();

        assert_eq!(item.metadata().title.as_deref(), Some("live"));
        assert_eq!(item.metadata().mime_type, None);
        assert_eq!(item.metadata().media_type, MediaType::Default);
    }

    #[tokio::test]
    async fn test_missing_local_file_fails() {
        let extractor = LoftyMediaExtractor::new();
        let result = extractor
            .create_media_item("file:///definitely/not/here.mp3")
            .await;

        assert!(matches!(result, Err(BridgeError::OperationFailed(_))));
    }

    /// One second of 16-bit mono silence at 8 kHz.
    fn silent_wav() -> Vec<u8> {
        let sample_rate: u32 = 8_000;
        let data_len: u32 = sample_rate * 2;

        let mut wav = Vec::with_capacity(44 + data_len as usize);
        wav.extend_from_slice(b"RIFF");
        wav.extend_from_slice(&(36 + data_len).to_le_bytes());
        wav.extend_from_slice(b"WAVE");
        wav.extend_from_slice(b"fmt ");
        wav.extend_from_slice(&16u32.to_le_bytes());
        wav.extend_from_slice(&1u16.to_le_bytes()); // PCM
        wav.extend_from_slice(&1u16.to_le_bytes()); // mono
        wav.extend_from_slice(&sample_rate.to_le_bytes());
        wav.extend_from_slice(&(sample_rate * 2).to_le_bytes());
        wav.extend_from_slice(&2u16.to_le_bytes());
        wav.extend_from_slice(&16u16.to_le_bytes());
        wav.extend_from_slice(b"data");
        wav.extend_from_slice(&data_len.to_le_bytes());
        wav.resize(44 + data_len as usize, 0);
        wav
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_encoded_file_uri_resolves_local_file() {
        let dir = tempfile::tempdir().unwrap();
        let folder = dir.path().join("my music");
        std::fs::create_dir(&folder).unwrap();
        let path = folder.join("My Song.wav");
        std::fs::write(&path, silent_wav()).unwrap();

        let encoded: String = path
            .to_str()
            .unwrap()
            .split('/')
            .map(|segment| urlencoding::encode(segment).into_owned())
            .collect::<Vec<_>>()
            .join("/");
        let uri = format!("file://{}", encoded);
        assert!(uri.contains("my%20music/My%20Song.wav"));

        let item = LoftyMediaExtractor::new()
            .create_media_item(&uri)
            .await
            .unwrap();

        assert_eq!(item.uri(), uri);
        assert_eq!(item.metadata().title.as_deref(), Some("My Song"));
        assert_eq!(item.metadata().media_type, MediaType::Audio);
        assert!(item.metadata().duration.is_some());
    }

    #[tokio::test]
    async fn test_empty_uri_rejected() {
        let extractor = LoftyMediaExtractor::new();
        let result = extractor.create_media_item("  ").await;
        assert!(matches!(result, Err(BridgeError::InvalidArgument(_))));
    }
}
