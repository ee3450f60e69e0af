//! Integration tests for logging, events and configuration

use async_trait::async_trait;
use bridge_traits::error::Result as BridgeResult;
use bridge_traits::log::{LogEntry, LogLevel, LoggerSink};
use core_runtime::config::{ExtractionFailurePolicy, PlaybackSettings};
use core_runtime::events::{CoreEvent, EventBus, EventStream, PlaybackEvent};
use core_runtime::logging::{init_logging, redact_uri, strip_path, LogFormat, LoggingConfig};
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Default)]
struct RecordingSink {
    entries: Mutex<Vec<LogEntry>>,
}

#[async_trait]
impl LoggerSink for RecordingSink {
    async fn log(&self, entry: LogEntry) -> BridgeResult<()> {
        self.entries.lock().unwrap().push(entry);
        Ok(())
    }

    fn min_level(&self) -> LogLevel {
        LogLevel::Debug
    }
}

// Only one global subscriber can be installed per process, so initialization
// and double-initialization are exercised in a single test.
#[tokio::test]
async fn test_init_logging_forwards_to_sink_once() {
    let sink = Arc::new(RecordingSink::default());
    let config = LoggingConfig::default()
        .with_format(LogFormat::Compact)
        .with_level(LogLevel::Debug)
        .with_logger_sink(sink.clone());

    init_logging(config.clone()).unwrap();
    assert!(init_logging(config).is_err());

    tracing::info!(
        target: "core_playback",
        uri = "https://user:pw@cdn.example.com/a.mp3",
        "queue replaced"
    );

    // Forwarding is spawned onto the current runtime.
    for _ in 0..50 {
        if !sink.entries.lock().unwrap().is_empty() {
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }

    let entries = sink.entries.lock().unwrap();
    let entry = entries
        .iter()
        .find(|e| e.message == "queue replaced")
        .expect("event forwarded to sink");
    assert_eq!(
        entry.fields.get("uri"),
        Some(&"https://cdn.example.com/a.mp3".to_string())
    );
}

#[test]
fn test_location_helpers() {
    assert_eq!(strip_path("/Users/someone/Music/song.mp3"), "song.mp3");
    assert_eq!(
        redact_uri("https://cdn.example.com/a.mp3?X-Amz-Signature=1&signature=2"),
        "https://cdn.example.com/a.mp3?X-Amz-Signature=1&signature=[REDACTED]"
    );
}

#[tokio::test]
async fn test_event_stream_sees_bus_events_in_order() {
    let bus = EventBus::new(8);
    let mut stream = EventStream::new(bus.subscribe());

    bus.emit(CoreEvent::Playback(PlaybackEvent::QueueReplaced { count: 2 }))
        .unwrap();
    bus.emit(CoreEvent::Playback(PlaybackEvent::PlayRequested))
        .unwrap();

    assert_eq!(
        stream.recv().await.unwrap(),
        CoreEvent::Playback(PlaybackEvent::QueueReplaced { count: 2 })
    );
    assert_eq!(
        stream.recv().await.unwrap(),
        CoreEvent::Playback(PlaybackEvent::PlayRequested)
    );
}

#[test]
fn test_settings_round_trip_through_json() {
    let settings = PlaybackSettings {
        extraction_failure_policy: ExtractionFailurePolicy::RollBack,
        discard_stale_resolutions: false,
        event_capacity: 16,
    };

    let json = serde_json::to_string(&settings).unwrap();
    assert!(json.contains("roll_back"));
    assert_eq!(PlaybackSettings::from_json(&json).unwrap(), settings);
}
