//! Integration tests for channel recording.

use evmux_event::{Event, EventCategory, EventMask, EventPath, WaitMode};
use evmux_runtime::recording::temp_path;
use evmux_runtime::{
    read_records, Channel, ChannelConfig, MaskSink, Multiplexer, MuxChannel, Record,
};
use serde_json::json;
use std::sync::Arc;
use tempfile::TempDir;

fn path(s: &str) -> EventPath {
    EventPath::parse(s).expect("path should parse")
}

fn sample_events() -> Vec<Event> {
    vec![
        Event::parse("job.start", EventCategory::Lifecycle)
            .unwrap()
            .with_address(path("worker.1")),
        Event::parse("job.progress", EventCategory::Data)
            .unwrap()
            .with_payload(json!({"done": 3, "total": 10}))
            .with_address(path("worker.1")),
        Event::parse("job.cancel", EventCategory::Control).unwrap(),
        Event::parse("job.trace", EventCategory::extension("otel", "span"))
            .unwrap()
            .with_payload(json!(["a", "b"])),
    ]
}

fn hub_with_sink(mask: &str) -> (Arc<Multiplexer>, MuxChannel) {
    let hub = Arc::new(Multiplexer::standalone("recording"));
    let sink = hub.add_sink(MaskSink::new(EventMask::parse(mask).unwrap()));
    let channel = MuxChannel::new("recorder", Arc::clone(&hub), sink).expect("should bind");
    (hub, channel)
}

/// Posted events read back from the finished output log unchanged and in
/// order.
#[test]
fn output_log_reproduces_posted_events() {
    let dir = TempDir::new().unwrap();
    let log = dir.path().join("out.log");
    let (_hub, mut channel) = hub_with_sink("nothing.here");

    channel
        .init(&ChannelConfig::default().with_output_recording(&log))
        .expect("should open output log");
    let events = sample_events();
    for event in &events {
        channel.post_event(event.clone()).expect("post should succeed");
    }
    assert!(!log.exists());
    channel.close("done").expect("close should rename the log");

    let expected: Vec<Record> = events.iter().map(Record::from).collect();
    assert_eq!(read_records(&log).expect("log should read back"), expected);
}

/// Delivered events are logged with the canonical id and source address.
#[test]
fn input_log_records_deliveries() {
    let dir = TempDir::new().unwrap();
    let log = dir.path().join("in.log");
    let (hub, mut channel) = hub_with_sink("job.*");

    channel
        .init(&ChannelConfig::default().with_input_recording(&log))
        .expect("should open input log");
    for event in sample_events() {
        hub.publish(event);
    }
    let mut delivered = Vec::new();
    while let Some(event) = channel
        .get_event(&EventMask::any(), WaitMode::NoWait)
        .unwrap()
        .into_event()
    {
        delivered.push(Record::from(&event));
    }
    channel.close("done").unwrap();

    assert_eq!(delivered.len(), 4);
    assert_eq!(read_records(&log).unwrap(), delivered);
}

/// Abort removes temp logs; nothing reaches the final name.
#[test]
fn abort_discards_logs() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("in.log");
    let output = dir.path().join("out.log");
    let (_hub, mut channel) = hub_with_sink("job.*");

    channel
        .init(
            &ChannelConfig::default()
                .with_input_recording(&input)
                .with_output_recording(&output),
        )
        .unwrap();
    channel.post_event(sample_events().remove(0)).unwrap();
    assert!(temp_path(&output).exists());

    channel.abort("test failure").expect("abort should unlink logs");
    for p in [&input, &output] {
        assert!(!p.exists());
        assert!(!temp_path(p).exists());
    }
}

/// With delete-on-abort off, logs are written in place and survive an
/// abort.
#[test]
fn logs_survive_abort_when_kept() {
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("out.log");
    let (_hub, mut channel) = hub_with_sink("job.*");

    channel
        .init(
            &ChannelConfig::default()
                .with_output_recording(&output)
                .with_delete_on_abort(false),
        )
        .unwrap();
    channel.post_event(sample_events().remove(2)).unwrap();
    channel.flush().unwrap();
    assert_eq!(read_records(&output).unwrap().len(), 1);

    channel.abort("crash").unwrap();
    assert_eq!(read_records(&output).unwrap().len(), 1);
}

/// A log that can not be created fails `init` and leaves the channel
/// closed.
#[test]
fn unopenable_log_fails_init() {
    let dir = TempDir::new().unwrap();
    let (_hub, mut channel) = hub_with_sink("job.*");

    let err = channel
        .init(&ChannelConfig::default().with_input_recording(dir.path().join("no/such/in.log")))
        .unwrap_err();
    assert!(err.to_string().contains("in.log"));
    assert!(!channel.is_open());
}
