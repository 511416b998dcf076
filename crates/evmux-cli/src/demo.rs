//! Two consumers and one producer over a shared multiplexer.
//!
//! ```text
//!   producer ──post──▶ Multiplexer ──▶ alpha (a.*)
//!   (a.N, b.N, c.N)         │      ──▶ beta  (b.*)
//!                           └── c.N dropped
//! ```

use anyhow::{Context, Result};
use evmux_event::{Event, EventCategory, EventMask, EventStatus, Fetch, WaitMode};
use evmux_runtime::{
    BaseChannel, Channel, ChannelConfig, EventFlag, EventOutlet, EvmuxConfig, MaskSink,
    Multiplexer, MuxChannel, MuxStats,
};
use serde_json::json;
use std::fmt;
use std::path::Path;
use std::sync::Arc;
use std::thread;
use tracing::{debug, info};

const CONSUMERS: [(&str, &str); 2] = [("alpha", "a.*"), ("beta", "b.*")];
const PREFIXES: [&str; 3] = ["a", "b", "c"];

/// What a demo run did.
#[derive(Debug)]
pub struct Summary {
    pub received: Vec<(String, Vec<String>)>,
    pub stats: MuxStats,
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (name, ids) in &self.received {
            writeln!(f, "{name}: {}", ids.join(" "))?;
        }
        writeln!(
            f,
            "delivered={} dropped={} queued={}",
            self.stats.delivered, self.stats.dropped, self.stats.queued
        )
    }
}

fn channel_config(config: &EvmuxConfig, name: &str, record_dir: Option<&Path>) -> ChannelConfig {
    let mut channel = config.channel_config(name);
    if let Some(dir) = record_dir {
        channel = channel
            .with_input_recording(dir.join(format!("{name}-in.log")))
            .with_output_recording(dir.join(format!("{name}-out.log")));
    }
    channel
}

fn consume(mut channel: MuxChannel, mask: EventMask, expected: usize) -> Result<(String, Vec<String>)> {
    let mut ids = Vec::with_capacity(expected);
    while ids.len() < expected {
        match channel.get_event(&mask, WaitMode::Block)? {
            Fetch::Delivered(event) => {
                debug!(channel = channel.name(), event = %event.id, "demo event received");
                ids.push(event.id.to_string());
            }
            Fetch::Pending(EventStatus::Closed) => break,
            // head already assigned to the other consumer
            Fetch::Pending(_) => thread::yield_now(),
        }
    }
    channel.close("demo finished")?;
    Ok((channel.name().to_string(), ids))
}

/// Runs the demo and returns what each consumer received.
///
/// # Errors
///
/// Fails if a channel can not be opened or closed (recording I/O).
pub fn run(config: &EvmuxConfig, events: usize, record_dir: Option<&Path>) -> Result<Summary> {
    if let Some(dir) = record_dir {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("cannot create record dir {}", dir.display()))?;
    }

    let flag = Arc::new(EventFlag::new());
    let hub = Arc::new(Multiplexer::new("demo", Arc::clone(&flag)));

    let mut consumers = Vec::new();
    for (name, mask) in CONSUMERS {
        let mask = EventMask::parse(mask)?;
        let sink = hub.add_sink(MaskSink::new(mask.clone()));
        let mut channel = MuxChannel::new(name, Arc::clone(&hub), sink)?;
        channel.init(&channel_config(config, name, record_dir))?;
        consumers.push(thread::spawn(move || consume(channel, mask, events)));
    }

    let outlet: Arc<dyn EventOutlet> = Arc::clone(&hub) as Arc<dyn EventOutlet>;
    let mut producer = BaseChannel::new("producer").with_outlet(outlet);
    producer.init(&channel_config(config, "producer", record_dir))?;
    for n in 0..events {
        for prefix in PREFIXES {
            let event = Event::parse(&format!("{prefix}.{n}"), EventCategory::Data)?
                .with_payload(json!({ "n": n }));
            producer.post_event(event)?;
        }
    }
    producer.close("demo finished")?;
    info!(events = events * PREFIXES.len(), "demo producer done");

    let mut received = Vec::new();
    for consumer in consumers {
        let result = consumer
            .join()
            .map_err(|_| anyhow::anyhow!("consumer thread panicked"))?;
        received.push(result?);
    }

    let stats = hub.stats();
    hub.stop();
    Ok(Summary { received, stats })
}

#[cfg(test)]
mod tests {
    use super::*;
    use evmux_runtime::read_records;

    #[test]
    fn consumers_get_their_prefix_in_order() {
        let summary = run(&EvmuxConfig::default(), 3, None).expect("demo should run");

        assert_eq!(summary.received[0].0, "alpha");
        assert_eq!(summary.received[0].1, vec!["a.0", "a.1", "a.2"]);
        assert_eq!(summary.received[1].0, "beta");
        assert_eq!(summary.received[1].1, vec!["b.0", "b.1", "b.2"]);
        assert_eq!(summary.stats.delivered, 6);
    }

    #[test]
    fn record_dir_collects_logs() {
        let dir = tempfile::tempdir().expect("should create temp dir");
        run(&EvmuxConfig::default(), 2, Some(dir.path())).expect("demo should run");

        let produced = read_records(dir.path().join("producer-out.log")).expect("producer log");
        assert_eq!(produced.len(), 6);
        let alpha = read_records(dir.path().join("alpha-in.log")).expect("alpha log");
        let ids: Vec<_> = alpha.iter().map(|r| r.id.to_string()).collect();
        assert_eq!(ids, vec!["a.0", "a.1"]);
    }

    #[test]
    fn summary_lists_consumers() {
        let summary = Summary {
            received: vec![("alpha".into(), vec!["a.0".into()])],
            stats: MuxStats {
                delivered: 1,
                dropped: 2,
                queued: 0,
            },
        };
        assert_eq!(summary.to_string(), "alpha: a.0\ndelivered=1 dropped=2 queued=0\n");
    }
}
