//! # Flaky Workers Example
//!
//! Workers that panic or fail now and then. Every lifecycle event is logged
//! through `tracing` by the built-in [`LogWriter`] and a small custom
//! subscriber keeps counters.
//!
//! ## Run
//! ```bash
//! RUST_LOG=groupvisor=debug cargo run --example flaky_workers --features logging
//! ```

use std::{
    sync::Arc,
    sync::atomic::{AtomicU64, Ordering},
    time::Duration,
};

use groupvisor::{
    BackoffPolicy, Event, EventKind, GroupSpec, JitterPolicy, LogWriter, RestartPolicy, Subscribe,
    Supervisor, SupervisorConfig, TaskError,
};
use tracing_subscriber::EnvFilter;

#[derive(Default)]
struct Counters {
    starts: AtomicU64,
    panics: AtomicU64,
    exits: AtomicU64,
}

#[async_trait::async_trait]
impl Subscribe for Counters {
    async fn on_event(&self, ev: &Event) {
        let counter = match ev.kind {
            EventKind::InstanceStarting => &self.starts,
            EventKind::InstancePanicked => &self.panics,
            EventKind::InstanceExited => &self.exits,
            _ => return,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    fn name(&self) -> &'static str {
        "counters"
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("groupvisor=info")),
        )
        .init();

    let counters = Arc::new(Counters::default());
    let sup = Supervisor::builder(SupervisorConfig::default())
        .with_subscriber(Arc::new(LogWriter::new()))
        .with_subscriber(counters.clone())
        .build();

    let spec = GroupSpec::builder("flaky")
        .instances(4)
        .with_restart(RestartPolicy::Always)
        .with_backoff(BackoffPolicy {
            first: Duration::from_millis(100),
            max: Duration::from_secs(2),
            factor: 2.0,
            jitter: JitterPolicy::Equal,
        })
        .build(|| async {
            let roll: u8 = rand::random_range(0..10);
            tokio::time::sleep(Duration::from_millis(150 + 50 * roll as u64)).await;
            match roll {
                0..=2 => panic!("dice came up {roll}"),
                3..=4 => Err(TaskError::fail(format!("soft failure ({roll})"))),
                _ => Ok(()),
            }
        });
    sup.register(spec)?;

    tokio::time::sleep(Duration::from_secs(5)).await;

    print!("{}", sup.snapshot());
    println!(
        "starts={} panics={} exits={}",
        counters.starts.load(Ordering::Relaxed),
        counters.panics.load(Ordering::Relaxed),
        counters.exits.load(Ordering::Relaxed),
    );
    Ok(())
}
