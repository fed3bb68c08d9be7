//! # Basic Group Example
//!
//! Registers two groups, lets them run for a while and prints the report.
//!
//! - `tickers`: three instances that never return
//! - `batch`: one instance that returns and is relaunched (loop restart)
//!
//! ## Run
//! ```bash
//! cargo run --example basic_group
//! ```

use std::{
    sync::Arc,
    sync::atomic::{AtomicU32, Ordering},
    time::Duration,
};

use groupvisor::{GroupSpec, RestartPolicy, Supervisor, SupervisorConfig, TaskError};

async fn tick_forever() -> Result<(), TaskError> {
    let mut interval = tokio::time::interval(Duration::from_secs(1));
    loop {
        interval.tick().await;
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let sup = Supervisor::builder(SupervisorConfig::default()).build();

    sup.register_fn("tickers", 3, tick_forever, true, false)?;

    let runs = Arc::new(AtomicU32::new(0));
    let counter = Arc::clone(&runs);
    let batch = GroupSpec::builder("batch")
        .with_restart(RestartPolicy::OnExit)
        .build(move || {
            let counter = Arc::clone(&counter);
            async move {
                let n = counter.fetch_add(1, Ordering::Relaxed) + 1;
                println!("[batch] pass #{n}");
                tokio::time::sleep(Duration::from_millis(200)).await;
                Ok::<(), TaskError>(())
            }
        });
    sup.register(batch)?;

    tokio::time::sleep(Duration::from_secs(2)).await;

    println!();
    print!("{}", sup.snapshot());
    println!();
    println!("batch passes so far: {}", runs.load(Ordering::Relaxed));
    Ok(())
}
