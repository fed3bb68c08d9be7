//! # Monitor Example
//!
//! Starts the status endpoint and keeps a few groups running so the report
//! has something to show.
//!
//! ## Run
//! ```bash
//! cargo run --example monitor
//! curl http://127.0.0.1:8080/
//! ```

use std::time::Duration;

use groupvisor::{Supervisor, SupervisorConfig, TaskError};

async fn crash_soon() -> Result<(), TaskError> {
    tokio::time::sleep(Duration::from_secs(3)).await;
    panic!("crashy worker crashed")
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let sup = Supervisor::builder(SupervisorConfig::default()).build();

    sup.register_fn(
        "pollers",
        2,
        || async {
            tokio::time::sleep(Duration::from_secs(30)).await;
            Ok::<(), TaskError>(())
        },
        false,
        true,
    )?;
    sup.register_fn("crashy", 1, crash_soon, true, false)?;

    if let Some(addr) = sup.start_monitor_on_port(8080).await? {
        println!("status at http://{addr}/ (Ctrl+C to quit)");
    }

    tokio::signal::ctrl_c().await?;
    Ok(())
}
