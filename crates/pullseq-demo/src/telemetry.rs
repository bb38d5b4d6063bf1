//! Console logging for the demo binary.
//!
//! Events are filtered through `RUST_LOG` (default `info`). Building with the
//! `tracing` feature also turns on the library's own `trace`/`debug` events,
//! so `RUST_LOG=pullseq=trace` shows every generator hand-off and fan-out
//! round, tagged with the thread that produced it.

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

pub fn init_telemetry() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(
            tracing_subscriber::fmt::layer()
                .with_thread_ids(true)
                .with_thread_names(true)
                .with_line_number(true)
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .try_init()?;
    Ok(())
}
