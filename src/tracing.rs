//! Subscriber setup for the library and the `dotnet-docs` binary.

use std::sync::Once;
use tracing::Level;
use tracing_subscriber::{EnvFilter, fmt::format::FmtSpan};

static INIT: Once = Once::new();

fn under_test_harness() -> bool {
    std::env::var("NEXTEST").is_ok() || std::env::var("CARGO_TARGET_TMPDIR").is_ok()
}

/// Initialize tracing at INFO (DEBUG under a test harness). Safe to call multiple times.
pub fn init() {
    init_with_level(Level::INFO);
}

/// Like [`init`], with an explicit default level. `RUST_LOG` still wins.
/// Only the first call in a process takes effect.
pub fn init_with_level(level: Level) {
    INIT.call_once(|| {
        let is_test = under_test_harness();
        let level = if is_test { Level::DEBUG } else { level };
        let filter = EnvFilter::builder()
            .with_default_directive(level.into())
            .from_env_lossy();

        let builder = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_ansi(false)
            .with_target(true)
            .with_span_events(FmtSpan::NONE)
            .compact();

        if is_test {
            // Another test binary may already own the global subscriber.
            let _ = builder.with_test_writer().try_init();
        } else if let Err(e) = builder.with_writer(std::io::stderr).try_init() {
            eprintln!("dotnet-docs: failed to initialize tracing: {}", e);
        }
    });
}
