//! Diagnostic tracing for the runner itself.
//!
//! Reads `RUST_LOG`; defaults to `warn`. Output goes to stderr so it never
//! mixes with the formatter's or linter's stdout.
//!
//! ```bash
//! RUST_LOG=tidyup_core=debug tidyup lint
//! ```

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).compact())
        .init();
}
