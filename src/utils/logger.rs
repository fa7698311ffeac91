//! Subscriber setup for the `geispoint` binary. Library code only emits events.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// How log lines are rendered on stderr. Stdout is reserved for lookup results.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Compact,
    /// One JSON object per line, for log collectors.
    Json,
}

/// `RUST_LOG` wins over `verbose` when it is set.
pub fn filter(verbose: bool) -> EnvFilter {
    let fallback = if verbose { "geispoint=debug,info" } else { "geispoint=info" };
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback))
}

pub fn init(format: LogFormat, verbose: bool) {
    let layer = fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr);
    let registry = tracing_subscriber::registry().with(filter(verbose));

    match format {
        LogFormat::Compact => registry.with(layer.compact()).init(),
        LogFormat::Json => registry.with(layer.json()).init(),
    }
}
