//! Tracing setup.
//!
//! Log lines go to stderr so stdout stays clean for answers and JSON
//! output. The filter comes from the explicit level override when given,
//! falling back to `RUST_LOG`, then to `info`.

use tracing_subscriber::EnvFilter;

use crate::error::{AppError, AppResult};

/// Install the global tracing subscriber.
///
/// `level` accepts anything `EnvFilter` understands, from a bare level
/// (`debug`) to full directives (`doctalk_agent=trace,info`). An invalid
/// filter is a configuration error rather than a silent fallback.
pub fn init_logging(level: Option<&str>, no_color: bool) -> AppResult<()> {
    let filter = match level {
        Some(directives) => EnvFilter::try_new(directives)
            .map_err(|e| AppError::Config(format!("Invalid log filter '{}': {}", directives, e)))?,
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(!no_color && std::env::var_os("NO_COLOR").is_none())
        .try_init()
        .map_err(|e| AppError::Config(format!("Failed to init logging: {}", e)))?;

    Ok(())
}
