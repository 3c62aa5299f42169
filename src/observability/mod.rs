//! Observability for persondb
//!
//! Logging goes through `tracing`. Binaries call [`init_tracing`] once at
//! startup; library code only emits events, tagged with an [`Event`] name in
//! the `event` field.

mod events;

pub use events::Event;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Install the global subscriber
///
/// `RUST_LOG` takes precedence over `default_level` when set. Calling this
/// twice is harmless; the second call leaves the first subscriber in place.
pub fn init_tracing(default_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("persondb={default_level},tower_http={default_level}")));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init();
}
