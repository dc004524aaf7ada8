pub mod config;
pub mod crd;
pub mod errors;
pub mod inspector;
pub mod runtime;
pub mod status;
pub mod store;

use tracing_subscriber::{
    EnvFilter,
    filter::{Directive, LevelFilter},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

/// Install the global subscriber. `RUST_LOG` directives are layered on top of
/// `default_directive`; an unparsable default falls back to `info`.
pub fn init_tracing(default_directive: &str) {
    let directive: Directive = default_directive
        .parse()
        .unwrap_or_else(|_| LevelFilter::INFO.into());
    let filter = EnvFilter::builder()
        .with_default_directive(directive)
        .from_env_lossy();

    let _ = tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(filter)
        .try_init();
}
