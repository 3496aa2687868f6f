use std::sync::Once;

static TRACING_INIT: Once = Once::new();

/// Install a `tracing` fmt subscriber filtered by `RUST_LOG`, defaulting to
/// `shop_ledger_core=info`. Safe to call more than once; only the first call
/// has an effect, and an already-installed global subscriber is left alone.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{filter::Directive, fmt, EnvFilter};

        let mut filter = EnvFilter::from_default_env();
        if let Ok(directive) = "shop_ledger_core=info".parse::<Directive>() {
            filter = filter.add_directive(directive);
        }

        if fmt().with_env_filter(filter).try_init().is_ok() {
            tracing::info!("Shop ledger tracing initialized.");
        }
    });
}
