//! Opt-in tracing setup for hosts embedding `chart-view`.
//!
//! The engine only emits `tracing` events. Hosts that already own a
//! subscriber should ignore this module.

/// Installs a compact fmt subscriber filtered by `RUST_LOG`, falling back to
/// `info`.
///
/// Returns `false` when the `telemetry` feature is disabled or a global
/// subscriber is already installed.
#[must_use]
pub fn init_default_tracing() -> bool {
    init_tracing_with_default_filter("info")
}

/// Same as [`init_default_tracing`] with a caller-chosen fallback filter,
/// e.g. `"chart_view=debug"` to trace domain updates and gesture rejections.
#[must_use]
pub fn init_tracing_with_default_filter(fallback_directives: &str) -> bool {
    #[cfg(feature = "telemetry")]
    {
        let filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(fallback_directives));
        return tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .compact()
            .try_init()
            .is_ok();
    }

    #[cfg(not(feature = "telemetry"))]
    {
        let _ = fallback_directives;
        false
    }
}
