//! Log wiring for hosts embedding `numbus`.
//!
//! Render, composition and viewport events are emitted under the `numbus`
//! target. Hosts with their own subscriber only need to enable that target.

/// Environment variable read before `RUST_LOG` by [`init_default_tracing`].
pub const LOG_ENV_VAR: &str = "NUMBUS_LOG";

/// Filter applied when neither [`LOG_ENV_VAR`] nor `RUST_LOG` is set: engine
/// events at `info`, everything else at `warn`.
pub const DEFAULT_LOG_DIRECTIVE: &str = "warn,numbus=info";

/// Installs a compact `fmt` subscriber filtered by [`LOG_ENV_VAR`], then
/// `RUST_LOG`, then [`DEFAULT_LOG_DIRECTIVE`].
///
/// Returns `false` without the `telemetry` feature or when the host already
/// installed a global subscriber.
#[must_use]
pub fn init_default_tracing() -> bool {
    #[cfg(feature = "telemetry")]
    {
        use tracing_subscriber::EnvFilter;

        let filter = EnvFilter::try_from_env(LOG_ENV_VAR)
            .or_else(|_| EnvFilter::try_from_default_env())
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_DIRECTIVE));

        return tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .compact()
            .try_init()
            .is_ok();
    }

    #[cfg(not(feature = "telemetry"))]
    {
        false
    }
}
