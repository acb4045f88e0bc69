//! Tracing initialization.

use std::sync::Once;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

static INIT: Once = Once::new();

/// Environment variable holding per-target log directives.
pub const LOG_ENV_VAR: &str = "REGOLINT_LOG";

const DEFAULT_DIRECTIVE: &str = "regolint=info";

/// Initialize the regolint logging system.
///
/// Reads `REGOLINT_LOG` for per-target levels, e.g.
/// `REGOLINT_LOG=regolint_analysis::policy=debug,regolint_analysis::remote=warn`.
/// Falls back to `regolint=info` when unset or invalid.
///
/// Idempotent: only the first call installs a subscriber.
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_env(LOG_ENV_VAR)
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVE));

        // A host application may already own the global subscriber.
        let _ = tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_file(true)
                    .with_line_number(true),
            )
            .with(filter)
            .try_init();
    });
}
