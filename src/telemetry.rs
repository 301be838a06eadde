//! Tracing subscriber setup.
//!
//! Host builds log to stderr. Android app processes have no useful stderr,
//! so the JNI entry installs a logcat layer instead.

use std::sync::Once;

use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Filter used when `RUST_LOG` is unset or unparsable.
pub const DEFAULT_FILTER: &str = "btautopin=info";

/// Logcat tag for every line the crate emits on Android.
pub const LOG_TAG: &str = "BTAutoPIN";

/// Guards the process-wide subscriber.
static SUBSCRIBER: Once = Once::new();

/// Output format for log lines.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Pretty,
    /// One JSON object per line, for log collectors.
    Json,
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Run `install` the first time `guard` is seen. Returns whether it ran.
fn install_once(guard: &Once, install: impl FnOnce()) -> bool {
    let mut ran = false;
    guard.call_once(|| {
        install();
        ran = true;
    });
    ran
}

/// Install the global stderr subscriber. Later calls are no-ops.
pub fn init_tracing(format: LogFormat) {
    let installed = install_once(&SUBSCRIBER, || {
        let registry = tracing_subscriber::registry().with(env_filter());
        // A host application may already own the global default.
        let _ = match format {
            LogFormat::Pretty => registry.with(fmt::layer().with_writer(std::io::stderr)).try_init(),
            LogFormat::Json => registry
                .with(fmt::layer().json().with_writer(std::io::stderr))
                .try_init(),
        };
    });

    if !installed {
        tracing::debug!("Tracing subscriber already installed");
    }
}

/// Install the logcat subscriber, tagged [`LOG_TAG`]. Later calls are no-ops.
#[cfg(target_os = "android")]
pub fn init_logcat() {
    install_once(&SUBSCRIBER, || {
        let _ = tracing_subscriber::registry()
            .with(env_filter())
            .with(paranoid_android::layer(LOG_TAG))
            .try_init();
    });
}
