use std::sync::Once;

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

const DEFAULT_LOG_LEVEL: &str = "warn";
const DEBUG_LOG_LEVEL: &str = "debug";
pub const ENV_VAR_NAME: &str = "LESSON_PLANNER_LOG";

static INIT: Once = Once::new();

/// Install the global subscriber (stderr, compact). Filter precedence:
/// `LESSON_PLANNER_LOG` > `log_level` > `debug` when `debug` is set > `warn`.
///
/// Safe to call more than once; only the first call has an effect.
pub fn init(log_level: Option<&str>, debug: bool) -> anyhow::Result<()> {
    let mut init_err: Option<anyhow::Error> = None;

    INIT.call_once(|| {
        let stderr_layer = tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false)
            .compact();

        if let Err(e) = tracing_subscriber::registry()
            .with(stderr_layer.with_filter(build_filter(log_level, debug)))
            .try_init()
        {
            init_err = Some(anyhow::anyhow!("failed to initialize logging: {e}"));
        }
    });

    match init_err {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

fn build_filter(log_level: Option<&str>, debug: bool) -> EnvFilter {
    EnvFilter::try_from_env(ENV_VAR_NAME).unwrap_or_else(|_| {
        let fallback = if debug { DEBUG_LOG_LEVEL } else { DEFAULT_LOG_LEVEL };
        EnvFilter::new(log_level.unwrap_or(fallback))
    })
}
