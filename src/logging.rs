//! Tracing subscriber setup

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Install the global subscriber. `RUST_LOG` overrides the default filter.
pub fn init_logger(debug: bool) {
    let default_filter = if debug {
        "vidscout=debug,tower_http=debug,info"
    } else {
        "vidscout=info,tower_http=info"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(debug)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .compact(),
        )
        .init();
}
