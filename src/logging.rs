use tracing_subscriber::EnvFilter;

use crate::config::AppConfig;

const FALLBACK_DIRECTIVES: &str = "warn,vive_medellin=info";

pub fn init_from_config(config: &AppConfig) {
    init_subscriber(&config.log_level);
}

/// `RUST_LOG` wins over `level`. Only the first call installs a subscriber.
pub fn init_subscriber(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| filter_for(level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .compact()
        .try_init();
}

// A bare level such as "debug" applies to this crate only and leaves
// dependencies at warn. Full directive lists are used as written.
fn directives_for(level: &str) -> String {
    let level = level.trim();
    if level.is_empty() {
        FALLBACK_DIRECTIVES.to_string()
    } else if level.contains('=') || level.contains(',') {
        level.to_string()
    } else {
        format!("warn,vive_medellin={level}")
    }
}

fn filter_for(level: &str) -> EnvFilter {
    EnvFilter::try_new(directives_for(level)).unwrap_or_else(|err| {
        eprintln!("invalid log level {level:?} ({err}), using {FALLBACK_DIRECTIVES}");
        EnvFilter::new(FALLBACK_DIRECTIVES)
    })
}
