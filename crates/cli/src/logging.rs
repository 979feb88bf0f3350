use env_logger::{Builder, Env};
use log::LevelFilter;

/// Initializes the global logger on stderr.
///
/// `RUST_LOG` wins when set. Otherwise `verbosity` picks the level:
/// 0 shows warnings, 1 adds debug output (one line per accepted curve),
/// 2 or more adds a line per rejected seed.
pub fn init(verbosity: u8) {
    let level = match verbosity {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };

    let env = Env::default().default_filter_or(level.to_string());
    let mut builder = Builder::from_env(env);

    // `try_init` only fails if a logger was already set; tests may call
    // `init` more than once.
    let _ = builder.try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_twice_does_not_panic() {
        init(0);
        init(2);
        log::debug!("logger initialised");
    }
}
