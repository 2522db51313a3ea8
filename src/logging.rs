//! Logging initialization utilities.

use env_logger::Env;

/// Initialize logging. `RUST_LOG` wins over the default filter level.
pub fn init(verbose: bool) {
    let default = if verbose { "info" } else { "warn" };
    let env = Env::default().default_filter_or(default);
    // A second init (tests driving `run` twice) is harmless.
    let _ = env_logger::Builder::from_env(env).try_init();
}
