use tracing_subscriber::EnvFilter;

/// Env var holding an `EnvFilter` directive string, e.g. "warn,crm=debug"
pub const LOG_ENV: &str = "CRM_LOG";

/// Install the global subscriber. Logs go to stderr so `--json` output on
/// stdout stays machine-readable.
pub fn init_logging(verbose: bool) {
    let default = if verbose { "warn,crm=debug" } else { "warn,crm=info" };
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
