use tracing_subscriber::EnvFilter;

pub const ENV_LOG_FORMAT: &str = "LOG_FORMAT";

/// Install the global subscriber. Logs go to stderr so stdout stays free for
/// command output; `LOG_FORMAT=json` switches to one JSON object per line.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    if std::env::var(ENV_LOG_FORMAT).is_ok_and(|f| f.eq_ignore_ascii_case("json")) {
        builder.json().init();
    } else {
        builder.init();
    }
}
