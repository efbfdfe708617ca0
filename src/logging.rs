/// Install the tracing subscriber for standalone binaries and tests.
///
/// The library itself never installs a global subscriber; embedders decide.
/// Filtering is controlled via `POCKETBOOK_LOG`.
pub fn init() {
    let _ = tracing_log::LogTracer::init();
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("POCKETBOOK_LOG").unwrap_or_else(|_| "pocketbook=info,sqlx=warn".into()),
        )
        .with_target(true)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .try_init();
}
