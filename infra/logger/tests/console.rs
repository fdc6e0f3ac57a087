use waitlist_logger::{Logger, LoggerError};

#[test]
fn console_logger_is_installed_once_per_process() {
    let logger = Logger::builder()
        .name(env!("CARGO_PKG_NAME"))
        .env_filter("waitlist=debug,surrealdb=warn,tower_http=info")
        .init()
        .expect("console logger");
    assert!(logger.guard().is_none());

    tracing::debug!(route = "/api/register", "visible through the waitlist directive");

    let second = Logger::builder().name("waitlist-server").init();
    assert!(matches!(second, Err(LoggerError::Subscriber { .. })));
}
