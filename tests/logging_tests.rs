use maxbridge::logging::{LogContext, get_logger_with_context, min_level, parse_log_level};
use tracing::Level;

#[test]
fn parses_levels_case_insensitively() {
    assert_eq!(parse_log_level("info").unwrap(), Level::INFO);
    assert_eq!(parse_log_level(" WARNING ").unwrap(), Level::WARN);
    assert!(parse_log_level("loud").is_err());
}

#[test]
fn min_level_picks_more_verbose() {
    assert_eq!(min_level(Level::INFO, Level::DEBUG), Level::DEBUG);
    assert_eq!(min_level(Level::ERROR, Level::WARN), Level::WARN);
}

#[test]
fn logger_keeps_context() {
    let logger = get_logger_with_context(
        LogContext::new("device_handler")
            .with_cube("0a1b2c")
            .with_device("123456"),
    );
    assert_eq!(logger.context().component, "device_handler");
    assert_eq!(logger.context().cube.as_deref(), Some("0a1b2c"));
    // Logging before init is a no-op rather than a panic
    logger.info("not initialised yet");
}
