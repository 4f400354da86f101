use common::{init_structured_logging, LoggingConfig, OperationTimer};

#[test]
fn global_subscriber_installs_once() {
    let config = LoggingConfig {
        level: "debug".to_string(),
        json_output: true,
        color_output: false,
    };
    init_structured_logging(&config).unwrap();

    let mut timer = OperationTimer::new("audit");
    timer.add_field("segment_id", "1");
    timer.finish_with_result(&Err::<(), _>("Invalid API Key"));

    // A second subscriber is refused rather than silently replacing the first
    assert!(init_structured_logging(&LoggingConfig::default()).is_err());
}

