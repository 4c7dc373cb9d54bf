use marketpulse_pipeline::PipelineConfig;

#[test]
fn default_points_at_production() {
    let config = PipelineConfig::default();
    assert_eq!(config.api_base_url, "https://api.marketpulse.io/v2");
    assert_eq!(config.request_timeout_secs, 30);
}

#[test]
fn events_url_joins_fixed_path() {
    let config = PipelineConfig {
        api_base_url: "http://localhost:3002".to_string(),
        ..PipelineConfig::default()
    };
    assert_eq!(config.events_url(), "http://localhost:3002/events");
}

#[test]
fn events_url_tolerates_trailing_slash() {
    let config = PipelineConfig {
        api_base_url: "http://localhost:3002/".to_string(),
        ..PipelineConfig::default()
    };
    assert_eq!(config.events_url(), "http://localhost:3002/events");
}

#[test]
fn config_round_trips_through_json() {
    let config = PipelineConfig::default();
    let json = serde_json::to_string(&config).unwrap();
    let decoded: PipelineConfig = serde_json::from_str(&json).unwrap();
    assert_eq!(decoded.api_base_url, config.api_base_url);
    assert_eq!(decoded.request_timeout_secs, config.request_timeout_secs);
}
