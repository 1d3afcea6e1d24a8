use ads_metrics::{MetricsConfig, MetricsError};
use std::path::PathBuf;

fn scratch_path(name: &str) -> PathBuf {
    std::env::temp_dir()
        .join(format!("ads-metrics-{}-{}", std::process::id(), name))
        .join("metrics.toml")
}

#[test]
fn defaults_match_reference_constants() {
    let config = MetricsConfig::default();

    assert_eq!(config.strategy.google_base_roas, 6.0);
    assert_eq!(config.strategy.facebook_base_roas, 5.0);
    assert_eq!(config.optimization.pmax_healthy_roas, 2.5);
    assert_eq!(config.simulation.scale_factors, vec![1.0, 1.5, 2.0, 3.0]);
    assert_eq!(config.tools.significance_z, 1.96);
    assert_eq!(config.diagnosis.roas_gap_pct, -10.0);
    assert_eq!(config.diagnosis.spend_rate_pct, 95.0);
}

#[test]
fn written_config_reads_back() {
    let path = scratch_path("roundtrip");
    let mut config = MetricsConfig::default();
    config.tools.significance_z = 2.58;
    config.simulation.scale_factors = vec![1.0, 4.0];

    config.write(&path).expect("write config");
    let loaded = MetricsConfig::read(&path).expect("read config");
    assert_eq!(loaded, config);

    let _ = std::fs::remove_dir_all(path.parent().unwrap_or(&path));
}

#[test]
fn partial_file_keeps_other_defaults() {
    let path = scratch_path("partial");
    std::fs::create_dir_all(path.parent().expect("parent")).expect("mkdir");
    std::fs::write(&path, "[strategy]\ngoogle_base_roas = 7.5\n").expect("write");

    let loaded = MetricsConfig::read(&path).expect("read config");
    assert_eq!(loaded.strategy.google_base_roas, 7.5);
    assert_eq!(loaded.strategy.facebook_base_roas, 5.0);
    assert_eq!(loaded.tools, MetricsConfig::default().tools);

    let _ = std::fs::remove_dir_all(path.parent().unwrap_or(&path));
}

#[test]
fn missing_file_falls_back_to_defaults() {
    let path = scratch_path("missing");
    let (config, resolved) = MetricsConfig::load(Some(path.clone())).expect("load");

    assert_eq!(resolved, Some(path));
    assert_eq!(config.strategy, MetricsConfig::default().strategy);
}

#[test]
fn malformed_file_is_a_parse_error() {
    let path = scratch_path("malformed");
    std::fs::create_dir_all(path.parent().expect("parent")).expect("mkdir");
    std::fs::write(&path, "[tools\nsignificance_z = ").expect("write");

    let err = MetricsConfig::read(&path).expect_err("malformed toml");
    assert!(matches!(err, MetricsError::ConfigParse(_)));

    let _ = std::fs::remove_dir_all(path.parent().unwrap_or(&path));
}
