use std::io::Write;

use assert_approx_eq::assert_approx_eq;
use robosim_apps::{Error, SimulatorConfig};

#[test]
fn load_config_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r#"
        publish_rate_hz = 20.0
        joint_names = ["j1", "j2"]
        "#
    )
    .unwrap();
    let config = SimulatorConfig::try_new(file.path()).unwrap();
    assert_approx_eq!(config.publish_rate_hz, 20.0);
    assert_eq!(config.joint_names, vec!["j1".to_owned(), "j2".to_owned()]);
}

#[test]
fn load_config_missing_file() {
    let err = SimulatorConfig::try_new("/nonexistent/robosim.toml").unwrap_err();
    assert!(matches!(err, Error::NoFile(..)));
}

#[test]
fn load_config_broken_toml() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, "publish_rate_hz = ").unwrap();
    let err = SimulatorConfig::try_new(file.path()).unwrap_err();
    assert!(matches!(err, Error::TomlParseFailure(..)));
}

#[test]
fn load_config_rejects_invalid_rate() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, "publish_rate_hz = -5.0").unwrap();
    let err = SimulatorConfig::try_new(file.path()).unwrap_err();
    assert!(matches!(err, Error::InvalidPublishRate(rate) if rate == -5.0));
}
