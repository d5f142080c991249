//! `init` creates the session, stores the configuration and starts logging.

use dirlog_core::config::EXPERIMENTS_DIR_ENV;
use dirlog_core::global::{self, InitOptions};
use dirlog_core::naming::{default_label, leaf_label};
use dirlog_core::LogOptions;

#[test]
fn init_sets_up_config_and_logs() {
    let root = tempfile::tempdir().unwrap();
    std::env::set_var("HOME", root.path());
    std::env::set_var(EXPERIMENTS_DIR_ENV, root.path());

    let configs: toml::Table = toml::from_str("model = \"mlp\"\nhidden = 128").unwrap();
    let dir = global::init(InitOptions {
        configs,
        logging: Some(LogOptions {
            stream: false,
            ..LogOptions::default()
        }),
        dev_mode: false,
    })
    .unwrap();

    let label = default_label();
    let project = dirlog_core::normalize_label(&label);
    assert_eq!(dir.parent().unwrap(), root.path().join(&project));
    let leaf = dir.file_name().unwrap().to_string_lossy().into_owned();
    assert!(leaf.ends_with(&format!("_{}", leaf_label(&label))));
    assert!(dirlog_core::enumerate::parse_dir_timestamp(&leaf).is_ok());

    tracing::info!("training started");

    let configs = std::fs::read_to_string(dir.join("configs.toml")).unwrap();
    assert!(configs.contains("model = \"mlp\""));
    let logs = std::fs::read_to_string(dir.join("logs.txt")).unwrap();
    assert!(logs.contains(" INFO     training started"));

    // A second global subscriber cannot be installed.
    assert!(global::slogs(&LogOptions::default()).is_err());
}
