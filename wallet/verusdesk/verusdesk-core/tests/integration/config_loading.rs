use tempfile::tempdir;
use verusdesk_core::application::open_store;
use verusdesk_core::foundation::ErrorCode;
use verusdesk_core::infrastructure::config::{load_app_config_from_path, CONFIG_FILE_NAME};

#[test]
fn invalid_file_reports_every_problem_at_once() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join(CONFIG_FILE_NAME);
    std::fs::write(
        &path,
        r#"
        [node]
        rpc_url = "127.0.0.1:27486"
        rpc_password = "secret"
        timeout_secs = 0

        [offers]
        default_fee = -0.5
    "#,
    )
    .expect("write");

    let err = load_app_config_from_path(&path, dir.path()).expect_err("invalid config");
    assert_eq!(err.code(), ErrorCode::ConfigError);
    let message = err.to_string();
    for fragment in ["node.rpc_url", "node.rpc_password", "node.timeout_secs", "offers.default_fee"] {
        assert!(message.contains(fragment), "missing {fragment} in {message}");
    }
    assert!(!message.contains("secret"));
}

#[test]
fn valid_file_opens_the_configured_store() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join(CONFIG_FILE_NAME);
    std::fs::write(&path, "[node]\nrpc_user = \"rpcuser\"\nrpc_password = \"rpcpass\"\n\n[offers]\ndefault_fee = 0.0001\n").expect("write");

    let config = load_app_config_from_path(&path, dir.path()).expect("config");
    assert_eq!(config.offers.default_fee, Some(0.0001));
    assert_eq!(config.storage.data_dir, dir.path().to_string_lossy());

    let store = open_store(&config.storage).expect("store");
    store.set("open_check", &serde_json::json!(1)).expect("set");
    assert!(dir.path().join("desk-state").exists());
}
