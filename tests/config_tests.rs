use tempfile::tempdir;
use wallet_core::config::{Config, ConfigManager};
use wallet_core::services::UnpaidStatementPolicy;

#[test]
fn load_without_file_returns_defaults() {
    let dir = tempdir().expect("tempdir");
    let manager = ConfigManager::with_base_dir(dir.path().to_path_buf()).expect("manager");
    assert_eq!(manager.load().expect("load"), Config::default());
}

#[test]
fn saved_config_round_trips_through_disk() {
    let dir = tempdir().expect("tempdir");
    let manager = ConfigManager::with_base_dir(dir.path().join("nested")).expect("manager");
    let config = Config {
        locale: "en-US".into(),
        currency: "USD".into(),
        unpaid_statement_policy: UnpaidStatementPolicy::SumUnpaid,
        installment_cycle_months: 2,
    };
    manager.save(&config).expect("save");
    assert!(manager.config_path().exists());
    assert!(!manager.config_path().with_extension("json.tmp").exists());
    assert_eq!(manager.load().expect("load"), config);
}

#[test]
fn invalid_config_is_not_written() {
    let dir = tempdir().expect("tempdir");
    let manager = ConfigManager::with_base_dir(dir.path().to_path_buf()).expect("manager");
    let config = Config {
        installment_cycle_months: 0,
        ..Config::default()
    };
    let err = manager.save(&config).expect_err("zero-month cycle");
    assert_eq!(err.field(), Some("installmentCycleMonths"));
    assert!(!manager.config_path().exists());
}

#[test]
fn corrupt_file_reports_serialization_error() {
    let dir = tempdir().expect("tempdir");
    let manager = ConfigManager::with_base_dir(dir.path().to_path_buf()).expect("manager");
    std::fs::write(manager.config_path(), "{ not json").expect("write");
    let err = manager.load().expect_err("corrupt config");
    assert!(matches!(err, wallet_core::LedgerError::Serialization(_)), "{err:?}");
}
