// ==========================================
// AppState 装配测试
// ==========================================
// 测试范围: 建表幂等、跨实例持久化、配置读写
// ==========================================

mod test_helpers;

use std::sync::Arc;

use chrono::NaiveDate;
use jirangan_planner::app::AppState;
use jirangan_planner::config::{config_keys, ForecastConfigReader};
use jirangan_planner::db::{open_sqlite_connection, read_schema_version, CURRENT_SCHEMA_VERSION};
use jirangan_planner::engine::FixedClock;
use tempfile::NamedTempFile;

fn clock() -> Arc<FixedClock> {
    Arc::new(FixedClock::at_date(NaiveDate::from_ymd_opt(2026, 10, 16).unwrap()))
}

#[test]
fn test_fresh_database_is_initialized() {
    let temp = NamedTempFile::new().unwrap();
    let db_path = temp.path().to_str().unwrap().to_string();

    let state = AppState::with_clock(db_path.clone(), clock()).unwrap();
    assert_eq!(state.db_path, db_path);

    let conn = open_sqlite_connection(&db_path).unwrap();
    assert_eq!(read_schema_version(&conn).unwrap(), Some(CURRENT_SCHEMA_VERSION));
}

#[test]
fn test_records_persist_across_instances() {
    let (_temp, db_path) = test_helpers::create_test_db().unwrap();
    let today = NaiveDate::from_ymd_opt(2026, 10, 16).unwrap();

    let first = AppState::with_clock(db_path.clone(), clock()).unwrap();
    let record = first.production_api.reconcile_production(today).unwrap();
    first
        .production_api
        .set_manual_total(record.id, 7.0, "admin")
        .unwrap();
    drop(first);

    let second = AppState::with_clock(db_path, clock()).unwrap();
    let reloaded = second.production_api.reconcile_production(today).unwrap();
    assert_eq!(reloaded.id, record.id);
    assert_eq!(reloaded.total, 7.0);
    assert!(reloaded.is_customized);
    assert_eq!(second.production_api.list_action_logs(record.id).unwrap().len(), 1);
}

#[test]
fn test_config_written_through_manager_is_read_back() {
    let (_temp, db_path) = test_helpers::create_test_db().unwrap();
    let state = AppState::with_clock(db_path, clock()).unwrap();

    state
        .config_manager
        .set_global_config_value(config_keys::SMOOTHING_ALPHA, "0.6")
        .unwrap();
    assert_eq!(state.config_manager.get_smoothing_alpha().unwrap(), 0.6);
    assert_eq!(
        state
            .config_manager
            .get_global_config_value(config_keys::SMOOTHING_ALPHA)
            .unwrap()
            .as_deref(),
        Some("0.6")
    );
    assert_eq!(
        state
            .config_manager
            .get_global_config_value(config_keys::DISPLAY_LOCALE)
            .unwrap(),
        None
    );
    assert_eq!(
        state.config_manager.get_config_snapshot().unwrap(),
        r#"{"smoothing_alpha":"0.6"}"#
    );
}
