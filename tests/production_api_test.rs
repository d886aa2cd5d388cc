// ==========================================
// ProductionApi 集成测试
// ==========================================
// 测试范围:
// 1. 对账: 新建 / 刷新 / 历史冻结 / 远期不预测直销
// 2. 人工设定: 设定 / 取消 / 审计日志 / 输入校验
// 3. 查询: 生产计划视图 / 日期范围 / 月度汇总
// ==========================================

mod helpers;
mod test_helpers;

use std::sync::Arc;

use helpers::api_test_helper::*;
use helpers::mock_config::MockConfig;
use jirangan_planner::api::ApiError;
use jirangan_planner::config::config_keys;
use jirangan_planner::domain::types::{ActionType, ReconcileAction};
use test_helpers::*;

fn today() -> chrono::NaiveDate {
    d(2026, 10, 16)
}

/// 产品 Opak: 每批 50 件; 10-15 销售 150 件 (3 批) 作为直销历史
fn seed_basic(env: &ApiTestEnv) -> i64 {
    let opak = insert_product(&env.seed_conn, "Opak", 50);
    insert_sale(&env.seed_conn, "2026-10-15 10:00:00", &[(opak, 150.0)]);
    opak
}

// ==========================================
// 对账
// ==========================================

#[test]
fn test_reconcile_creates_record_from_orders_and_forecast() {
    let env = ApiTestEnv::new(today()).expect("无法创建测试环境");
    let opak = seed_basic(&env);
    insert_order(&env.seed_conn, "2026-10-16", None, &[(opak, 100.0)]);

    let plan = env.production_api.get_production_plan(today()).unwrap();
    assert_eq!(plan.action, ReconcileAction::Created);
    assert_eq!(plan.order_lines.len(), 1);

    let record = plan.record;
    assert!(record.id > 0);
    assert_eq!(record.orders, 2.0);
    // 15 天序列仅最后一天为 3 → 0.3 × 3
    assert!(approx(record.direct_sales, 0.9));
    assert_eq!(record.total, 3.0);
    assert!(!record.is_customized);
}

#[test]
fn test_reconcile_refreshes_existing_record() {
    let env = ApiTestEnv::new(today()).expect("无法创建测试环境");
    let opak = seed_basic(&env);
    insert_order(&env.seed_conn, "2026-10-17", None, &[(opak, 100.0)]);

    let first = env.production_api.reconcile_production(d(2026, 10, 17)).unwrap();
    assert_eq!(first.total, 3.0);

    insert_order(&env.seed_conn, "2026-10-17", None, &[(opak, 50.0)]);
    let plan = env.production_api.get_production_plan(d(2026, 10, 17)).unwrap();
    assert_eq!(plan.action, ReconcileAction::Refreshed);
    assert_eq!(plan.record.id, first.id);
    assert_eq!(plan.record.orders, 3.0);
    assert_eq!(plan.record.total, 4.0);
}

#[test]
fn test_customized_total_survives_repeated_reconcile() {
    let env = ApiTestEnv::new(today()).expect("无法创建测试环境");
    let opak = seed_basic(&env);
    insert_production(&env.seed_conn, "2026-10-16", 1.0, 1.0, 42.0, true);

    for extra in [100.0, 250.0, 500.0] {
        insert_order(&env.seed_conn, "2026-10-16", None, &[(opak, extra)]);
        let record = env.production_api.reconcile_production(today()).unwrap();
        assert_eq!(record.total, 42.0);
        assert!(record.is_customized);
    }

    let record = env.production_api.reconcile_production(today()).unwrap();
    assert_eq!(record.orders, 17.0);
    assert!(approx(record.direct_sales, 0.9));
}

#[test]
fn test_two_days_ahead_has_no_direct_sales() {
    let env = ApiTestEnv::new(today()).expect("无法创建测试环境");
    let opak = seed_basic(&env);
    insert_order(&env.seed_conn, "2026-10-18", None, &[(opak, 120.0)]);

    let record = env.production_api.reconcile_production(d(2026, 10, 18)).unwrap();
    assert_eq!(record.direct_sales, 0.0);
    assert_eq!(record.orders, 2.4);
    assert_eq!(record.total, 2.0);
}

#[test]
fn test_delivery_date_stored_with_time_part_counts_as_order() {
    let env = ApiTestEnv::new(today()).expect("无法创建测试环境");
    let opak = insert_product(&env.seed_conn, "Opak", 50);
    insert_order(&env.seed_conn, "2026-10-16 00:00:00", None, &[(opak, 100.0)]);

    let record = env.production_api.reconcile_production(today()).unwrap();
    assert_eq!(record.orders, 2.0);
    assert_eq!(record.total, 2.0);
}

#[test]
fn test_date_without_orders_stores_positive_zero() {
    let env = ApiTestEnv::new(today()).expect("无法创建测试环境");

    let record = env.production_api.reconcile_production(d(2026, 10, 25)).unwrap();
    assert_eq!(record.orders, 0.0);
    assert!(record.orders.is_sign_positive());
    assert!(record.total.is_sign_positive());

    let json = serde_json::to_string(&record).unwrap();
    assert!(!json.contains("-0.0"), "{}", json);
}

#[test]
fn test_historical_record_is_frozen() {
    let env = ApiTestEnv::new(today()).expect("无法创建测试环境");
    let opak = seed_basic(&env);
    let id = insert_production(&env.seed_conn, "2026-10-10", 1.0, 0.5, 2.0, false);
    insert_order(&env.seed_conn, "2026-10-10", None, &[(opak, 500.0)]);

    let plan = env.production_api.get_production_plan(d(2026, 10, 10)).unwrap();
    assert_eq!(plan.action, ReconcileAction::Frozen);
    assert_eq!(plan.record.id, id);
    assert_eq!(plan.record.orders, 1.0);
    assert_eq!(plan.record.direct_sales, 0.5);
    assert_eq!(plan.record.total, 2.0);
    // 订单明细仍随视图返回
    assert_eq!(plan.order_lines.len(), 1);
}

#[test]
fn test_picked_orders_reduce_direct_sales_history() {
    let env = ApiTestEnv::new(today()).expect("无法创建测试环境");
    let opak = seed_basic(&env);
    // 10-15 已取货订单 150 件 → 当日直销 3 - 3 = 0
    insert_order(
        &env.seed_conn,
        "2026-10-15",
        Some("2026-10-15 09:00:00"),
        &[(opak, 150.0)],
    );

    let record = env.production_api.reconcile_production(today()).unwrap();
    assert_eq!(record.direct_sales, 0.0);
}

#[test]
fn test_alpha_from_injected_config() {
    let env = ApiTestEnv::with_config(today(), Arc::new(MockConfig::with_alpha(1.0)))
        .expect("无法创建测试环境");
    seed_basic(&env);

    // α = 1: 预测值等于最后一个观测值
    let record = env.production_api.reconcile_production(today()).unwrap();
    assert_eq!(record.direct_sales, 3.0);
    assert_eq!(record.total, 3.0);
}

#[test]
fn test_zero_window_means_no_direct_sales() {
    let env = ApiTestEnv::with_config(today(), Arc::new(MockConfig::with_window(0)))
        .expect("无法创建测试环境");
    seed_basic(&env);

    let record = env.production_api.reconcile_production(today()).unwrap();
    assert_eq!(record.direct_sales, 0.0);
}

#[test]
fn test_oversized_configured_window_uses_default() {
    let env = ApiTestEnv::new(today()).expect("无法创建测试环境");
    seed_basic(&env);
    env.config_manager
        .set_global_config_value(config_keys::HISTORY_WINDOW_DAYS, "100000000")
        .unwrap();

    // 回退为 15 天窗口: 0.3 × 3
    let record = env.production_api.reconcile_production(today()).unwrap();
    assert!(approx(record.direct_sales, 0.9));
    assert_eq!(record.total, 1.0);
}

#[test]
fn test_zero_yield_product_contributes_nothing() {
    let env = ApiTestEnv::new(today()).expect("无法创建测试环境");
    let broken = insert_product(&env.seed_conn, "Sample", 0);
    let opak = insert_product(&env.seed_conn, "Opak", 50);
    insert_order(
        &env.seed_conn,
        "2026-10-20",
        None,
        &[(broken, 999.0), (opak, 50.0)],
    );

    let record = env.production_api.reconcile_production(d(2026, 10, 20)).unwrap();
    assert_eq!(record.orders, 1.0);
}

#[test]
fn test_missing_product_propagates_error() {
    let env = ApiTestEnv::new(today()).expect("无法创建测试环境");
    insert_order(&env.seed_conn, "2026-10-16", None, &[(404, 10.0)]);

    let err = env.production_api.reconcile_production(today()).unwrap_err();
    assert!(matches!(err, ApiError::NotFound(_)));
    // 失败时不落库
    assert!(env
        .production_api
        .list_productions(today(), today())
        .unwrap()
        .is_empty());
}

// ==========================================
// 人工设定
// ==========================================

#[test]
fn test_manual_override_cycle_with_audit() {
    let env = ApiTestEnv::new(today()).expect("无法创建测试环境");
    let opak = seed_basic(&env);
    insert_order(&env.seed_conn, "2026-10-16", None, &[(opak, 100.0)]);

    let created = env.production_api.reconcile_production(today()).unwrap();
    assert_eq!(created.total, 3.0);

    let manual = env
        .production_api
        .set_manual_total(created.id, 12.0, "admin")
        .unwrap();
    assert_eq!(manual.total, 12.0);
    assert!(manual.is_customized);

    let again = env.production_api.reconcile_production(today()).unwrap();
    assert_eq!(again.total, 12.0);

    let cleared = env
        .production_api
        .clear_manual_override(created.id, "admin")
        .unwrap();
    assert!(!cleared.is_customized);
    assert_eq!(cleared.total, 12.0);

    let recomputed = env.production_api.reconcile_production(today()).unwrap();
    assert_eq!(recomputed.total, 3.0);

    let logs = env.production_api.list_action_logs(created.id).unwrap();
    assert_eq!(logs.len(), 2);
    assert_eq!(logs[0].parsed_action_type(), Some(ActionType::ClearManualOverride));
    assert_eq!(logs[1].parsed_action_type(), Some(ActionType::SetManualTotal));
    assert_eq!(logs[1].actor, "admin");
    assert_eq!(logs[1].target_date, Some(today()));
    assert_eq!(
        logs[1].payload_json.as_ref().and_then(|p| p["previous_total"].as_f64()),
        Some(3.0)
    );
    assert_eq!(
        logs[1].detail.as_deref(),
        Some("Total produksi 2026-10-16 diubah manual menjadi 12")
    );
}

#[test]
fn test_set_manual_total_validation() {
    let env = ApiTestEnv::new(today()).expect("无法创建测试环境");
    let record = env.production_api.reconcile_production(today()).unwrap();

    for bad in [-1.0, f64::NAN, f64::INFINITY] {
        let err = env
            .production_api
            .set_manual_total(record.id, bad, "admin")
            .unwrap_err();
        assert!(matches!(err, ApiError::InvalidInput(_)));
    }

    assert!(matches!(
        env.production_api.set_manual_total(record.id, 5.0, "  "),
        Err(ApiError::InvalidInput(_))
    ));
    assert!(matches!(
        env.production_api.set_manual_total(9999, 5.0, "admin"),
        Err(ApiError::NotFound(_))
    ));
    assert!(matches!(
        env.production_api.clear_manual_override(9999, "admin"),
        Err(ApiError::NotFound(_))
    ));

    // 校验失败不留审计
    assert!(env.production_api.list_action_logs(record.id).unwrap().is_empty());

    // 0 是合法的人工总量
    let zero = env.production_api.set_manual_total(record.id, 0.0, "admin").unwrap();
    assert_eq!(zero.total, 0.0);
    assert!(zero.is_customized);
}

// ==========================================
// 查询
// ==========================================

#[test]
fn test_list_productions_and_monthly_recap() {
    let env = ApiTestEnv::new(today()).expect("无法创建测试环境");
    insert_production(&env.seed_conn, "2026-10-01", 5.0, 0.0, 5.0, false);
    insert_production(&env.seed_conn, "2026-10-15", 3.0, 1.0, 7.0, true);
    insert_production(&env.seed_conn, "2026-11-01", 9.0, 0.0, 9.0, false);

    let october = env
        .production_api
        .list_productions(d(2026, 10, 1), d(2026, 10, 31))
        .unwrap();
    assert_eq!(october.len(), 2);
    assert_eq!(october[0].date, d(2026, 10, 1));

    let recap = env.production_api.monthly_recap(2026, 10).unwrap();
    assert_eq!(recap.days.len(), 2);
    assert_eq!(recap.grand_total, 12.0);
    assert_eq!(recap.customized_days, 1);

    let december = env.production_api.monthly_recap(2026, 12).unwrap();
    assert!(december.days.is_empty());
    assert_eq!(december.grand_total, 0.0);

    assert!(matches!(
        env.production_api.monthly_recap(2026, 13),
        Err(ApiError::InvalidInput(_))
    ));
    assert!(matches!(
        env.production_api
            .list_productions(d(2026, 10, 31), d(2026, 10, 1)),
        Err(ApiError::InvalidInput(_))
    ));
}
