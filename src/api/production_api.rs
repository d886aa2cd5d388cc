// ==========================================
// 生产预测核心 - 生产计划 API
// ==========================================
// 职责: 每日生产目标对账、人工设定总量、历史/月度查询
// 红线: 人工设定的 total 不被自动重算覆盖
// 红线: 人工干预必须写 ActionLog,与记录更新同事务提交
// ==========================================

use std::sync::Arc;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, info, instrument};

use crate::api::error::{ApiError, ApiResult};
use crate::config::forecast_config_trait::{ForecastConfigReader, ForecastSettings};
use crate::domain::action_log::ActionLog;
use crate::domain::demand::OrderLine;
use crate::domain::production::{ProductionRecap, ProductionRecapDay, ProductionRecord};
use crate::domain::series::DailyDemandSeries;
use crate::domain::types::{ActionType, ReconcileAction};
use crate::engine::aggregator::{HistoryWindow, TimeSeriesAggregator};
use crate::engine::clock::Clock;
use crate::engine::reconciler::{ProductionReconciler, ReconcileOutcome};
use crate::engine::smoothing::ExponentialSmoothing;
use crate::i18n;
use crate::repository::action_log_repo::ActionLogRepository;
use crate::repository::error::RepositoryError;
use crate::repository::order_repo::OrderRepository;
use crate::repository::production_repo::ProductionRepository;
use crate::repository::sale_repo::SaleRepository;

// ==========================================
// ProductionPlanView - 生产计划视图
// ==========================================
/// 某日的生产目标 + 当日交货的订单明细
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductionPlanView {
    pub record: ProductionRecord,
    pub action: ReconcileAction,
    pub order_lines: Vec<OrderLine>,
}

// ==========================================
// ProductionApi - 生产计划 API
// ==========================================
pub struct ProductionApi {
    production_repo: Arc<ProductionRepository>,
    order_repo: Arc<OrderRepository>,
    sale_repo: Arc<SaleRepository>,
    action_log_repo: Arc<ActionLogRepository>,
    config: Arc<dyn ForecastConfigReader>,
    clock: Arc<dyn Clock>,
    reconciler: ProductionReconciler,
    aggregator: TimeSeriesAggregator,
}

impl ProductionApi {
    pub fn new(
        production_repo: Arc<ProductionRepository>,
        order_repo: Arc<OrderRepository>,
        sale_repo: Arc<SaleRepository>,
        action_log_repo: Arc<ActionLogRepository>,
        config: Arc<dyn ForecastConfigReader>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            production_repo,
            order_repo,
            sale_repo,
            action_log_repo,
            config,
            clock,
            reconciler: ProductionReconciler::new(),
            aggregator: TimeSeriesAggregator::new(),
        }
    }

    fn settings(&self) -> ApiResult<ForecastSettings> {
        self.config
            .get_forecast_settings()
            .map_err(|e| ApiError::ConfigError(e.to_string()))
    }

    // ==========================================
    // 对账
    // ==========================================

    /// 对账指定日期的生产目标,返回落库后的记录
    pub fn reconcile_production(&self, date: NaiveDate) -> ApiResult<ProductionRecord> {
        let (outcome, _) = self.reconcile_with_lines(date)?;
        Ok(outcome.record)
    }

    /// 生产计划页: 对账后的记录 + 当日订单明细
    pub fn get_production_plan(&self, date: NaiveDate) -> ApiResult<ProductionPlanView> {
        let (outcome, order_lines) = self.reconcile_with_lines(date)?;
        Ok(ProductionPlanView {
            record: outcome.record,
            action: outcome.action,
            order_lines,
        })
    }

    #[instrument(skip(self), fields(date = %date))]
    fn reconcile_with_lines(&self, date: NaiveDate) -> ApiResult<(ReconcileOutcome, Vec<OrderLine>)> {
        let today = self.clock.today();
        let settings = self.settings()?;

        let order_lines = self.order_repo.find_lines_by_delivery_date(date)?;
        let orders_jirangan = self.reconciler.orders_jirangan(&order_lines);

        let forecaster = ExponentialSmoothing::new(settings.smoothing_alpha);
        let direct_sales_jirangan =
            self.reconciler
                .forecast_direct_sales(date, today, &forecaster, || {
                    self.load_direct_sales_history(today, settings.history_window_days)
                })?;

        // 读-改-写在同一事务内完成; 历史读取已在事务外完成,避免重入连接锁
        let reconciler = self.reconciler;
        let outcome = self.production_repo.with_transaction(|tx| {
            let existing = ProductionRepository::find_by_date_in(tx, date)?;
            let outcome =
                reconciler.reconcile(existing, date, today, orders_jirangan, direct_sales_jirangan);

            let record = match outcome.action {
                ReconcileAction::Created => ProductionRepository::insert_in(tx, &outcome.record)?,
                ReconcileAction::Refreshed => {
                    ProductionRepository::update_in(tx, &outcome.record)?;
                    outcome.record.clone()
                }
                ReconcileAction::Frozen => outcome.record.clone(),
            };

            Ok(ReconcileOutcome {
                record,
                action: outcome.action,
            })
        })?;

        info!(
            production_id = outcome.record.id,
            action = %outcome.action,
            orders = outcome.record.orders,
            direct_sales = outcome.record.direct_sales,
            total = outcome.record.total,
            is_customized = outcome.record.is_customized,
            "生产目标对账完成"
        );

        Ok((outcome, order_lines))
    }

    /// 直销历史序列: 参考日为今日,窗口结束于昨日
    fn load_direct_sales_history(
        &self,
        today: NaiveDate,
        window_days: usize,
    ) -> ApiResult<DailyDemandSeries> {
        let window = HistoryWindow::new(today, window_days);
        if window_days == 0 {
            return Ok(window.empty_series());
        }

        let sale_lines = self
            .sale_repo
            .find_lines_between(window.start_date(), window.end_date())?;
        let picked_orders = self
            .order_repo
            .find_picked_lines_between(window.start_date(), window.end_date())?;

        let series = self
            .aggregator
            .direct_sales_series(window, &sale_lines, &picked_orders);
        debug!(values = ?series.values(), "直销历史序列");
        Ok(series)
    }

    // ==========================================
    // 人工设定
    // ==========================================

    /// 人工设定生产总量,冻结自动重算
    ///
    /// # 参数
    /// - production_id: 生产记录ID
    /// - total: 人工总量（有限且非负）
    /// - actor: 操作人
    #[instrument(skip(self))]
    pub fn set_manual_total(
        &self,
        production_id: i64,
        total: f64,
        actor: &str,
    ) -> ApiResult<ProductionRecord> {
        if !total.is_finite() || total < 0.0 {
            return Err(ApiError::InvalidInput(format!(
                "生产总量必须为非负有限数: {}",
                total
            )));
        }
        let actor = Self::validate_actor(actor)?;
        let settings = self.settings()?;
        let now = self.clock.now();
        let reconciler = self.reconciler;

        let record = self.production_repo.with_transaction(|tx| {
            let current = ProductionRepository::find_by_id_in(tx, production_id)?
                .ok_or_else(|| not_found(production_id))?;
            let previous_total = current.total;
            let previous_customized = current.is_customized;

            let updated = reconciler.apply_manual_total(current, total);
            ProductionRepository::update_in(tx, &updated)?;

            let date_str = updated.date.to_string();
            let total_str = total.to_string();
            let log = ActionLog::new(ActionType::SetManualTotal, actor, now)
                .with_production(updated.id, updated.date)
                .with_payload(&json!({
                    "total": total,
                    "previous_total": previous_total,
                    "previous_is_customized": previous_customized,
                }))
                .with_detail(i18n::t_with_args(
                    "production.manual_total_set",
                    &settings.display_locale,
                    &[("date", date_str.as_str()), ("total", total_str.as_str())],
                ));
            ActionLogRepository::insert_in(tx, &log)?;
            Ok(updated)
        })?;

        info!(production_id, total, actor, "生产总量已人工设定");
        Ok(record)
    }

    /// 取消人工设定,下次对账时恢复自动计算
    #[instrument(skip(self))]
    pub fn clear_manual_override(
        &self,
        production_id: i64,
        actor: &str,
    ) -> ApiResult<ProductionRecord> {
        let actor = Self::validate_actor(actor)?;
        let settings = self.settings()?;
        let now = self.clock.now();
        let reconciler = self.reconciler;

        let record = self.production_repo.with_transaction(|tx| {
            let current = ProductionRepository::find_by_id_in(tx, production_id)?
                .ok_or_else(|| not_found(production_id))?;

            let updated = reconciler.clear_manual_override(current);
            ProductionRepository::update_in(tx, &updated)?;

            let date_str = updated.date.to_string();
            let log = ActionLog::new(ActionType::ClearManualOverride, actor, now)
                .with_production(updated.id, updated.date)
                .with_payload(&json!({ "total": updated.total }))
                .with_detail(i18n::t_with_args(
                    "production.manual_override_cleared",
                    &settings.display_locale,
                    &[("date", date_str.as_str())],
                ));
            ActionLogRepository::insert_in(tx, &log)?;
            Ok(updated)
        })?;

        info!(production_id, actor, "人工设定已取消");
        Ok(record)
    }

    fn validate_actor(actor: &str) -> ApiResult<&str> {
        let actor = actor.trim();
        if actor.is_empty() {
            return Err(ApiError::InvalidInput("操作人不能为空".to_string()));
        }
        Ok(actor)
    }

    // ==========================================
    // 查询
    // ==========================================

    /// 查询日期范围内已落库的生产记录（不触发对账）
    pub fn list_productions(
        &self,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> ApiResult<Vec<ProductionRecord>> {
        if start_date > end_date {
            return Err(ApiError::InvalidInput(format!(
                "开始日期{}晚于结束日期{}",
                start_date, end_date
            )));
        }
        Ok(self.production_repo.find_between(start_date, end_date)?)
    }

    /// 月度生产汇总
    pub fn monthly_recap(&self, year: i32, month: u32) -> ApiResult<ProductionRecap> {
        let first = NaiveDate::from_ymd_opt(year, month, 1)
            .ok_or_else(|| ApiError::InvalidInput(format!("无效月份: {}-{}", year, month)))?;
        let (next_year, next_month) = if month == 12 {
            (year + 1, 1)
        } else {
            (year, month + 1)
        };
        let last = NaiveDate::from_ymd_opt(next_year, next_month, 1)
            .and_then(|d| d.pred_opt())
            .ok_or_else(|| ApiError::InvalidInput(format!("无效月份: {}-{}", year, month)))?;

        let records = self.production_repo.find_between(first, last)?;
        let days: Vec<ProductionRecapDay> = records
            .iter()
            .map(|r| ProductionRecapDay {
                date: r.date,
                total: r.total,
                is_customized: r.is_customized,
            })
            .collect();

        Ok(ProductionRecap {
            year: first.year(),
            month: first.month(),
            grand_total: days.iter().fold(0.0, |acc, d| acc + d.total),
            customized_days: days.iter().filter(|d| d.is_customized).count(),
            days,
        })
    }

    /// 查询生产记录的人工干预日志（按时间倒序）
    pub fn list_action_logs(&self, production_id: i64) -> ApiResult<Vec<ActionLog>> {
        Ok(self.action_log_repo.find_by_production_id(production_id)?)
    }
}

fn not_found(production_id: i64) -> RepositoryError {
    RepositoryError::NotFound {
        entity: "Production".to_string(),
        id: production_id.to_string(),
    }
}
