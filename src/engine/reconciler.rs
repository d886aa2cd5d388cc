// ==========================================
// 生产预测核心 - 生产目标对账引擎
// ==========================================
// 职责: 订单需求 + 直销预测 → 每日生产目标
// 红线: is_customized=true 时 total 不被自动重算
// 红线: 仅今日/明日参与自动刷新,历史与远期记录只读
// 红线: Engine 不拼 SQL,持久化由 API 层完成
// ==========================================

use chrono::NaiveDate;
use tracing::instrument;

use crate::domain::demand::{to_jirangan, OrderLine};
use crate::domain::production::ProductionRecord;
use crate::domain::series::DailyDemandSeries;
use crate::domain::types::ReconcileAction;
use crate::engine::smoothing::DemandForecaster;

// ==========================================
// ReconcileOutcome - 对账结果
// ==========================================
#[derive(Debug, Clone, PartialEq)]
pub struct ReconcileOutcome {
    pub record: ProductionRecord,
    pub action: ReconcileAction,
}

// ==========================================
// ProductionReconciler - 生产目标对账器
// ==========================================
#[derive(Debug, Default, Clone, Copy)]
pub struct ProductionReconciler;

impl ProductionReconciler {
    pub fn new() -> Self {
        Self
    }

    /// 目标日期是否处于自动刷新窗口（今日或明日）
    pub fn is_auto_window(target_date: NaiveDate, today: NaiveDate) -> bool {
        let offset = (target_date - today).num_days();
        offset == 0 || offset == 1
    }

    /// 订单需求折算: Σ qty / produce_per_jirangan
    ///
    /// 折算系数 ≤ 0 的明细跳过（计 0）并告警
    #[instrument(skip(self, lines), fields(lines = lines.len()))]
    pub fn orders_jirangan(&self, lines: &[OrderLine]) -> f64 {
        lines
            .iter()
            .map(|line| match to_jirangan(line.qty, line.produce_per_jirangan) {
                Some(j) => j,
                None => {
                    tracing::warn!(
                        order_id = line.order_id,
                        product_id = line.product_id,
                        produce_per_jirangan = line.produce_per_jirangan,
                        "产品每批产出非正数,订单明细不计入需求"
                    );
                    0.0
                }
            })
            .fold(0.0, |acc, j| acc + j)
    }

    /// 直销批次预测
    ///
    /// 非今日/明日直接返回 0, 不读取历史也不调用预测器;
    /// 预测结果为负时截断为 0
    ///
    /// # 参数
    /// - `load_history`: 延迟加载直销序列（通常为昨日结束的 15 天窗口）
    pub fn forecast_direct_sales<E, F>(
        &self,
        target_date: NaiveDate,
        today: NaiveDate,
        forecaster: &dyn DemandForecaster,
        load_history: F,
    ) -> Result<f64, E>
    where
        F: FnOnce() -> Result<DailyDemandSeries, E>,
    {
        if !Self::is_auto_window(target_date, today) {
            return Ok(0.0);
        }

        let history = load_history()?;
        let predicted = forecaster.forecast(history.values());
        tracing::debug!(
            target_date = %target_date,
            history_days = history.len(),
            predicted,
            "直销批次预测完成"
        );
        Ok(predicted.max(0.0))
    }

    /// 合并已有记录与新的需求构成
    ///
    /// 规则:
    /// 1) 无记录 → 新建, total = round(orders + direct_sales)
    /// 2) 今日/明日 → 刷新 orders/direct_sales; 未定制时刷新 total
    /// 3) 其他日期 → 原样返回
    #[instrument(skip(self, existing), fields(target_date = %target_date))]
    pub fn reconcile(
        &self,
        existing: Option<ProductionRecord>,
        target_date: NaiveDate,
        today: NaiveDate,
        orders_jirangan: f64,
        direct_sales_jirangan: f64,
    ) -> ReconcileOutcome {
        let Some(mut record) = existing else {
            return ReconcileOutcome {
                record: ProductionRecord::draft(target_date, orders_jirangan, direct_sales_jirangan),
                action: ReconcileAction::Created,
            };
        };

        if !Self::is_auto_window(target_date, today) {
            return ReconcileOutcome {
                record,
                action: ReconcileAction::Frozen,
            };
        }

        record.orders = orders_jirangan;
        record.direct_sales = direct_sales_jirangan;
        if !record.is_customized {
            record.total = ProductionRecord::computed_total(orders_jirangan, direct_sales_jirangan);
        }

        ReconcileOutcome {
            record,
            action: ReconcileAction::Refreshed,
        }
    }

    /// 人工设定总量: 冻结自动重算
    pub fn apply_manual_total(&self, mut record: ProductionRecord, total: f64) -> ProductionRecord {
        record.total = total;
        record.is_customized = true;
        record
    }

    /// 取消人工设定: 下次对账时恢复自动计算
    pub fn clear_manual_override(&self, mut record: ProductionRecord) -> ProductionRecord {
        record.is_customized = false;
        record
    }
}
