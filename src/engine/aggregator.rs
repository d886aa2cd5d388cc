// ==========================================
// 生产预测核心 - 时间序列聚合引擎
// ==========================================
// 职责: 从交易记录提取参考日之前 N 天的日需求序列
// 红线: 输出长度恒为 N,无记录的日期补 0.0
// 红线: Engine 不拼 SQL,记录由仓储层按窗口读取后传入
// ==========================================

use chrono::{Duration, NaiveDate};
use tracing::instrument;

use crate::domain::demand::{to_jirangan, OrderLine, SaleLine};
use crate::domain::series::DailyDemandSeries;

/// 默认历史窗口天数
pub const DEFAULT_HISTORY_WINDOW_DAYS: usize = 15;

/// 可配置的历史窗口上限（10 年）
pub const MAX_HISTORY_WINDOW_DAYS: usize = 3650;

// ==========================================
// HistoryWindow - 历史窗口
// ==========================================
/// 参考日(不含)之前的 N 个连续日历日
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HistoryWindow {
    pub reference_date: NaiveDate,
    pub days: usize,
}

impl HistoryWindow {
    /// 创建窗口
    ///
    /// 窗口首日超出可表示日期范围时退化为空窗口（预测为 0）
    pub fn new(reference_date: NaiveDate, days: usize) -> Self {
        if Self::offset_start(reference_date, days).is_none() {
            tracing::warn!(
                %reference_date,
                days,
                "历史窗口超出日期范围,按空窗口处理"
            );
            return Self {
                reference_date,
                days: 0,
            };
        }
        Self {
            reference_date,
            days,
        }
    }

    fn offset_start(reference_date: NaiveDate, days: usize) -> Option<NaiveDate> {
        i64::try_from(days)
            .ok()
            .and_then(Duration::try_days)
            .and_then(|span| reference_date.checked_sub_signed(span))
    }

    /// 窗口首日（含）
    pub fn start_date(&self) -> NaiveDate {
        Self::offset_start(self.reference_date, self.days).unwrap_or(self.reference_date)
    }

    /// 窗口末日（含）, 即参考日前一天
    pub fn end_date(&self) -> NaiveDate {
        self.reference_date.pred_opt().unwrap_or(self.reference_date)
    }

    pub fn empty_series(&self) -> DailyDemandSeries {
        DailyDemandSeries::zeros(self.start_date(), self.days)
    }
}

// ==========================================
// TimeSeriesAggregator - 时间序列聚合器
// ==========================================
#[derive(Debug, Default, Clone, Copy)]
pub struct TimeSeriesAggregator;

impl TimeSeriesAggregator {
    pub fn new() -> Self {
        Self
    }

    /// 生产量序列: 每日 productions.total 之和
    ///
    /// # 参数
    /// - `daily_totals`: (日期, total) 列表,窗口外日期被忽略
    #[instrument(skip(self, daily_totals), fields(window = window.days, rows = daily_totals.len()))]
    pub fn production_volume_series(
        &self,
        window: HistoryWindow,
        daily_totals: &[(NaiveDate, f64)],
    ) -> DailyDemandSeries {
        let mut series = window.empty_series();
        for (date, total) in daily_totals {
            series.add(*date, *total);
        }
        series
    }

    /// 直销序列: 每日 max(0, 销售批次 - 已取货订单批次)
    ///
    /// 口径:
    /// - 销售按 sales.created_at 的日历日归集
    /// - 订单按交货日 orders.date 归集,且仅统计已取货订单
    /// - 折算系数 ≤ 0 的明细计 0
    #[instrument(skip(self, sale_lines, order_lines), fields(
        window = window.days,
        sale_lines = sale_lines.len(),
        order_lines = order_lines.len()
    ))]
    pub fn direct_sales_series(
        &self,
        window: HistoryWindow,
        sale_lines: &[SaleLine],
        order_lines: &[OrderLine],
    ) -> DailyDemandSeries {
        let mut sold = window.empty_series();
        for line in sale_lines {
            if let Some(j) = to_jirangan(line.qty, line.produce_per_jirangan) {
                sold.add(line.sold_at.date(), j);
            }
        }

        let mut ordered = window.empty_series();
        for line in order_lines.iter().filter(|l| l.is_picked_up()) {
            if let Some(j) = to_jirangan(line.qty, line.produce_per_jirangan) {
                ordered.add(line.delivery_date, j);
            }
        }

        let mut direct = window.empty_series();
        for ((date, s), (_, o)) in sold.iter_days().zip(ordered.iter_days()) {
            direct.add(date, s - o);
        }
        direct.map_values(|v| v.max(0.0));
        direct
    }
}
