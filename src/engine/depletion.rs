// ==========================================
// 生产预测核心 - 原料耗尽预估引擎
// ==========================================
// 算法: 按日扣减 (预测批次 × 单耗),直到库存 ≤ 0
// 红线: 结果仅用于展示,不落库,不修改库存
// ==========================================

use chrono::{Duration, NaiveDate};
use tracing::instrument;

use crate::domain::material::MaterialStock;
use crate::domain::types::DepletionEstimate;

/// 默认预估视野（5 年）
pub const DEFAULT_DEPLETION_HORIZON_DAYS: u32 = 365 * 5;

/// 可配置的预估视野上限（100 年）
pub const MAX_DEPLETION_HORIZON_DAYS: u32 = 365 * 100;

// ==========================================
// DepletionProjector - 耗尽预估器
// ==========================================
#[derive(Debug, Clone, Copy)]
pub struct DepletionProjector {
    horizon_days: u32,
}

impl Default for DepletionProjector {
    fn default() -> Self {
        Self {
            horizon_days: DEFAULT_DEPLETION_HORIZON_DAYS,
        }
    }
}

impl DepletionProjector {
    pub fn new(horizon_days: u32) -> Self {
        Self { horizon_days }
    }

    pub fn horizon_days(&self) -> u32 {
        self.horizon_days
    }

    /// 预估单个原料的耗尽日期
    ///
    /// # 规则
    /// - 预测批次 ≤ 0 或单耗 ≤ 0 → N/A
    /// - 库存已 ≤ 0 → 今日 (0 天)
    /// - 模拟天数超出视野 → N/A
    #[instrument(level = "debug", skip(self, material), fields(material_id = material.id))]
    pub fn project(
        &self,
        material: &MaterialStock,
        predicted_batches_per_day: f64,
        today: NaiveDate,
    ) -> DepletionEstimate {
        if !(predicted_batches_per_day > 0.0) || !(material.measure_per_jirangan > 0.0) {
            return DepletionEstimate::NotApplicable;
        }

        let daily_consumption = predicted_batches_per_day * material.measure_per_jirangan;
        let mut remaining = material.stock;
        let mut days: u32 = 0;

        while remaining > 0.0 {
            remaining -= daily_consumption;
            days += 1;
            if days > self.horizon_days {
                return DepletionEstimate::NotApplicable;
            }
        }

        // 日期超出可表示范围同样视为不可预估
        match Duration::try_days(i64::from(days)).and_then(|span| today.checked_add_signed(span)) {
            Some(date) => DepletionEstimate::Date { date, days },
            None => DepletionEstimate::NotApplicable,
        }
    }
}
