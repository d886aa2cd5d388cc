// ==========================================
// 生产预测核心 - 每日生产记录领域模型
// ==========================================
// 对齐: productions 表 (date 唯一)
// 红线: is_customized=true 时 total 不得被自动重算覆盖
// ==========================================

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ==========================================
// ProductionRecord - 每日生产记录
// ==========================================
// 生命周期: 首次查询该日期时创建; 今日/明日可被刷新; 核心从不删除
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductionRecord {
    pub id: i64,              // 主键
    pub date: NaiveDate,      // 生产日期 (唯一)

    // ===== 需求构成 (单位: jirangan) =====
    pub orders: f64,          // 订单需求
    pub direct_sales: f64,    // 散客直销预测

    // ===== 目标 =====
    pub total: f64,           // 生产目标 (计算值或人工值)
    pub is_customized: bool,  // 人工定制标志
}

impl ProductionRecord {
    /// 自动模式下的目标总量: round(orders + direct_sales)
    ///
    /// 四舍五入口径: 远离零 (f64::round)
    pub fn computed_total(orders: f64, direct_sales: f64) -> f64 {
        (orders + direct_sales).round()
    }

    /// 未落库的新记录（id 由仓储分配）
    pub fn draft(date: NaiveDate, orders: f64, direct_sales: f64) -> Self {
        Self {
            id: 0,
            date,
            orders,
            direct_sales,
            total: Self::computed_total(orders, direct_sales),
            is_customized: false,
        }
    }
}

// ==========================================
// ProductionRecap - 月度生产汇总
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductionRecap {
    pub year: i32,
    pub month: u32,
    pub days: Vec<ProductionRecapDay>,
    pub grand_total: f64,
    pub customized_days: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductionRecapDay {
    pub date: NaiveDate,
    pub total: f64,
    pub is_customized: bool,
}
