// ==========================================
// 生产预测核心 - 需求来源领域模型
// ==========================================
// 外部实体: 订单明细 / 销售明细（产品折算系数随明细带出）
// 用途: 按 produce_per_jirangan 折算为批次当量
// ==========================================

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

// ==========================================
// OrderLine - 订单明细 (带订单头信息)
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderLine {
    pub order_id: i64,
    pub product_id: i64,
    pub product_name: String,
    pub qty: f64,
    pub produce_per_jirangan: i64,
    pub delivery_date: NaiveDate,           // orders.date
    pub picked_at: Option<NaiveDateTime>,   // 取货时间, None=未履约
}

impl OrderLine {
    /// 订单是否已取货（已履约）
    pub fn is_picked_up(&self) -> bool {
        self.picked_at.is_some()
    }
}

// ==========================================
// SaleLine - 销售明细 (带销售头信息)
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaleLine {
    pub sale_id: i64,
    pub product_id: i64,
    pub qty: f64,
    pub produce_per_jirangan: i64,
    pub sold_at: NaiveDateTime, // sales.created_at
}

// ==========================================
// 批次折算
// ==========================================

/// 将件数折算为 jirangan
///
/// 折算系数 ≤ 0 时返回 None（调用方决定跳过/计 0）
pub fn to_jirangan(qty: f64, produce_per_jirangan: i64) -> Option<f64> {
    if produce_per_jirangan <= 0 {
        return None;
    }
    Some(qty / produce_per_jirangan as f64)
}
