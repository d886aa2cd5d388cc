// ==========================================
// 生产预测核心 - 原料库存领域模型
// ==========================================
// 对齐: materials 表
// 红线: 预测核心只读,库存仅由采购/生产事务修改
// ==========================================

use serde::{Deserialize, Serialize};

use crate::domain::types::DepletionEstimate;

// ==========================================
// MaterialStock - 原料库存状态
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialStock {
    pub id: i64,
    pub name: String,
    pub stock: f64,                // 当前库存
    pub measure_per_jirangan: f64, // 每批次单耗
}

// ==========================================
// MaterialDepletionView - 原料列表展示行
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaterialDepletionView {
    #[serde(flatten)]
    pub material: MaterialStock,
    pub estimated_depletion: DepletionEstimate,
    pub estimated_depletion_label: String, // 本地化展示, 如 "17 Oktober 2026" / "N/A"
}
