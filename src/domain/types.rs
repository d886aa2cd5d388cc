// ==========================================
// 生产预测核心 - 领域类型定义
// ==========================================
// 职责: 耗尽预估结果、重算动作、日期窗口口径
// ==========================================

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 原料耗尽预估 (Depletion Estimate)
// ==========================================
// 仅用于展示,从不落库
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DepletionEstimate {
    /// 预计耗尽日期 (today + days)
    Date { date: NaiveDate, days: u32 },
    /// 无法预估: 无产量预测 / 无单耗 / 超出预估视野
    NotApplicable,
}

impl DepletionEstimate {
    /// 返回预计耗尽日期（N/A 时为 None）
    pub fn date(&self) -> Option<NaiveDate> {
        match self {
            DepletionEstimate::Date { date, .. } => Some(*date),
            DepletionEstimate::NotApplicable => None,
        }
    }

    pub fn is_not_applicable(&self) -> bool {
        matches!(self, DepletionEstimate::NotApplicable)
    }
}

impl fmt::Display for DepletionEstimate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DepletionEstimate::Date { date, .. } => write!(f, "{}", date.format("%Y-%m-%d")),
            DepletionEstimate::NotApplicable => write!(f, "N/A"),
        }
    }
}

// ==========================================
// 重算动作 (Reconcile Action)
// ==========================================
// 记录一次 reconcile 对生产记录做了什么
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReconcileAction {
    Created,   // 首次查询,新建记录
    Refreshed, // 今日/明日,刷新 orders/direct_sales(未人工定制时同时刷新 total)
    Frozen,    // 历史或远期日期,记录只读
}

impl fmt::Display for ReconcileAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReconcileAction::Created => write!(f, "CREATED"),
            ReconcileAction::Refreshed => write!(f, "REFRESHED"),
            ReconcileAction::Frozen => write!(f, "FROZEN"),
        }
    }
}

// ==========================================
// 操作类型 (Action Type)
// ==========================================
// 人工干预生产总量的审计口径
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActionType {
    SetManualTotal,      // 人工设定总量 (冻结自动重算)
    ClearManualOverride, // 取消人工设定 (恢复自动重算)
}

impl ActionType {
    /// 转换为数据库存储的字符串
    pub fn to_db_str(&self) -> &'static str {
        match self {
            ActionType::SetManualTotal => "SET_MANUAL_TOTAL",
            ActionType::ClearManualOverride => "CLEAR_MANUAL_OVERRIDE",
        }
    }

    /// 从字符串解析
    pub fn from_db_str(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "SET_MANUAL_TOTAL" => Some(ActionType::SetManualTotal),
            "CLEAR_MANUAL_OVERRIDE" => Some(ActionType::ClearManualOverride),
            _ => None,
        }
    }
}

impl fmt::Display for ActionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_db_str())
    }
}
