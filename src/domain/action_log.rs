// ==========================================
// 生产预测核心 - 操作日志领域模型
// ==========================================
// 红线: 人工干预生产总量必须留痕
// 对齐: action_log 表
// ==========================================

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::domain::types::ActionType;

// ==========================================
// ActionLog - 操作日志
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionLog {
    pub action_id: String,            // 日志ID (UUID)
    pub action_type: String,          // 操作类型 (存储为字符串)
    pub action_ts: NaiveDateTime,     // 操作时间戳
    pub actor: String,                // 操作人
    pub production_id: Option<i64>,   // 关联生产记录
    pub target_date: Option<NaiveDate>, // 关联生产日期
    pub payload_json: Option<JsonValue>, // 操作参数 (JSON)
    pub detail: Option<String>,       // 详细描述
}

impl ActionLog {
    /// 创建新的操作日志
    ///
    /// # 参数
    /// - `action_type`: 操作类型
    /// - `actor`: 操作人
    /// - `action_ts`: 操作时间（由注入时钟提供）
    pub fn new(action_type: ActionType, actor: &str, action_ts: NaiveDateTime) -> Self {
        Self {
            action_id: uuid::Uuid::new_v4().to_string(),
            action_type: action_type.to_db_str().to_string(),
            action_ts,
            actor: actor.to_string(),
            production_id: None,
            target_date: None,
            payload_json: None,
            detail: None,
        }
    }

    /// 设置操作负载 (转换为JSON)
    pub fn with_payload<T: Serialize>(mut self, payload: &T) -> Self {
        self.payload_json = serde_json::to_value(payload).ok();
        self
    }

    /// 关联生产记录
    pub fn with_production(mut self, production_id: i64, date: NaiveDate) -> Self {
        self.production_id = Some(production_id);
        self.target_date = Some(date);
        self
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    /// 解析操作类型
    pub fn parsed_action_type(&self) -> Option<ActionType> {
        ActionType::from_db_str(&self.action_type)
    }
}
