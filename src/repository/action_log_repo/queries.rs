use super::core::ActionLogRepository;
use crate::domain::action_log::ActionLog;
use crate::repository::error::{parse_date_column, parse_datetime_column, RepositoryResult};
use rusqlite::{params, OptionalExtension, Result as SqliteResult, Row};

const SELECT_COLUMNS: &str = r#"
    SELECT action_id, action_type, action_ts, actor,
           production_id, target_date, payload_json, detail
    FROM action_log
"#;

impl ActionLogRepository {
    // ==========================================
    // 查询操作
    // ==========================================

    /// 按 action_id 查询单个日志
    pub fn find_by_id(&self, action_id: &str) -> RepositoryResult<Option<ActionLog>> {
        let conn = self.get_conn()?;
        let sql = format!("{} WHERE action_id = ?", SELECT_COLUMNS);
        let log = conn
            .query_row(&sql, params![action_id], Self::map_row)
            .optional()?;
        Ok(log)
    }

    /// 查询指定生产记录的操作日志（按时间倒序）
    pub fn find_by_production_id(&self, production_id: i64) -> RepositoryResult<Vec<ActionLog>> {
        let conn = self.get_conn()?;
        let sql = format!(
            "{} WHERE production_id = ? ORDER BY action_ts DESC, rowid DESC",
            SELECT_COLUMNS
        );
        let mut stmt = conn.prepare(&sql)?;
        let logs = stmt
            .query_map(params![production_id], Self::map_row)?
            .collect::<SqliteResult<Vec<_>>>()?;
        Ok(logs)
    }

    /// 查询最近的 N 条日志
    pub fn find_recent(&self, limit: i32) -> RepositoryResult<Vec<ActionLog>> {
        let conn = self.get_conn()?;
        let sql = format!("{} ORDER BY action_ts DESC, rowid DESC LIMIT ?", SELECT_COLUMNS);
        let mut stmt = conn.prepare(&sql)?;
        let logs = stmt
            .query_map(params![limit], Self::map_row)?
            .collect::<SqliteResult<Vec<_>>>()?;
        Ok(logs)
    }

    // ==========================================
    // 辅助方法
    // ==========================================

    /// 映射数据库行到 ActionLog 实体
    fn map_row(row: &Row<'_>) -> SqliteResult<ActionLog> {
        let raw_ts: String = row.get(2)?;
        let raw_date: Option<String> = row.get(5)?;
        let payload: Option<String> = row.get(6)?;

        Ok(ActionLog {
            action_id: row.get(0)?,
            action_type: row.get(1)?,
            action_ts: parse_datetime_column(2, &raw_ts)?,
            actor: row.get(3)?,
            production_id: row.get(4)?,
            target_date: raw_date
                .as_deref()
                .map(|s| parse_date_column(5, s))
                .transpose()?,
            // 损坏的 JSON 不阻断审计查询
            payload_json: payload.and_then(|s| serde_json::from_str(&s).ok()),
            detail: row.get(7)?,
        })
    }
}
