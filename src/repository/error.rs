// ==========================================
// 生产预测核心 - 仓储层错误类型
// ==========================================
// 工具: thiserror 派生宏
// ==========================================

use thiserror::Error;

/// 仓储层错误类型
#[derive(Error, Debug)]
pub enum RepositoryError {
    // ===== 数据库错误 =====
    #[error("记录未找到: {entity} with id={id}")]
    NotFound { entity: String, id: String },

    #[error("数据库锁获取失败: {0}")]
    LockError(String),

    #[error("数据库事务失败: {0}")]
    DatabaseTransactionError(String),

    #[error("数据库查询失败: {0}")]
    DatabaseQueryError(String),

    #[error("唯一约束违反: {0}")]
    UniqueConstraintViolation(String),

    #[error("外键约束违反: {0}")]
    ForeignKeyViolation(String),

    // ===== 通用错误 =====
    #[error("内部错误: {0}")]
    InternalError(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

// 实现 From<rusqlite::Error>
impl From<rusqlite::Error> for RepositoryError {
    fn from(err: rusqlite::Error) -> Self {
        match err {
            rusqlite::Error::SqliteFailure(_, Some(msg)) => {
                if msg.contains("UNIQUE") {
                    RepositoryError::UniqueConstraintViolation(msg)
                } else if msg.contains("FOREIGN KEY") {
                    RepositoryError::ForeignKeyViolation(msg)
                } else {
                    RepositoryError::DatabaseQueryError(msg)
                }
            }
            rusqlite::Error::QueryReturnedNoRows => RepositoryError::NotFound {
                entity: "Unknown".to_string(),
                id: "Unknown".to_string(),
            },
            _ => RepositoryError::DatabaseQueryError(err.to_string()),
        }
    }
}

/// Result 类型别名
pub type RepositoryResult<T> = Result<T, RepositoryError>;

// ==========================================
// 行映射辅助
// ==========================================

/// 解析 YYYY-MM-DD 日期列
///
/// 解析失败转换为 rusqlite 的 FromSqlConversionFailure,由调用方 `?` 传播
pub(crate) fn parse_date_column(
    idx: usize,
    raw: &str,
) -> rusqlite::Result<chrono::NaiveDate> {
    // 兼容带时间部分的日期列（如 "2026-10-16 00:00:00"）
    let date_part = raw.get(..10).unwrap_or(raw);
    chrono::NaiveDate::parse_from_str(date_part, crate::db::DATE_FMT).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
    })
}

/// 解析 YYYY-MM-DD HH:MM:SS 时间戳列
pub(crate) fn parse_datetime_column(
    idx: usize,
    raw: &str,
) -> rusqlite::Result<chrono::NaiveDateTime> {
    chrono::NaiveDateTime::parse_from_str(raw.trim(), crate::db::DATETIME_FMT)
        .or_else(|_| {
            parse_date_column(idx, raw).map(|d| d.and_hms_opt(0, 0, 0).unwrap_or_default())
        })
        .map_err(|_| {
            rusqlite::Error::FromSqlConversionFailure(
                idx,
                rusqlite::types::Type::Text,
                format!("无法解析时间戳: {}", raw).into(),
            )
        })
}
