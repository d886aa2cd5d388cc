// ==========================================
// 生产预测核心 - 原料库存仓储
// ==========================================
// 红线: Repository 不含业务逻辑
// 红线: 预测核心对 materials 只读
// ==========================================

use crate::domain::material::MaterialStock;
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection, OptionalExtension, Result as SqliteResult, Row};
use std::sync::{Arc, Mutex, MutexGuard};

// ==========================================
// MaterialRepository - 原料库存仓储
// ==========================================
/// 职责: 读取 materials 表的库存与单耗
pub struct MaterialRepository {
    conn: Arc<Mutex<Connection>>,
}

impl MaterialRepository {
    /// 从已有连接创建仓储实例
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    fn map_row(row: &Row<'_>) -> SqliteResult<MaterialStock> {
        Ok(MaterialStock {
            id: row.get(0)?,
            name: row.get(1)?,
            stock: row.get(2)?,
            measure_per_jirangan: row.get(3)?,
        })
    }

    /// 查询原料列表（按名称排序）
    ///
    /// # 参数
    /// - search: 名称子串过滤（不区分大小写）, None 或空串表示不过滤
    pub fn list(&self, search: Option<&str>) -> RepositoryResult<Vec<MaterialStock>> {
        let conn = self.get_conn()?;
        let keyword = search.map(str::trim).filter(|s| !s.is_empty());

        let mut stmt = conn.prepare(
            r#"
            SELECT id, name, stock, measure_per_jirangan
            FROM materials
            WHERE ?1 IS NULL OR instr(LOWER(name), LOWER(?1)) > 0
            ORDER BY name ASC, id ASC
            "#,
        )?;

        let materials = stmt
            .query_map(params![keyword], Self::map_row)?
            .collect::<SqliteResult<Vec<_>>>()?;
        Ok(materials)
    }

    /// 按主键查询
    pub fn find_by_id(&self, id: i64) -> RepositoryResult<Option<MaterialStock>> {
        let conn = self.get_conn()?;
        let material = conn
            .query_row(
                "SELECT id, name, stock, measure_per_jirangan FROM materials WHERE id = ?1",
                params![id],
                Self::map_row,
            )
            .optional()?;
        Ok(material)
    }
}
