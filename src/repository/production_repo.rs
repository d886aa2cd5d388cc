// ==========================================
// 生产预测核心 - 每日生产记录仓储
// ==========================================
// 红线: Repository 不含业务逻辑
// 约束: productions.date 唯一; 核心从不删除记录
// ==========================================

use crate::db::DATE_FMT;
use crate::domain::production::ProductionRecord;
use crate::repository::error::{parse_date_column, RepositoryError, RepositoryResult};
use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension, Result as SqliteResult, Row, Transaction};
use std::sync::{Arc, Mutex, MutexGuard};

const SELECT_COLUMNS: &str = r#"
    SELECT id, date, orders, direct_sales, total, is_customized
    FROM productions
"#;

// ==========================================
// ProductionRepository - 每日生产记录仓储
// ==========================================
pub struct ProductionRepository {
    conn: Arc<Mutex<Connection>>,
}

impl ProductionRepository {
    /// 从已有连接创建仓储实例
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    /// 获取数据库连接
    pub(crate) fn get_conn(&self) -> RepositoryResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    fn map_row(row: &Row<'_>) -> SqliteResult<ProductionRecord> {
        let raw_date: String = row.get(1)?;
        Ok(ProductionRecord {
            id: row.get(0)?,
            date: parse_date_column(1, &raw_date)?,
            orders: row.get(2)?,
            direct_sales: row.get(3)?,
            total: row.get(4)?,
            is_customized: row.get::<_, i32>(5)? != 0,
        })
    }

    // ==========================================
    // 查询
    // ==========================================

    /// 按生产日期查询
    ///
    /// # 返回
    /// - Ok(Some(ProductionRecord)): 找到记录
    /// - Ok(None): 该日期尚未生成记录
    pub fn find_by_date(&self, date: NaiveDate) -> RepositoryResult<Option<ProductionRecord>> {
        let conn = self.get_conn()?;
        Self::find_by_date_in(&conn, date)
    }

    /// 在给定连接（或事务）上按日期查询
    pub(crate) fn find_by_date_in(
        conn: &Connection,
        date: NaiveDate,
    ) -> RepositoryResult<Option<ProductionRecord>> {
        let sql = format!("{} WHERE date = ?1", SELECT_COLUMNS);
        let record = conn
            .query_row(&sql, params![date.format(DATE_FMT).to_string()], Self::map_row)
            .optional()?;
        Ok(record)
    }

    /// 按主键查询
    pub fn find_by_id(&self, id: i64) -> RepositoryResult<Option<ProductionRecord>> {
        let conn = self.get_conn()?;
        Self::find_by_id_in(&conn, id)
    }

    pub(crate) fn find_by_id_in(
        conn: &Connection,
        id: i64,
    ) -> RepositoryResult<Option<ProductionRecord>> {
        let sql = format!("{} WHERE id = ?1", SELECT_COLUMNS);
        let record = conn.query_row(&sql, params![id], Self::map_row).optional()?;
        Ok(record)
    }

    /// 按日期范围查询（含首尾,按日期升序）
    pub fn find_between(
        &self,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> RepositoryResult<Vec<ProductionRecord>> {
        let conn = self.get_conn()?;
        let sql = format!("{} WHERE date BETWEEN ?1 AND ?2 ORDER BY date ASC", SELECT_COLUMNS);
        let mut stmt = conn.prepare(&sql)?;
        let records = stmt
            .query_map(
                params![
                    start_date.format(DATE_FMT).to_string(),
                    end_date.format(DATE_FMT).to_string()
                ],
                Self::map_row,
            )?
            .collect::<SqliteResult<Vec<_>>>()?;
        Ok(records)
    }

    /// 按日期范围汇总每日 total（供生产量序列使用）
    pub fn sum_totals_by_date(
        &self,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> RepositoryResult<Vec<(NaiveDate, f64)>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT date, SUM(total)
            FROM productions
            WHERE date BETWEEN ?1 AND ?2
            GROUP BY date
            ORDER BY date ASC
            "#,
        )?;
        let rows = stmt
            .query_map(
                params![
                    start_date.format(DATE_FMT).to_string(),
                    end_date.format(DATE_FMT).to_string()
                ],
                |row| {
                    let raw: String = row.get(0)?;
                    Ok((parse_date_column(0, &raw)?, row.get::<_, f64>(1)?))
                },
            )?
            .collect::<SqliteResult<Vec<_>>>()?;
        Ok(rows)
    }

    // ==========================================
    // 写入
    // ==========================================

    /// 插入新记录,返回带主键的记录
    pub(crate) fn insert_in(
        conn: &Connection,
        record: &ProductionRecord,
    ) -> RepositoryResult<ProductionRecord> {
        conn.execute(
            r#"
            INSERT INTO productions (date, orders, direct_sales, total, is_customized)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
            params![
                record.date.format(DATE_FMT).to_string(),
                record.orders,
                record.direct_sales,
                record.total,
                record.is_customized as i32,
            ],
        )?;

        let mut saved = record.clone();
        saved.id = conn.last_insert_rowid();
        Ok(saved)
    }

    /// 按主键更新全部可变字段
    pub(crate) fn update_in(conn: &Connection, record: &ProductionRecord) -> RepositoryResult<()> {
        let affected = conn.execute(
            r#"
            UPDATE productions
            SET orders = ?1,
                direct_sales = ?2,
                total = ?3,
                is_customized = ?4,
                updated_at = datetime('now')
            WHERE id = ?5
            "#,
            params![
                record.orders,
                record.direct_sales,
                record.total,
                record.is_customized as i32,
                record.id,
            ],
        )?;

        if affected == 0 {
            return Err(RepositoryError::NotFound {
                entity: "Production".to_string(),
                id: record.id.to_string(),
            });
        }
        Ok(())
    }

    /// 在单个事务内执行读-改-写
    ///
    /// 闭包返回 Err 时事务回滚（Transaction drop 即回滚）
    pub fn with_transaction<T, F>(&self, f: F) -> RepositoryResult<T>
    where
        F: FnOnce(&Transaction<'_>) -> RepositoryResult<T>,
    {
        let mut conn = self.get_conn()?;
        let tx = conn
            .transaction()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;
        let out = f(&tx)?;
        tx.commit()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;
        Ok(out)
    }

    pub fn insert(&self, record: &ProductionRecord) -> RepositoryResult<ProductionRecord> {
        let conn = self.get_conn()?;
        Self::insert_in(&conn, record)
    }

    pub fn update(&self, record: &ProductionRecord) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        Self::update_in(&conn, record)
    }
}
