// ==========================================
// 生产预测核心 - 销售明细只读仓储
// ==========================================
// 外部实体: sales / sale_details / products
// 口径: 按 sales.created_at 的日历日归集
// ==========================================

use crate::db::DATE_FMT;
use crate::domain::demand::SaleLine;
use crate::repository::error::{parse_datetime_column, RepositoryError, RepositoryResult};
use chrono::NaiveDate;
use rusqlite::{params, Connection, Result as SqliteResult};
use std::sync::{Arc, Mutex, MutexGuard};

pub struct SaleRepository {
    conn: Arc<Mutex<Connection>>,
}

impl SaleRepository {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 查询销售日在 [start, end] 内的销售明细
    ///
    /// 明细引用的产品不存在时返回 NotFound
    pub fn find_lines_between(
        &self,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> RepositoryResult<Vec<SaleLine>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT d.sale_id, d.product_id, p.id, d.qty, p.produce_per_jirangan, s.created_at
            FROM sale_details d
            JOIN sales s ON s.id = d.sale_id
            LEFT JOIN products p ON p.id = d.product_id
            WHERE DATE(s.created_at) BETWEEN ?1 AND ?2
            ORDER BY s.created_at, d.id
            "#,
        )?;

        let rows = stmt
            .query_map(
                params![
                    start_date.format(DATE_FMT).to_string(),
                    end_date.format(DATE_FMT).to_string()
                ],
                |row| {
                    let raw_ts: String = row.get(5)?;
                    Ok((
                        row.get::<_, i64>(0)?,
                        row.get::<_, i64>(1)?,
                        row.get::<_, Option<i64>>(2)?,
                        row.get::<_, f64>(3)?,
                        row.get::<_, Option<i64>>(4)?,
                        parse_datetime_column(5, &raw_ts)?,
                    ))
                },
            )?
            .collect::<SqliteResult<Vec<_>>>()?;

        rows.into_iter()
            .map(|(sale_id, product_id, joined, qty, factor, sold_at)| {
                match (joined, factor) {
                    (Some(_), Some(produce_per_jirangan)) => Ok(SaleLine {
                        sale_id,
                        product_id,
                        qty,
                        produce_per_jirangan,
                        sold_at,
                    }),
                    _ => Err(RepositoryError::NotFound {
                        entity: "Product".to_string(),
                        id: product_id.to_string(),
                    }),
                }
            })
            .collect()
    }
}
