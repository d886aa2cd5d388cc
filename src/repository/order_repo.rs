// ==========================================
// 生产预测核心 - 订单明细只读仓储
// ==========================================
// 外部实体: orders / order_details / products
// 口径: 按交货日 DATE(orders.date) 归集,兼容带时间部分的存量数据
// 红线: 明细引用的产品不存在 → NotFound,不静默跳过
// ==========================================

use crate::db::DATE_FMT;
use crate::domain::demand::OrderLine;
use crate::repository::error::{
    parse_date_column, parse_datetime_column, RepositoryError, RepositoryResult,
};
use chrono::NaiveDate;
use rusqlite::{params, Connection, Result as SqliteResult, Row};
use std::sync::{Arc, Mutex, MutexGuard};

const SELECT_LINES: &str = r#"
    SELECT d.order_id, d.product_id, p.id, p.name, d.qty,
           p.produce_per_jirangan, o.date, o.picked_at
    FROM order_details d
    JOIN orders o ON o.id = d.order_id
    LEFT JOIN products p ON p.id = d.product_id
"#;

/// 行映射中间态: 产品列可能为空 (LEFT JOIN)
struct RawOrderLine {
    order_id: i64,
    product_id: i64,
    product: Option<(String, i64)>,
    qty: f64,
    delivery_date: NaiveDate,
    picked_at: Option<chrono::NaiveDateTime>,
}

pub struct OrderRepository {
    conn: Arc<Mutex<Connection>>,
}

impl OrderRepository {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 查询指定交货日的全部订单明细（无论是否已取货）
    pub fn find_lines_by_delivery_date(&self, date: NaiveDate) -> RepositoryResult<Vec<OrderLine>> {
        let conn = self.get_conn()?;
        let sql = format!("{} WHERE DATE(o.date) = ?1 ORDER BY d.order_id, d.id", SELECT_LINES);
        let mut stmt = conn.prepare(&sql)?;
        let raw = stmt
            .query_map(params![date.format(DATE_FMT).to_string()], Self::map_raw)?
            .collect::<SqliteResult<Vec<_>>>()?;
        raw.into_iter().map(Self::resolve).collect()
    }

    /// 查询交货日在 [start, end] 内且已取货的订单明细
    pub fn find_picked_lines_between(
        &self,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> RepositoryResult<Vec<OrderLine>> {
        let conn = self.get_conn()?;
        let sql = format!(
            "{} WHERE DATE(o.date) BETWEEN ?1 AND ?2 AND o.picked_at IS NOT NULL ORDER BY o.date, d.id",
            SELECT_LINES
        );
        let mut stmt = conn.prepare(&sql)?;
        let raw = stmt
            .query_map(
                params![
                    start_date.format(DATE_FMT).to_string(),
                    end_date.format(DATE_FMT).to_string()
                ],
                Self::map_raw,
            )?
            .collect::<SqliteResult<Vec<_>>>()?;
        raw.into_iter().map(Self::resolve).collect()
    }

    fn map_raw(row: &Row<'_>) -> SqliteResult<RawOrderLine> {
        let joined_id: Option<i64> = row.get(2)?;
        let product = match joined_id {
            Some(_) => Some((row.get::<_, String>(3)?, row.get::<_, i64>(5)?)),
            None => None,
        };
        let raw_date: String = row.get(6)?;
        let raw_picked: Option<String> = row.get(7)?;

        Ok(RawOrderLine {
            order_id: row.get(0)?,
            product_id: row.get(1)?,
            product,
            qty: row.get(4)?,
            delivery_date: parse_date_column(6, &raw_date)?,
            picked_at: raw_picked
                .as_deref()
                .map(|s| parse_datetime_column(7, s))
                .transpose()?,
        })
    }

    fn resolve(raw: RawOrderLine) -> RepositoryResult<OrderLine> {
        let Some((product_name, produce_per_jirangan)) = raw.product else {
            return Err(RepositoryError::NotFound {
                entity: "Product".to_string(),
                id: raw.product_id.to_string(),
            });
        };
        Ok(OrderLine {
            order_id: raw.order_id,
            product_id: raw.product_id,
            product_name,
            qty: raw.qty,
            produce_per_jirangan,
            delivery_date: raw.delivery_date,
            picked_at: raw.picked_at,
        })
    }
}
