// ==========================================
// 测试辅助函数
// ==========================================
// 职责: 提供测试所需的数据库初始化、测试数据生成等功能
// ==========================================
#![allow(dead_code)]

use jirangan_planner::db::{ensure_schema, open_sqlite_connection};
use rusqlite::{params, Connection};
use std::error::Error;
use tempfile::NamedTempFile;

/// 创建临时测试数据库并初始化 schema
///
/// # 返回
/// - NamedTempFile: 临时数据库文件（需要保持存活）
/// - String: 数据库文件路径
pub fn create_test_db() -> Result<(NamedTempFile, String), Box<dyn Error>> {
    let temp_file = NamedTempFile::new()?;
    let db_path = temp_file
        .path()
        .to_str()
        .ok_or("临时文件路径不是合法 UTF-8")?
        .to_string();

    let conn = open_sqlite_connection(&db_path)?;
    ensure_schema(&conn)?;

    Ok((temp_file, db_path))
}

// ==========================================
// 测试数据写入（模拟外部 CRUD 层）
// ==========================================

pub fn insert_product(conn: &Connection, name: &str, produce_per_jirangan: i64) -> i64 {
    conn.execute(
        "INSERT INTO products (name, produce_per_jirangan) VALUES (?1, ?2)",
        params![name, produce_per_jirangan],
    )
    .unwrap();
    conn.last_insert_rowid()
}

/// 写入订单及明细
///
/// # 参数
/// - date: 交货日 (YYYY-MM-DD)
/// - picked_at: 取货时间 (YYYY-MM-DD HH:MM:SS), None 表示未取货
/// - lines: (product_id, qty)
pub fn insert_order(
    conn: &Connection,
    date: &str,
    picked_at: Option<&str>,
    lines: &[(i64, f64)],
) -> i64 {
    conn.execute(
        "INSERT INTO orders (customer_id, date, picked_at) VALUES (1, ?1, ?2)",
        params![date, picked_at],
    )
    .unwrap();
    let order_id = conn.last_insert_rowid();
    for (product_id, qty) in lines {
        conn.execute(
            "INSERT INTO order_details (order_id, product_id, qty) VALUES (?1, ?2, ?3)",
            params![order_id, product_id, qty],
        )
        .unwrap();
    }
    order_id
}

/// 写入销售及明细
///
/// # 参数
/// - created_at: 销售时间 (YYYY-MM-DD HH:MM:SS)
/// - lines: (product_id, qty)
pub fn insert_sale(conn: &Connection, created_at: &str, lines: &[(i64, f64)]) -> i64 {
    conn.execute(
        "INSERT INTO sales (code, customer_id, total, created_at) VALUES (?1, NULL, 0, ?2)",
        params![format!("S-{}", created_at), created_at],
    )
    .unwrap();
    let sale_id = conn.last_insert_rowid();
    for (product_id, qty) in lines {
        conn.execute(
            "INSERT INTO sale_details (sale_id, product_id, qty) VALUES (?1, ?2, ?3)",
            params![sale_id, product_id, qty],
        )
        .unwrap();
    }
    sale_id
}

pub fn insert_material(conn: &Connection, name: &str, stock: f64, measure: f64) -> i64 {
    conn.execute(
        "INSERT INTO materials (name, stock, measure_per_jirangan) VALUES (?1, ?2, ?3)",
        params![name, stock, measure],
    )
    .unwrap();
    conn.last_insert_rowid()
}

/// 直接写入生产记录（模拟历史数据）
pub fn insert_production(
    conn: &Connection,
    date: &str,
    orders: f64,
    direct_sales: f64,
    total: f64,
    is_customized: bool,
) -> i64 {
    conn.execute(
        r#"
        INSERT INTO productions (date, orders, direct_sales, total, is_customized)
        VALUES (?1, ?2, ?3, ?4, ?5)
        "#,
        params![date, orders, direct_sales, total, is_customized as i32],
    )
    .unwrap();
    conn.last_insert_rowid()
}
