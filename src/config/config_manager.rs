// ==========================================
// 生产预测核心 - 配置管理器
// ==========================================
// 职责: 配置加载、查询、写入
// 存储: config_kv 表 (key-value + scope)
// ==========================================

use crate::config::forecast_config_trait::{
    ForecastConfigReader, DEFAULT_DISPLAY_LOCALE, SUPPORTED_LOCALES,
};
use crate::engine::aggregator::{DEFAULT_HISTORY_WINDOW_DAYS, MAX_HISTORY_WINDOW_DAYS};
use crate::engine::depletion::{DEFAULT_DEPLETION_HORIZON_DAYS, MAX_DEPLETION_HORIZON_DAYS};
use crate::engine::smoothing::DEFAULT_SMOOTHING_ALPHA;
use rusqlite::{params, Connection, OptionalExtension};
use std::collections::BTreeMap;
use std::error::Error;
use std::str::FromStr;
use std::sync::{Arc, Mutex};

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
pub struct ConfigManager {
    conn: Arc<Mutex<Connection>>,
}

impl ConfigManager {
    /// 从已有连接创建 ConfigManager
    ///
    /// 说明：为保证连接行为一致，会对传入连接再次应用统一 PRAGMA（幂等）。
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Result<Self, Box<dyn Error>> {
        {
            let conn_guard = conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
            crate::db::configure_sqlite_connection(&conn_guard)?;
        }

        Ok(Self { conn })
    }

    /// 从 config_kv 表读取配置值（scope_id='global'）
    fn get_config_value(&self, key: &str) -> Result<Option<String>, Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;

        let value = conn
            .query_row(
                "SELECT value FROM config_kv WHERE scope_id = 'global' AND key = ?1",
                params![key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    /// 读取 global scope 的原始配置值（未校验,CLI `config get` 使用）
    pub fn get_global_config_value(&self, key: &str) -> Result<Option<String>, Box<dyn Error>> {
        self.get_config_value(key)
    }

    /// 写入 global scope 的配置值（UPSERT）
    pub fn set_global_config_value(&self, key: &str, value: &str) -> Result<(), Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
        conn.execute(
            "INSERT INTO config_kv (scope_id, key, value) VALUES ('global', ?1, ?2)
             ON CONFLICT(scope_id, key) DO UPDATE SET value = ?2, updated_at = datetime('now')",
            params![key, value],
        )?;
        Ok(())
    }

    /// 获取所有 global 配置的快照（JSON格式,按 key 排序）
    pub fn get_config_snapshot(&self) -> Result<String, Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;

        let mut stmt =
            conn.prepare("SELECT key, value FROM config_kv WHERE scope_id = 'global' ORDER BY key")?;
        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;

        let mut config_map: BTreeMap<String, String> = BTreeMap::new();
        for row in rows {
            let (key, value) = row?;
            config_map.insert(key, value);
        }

        Ok(serde_json::to_string(&config_map)?)
    }

    /// 读取并校验数值配置
    ///
    /// 缺失 → 默认值; 解析失败或不满足约束 → 告警后回退默认值
    fn get_validated<T, F>(&self, key: &str, default: T, is_valid: F) -> Result<T, Box<dyn Error>>
    where
        T: FromStr + Copy + std::fmt::Display,
        F: Fn(&T) -> bool,
    {
        let Some(raw) = self.get_config_value(key)? else {
            return Ok(default);
        };

        match raw.trim().parse::<T>() {
            Ok(v) if is_valid(&v) => Ok(v),
            _ => {
                tracing::warn!(
                    config_key = key,
                    raw_value = %raw,
                    default = %default,
                    "配置值非法，使用默认值"
                );
                Ok(default)
            }
        }
    }
}

// ==========================================
// ForecastConfigReader Trait 实现
// ==========================================
impl ForecastConfigReader for ConfigManager {
    fn get_smoothing_alpha(&self) -> Result<f64, Box<dyn Error>> {
        self.get_validated(config_keys::SMOOTHING_ALPHA, DEFAULT_SMOOTHING_ALPHA, |a| {
            *a > 0.0 && *a <= 1.0
        })
    }

    fn get_history_window_days(&self) -> Result<usize, Box<dyn Error>> {
        self.get_validated(
            config_keys::HISTORY_WINDOW_DAYS,
            DEFAULT_HISTORY_WINDOW_DAYS,
            |d| (1..=MAX_HISTORY_WINDOW_DAYS).contains(d),
        )
    }

    fn get_depletion_horizon_days(&self) -> Result<u32, Box<dyn Error>> {
        self.get_validated(
            config_keys::DEPLETION_HORIZON_DAYS,
            DEFAULT_DEPLETION_HORIZON_DAYS,
            |d| (1..=MAX_DEPLETION_HORIZON_DAYS).contains(d),
        )
    }

    fn get_display_locale(&self) -> Result<String, Box<dyn Error>> {
        let Some(raw) = self.get_config_value(config_keys::DISPLAY_LOCALE)? else {
            return Ok(DEFAULT_DISPLAY_LOCALE.to_string());
        };

        let locale = raw.trim().to_lowercase();
        if SUPPORTED_LOCALES.contains(&locale.as_str()) {
            Ok(locale)
        } else {
            tracing::warn!(
                config_key = config_keys::DISPLAY_LOCALE,
                raw_value = %raw,
                "不支持的展示语言，使用默认值"
            );
            Ok(DEFAULT_DISPLAY_LOCALE.to_string())
        }
    }
}

// ==========================================
// 配置键常量
// ==========================================
pub mod config_keys {
    // 预测
    pub const SMOOTHING_ALPHA: &str = "smoothing_alpha";
    pub const HISTORY_WINDOW_DAYS: &str = "history_window_days";

    // 原料耗尽预估
    pub const DEPLETION_HORIZON_DAYS: &str = "depletion_horizon_days";

    // 展示
    pub const DISPLAY_LOCALE: &str = "display_locale";

    /// 全部可写配置键
    pub const ALL: &[&str] = &[
        SMOOTHING_ALPHA,
        HISTORY_WINDOW_DAYS,
        DEPLETION_HORIZON_DAYS,
        DISPLAY_LOCALE,
    ];
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::forecast_config_trait::ForecastSettings;

    fn setup() -> ConfigManager {
        let conn = Connection::open_in_memory().unwrap();
        crate::db::ensure_schema(&conn).unwrap();
        ConfigManager::from_connection(Arc::new(Mutex::new(conn))).unwrap()
    }

    #[test]
    fn test_defaults_when_missing() {
        let cfg = setup();
        assert_eq!(cfg.get_forecast_settings().unwrap(), ForecastSettings::default());
    }

    #[test]
    fn test_valid_overrides() {
        let cfg = setup();
        cfg.set_global_config_value(config_keys::SMOOTHING_ALPHA, "0.5").unwrap();
        cfg.set_global_config_value(config_keys::HISTORY_WINDOW_DAYS, "7").unwrap();
        cfg.set_global_config_value(config_keys::DEPLETION_HORIZON_DAYS, "30").unwrap();
        cfg.set_global_config_value(config_keys::DISPLAY_LOCALE, "EN").unwrap();

        let s = cfg.get_forecast_settings().unwrap();
        assert_eq!(s.smoothing_alpha, 0.5);
        assert_eq!(s.history_window_days, 7);
        assert_eq!(s.depletion_horizon_days, 30);
        assert_eq!(s.display_locale, "en");
    }

    #[test]
    fn test_invalid_values_fall_back() {
        let cfg = setup();
        for alpha in ["0", "1.5", "-0.2", "abc"] {
            cfg.set_global_config_value(config_keys::SMOOTHING_ALPHA, alpha).unwrap();
            assert_eq!(cfg.get_smoothing_alpha().unwrap(), DEFAULT_SMOOTHING_ALPHA);
        }
        cfg.set_global_config_value(config_keys::SMOOTHING_ALPHA, "1").unwrap();
        assert_eq!(cfg.get_smoothing_alpha().unwrap(), 1.0);

        cfg.set_global_config_value(config_keys::HISTORY_WINDOW_DAYS, "0").unwrap();
        assert_eq!(cfg.get_history_window_days().unwrap(), DEFAULT_HISTORY_WINDOW_DAYS);

        cfg.set_global_config_value(config_keys::DISPLAY_LOCALE, "fr").unwrap();
        assert_eq!(cfg.get_display_locale().unwrap(), "id");
    }

    #[test]
    fn test_oversized_window_and_horizon_fall_back() {
        let cfg = setup();
        cfg.set_global_config_value(config_keys::HISTORY_WINDOW_DAYS, "100000000").unwrap();
        cfg.set_global_config_value(config_keys::DEPLETION_HORIZON_DAYS, "4000000000").unwrap();
        assert_eq!(cfg.get_history_window_days().unwrap(), DEFAULT_HISTORY_WINDOW_DAYS);
        assert_eq!(cfg.get_depletion_horizon_days().unwrap(), DEFAULT_DEPLETION_HORIZON_DAYS);

        cfg.set_global_config_value(config_keys::HISTORY_WINDOW_DAYS, "3650").unwrap();
        cfg.set_global_config_value(config_keys::DEPLETION_HORIZON_DAYS, "36500").unwrap();
        assert_eq!(cfg.get_history_window_days().unwrap(), MAX_HISTORY_WINDOW_DAYS);
        assert_eq!(cfg.get_depletion_horizon_days().unwrap(), MAX_DEPLETION_HORIZON_DAYS);
    }

    #[test]
    fn test_snapshot_is_sorted_json() {
        let cfg = setup();
        cfg.set_global_config_value(config_keys::SMOOTHING_ALPHA, "0.4").unwrap();
        cfg.set_global_config_value(config_keys::DISPLAY_LOCALE, "en").unwrap();
        assert_eq!(
            cfg.get_config_snapshot().unwrap(),
            r#"{"display_locale":"en","smoothing_alpha":"0.4"}"#
        );
    }
}
