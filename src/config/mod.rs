// ==========================================
// 生产预测核心 - 配置层
// ==========================================
// 职责: 预测参数读取与写入
// 存储: config_kv 表
// ==========================================

pub mod config_manager;
pub mod forecast_config_trait;

// 重导出核心配置管理器
pub use config_manager::{config_keys, ConfigManager};
pub use forecast_config_trait::{
    ForecastConfigReader, ForecastSettings, DEFAULT_DISPLAY_LOCALE, SUPPORTED_LOCALES,
};
