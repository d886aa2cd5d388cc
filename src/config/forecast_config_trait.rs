// ==========================================
// 生产预测核心 - 预测配置读取 Trait
// ==========================================
// 职责: 定义预测/对账/耗尽预估所需的配置读取接口（不包含实现）
// 红线: 不包含配置写入、不包含业务逻辑
// ==========================================

use serde::{Deserialize, Serialize};
use std::error::Error;

use crate::engine::aggregator::DEFAULT_HISTORY_WINDOW_DAYS;
use crate::engine::depletion::DEFAULT_DEPLETION_HORIZON_DAYS;
use crate::engine::smoothing::DEFAULT_SMOOTHING_ALPHA;

/// 默认展示语言（印尼语）
pub const DEFAULT_DISPLAY_LOCALE: &str = "id";

/// 支持的展示语言
pub const SUPPORTED_LOCALES: &[&str] = &["id", "en"];

// ==========================================
// ForecastSettings - 预测参数快照
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastSettings {
    pub smoothing_alpha: f64,
    pub history_window_days: usize,
    pub depletion_horizon_days: u32,
    pub display_locale: String,
}

impl Default for ForecastSettings {
    fn default() -> Self {
        Self {
            smoothing_alpha: DEFAULT_SMOOTHING_ALPHA,
            history_window_days: DEFAULT_HISTORY_WINDOW_DAYS,
            depletion_horizon_days: DEFAULT_DEPLETION_HORIZON_DAYS,
            display_locale: DEFAULT_DISPLAY_LOCALE.to_string(),
        }
    }
}

// ==========================================
// ForecastConfigReader Trait
// ==========================================
// 实现者: ConfigManager（从 config_kv 表读取）
// 约定: 缺失或非法的配置值由实现方回退为默认值,不返回错误
pub trait ForecastConfigReader: Send + Sync {
    /// 指数平滑系数 α
    ///
    /// # 默认值
    /// - 0.3, 取值范围 (0, 1]
    fn get_smoothing_alpha(&self) -> Result<f64, Box<dyn Error>>;

    /// 历史窗口天数
    ///
    /// # 默认值
    /// - 15, 至少 1
    fn get_history_window_days(&self) -> Result<usize, Box<dyn Error>>;

    /// 耗尽预估视野（天）
    ///
    /// # 默认值
    /// - 1825 (5 年)
    fn get_depletion_horizon_days(&self) -> Result<u32, Box<dyn Error>>;

    /// 展示语言 (id / en)
    fn get_display_locale(&self) -> Result<String, Box<dyn Error>>;

    /// 一次性读取全部预测参数
    fn get_forecast_settings(&self) -> Result<ForecastSettings, Box<dyn Error>> {
        Ok(ForecastSettings {
            smoothing_alpha: self.get_smoothing_alpha()?,
            history_window_days: self.get_history_window_days()?,
            depletion_horizon_days: self.get_depletion_horizon_days()?,
            display_locale: self.get_display_locale()?,
        })
    }
}
