// ==========================================
// Mock 配置实现 - 用于集成测试
// ==========================================

use jirangan_planner::config::{ForecastConfigReader, ForecastSettings};
use std::error::Error;

/// Mock 配置结构
#[derive(Debug, Clone)]
pub struct MockConfig {
    pub settings: ForecastSettings,
}

impl MockConfig {
    /// 创建默认配置
    pub fn default() -> Self {
        Self {
            settings: ForecastSettings::default(),
        }
    }

    /// 自定义平滑系数
    pub fn with_alpha(alpha: f64) -> Self {
        let mut config = Self::default();
        config.settings.smoothing_alpha = alpha;
        config
    }

    /// 自定义历史窗口
    pub fn with_window(days: usize) -> Self {
        let mut config = Self::default();
        config.settings.history_window_days = days;
        config
    }
}

impl ForecastConfigReader for MockConfig {
    fn get_smoothing_alpha(&self) -> Result<f64, Box<dyn Error>> {
        Ok(self.settings.smoothing_alpha)
    }

    fn get_history_window_days(&self) -> Result<usize, Box<dyn Error>> {
        Ok(self.settings.history_window_days)
    }

    fn get_depletion_horizon_days(&self) -> Result<u32, Box<dyn Error>> {
        Ok(self.settings.depletion_horizon_days)
    }

    fn get_display_locale(&self) -> Result<String, Box<dyn Error>> {
        Ok(self.settings.display_locale.clone())
    }
}
