// ==========================================
// 生产预测核心 - 指数平滑预测引擎
// ==========================================
// 算法: 一次指数平滑 F = α·Y + (1-α)·F
// 口径: 以首个观测值初始化后,对所有观测值(含首个)逐一平滑
//       首值会被重复平滑一次,与历史存量数据保持一致,不得改为 N-1 步
// ==========================================

use tracing::instrument;

/// 默认平滑常数
pub const DEFAULT_SMOOTHING_ALPHA: f64 = 0.3;

/// 需求预测接口
///
/// 输入旧 → 新的日序列,输出下一期的单值预测
pub trait DemandForecaster: Send + Sync {
    fn forecast(&self, series: &[f64]) -> f64;
}

// ==========================================
// ExponentialSmoothing - 一次指数平滑
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExponentialSmoothing {
    alpha: f64,
}

impl ExponentialSmoothing {
    /// 创建平滑器
    ///
    /// α 超出 (0, 1] 时回退为默认值 0.3
    pub fn new(alpha: f64) -> Self {
        if !(alpha > 0.0 && alpha <= 1.0) {
            tracing::warn!(alpha, "平滑常数超出 (0,1], 使用默认值 {}", DEFAULT_SMOOTHING_ALPHA);
            return Self {
                alpha: DEFAULT_SMOOTHING_ALPHA,
            };
        }
        Self { alpha }
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }
}

impl Default for ExponentialSmoothing {
    fn default() -> Self {
        Self {
            alpha: DEFAULT_SMOOTHING_ALPHA,
        }
    }
}

impl DemandForecaster for ExponentialSmoothing {
    /// 退化情形:
    /// - 空序列 → 0
    /// - 单值序列 → 原值（不平滑）
    #[instrument(level = "debug", skip(self, series), fields(alpha = self.alpha, n = series.len()))]
    fn forecast(&self, series: &[f64]) -> f64 {
        match series {
            [] => 0.0,
            [only] => *only,
            [first, ..] => {
                let mut forecast = *first;
                for observed in series {
                    forecast = self.alpha * observed + (1.0 - self.alpha) * forecast;
                }
                forecast
            }
        }
    }
}
