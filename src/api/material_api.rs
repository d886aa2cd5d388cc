// ==========================================
// 生产预测核心 - 原料 API
// ==========================================
// 职责: 日产量预测、原料耗尽预估、原料列表展示
// 红线: 耗尽预估仅用于展示,不落库,不修改库存
// ==========================================

use std::sync::Arc;

use chrono::NaiveDate;
use tracing::{debug, instrument};

use crate::api::error::{ApiError, ApiResult};
use crate::config::forecast_config_trait::{ForecastConfigReader, ForecastSettings};
use crate::domain::material::MaterialDepletionView;
use crate::domain::types::DepletionEstimate;
use crate::engine::aggregator::{HistoryWindow, TimeSeriesAggregator};
use crate::engine::clock::Clock;
use crate::engine::depletion::DepletionProjector;
use crate::engine::smoothing::{DemandForecaster, ExponentialSmoothing};
use crate::i18n;
use crate::repository::material_repo::MaterialRepository;
use crate::repository::production_repo::ProductionRepository;

// ==========================================
// MaterialApi - 原料 API
// ==========================================

/// 原料API
///
/// 职责：
/// 1. 基于历史生产总量预测日产批次
/// 2. 单个原料耗尽日期预估
/// 3. 原料列表（带本地化耗尽日期）
pub struct MaterialApi {
    material_repo: Arc<MaterialRepository>,
    production_repo: Arc<ProductionRepository>,
    config: Arc<dyn ForecastConfigReader>,
    clock: Arc<dyn Clock>,
    aggregator: TimeSeriesAggregator,
}

impl MaterialApi {
    pub fn new(
        material_repo: Arc<MaterialRepository>,
        production_repo: Arc<ProductionRepository>,
        config: Arc<dyn ForecastConfigReader>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            material_repo,
            production_repo,
            config,
            clock,
            aggregator: TimeSeriesAggregator::new(),
        }
    }

    fn settings(&self) -> ApiResult<ForecastSettings> {
        self.config
            .get_forecast_settings()
            .map_err(|e| ApiError::ConfigError(e.to_string()))
    }

    /// 预测日产批次: 对昨日结束的历史窗口内每日 total 做指数平滑
    ///
    /// 结果截断为 ≥ 0
    pub fn predicted_daily_batches(&self) -> ApiResult<f64> {
        let settings = self.settings()?;
        self.predict_with(&settings, self.clock.today())
    }

    #[instrument(skip(self, settings), fields(window = settings.history_window_days))]
    fn predict_with(&self, settings: &ForecastSettings, today: NaiveDate) -> ApiResult<f64> {
        let window = HistoryWindow::new(today, settings.history_window_days);
        let daily_totals = if settings.history_window_days == 0 {
            Vec::new()
        } else {
            self.production_repo
                .sum_totals_by_date(window.start_date(), window.end_date())?
        };

        let series = self.aggregator.production_volume_series(window, &daily_totals);
        let predicted = ExponentialSmoothing::new(settings.smoothing_alpha)
            .forecast(series.values())
            .max(0.0);
        debug!(values = ?series.values(), predicted, "日产批次预测");
        Ok(predicted)
    }

    /// 预估单个原料的耗尽日期
    ///
    /// # 参数
    /// - material_id: 原料ID
    /// - predicted_daily_batches: 预测日产批次
    ///
    /// # 返回
    /// - Err(NotFound): 原料不存在
    pub fn project_depletion(
        &self,
        material_id: i64,
        predicted_daily_batches: f64,
    ) -> ApiResult<DepletionEstimate> {
        let settings = self.settings()?;
        let material = self
            .material_repo
            .find_by_id(material_id)?
            .ok_or_else(|| ApiError::NotFound(format!("Material(id={})不存在", material_id)))?;

        let projector = DepletionProjector::new(settings.depletion_horizon_days);
        Ok(projector.project(&material, predicted_daily_batches, self.clock.today()))
    }

    /// 原料列表（按名称排序,可按名称子串过滤）,附耗尽预估
    #[instrument(skip(self))]
    pub fn list_materials_with_depletion(
        &self,
        search: Option<&str>,
    ) -> ApiResult<Vec<MaterialDepletionView>> {
        let settings = self.settings()?;
        let today = self.clock.today();
        let predicted = self.predict_with(&settings, today)?;
        let projector = DepletionProjector::new(settings.depletion_horizon_days);

        let views = self
            .material_repo
            .list(search)?
            .into_iter()
            .map(|material| {
                let estimate = projector.project(&material, predicted, today);
                MaterialDepletionView {
                    estimated_depletion_label: i18n::depletion_label(
                        &estimate,
                        &settings.display_locale,
                    ),
                    estimated_depletion: estimate,
                    material,
                }
            })
            .collect();

        Ok(views)
    }
}
