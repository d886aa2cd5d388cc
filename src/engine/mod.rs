// ==========================================
// 生产预测核心 - 引擎层
// ==========================================
// 职责: 聚合 / 平滑 / 对账 / 耗尽预估
// 红线: Engine 不拼 SQL, 不读全局时间
// ==========================================

pub mod aggregator;
pub mod clock;
pub mod depletion;
pub mod reconciler;
pub mod smoothing;

// 重导出核心引擎
pub use aggregator::{HistoryWindow, TimeSeriesAggregator, DEFAULT_HISTORY_WINDOW_DAYS};
pub use clock::{Clock, FixedClock, SystemClock};
pub use depletion::{DepletionProjector, DEFAULT_DEPLETION_HORIZON_DAYS};
pub use reconciler::{ProductionReconciler, ReconcileOutcome};
pub use smoothing::{DemandForecaster, ExponentialSmoothing, DEFAULT_SMOOTHING_ALPHA};
