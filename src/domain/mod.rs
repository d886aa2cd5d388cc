// ==========================================
// 生产预测核心 - 领域模型层
// ==========================================
// 职责: 定义领域实体、类型
// 红线: 不含数据访问逻辑,不含引擎逻辑
// ==========================================

pub mod action_log;
pub mod demand;
pub mod material;
pub mod production;
pub mod series;
pub mod types;

// 重导出核心类型
pub use action_log::ActionLog;
pub use demand::{to_jirangan, OrderLine, SaleLine};
pub use material::{MaterialDepletionView, MaterialStock};
pub use production::{ProductionRecap, ProductionRecapDay, ProductionRecord};
pub use series::DailyDemandSeries;
pub use types::{ActionType, DepletionEstimate, ReconcileAction};
