// ==========================================
// 生产预测核心 - API 层
// ==========================================
// 职责: 组合仓储与引擎,对外提供业务接口
// ==========================================

pub mod error;
pub mod material_api;
pub mod production_api;

pub use error::{ApiError, ApiResult};
pub use material_api::MaterialApi;
pub use production_api::{ProductionApi, ProductionPlanView};
