// ==========================================
// 生产预测核心 - 核心库
// ==========================================
// 技术栈: Rust + SQLite
// 系统定位: 每日生产批次(jirangan)预测 + 原料耗尽预估
// ==========================================

// 初始化国际化系统
rust_i18n::i18n!("locales", fallback = "id");

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 数据仓储层 - 数据访问
pub mod repository;

// 引擎层 - 预测与对账规则
pub mod engine;

// 配置层 - 预测参数
pub mod config;

// 数据库基础设施（连接初始化/PRAGMA 统一/建表）
pub mod db;

// 日志系统
pub mod logging;

// 国际化
pub mod i18n;

// API 层 - 业务接口
pub mod api;

// 应用层 - 装配
pub mod app;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域实体与类型
pub use domain::{
    ActionLog, ActionType, DailyDemandSeries, DepletionEstimate, MaterialDepletionView,
    MaterialStock, OrderLine, ProductionRecap, ProductionRecord, ReconcileAction,
    SaleLine,
};

// 引擎
pub use engine::{
    Clock, DemandForecaster, DepletionProjector, ExponentialSmoothing, FixedClock,
    ProductionReconciler, SystemClock, TimeSeriesAggregator,
};

// API
pub use api::{ApiError, ApiResult, MaterialApi, ProductionApi, ProductionPlanView};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "Jirangan Planner";
