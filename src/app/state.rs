// ==========================================
// 生产预测核心 - 应用状态
// ==========================================
// 职责: 管理应用级别的共享状态和API实例
// ==========================================

use std::sync::{Arc, Mutex};

use crate::api::{MaterialApi, ProductionApi};
use crate::config::config_manager::ConfigManager;
use crate::config::forecast_config_trait::ForecastConfigReader;
use crate::db::{ensure_schema, open_sqlite_connection};
use crate::engine::clock::{Clock, SystemClock};
use crate::repository::{
    ActionLogRepository, MaterialRepository, OrderRepository, ProductionRepository,
    SaleRepository,
};

/// 应用状态
///
/// 包含所有API实例和共享资源,所有仓储共享同一个连接
pub struct AppState {
    /// 数据库路径
    pub db_path: String,

    /// 生产计划API
    pub production_api: Arc<ProductionApi>,

    /// 原料API
    pub material_api: Arc<MaterialApi>,

    /// 配置管理器（预测参数读取, CLI `config` 命令读写）
    pub config_manager: Arc<ConfigManager>,
}

impl AppState {
    /// 创建新的AppState实例（系统时钟）
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    pub fn new(db_path: String) -> Result<Self, String> {
        Self::with_clock(db_path, Arc::new(SystemClock))
    }

    /// 使用指定时钟创建AppState（测试/补算用）
    pub fn with_clock(db_path: String, clock: Arc<dyn Clock>) -> Result<Self, String> {
        tracing::info!("初始化AppState，数据库路径: {}", db_path);

        let conn = open_sqlite_connection(&db_path)
            .map_err(|e| format!("无法打开数据库: {}", e))?;
        ensure_schema(&conn).map_err(|e| format!("无法初始化数据库结构: {}", e))?;
        let conn = Arc::new(Mutex::new(conn));

        // ==========================================
        // 初始化Repository层
        // ==========================================
        let production_repo = Arc::new(ProductionRepository::new(conn.clone()));
        let order_repo = Arc::new(OrderRepository::new(conn.clone()));
        let sale_repo = Arc::new(SaleRepository::new(conn.clone()));
        let material_repo = Arc::new(MaterialRepository::from_connection(conn.clone()));
        let action_log_repo = Arc::new(ActionLogRepository::new(conn.clone()));

        // 配置管理器
        let config_manager = Arc::new(
            ConfigManager::from_connection(conn.clone())
                .map_err(|e| format!("无法创建ConfigManager: {}", e))?,
        );
        let config: Arc<dyn ForecastConfigReader> = config_manager.clone();

        // ==========================================
        // 初始化API层
        // ==========================================
        let production_api = Arc::new(ProductionApi::new(
            production_repo.clone(),
            order_repo,
            sale_repo,
            action_log_repo,
            config.clone(),
            clock.clone(),
        ));

        let material_api = Arc::new(MaterialApi::new(
            material_repo,
            production_repo,
            config,
            clock,
        ));

        tracing::info!("AppState初始化成功");

        Ok(Self {
            db_path,
            production_api,
            material_api,
            config_manager,
        })
    }
}

/// 获取默认数据库路径
///
/// 优先级: 环境变量 JIRANGAN_DB_PATH > 用户数据目录 > 当前目录
pub fn get_default_db_path() -> String {
    use std::path::PathBuf;

    // 允许通过环境变量显式指定 DB 路径（便于调试/测试/CI）
    if let Ok(path) = std::env::var("JIRANGAN_DB_PATH") {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }

    let mut path = PathBuf::from("./jirangan.db");

    if let Some(data_dir) = dirs::data_dir() {
        let dir = data_dir.join("jirangan-planner");
        // 目录创建失败时回退到当前目录
        if std::fs::create_dir_all(&dir).is_ok() {
            path = dir.join("jirangan.db");
        }
    }

    path.to_string_lossy().to_string()
}
