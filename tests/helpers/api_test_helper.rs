// ==========================================
// API集成测试辅助工具
// ==========================================
// 职责: 提供API层集成测试的通用辅助函数
// ==========================================

use std::sync::{Arc, Mutex};

use chrono::NaiveDate;
use rusqlite::Connection;
use tempfile::NamedTempFile;

use jirangan_planner::api::{MaterialApi, ProductionApi};
use jirangan_planner::app::AppState;
use jirangan_planner::config::{ConfigManager, ForecastConfigReader};
use jirangan_planner::db::open_sqlite_connection;
use jirangan_planner::engine::FixedClock;
use jirangan_planner::repository::{
    ActionLogRepository, MaterialRepository, OrderRepository, ProductionRepository,
    SaleRepository,
};

use crate::test_helpers::create_test_db;

// ==========================================
// API测试环境
// ==========================================

/// API测试环境
///
/// 包含 API 实例 + 用于准备测试数据的独立连接
pub struct ApiTestEnv {
    pub db_path: String,
    pub production_api: Arc<ProductionApi>,
    pub material_api: Arc<MaterialApi>,
    pub config_manager: Arc<ConfigManager>,

    /// 测试数据准备连接（模拟外部 CRUD 层）
    pub seed_conn: Connection,

    // 临时文件（确保生命周期）
    _temp_file: NamedTempFile,
}

impl ApiTestEnv {
    /// 通过 AppState 装配（配置来自 config_kv）
    pub fn new(today: NaiveDate) -> Result<Self, Box<dyn std::error::Error>> {
        jirangan_planner::logging::init_test();
        let (temp_file, db_path) = create_test_db()?;
        let state = AppState::with_clock(db_path.clone(), Arc::new(FixedClock::at_date(today)))?;
        let seed_conn = open_sqlite_connection(&db_path)?;

        Ok(Self {
            db_path,
            production_api: state.production_api,
            material_api: state.material_api,
            config_manager: state.config_manager,
            seed_conn,
            _temp_file: temp_file,
        })
    }

    /// 手工装配,注入指定配置实现
    pub fn with_config(
        today: NaiveDate,
        config: Arc<dyn ForecastConfigReader>,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        jirangan_planner::logging::init_test();
        let (temp_file, db_path) = create_test_db()?;
        let conn = Arc::new(Mutex::new(open_sqlite_connection(&db_path)?));
        let clock = Arc::new(FixedClock::at_date(today));

        let production_repo = Arc::new(ProductionRepository::new(conn.clone()));
        let production_api = Arc::new(ProductionApi::new(
            production_repo.clone(),
            Arc::new(OrderRepository::new(conn.clone())),
            Arc::new(SaleRepository::new(conn.clone())),
            Arc::new(ActionLogRepository::new(conn.clone())),
            config.clone(),
            clock.clone(),
        ));
        let material_api = Arc::new(MaterialApi::new(
            Arc::new(MaterialRepository::from_connection(conn.clone())),
            production_repo,
            config,
            clock,
        ));
        let config_manager = Arc::new(ConfigManager::from_connection(conn)?);
        let seed_conn = open_sqlite_connection(&db_path)?;

        Ok(Self {
            db_path,
            production_api,
            material_api,
            config_manager,
            seed_conn,
            _temp_file: temp_file,
        })
    }
}

pub fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

pub fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}
