//! 服务器状态 - 持有所有服务的单例引用
//!
//! ServerState 是进程的核心数据结构，持有所有服务的共享引用。
//! 使用 Arc 实现浅拷贝，所有权成本极低。
//!
//! # 服务组件
//!
//! | 字段 | 类型 | 说明 |
//! |------|------|------|
//! | config | Config | 配置项 (不可变) |
//! | db | Surreal<Db> | 嵌入式数据库 |
//! | hub | Arc<RealtimeHub> | 实时推送中心 |
//! | jwt | Arc<JwtService> | JWT 认证服务 |
//! | orders | Arc<OrderService> | 订单服务 |
//! | tracking | Arc<TrackingResolver> | 订单追踪解析 |
//!
//! The hub and the order service are constructed exactly once here and
//! wired together by injection — handlers reach them through this state,
//! never through a process-wide global.

use std::path::PathBuf;
use std::sync::Arc;

use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use crate::auth::JwtService;
use crate::core::Config;
use crate::db::DbService;
use crate::db::repository::{MenuItemRepository, OrderRepository};
use crate::orders::{OrderNumberGenerator, OrderService, TrackingResolver};
use crate::realtime::{HubConfig, RealtimeHub};

/// 服务器状态
#[derive(Clone)]
pub struct ServerState {
    /// 服务器配置
    pub config: Config,
    /// 嵌入式数据库 (SurrealDB)
    pub db: Surreal<Db>,
    /// 实时推送中心
    pub hub: Arc<RealtimeHub>,
    /// JWT 认证服务
    pub jwt: Arc<JwtService>,
    /// 订单服务
    pub orders: Arc<OrderService>,
    /// 订单追踪解析
    pub tracking: Arc<TrackingResolver>,
    /// 菜单仓储 (浏览接口)
    pub menu: MenuItemRepository,
}

impl ServerState {
    /// 初始化服务器状态
    ///
    /// 按顺序初始化：
    /// 1. 工作目录结构
    /// 2. 数据库 (work_dir/database/orders.db)
    /// 3. 实时推送中心
    /// 4. 订单服务 (注入仓储 + 推送中心)
    pub async fn initialize(config: &Config) -> Result<Self, crate::utils::AppError> {
        // 0. Ensure work_dir structure exists
        let db_dir = config.database_dir();
        std::fs::create_dir_all(&db_dir).map_err(|e| {
            crate::utils::AppError::internal(format!(
                "Failed to create work directory {}: {}",
                db_dir.display(),
                e
            ))
        })?;

        // 1. Initialize DB
        let db_path = db_dir.join("orders.db");
        let db_service = DbService::new(&db_path.to_string_lossy()).await?;
        let db = db_service.db;

        // 2. Initialize services
        let hub = Arc::new(RealtimeHub::from_config(HubConfig {
            tcp_listen_addr: format!("0.0.0.0:{}", config.realtime_tcp_port),
            ..Default::default()
        }));
        let jwt = Arc::new(JwtService::default());

        Ok(Self::with_db(config.clone(), db, hub, jwt))
    }

    /// Assemble state from an already-open database (shared with tests)
    pub fn with_db(
        config: Config,
        db: Surreal<Db>,
        hub: Arc<RealtimeHub>,
        jwt: Arc<JwtService>,
    ) -> Self {
        let order_repo = OrderRepository::new(db.clone());
        let menu_repo = MenuItemRepository::new(db.clone());
        let numbers = OrderNumberGenerator::new(db.clone(), &config.order_number_prefix);
        let orders = Arc::new(OrderService::new(
            order_repo.clone(),
            menu_repo.clone(),
            hub.clone(),
            numbers,
            config.order_policy(),
        ));
        let tracking = Arc::new(TrackingResolver::new(order_repo));

        Self {
            config,
            db,
            hub,
            jwt,
            orders,
            tracking,
            menu: menu_repo,
        }
    }

    /// 获取数据库实例
    pub fn get_db(&self) -> Surreal<Db> {
        self.db.clone()
    }

    /// 获取工作目录
    pub fn work_dir(&self) -> PathBuf {
        PathBuf::from(&self.config.work_dir)
    }
}
