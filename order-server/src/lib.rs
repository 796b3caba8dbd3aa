//! Order Server - 餐饮下单与实时追踪服务
//!
//! # 架构概述
//!
//! 本模块是 Order Server 的主入口，提供以下核心功能：
//!
//! - **订单核心** (`orders`): 状态机、定价、订单号、追踪
//! - **实时推送** (`realtime`): 主题订阅与订单快照广播
//! - **数据库** (`db`): 嵌入式 SurrealDB 存储
//! - **认证** (`auth`): JWT 角色校验
//! - **HTTP API** (`api`): RESTful API 接口
//!
//! # 模块结构
//!
//! ```text
//! order-server/src/
//! ├── core/          # 配置、状态、服务器
//! ├── auth/          # JWT 校验、提取器
//! ├── api/           # HTTP 路由和处理器
//! ├── db/            # 数据库层
//! ├── orders/        # 订单领域核心
//! ├── realtime/      # 实时推送中心
//! └── utils/         # 工具函数
//! ```

pub mod api;
pub mod auth;
pub mod core;
pub mod db;
pub mod orders;
pub mod realtime;
pub mod utils;

// Re-export 公共类型
pub use auth::{CurrentUser, JwtService};
pub use core::{Config, Server, ServerState};
pub use orders::{OrderNumberGenerator, OrderService, TrackingResolver};
pub use realtime::RealtimeHub;
pub use utils::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

pub fn print_banner() {
    println!(
        r#"
   ____          __
  / __ \_______/ /__  _____
 / / / / ___/ __  / _ \/ ___/
/ /_/ / /  / /_/ /  __/ /
\____/_/   \__,_/\___/_/
   _____
  / ___/___  ______   _____  _____
  \__ \/ _ \/ ___/ | / / _ \/ ___/
 ___/ /  __/ /   | |/ /  __/ /
/____/\___/_/    |___/\___/_/
    "#
    );
}
