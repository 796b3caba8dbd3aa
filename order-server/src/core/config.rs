//! 服务器配置
//!
//! # 环境变量
//!
//! 所有配置项都可以通过环境变量覆盖：
//!
//! | 环境变量 | 默认值 | 说明 |
//! |----------|--------|------|
//! | WORK_DIR | /var/lib/order-server | 工作目录 (数据库、日志) |
//! | HTTP_PORT | 5000 | HTTP 服务端口 |
//! | REALTIME_TCP_PORT | 8081 | 实时推送 TCP 端口 |
//! | ENVIRONMENT | development | 运行环境 |
//! | ORDER_NUMBER_PREFIX | ORD | 订单号前缀 |
//! | SERVICE_FEE | 5.0 | 每单服务费 |
//! | BASE_PREP_MINUTES | 15 | 基础备餐时间估计(分钟) |
//! | PER_LINE_PREP_MINUTES | 2 | 每行追加估计(分钟) |
//!
//! # 示例
//!
//! ```ignore
//! WORK_DIR=/data/orders HTTP_PORT=8080 cargo run
//! ```

use std::path::PathBuf;

use crate::orders::service::OrderPolicy;

#[derive(Debug, Clone)]
pub struct Config {
    /// 工作目录，存储数据库与日志文件
    pub work_dir: String,
    /// HTTP API 服务端口
    pub http_port: u16,
    /// 实时推送 TCP 端口 (用于客户端直连)
    pub realtime_tcp_port: u16,
    /// 运行环境: development | staging | production
    pub environment: String,
    /// 订单号前缀
    pub order_number_prefix: String,
    /// 每单服务费
    pub service_fee: f64,
    /// 基础备餐时间估计 (分钟)
    pub base_prep_minutes: i64,
    /// 每行追加备餐估计 (分钟)
    pub per_line_prep_minutes: i64,
}

impl Config {
    /// 从环境变量加载配置
    ///
    /// 如果环境变量未设置，使用默认值
    pub fn from_env() -> Self {
        Self {
            work_dir: std::env::var("WORK_DIR")
                .unwrap_or_else(|_| "/var/lib/order-server".into()),
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(5000),
            realtime_tcp_port: std::env::var("REALTIME_TCP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8081),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
            order_number_prefix: std::env::var("ORDER_NUMBER_PREFIX")
                .unwrap_or_else(|_| "ORD".into()),
            service_fee: std::env::var("SERVICE_FEE")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(5.0),
            base_prep_minutes: std::env::var("BASE_PREP_MINUTES")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(15),
            per_line_prep_minutes: std::env::var("PER_LINE_PREP_MINUTES")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(2),
        }
    }

    /// 使用自定义值覆盖部分配置
    ///
    /// 常用于测试场景
    pub fn with_overrides(
        work_dir: impl Into<String>,
        http_port: u16,
        realtime_tcp_port: u16,
    ) -> Self {
        let mut config = Self::from_env();
        config.work_dir = work_dir.into();
        config.http_port = http_port;
        config.realtime_tcp_port = realtime_tcp_port;
        config
    }

    /// 数据库目录
    pub fn database_dir(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join("database")
    }

    /// 订单定价策略
    pub fn order_policy(&self) -> OrderPolicy {
        OrderPolicy {
            service_fee: self.service_fee,
            base_prep_minutes: self.base_prep_minutes,
            per_line_prep_minutes: self.per_line_prep_minutes,
        }
    }

    /// 是否生产环境
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// 是否开发环境
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
