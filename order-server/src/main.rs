use order_server::{Config, Server, init_logger, print_banner};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. 设置环境 (dotenv, 日志)
    dotenv::dotenv().ok();
    init_logger();

    // 打印横幅
    print_banner();

    tracing::info!("🍜 Order server starting...");

    // 2. 加载配置
    let config = Config::from_env();

    // 3. 启动 HTTP 服务器 (Server::run 会初始化状态并启动实时推送)
    let server = Server::new(config);

    if let Err(e) = server.run().await {
        tracing::error!("Server error: {}", e);
        anyhow::bail!("server exited with error: {e}");
    }

    Ok(())
}
