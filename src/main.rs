use realm_stats::{AppConfig, AppState, ShutdownManager, build_app};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "realm_stats=info,tower_http=info".into()),
        )
        .init();

    let shutdown_manager = ShutdownManager::new();

    // Load config
    if let Err(e) = AppConfig::init_global() {
        tracing::error!("Config init failed: {}", e);
        std::process::exit(1);
    }
    let config = AppConfig::global();

    // GitHub GraphQL 必须携带令牌，缺失时直接退出
    if config.github.effective_token().is_none() {
        tracing::error!("未配置 GitHub 令牌：请设置 github.token、APP_GITHUB__TOKEN 或 GITHUB_TOKEN");
        std::process::exit(1);
    }

    if let Err(e) = shutdown_manager.start_signal_handler() {
        tracing::error!("信号处理器启动失败: {}", e);
        std::process::exit(1);
    }

    let app_state = match AppState::from_config(config) {
        Ok(s) => s,
        Err(e) => {
            tracing::error!("上游客户端初始化失败: {}", e);
            std::process::exit(1);
        }
    };
    let app = build_app(app_state, config);

    let addr = config.server_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .unwrap_or_else(|e| {
            tracing::error!("Bind address failed {}: {}", addr, e);
            std::process::exit(1);
        });

    tracing::info!("Server: http://{}", addr);
    tracing::info!("Docs: http://{}/docs", addr);
    tracing::info!("Health: http://{}{}/health", addr, config.api.prefix);
    tracing::info!(
        "Badge cache ttl: {}ms, default GitHub user: {}",
        config.render_cache.ttl_ms,
        config.github.default_username
    );

    let shutdown_timeout = config.shutdown.timeout_duration();
    let signal_manager = shutdown_manager.clone();
    let graceful = axum::serve(listener, app).with_graceful_shutdown(async move {
        let reason = signal_manager.wait_for_shutdown().await;
        tracing::info!("接收到退出信号: {:?}，开始优雅关闭HTTP服务器...", reason);
    });

    // 收到退出信号后，给在途请求留出超时时间
    let serve = async {
        if let Err(e) = graceful.await {
            tracing::error!("服务器运行错误: {}", e);
            std::process::exit(1);
        }
    };
    let deadline = async {
        shutdown_manager.wait_for_shutdown().await;
        tokio::time::sleep(shutdown_timeout).await;
    };

    tokio::select! {
        _ = serve => tracing::info!("服务器已优雅关闭"),
        _ = deadline => tracing::warn!(
            "优雅退出超时（{}秒），强制退出",
            config.shutdown.timeout_secs
        ),
    }
}
