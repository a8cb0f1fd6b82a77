//! TauLayer 营销站后端与演示仪表盘 API

mod auth;
mod common;
mod dashboard;
mod http_client;
mod model;
mod notify;
mod relay;
mod settings;

use std::sync::Arc;
use std::time::Duration;

use clap::Parser;

use auth::{IdentityClient, SignInFlow, create_auth_router};
use dashboard::{DashboardStore, FilterController, create_dashboard_router};
use model::config::Config;
use notify::ToastBus;
use relay::{EmailSender, create_relay_router};
use settings::SettingsStore;

#[derive(Parser, Debug)]
#[command(name = "taulayer-rs", version, about = "TauLayer 营销站后端与演示仪表盘 API")]
struct Args {
    /// 配置文件路径
    #[arg(short, long, default_value_t = Config::default_config_path().to_string())]
    config: String,

    /// 覆盖监听地址
    #[arg(long)]
    host: Option<String>,

    /// 覆盖监听端口
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    let mut config = Config::load(&args.config)?;
    config.apply_env_overrides();
    if let Some(host) = args.host {
        config.host = host;
    }
    if let Some(port) = args.port {
        config.port = port;
    }

    // 身份提供方参数缺失是致命错误，直接终止启动
    config.validate()?;

    let http = http_client::build_client(config.http_timeout_secs)?;

    // 认证：魔法链接签发 + 对话框流程，错误经 toast 总线呈现
    let toasts = ToastBus::new();
    let identity = Arc::new(IdentityClient::new(
        config.supabase_url.clone().unwrap_or_default(),
        config.supabase_anon_key.clone().unwrap_or_default(),
        http.clone(),
    ));
    let sign_in = Arc::new(SignInFlow::new(identity.clone(), toasts.clone()));

    // 注册表单中继
    let sender = Arc::new(EmailSender::new(
        http,
        config.email_endpoint.clone(),
        config.resend_api_key.clone(),
        config.relay_from.clone(),
        config.relay_to.clone(),
    ));
    if config.resend_api_key.is_none() {
        tracing::warn!("未配置邮件服务商 API Key，/send 将返回失败响应");
    }

    // 演示仪表盘
    let controller = Arc::new(FilterController::new(Duration::from_millis(
        config.debounce_ms,
    )));
    let store = Arc::new(DashboardStore::new(config.dataset_seed));
    let settings_store = Arc::new(SettingsStore::new(&config.settings_path));

    let app = create_relay_router(sender)
        .nest(
            "/api/dashboard",
            create_dashboard_router(controller, store, settings_store),
        )
        .nest(
            "/api/auth",
            create_auth_router(identity, sign_in, config.auth_redirect_url.clone()),
        )
        .layer(common::cors_layer());

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("taulayer-rs 已启动: http://{}", addr);

    axum::serve(listener, app).await?;
    Ok(())
}
