use chrono::Utc;
use dioxus_logger::tracing;

use quanlyso::{
    client::{component::ToolComponent, http::ApiClient, router::Router, AppContext},
    config::Config,
    model::api::LoginDto,
};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = dioxus_logger::init(config.log_level) {
        eprintln!("Failed to initialize logger: {}", e);
    }

    let api = match ApiClient::new(&config.api_url) {
        Ok(api) => api,
        Err(e) => {
            tracing::error!("Failed to build API client: {}", e);
            std::process::exit(1);
        }
    };
    let ctx = AppContext::new(api).with_items_per_page(config.items_per_page);

    if let Some((username, password)) = config.credentials() {
        let credentials = LoginDto {
            username: username.to_string(),
            password: password.to_string(),
            remember_me: config.remember_me,
        };
        match ctx.auth().login(&credentials).await {
            Ok(account) => tracing::info!("Signed in as {}", account.login),
            Err(e) => tracing::error!("Failed to sign in as {}: {}", username, e),
        }
    }

    match ctx.principal.identity(false).await {
        Ok(Some(account)) => tracing::info!(
            "Current account {} with authorities {:?}",
            account.login,
            account.authorities
        ),
        Ok(None) => tracing::warn!("Not signed in, routes requiring ROLE_USER are closed"),
        Err(e) => tracing::error!("Failed to resolve current account: {}", e),
    }

    let router = Router::new(config.items_per_page);
    tracing::info!("{} routes registered", router.routes().len());

    let mut tool = ToolComponent::new(&ctx);
    tool.init(Utc::now().date_naive()).await;

    tracing::info!(
        "Tool opened for {}: {} channel(s), {} factor(s), {} style(s), {} type(s)",
        tool.day().unwrap_or("-"),
        tool.channels().len(),
        tool.factors().len(),
        tool.styles().len(),
        tool.types().len()
    );

    for alert in ctx.alerts.drain() {
        tracing::warn!("{:?}: {}", alert.severity, alert.message);
    }
}
