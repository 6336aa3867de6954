use anyhow::Result;
use lingodesk_relay::{
    create_router, AccountCredentials, AppState, Config, MeetingRelay, MemoryStore,
    WebhookDispatcher, WorkflowEngine,
};
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let cfg = Config::load("config/lingodesk-relay")?;

    info!("Lingodesk Relay v0.1.0");
    info!("Loaded config: {}", cfg.service.name);

    let store = Arc::new(MemoryStore::new());

    let credentials = Arc::new(AccountCredentials::new(
        cfg.provider.token_url.clone(),
        cfg.provider.account_id.clone(),
        cfg.provider.client_id.clone(),
        cfg.provider.client_secret.clone(),
    ));
    let relay = Arc::new(MeetingRelay::new(
        credentials,
        cfg.provider.api_base.clone(),
        cfg.provider.timezone.clone(),
    ));
    let workflow = Arc::new(WorkflowEngine::new(store.clone()));
    let dispatcher = Arc::new(WebhookDispatcher::new(store.clone()));

    if cfg.provider.webhook_secret.is_none() {
        info!("No webhook secret configured; inbound signature check disabled");
    }

    let state = AppState::new(workflow, relay, dispatcher, cfg.provider.webhook_secret.clone());
    let app = create_router(state);

    let addr = format!("{}:{}", cfg.service.http.bind, cfg.service.http.port);
    info!("HTTP server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
