//! # HTTP Transport
//!
//! Translates requests into [`FolioApi`] calls and results into JSON.
//!
//! ```text
//! GET    /api/portfolio                     aggregate, 500 on backend error
//! GET    /api/public                        public view with fallbacks
//! GET    /api/projects                      list ([] on read failure)
//! POST   /api/projects                      create (admin)
//! GET    /api/projects/:id                  200 / 404
//! PUT    /api/projects/:id                  shallow merge (admin)
//! DELETE /api/projects/:id                  204 / 404 (admin)
//!        /api/experiences, /api/portfolio/skill-categories: same shape
//! GET    /api/portfolio/personal-info       record or null
//! POST   /api/portfolio/personal-info       upsert (admin)
//! PUT    /api/portfolio/personal-info/:id   update (admin)
//!        about-info, contact-info, site-settings: same shape
//! GET    /admin  /login  /health
//! ```

mod auth;
mod error;
mod routes;

use anyhow::Context;
use axum::http::HeaderName;
use axum::routing::get;
use axum::{middleware, Router};
use folioapp::api::FolioApi;
use folioapp::auth::AdminGate;
use folioapp::model::{
    AboutInfo, ContactInfo, Experience, PersonalInfo, Project, SiteSettings, SkillCategory,
};
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub api: FolioApi,
    pub gate: Arc<AdminGate>,
    pub identity_header: HeaderName,
}

impl AppState {
    pub fn new(api: FolioApi, gate: AdminGate, identity_header: &str) -> anyhow::Result<Self> {
        let identity_header = HeaderName::from_bytes(identity_header.trim().as_bytes())
            .with_context(|| format!("invalid identity header name: {identity_header:?}"))?;
        Ok(Self {
            api,
            gate: Arc::new(gate),
            identity_header,
        })
    }
}

pub fn router(state: AppState) -> Router {
    let mut api = Router::new()
        .route("/api/portfolio", get(routes::portfolio))
        .route("/api/public", get(routes::public));
    api = routes::collection::<Project>(api, "/api/projects");
    api = routes::collection::<Experience>(api, "/api/experiences");
    api = routes::collection::<SkillCategory>(api, "/api/portfolio/skill-categories");
    api = routes::singleton::<PersonalInfo>(api, "/api/portfolio/personal-info");
    api = routes::singleton::<AboutInfo>(api, "/api/portfolio/about-info");
    api = routes::singleton::<ContactInfo>(api, "/api/portfolio/contact-info");
    api = routes::singleton::<SiteSettings>(api, "/api/portfolio/site-settings");
    let api = api.layer(middleware::from_fn_with_state(
        state.clone(),
        auth::require_admin_for_writes,
    ));

    Router::new()
        .merge(api)
        .route("/admin", get(auth::admin))
        .route("/login", get(auth::login))
        .route("/health", get(routes::health))
        .with_state(state)
}

pub async fn serve(state: AppState, bind: &str) -> anyhow::Result<()> {
    if state.gate.is_empty() {
        tracing::warn!("no admin emails configured; every write will be rejected");
    }
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(bind)
        .await
        .with_context(|| format!("failed to bind {bind}"))?;
    tracing::info!(address = %listener.local_addr()?, "listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    tracing::info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
    }
}
