use super::args::ConfigAction;
use super::render;
use crate::http::{self, AppState};
use anyhow::{bail, Result};
use chrono::Utc;
use folioapp::api::FolioApi;
use folioapp::auth::AdminGate;
use folioapp::config::{global_config_path, FolioConfig, CONFIG_FILE};
use folioapp::error::ErrorKind;
use folioapp::store::Collection;

/// Everything a handler needs: the resolved configuration and the API.
pub struct AppContext {
    pub config: FolioConfig,
    pub api: FolioApi,
}

pub async fn serve(ctx: AppContext, bind: Option<String>) -> Result<()> {
    let bind = bind.unwrap_or_else(|| ctx.config.bind.clone());
    let gate = AdminGate::new(&ctx.config.admin_emails);
    tracing::info!(admins = gate.len(), backend = %ctx.api.backend_description(), "starting server");
    let state = AppState::new(ctx.api, gate, &ctx.config.identity_header)?;
    http::serve(state, &bind).await
}

pub async fn list(ctx: &AppContext, collection: Collection, json: bool) -> Result<()> {
    let records = ctx.api.list_values(collection).await?;
    if json {
        println!("{}", serde_json::to_string_pretty(&records)?);
    } else {
        print!("{}", render::records(collection, &records, Utc::now()));
    }
    Ok(())
}

pub async fn show(ctx: &AppContext, collection: Collection, id: &str) -> Result<()> {
    match ctx.api.get_value(collection, id).await? {
        Some(record) => {
            println!("{}", serde_json::to_string_pretty(&record)?);
            Ok(())
        }
        None => bail!("No {} record with id {}", collection, id),
    }
}

pub async fn delete(ctx: &AppContext, collection: Collection, id: &str) -> Result<()> {
    match ctx.api.delete(collection, id).await {
        Ok(()) => {
            println!("Deleted {} {}", collection, id);
            Ok(())
        }
        Err(e) => match e.kind() {
            ErrorKind::NotFound => bail!("No {} record with id {}", collection, id),
            ErrorKind::BackendUnavailable | ErrorKind::ValidationFailure => Err(e.into()),
        },
    }
}

pub async fn portfolio(ctx: &AppContext, public: bool) -> Result<()> {
    let out = if public {
        serde_json::to_string_pretty(&ctx.api.public_site().await)?
    } else {
        serde_json::to_string_pretty(&ctx.api.portfolio().await?)?
    };
    println!("{}", out);
    Ok(())
}

pub async fn stats(ctx: &AppContext) -> Result<()> {
    let dashboard = ctx.api.dashboard().await?;
    print!("{}", render::dashboard(&dashboard));
    Ok(())
}

pub async fn seed(ctx: &AppContext, force: bool) -> Result<()> {
    let report = ctx.api.seed(force).await?;
    print!("{}", render::seed_report(&report));
    Ok(())
}

pub fn config(config: &FolioConfig, action: ConfigAction) -> Result<()> {
    match action {
        ConfigAction::Show => print!("{}", render::config(config)),
        ConfigAction::Template => print!("{}", FolioConfig::template()),
        ConfigAction::Path => {
            println!("{}", config.data_dir().join(CONFIG_FILE).display());
            if let Some(global) = global_config_path() {
                println!("{}", global.display());
            }
        }
    }
    Ok(())
}
