mod direct_path;
mod matrix;

use std::path::Path;
use std::sync::Arc;

use lastmile_core::{
    parse_provider_settings, GeoveloConfig, GeoveloConnector, RequestContext,
    StreetNetworkRegistry,
};
use serde_json::Value;
use tracing::debug;
use uuid::Uuid;

use crate::cli::{Cli, Command};
use crate::error::CliError;

/// Provider name used when settings come from the environment.
const ENV_PROVIDER_NAME: &str = "geovelo";

pub async fn run(cli: &Cli) -> Result<Value, CliError> {
    let registry = load_registry(cli.config.as_deref())?;
    let name = select_provider(&registry, cli.provider.as_deref())?;
    let provider = registry.require(&name)?;
    let context = RequestContext::with_request_id(Uuid::new_v4().to_string());
    debug!(provider = %name, request_id = ?context.request_id, "dispatching command");

    match &cli.command {
        Command::Matrix(args) => matrix::run(args, &name, provider.as_ref(), &context).await,
        Command::DirectPath(args) => {
            direct_path::run(args, &name, provider.as_ref(), &context).await
        }
    }
}

fn load_registry(config: Option<&Path>) -> Result<StreetNetworkRegistry, CliError> {
    match config {
        Some(path) => {
            let json = std::fs::read_to_string(path)?;
            let settings = parse_provider_settings(&json)?;
            Ok(StreetNetworkRegistry::from_settings(&settings)?)
        }
        None => {
            let mut registry = StreetNetworkRegistry::new();
            registry.register(
                ENV_PROVIDER_NAME,
                Arc::new(GeoveloConnector::new(GeoveloConfig::from_env()?)),
            )?;
            Ok(registry)
        }
    }
}

fn select_provider(
    registry: &StreetNetworkRegistry,
    requested: Option<&str>,
) -> Result<String, CliError> {
    if let Some(name) = requested {
        return Ok(name.trim().to_owned());
    }

    match registry.names().as_slice() {
        [only] => Ok((*only).to_owned()),
        [] => Err(CliError::Command(String::from("no provider configured"))),
        names => Err(CliError::Command(format!(
            "several providers configured ({}); choose one with --provider",
            names.join(", ")
        ))),
    }
}
