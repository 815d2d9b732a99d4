mod chart;
mod quote;
mod search;
mod window;

use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;
use tickerdash_core::{HttpClient, ReqwestHttpClient};

use crate::cli::{Cli, Command};
use crate::error::CliError;

/// One requested item that ended in error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemError {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub symbol: Option<String>,
    pub message: String,
}

impl ItemError {
    pub fn for_symbol(symbol: impl ToString, message: impl Into<String>) -> Self {
        Self {
            symbol: Some(symbol.to_string()),
            message: message.into(),
        }
    }

    pub fn general(message: impl Into<String>) -> Self {
        Self {
            symbol: None,
            message: message.into(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CommandOutput {
    pub data: Value,
    pub errors: Vec<ItemError>,
}

impl CommandOutput {
    pub fn ok(data: Value) -> Self {
        Self {
            data,
            errors: Vec::new(),
        }
    }

    pub fn with_errors(mut self, errors: Vec<ItemError>) -> Self {
        self.errors.extend(errors);
        self
    }
}

pub async fn run(cli: &Cli) -> Result<CommandOutput, CliError> {
    let http: Arc<dyn HttpClient> = Arc::new(
        ReqwestHttpClient::new().map_err(|e| CliError::Command(e.to_string()))?,
    );

    match &cli.command {
        Command::Chart(args) => chart::run(cli, args, http).await,
        Command::Quote(args) => quote::run(cli, args, http).await,
        Command::Search(args) => search::run(cli, args, http).await,
        Command::Window(args) => window::run(args),
    }
}
