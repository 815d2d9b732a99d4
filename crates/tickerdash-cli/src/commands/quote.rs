use std::sync::Arc;

use serde::Serialize;
use tickerdash_core::{HttpClient, QuoteBoard, QuoteStatus, Symbol};

use crate::cli::{parse_symbols, Cli, QuoteArgs};
use crate::error::CliError;

use super::{CommandOutput, ItemError};

#[derive(Debug, Serialize)]
struct QuoteResponseData {
    quotes: Vec<QuoteCard>,
}

#[derive(Debug, Serialize)]
struct QuoteCard {
    symbol: Symbol,
    status: QuoteStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    change_line: Option<String>,
}

pub async fn run(
    cli: &Cli,
    args: &QuoteArgs,
    http: Arc<dyn HttpClient>,
) -> Result<CommandOutput, CliError> {
    let symbols = parse_symbols(&args.symbols)?;
    let board = QuoteBoard::new(cli.dashboard_config().relay_client(http));

    let mut errors = Vec::new();
    let cards = board
        .load_all(&symbols)
        .await
        .into_iter()
        .map(|(symbol, status)| {
            let change_line = match &status {
                QuoteStatus::Ready(snapshot) => Some(snapshot.change_line()),
                QuoteStatus::Error(reason) => {
                    errors.push(ItemError::for_symbol(&symbol, reason.clone()));
                    None
                }
                QuoteStatus::Loading => None,
            };
            QuoteCard {
                symbol,
                status,
                change_line,
            }
        })
        .collect::<Vec<_>>();

    let data = serde_json::to_value(QuoteResponseData { quotes: cards })?;
    Ok(CommandOutput::ok(data).with_errors(errors))
}
