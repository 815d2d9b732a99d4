use std::sync::Arc;

use serde::Serialize;
use tickerdash_core::{HttpClient, SymbolMatch, SEARCH_LIMIT};

use crate::cli::{Cli, SearchArgs};
use crate::error::CliError;

use super::{CommandOutput, ItemError};

#[derive(Debug, Serialize)]
struct SearchResponseData<'a> {
    query: &'a str,
    matches: Vec<SymbolMatch>,
}

pub async fn run(
    cli: &Cli,
    args: &SearchArgs,
    http: Arc<dyn HttpClient>,
) -> Result<CommandOutput, CliError> {
    let client = cli.dashboard_config().relay_client(http);
    let query = args.query.trim();

    let (matches, errors) = match client.search(query).await {
        Ok(mut matches) => {
            matches.truncate(args.limit.min(SEARCH_LIMIT));
            (matches, Vec::new())
        }
        Err(error) => (Vec::new(), vec![ItemError::general(error.to_string())]),
    };

    let data = serde_json::to_value(SearchResponseData { query, matches })?;
    Ok(CommandOutput::ok(data).with_errors(errors))
}
