//! Quote cards for the selected tickers.

use tokio::task::JoinSet;
use tracing::warn;

use crate::relay::RelayClient;
use crate::{QuoteStatus, Symbol};

#[derive(Clone)]
pub struct QuoteBoard {
    client: RelayClient,
}

impl QuoteBoard {
    pub fn new(client: RelayClient) -> Self {
        Self { client }
    }

    pub async fn load(&self, symbol: &Symbol) -> QuoteStatus {
        match self.client.quote(symbol).await {
            Ok(snapshot) => QuoteStatus::Ready(snapshot),
            Err(error) => {
                warn!(symbol = %symbol, code = error.code(), "quote fetch failed");
                QuoteStatus::Error(error.to_string())
            }
        }
    }

    /// Loads every card concurrently; output keeps the order of `symbols`.
    pub async fn load_all(&self, symbols: &[Symbol]) -> Vec<(Symbol, QuoteStatus)> {
        let mut tasks = JoinSet::new();
        for (index, symbol) in symbols.iter().cloned().enumerate() {
            let board = self.clone();
            tasks.spawn(async move {
                let status = board.load(&symbol).await;
                (index, symbol, status)
            });
        }

        let mut cards = symbols
            .iter()
            .cloned()
            .map(|symbol| (symbol, QuoteStatus::Loading))
            .collect::<Vec<_>>();
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((index, symbol, status)) => cards[index] = (symbol, status),
                Err(error) => warn!(%error, "quote task did not complete"),
            }
        }
        cards
    }
}
