//! Debounced symbol search.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use crate::relay::RelayClient;
use crate::{RelayError, SymbolMatch};

pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

/// Latest-value-wins debouncer: a submission settles only if no newer one
/// arrived during the quiet period.
#[derive(Debug)]
pub struct Debouncer {
    delay: Duration,
    generation: AtomicU64,
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(DEFAULT_DEBOUNCE)
    }
}

impl Debouncer {
    pub const fn new(delay: Duration) -> Self {
        Self {
            delay,
            generation: AtomicU64::new(0),
        }
    }

    pub const fn delay(&self) -> Duration {
        self.delay
    }

    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    /// Resolves to `Some(value)` after the quiet period, or `None` if superseded.
    pub async fn settle<T>(&self, value: T) -> Option<T> {
        let ticket = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        tokio::time::sleep(self.delay).await;
        (self.generation() == ticket).then_some(value)
    }
}

/// Search box backend: debounce, then query the relay.
pub struct SymbolSearch {
    client: RelayClient,
    debouncer: Debouncer,
}

impl SymbolSearch {
    pub fn new(client: RelayClient, delay: Duration) -> Self {
        Self {
            client,
            debouncer: Debouncer::new(delay),
        }
    }

    /// `Ok(None)` when a newer query superseded this one, before or after the request.
    pub async fn query(&self, text: &str) -> Result<Option<Vec<SymbolMatch>>, RelayError> {
        let Some(text) = self.debouncer.settle(text.trim().to_owned()).await else {
            return Ok(None);
        };
        if text.is_empty() {
            return Ok(Some(Vec::new()));
        }

        let generation = self.debouncer.generation();
        let matches = self.client.search(&text).await?;
        if self.debouncer.generation() != generation {
            return Ok(None);
        }
        Ok(Some(matches))
    }
}
