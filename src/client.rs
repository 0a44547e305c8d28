//! High-level client: `TowerviewClient` with binding factories and
//! sub-client accessors.
//!
//! Dependencies are passed in through the builder: the transport, the
//! debounce window and the ledger decimals. Nothing is looked up ambiently.

use crate::binding::{CallSpec, QueryBinding, UpdateBinding};
use crate::domain::orderbook::client::Orderbooks;
use crate::domain::orderbook::DepthLadders;
use crate::domain::page::{Direction, Identified, PageRequest, PagedList};
use crate::error::SdkError;
use crate::remote::{Arg, CallArgs, RemoteService};
use crate::shared::MarketId;

use async_lock::RwLock;
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

pub use crate::domain::orderbook::client::Orderbooks as OrderbooksClient;

/// The primary entry point for the Towerview client.
pub struct TowerviewClient {
    pub(crate) service: Arc<dyn RemoteService>,
    pub(crate) debounce: Duration,
    /// Decimals of the ledger token order amounts are denominated in.
    pub(crate) token_decimals: u32,
    /// Depth cache: market → last aggregated ladders
    pub(crate) depth_cache: Arc<RwLock<HashMap<MarketId, DepthLadders>>>,
}

impl TowerviewClient {
    pub fn builder() -> TowerviewClientBuilder {
        TowerviewClientBuilder::default()
    }

    // ── Sub-client accessors ─────────────────────────────────────────────

    pub fn orderbooks(&self) -> Orderbooks<'_> {
        Orderbooks { client: self }
    }

    // ── Binding factories ────────────────────────────────────────────────

    /// A query binding sharing this client's transport and debounce window.
    pub fn query<R>(&self, spec: CallSpec<R>) -> QueryBinding<R>
    where
        R: DeserializeOwned + Clone + Send,
    {
        QueryBinding::new(self.service.clone(), spec, self.debounce)
    }

    pub fn update<R>(&self, spec: CallSpec<R>) -> UpdateBinding<R>
    where
        R: DeserializeOwned + Send,
    {
        UpdateBinding::new(self.service.clone(), spec)
    }

    // ── Pagination ───────────────────────────────────────────────────────

    /// Fetch one page from a paginated list procedure.
    pub async fn fetch_page<T>(
        &self,
        method: &str,
        request: &PageRequest<T::Id>,
    ) -> Result<Vec<T>, SdkError>
    where
        T: Identified + DeserializeOwned,
        T::Id: Into<Arg>,
    {
        let args = CallArgs::one(Arg::from(request));
        let value = self.service.query(method, &args).await?;
        Ok(serde_json::from_value(value)?)
    }

    /// Fetch the next page for `list` and merge it. Returns items added.
    pub async fn load_page<T>(
        &self,
        method: &str,
        list: &mut PagedList<T>,
        direction: Direction,
    ) -> Result<usize, SdkError>
    where
        T: Identified + DeserializeOwned,
        T::Id: Into<Arg>,
    {
        let request = list.next_request(direction);
        let page = self.fetch_page(method, &request).await?;
        let added = list.merge(page, direction);
        tracing::debug!(method, added, has_more = list.has_more(), "merged page");
        Ok(added)
    }

    pub fn service(&self) -> &Arc<dyn RemoteService> {
        &self.service
    }

    pub fn debounce(&self) -> Duration {
        self.debounce
    }

    /// Clear all client-side caches.
    pub async fn clear_all_caches(&self) {
        self.depth_cache.write().await.clear();
    }
}

impl Clone for TowerviewClient {
    fn clone(&self) -> Self {
        Self {
            service: self.service.clone(),
            debounce: self.debounce,
            token_decimals: self.token_decimals,
            depth_cache: self.depth_cache.clone(),
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════════
// Builder
// ═════════════════════════════════════════════════════════════════════════════

pub struct TowerviewClientBuilder {
    base_url: String,
    debounce: Duration,
    token_decimals: u32,
    service: Option<Arc<dyn RemoteService>>,
}

impl Default for TowerviewClientBuilder {
    fn default() -> Self {
        Self {
            base_url: crate::network::DEFAULT_API_URL.to_string(),
            debounce: Duration::from_millis(crate::network::DEFAULT_DEBOUNCE_MS),
            token_decimals: crate::domain::orderbook::wire::DEFAULT_TOKEN_DECIMALS,
            service: None,
        }
    }
}

impl TowerviewClientBuilder {
    /// Defaults overridden by `TOWERVIEW_API_URL` and `TOWERVIEW_DEBOUNCE_MS`
    /// (a `.env` file is honored).
    pub fn from_env() -> Result<Self, SdkError> {
        dotenvy::dotenv().ok();
        let mut builder = Self::default();
        if let Ok(url) = std::env::var("TOWERVIEW_API_URL") {
            builder = builder.base_url(&url);
        }
        if let Ok(ms) = std::env::var("TOWERVIEW_DEBOUNCE_MS") {
            let ms = ms.trim().parse::<u64>().map_err(|e| {
                SdkError::Validation(format!("TOWERVIEW_DEBOUNCE_MS '{}': {}", ms, e))
            })?;
            builder = builder.debounce(Duration::from_millis(ms));
        }
        Ok(builder)
    }

    pub fn base_url(mut self, url: &str) -> Self {
        self.base_url = url.to_string();
        self
    }

    pub fn debounce(mut self, delay: Duration) -> Self {
        self.debounce = delay;
        self
    }

    pub fn token_decimals(mut self, decimals: u32) -> Self {
        self.token_decimals = decimals;
        self
    }

    /// Use a custom transport instead of the HTTP gateway.
    pub fn service(mut self, service: Arc<dyn RemoteService>) -> Self {
        self.service = Some(service);
        self
    }

    pub fn build(self) -> Result<TowerviewClient, SdkError> {
        if self.token_decimals > 28 {
            return Err(SdkError::Validation(format!(
                "token decimals {} exceed 28",
                self.token_decimals
            )));
        }
        let service = match self.service {
            Some(service) => service,
            None => default_transport(&self.base_url)?,
        };
        Ok(TowerviewClient {
            service,
            debounce: self.debounce,
            token_decimals: self.token_decimals,
            depth_cache: Arc::new(RwLock::new(HashMap::new())),
        })
    }
}

#[cfg(feature = "http")]
fn default_transport(base_url: &str) -> Result<Arc<dyn RemoteService>, SdkError> {
    Ok(Arc::new(crate::http::RemoteHttp::new(base_url)?))
}

#[cfg(not(feature = "http"))]
fn default_transport(_base_url: &str) -> Result<Arc<dyn RemoteService>, SdkError> {
    Err(SdkError::Other(
        "no transport: enable the `http` feature or supply a RemoteService".to_string(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults() {
        let builder = TowerviewClientBuilder::default();
        assert_eq!(builder.base_url, crate::network::DEFAULT_API_URL);
        assert_eq!(builder.debounce, Duration::from_millis(100));
        assert_eq!(builder.token_decimals, 8);
    }

    #[test]
    fn test_builder_rejects_excess_decimals() {
        let err = TowerviewClient::builder().token_decimals(30).build();
        assert!(matches!(err, Err(SdkError::Validation(_))));
    }

    #[cfg(feature = "http")]
    #[test]
    fn test_builder_uses_http_by_default() {
        let client = TowerviewClient::builder()
            .base_url("http://localhost:4943")
            .debounce(Duration::from_millis(250))
            .build()
            .unwrap();
        assert_eq!(client.debounce(), Duration::from_millis(250));
    }
}
