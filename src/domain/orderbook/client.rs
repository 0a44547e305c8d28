//! Orderbooks sub-client: limit orders, depth ladders, cache.

use crate::binding::{CallSpec, QueryBinding};
use crate::client::TowerviewClient;
use crate::domain::orderbook::convert::to_orders;
use crate::domain::orderbook::wire::LimitOrderEntry;
use crate::domain::orderbook::{aggregate, DepthLadders, LimitOrder};
use crate::error::SdkError;
use crate::remote::{Arg, CallArgs};
use crate::shared::MarketId;

pub const GET_LIMIT_ORDERS: &str = "get_limit_orders";

/// Sub-client for orderbook operations.
pub struct Orderbooks<'a> {
    pub(crate) client: &'a TowerviewClient,
}

impl<'a> Orderbooks<'a> {
    fn args(market_id: &MarketId) -> CallArgs {
        CallArgs::one(Arg::from(market_id))
    }

    /// Fetch every resting order for a market.
    pub async fn orders(&self, market_id: &MarketId) -> Result<Vec<LimitOrder>, SdkError> {
        let value = self
            .client
            .service
            .query(GET_LIMIT_ORDERS, &Self::args(market_id))
            .await?;
        let entries: Vec<LimitOrderEntry> = serde_json::from_value(value)?;
        to_orders(&entries, self.client.token_decimals)
    }

    /// Fetch and aggregate depth (always fresh; refreshes the cache).
    pub async fn depth(&self, market_id: &MarketId) -> Result<DepthLadders, SdkError> {
        let ladders = aggregate(&self.orders(market_id).await?);
        self.client
            .depth_cache
            .write()
            .await
            .insert(market_id.clone(), ladders.clone());
        Ok(ladders)
    }

    /// Last ladders produced by `depth`, if any.
    pub async fn cached_depth(&self, market_id: &MarketId) -> Option<DepthLadders> {
        self.client.depth_cache.read().await.get(market_id).cloned()
    }

    /// Aggregate whatever a binding currently holds.
    pub fn depth_from(&self, entries: &[LimitOrderEntry]) -> Result<DepthLadders, SdkError> {
        Ok(aggregate(&to_orders(entries, self.client.token_decimals)?))
    }

    /// A query binding that follows the selected market.
    ///
    /// Pass `None` while no market is selected; switch markets with
    /// `set_args(Some(Orderbooks::market_args(..)))`.
    pub fn binding(&self, market_id: Option<&MarketId>) -> QueryBinding<Vec<LimitOrderEntry>> {
        let mut spec = CallSpec::new(GET_LIMIT_ORDERS);
        spec.args = market_id.map(Self::args);
        self.client.query(spec)
    }

    pub fn market_args(market_id: &MarketId) -> CallArgs {
        Self::args(market_id)
    }

    pub async fn clear_cache(&self) {
        self.client.depth_cache.write().await.clear();
    }
}
