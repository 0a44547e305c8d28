//! # Towerview client
//!
//! Client-side core for the Towerview protocol: bindings that invoke named
//! remote procedures, and the transforms that turn their results into
//! display-ready data.
//!
//! ## Architecture
//!
//! The crate is organized in layers:
//!
//! 1. **Core**: Newtypes, price helpers, domain transforms (depth ladders,
//!    pagination, emission curve). Pure and synchronous.
//! 2. **Remote**: `RemoteService` transport trait and typed call arguments
//! 3. **Bindings**: `QueryBinding` (debounced, stale-guarded, auto-refetch)
//!    and `UpdateBinding` (explicit only)
//! 4. **HTTP**: `RemoteHttp` with per-call-kind retry policies
//! 5. **High-Level Client**: `TowerviewClient` with binding factories and
//!    sub-clients
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use towerview_client::prelude::*;
//!
//! let client = TowerviewClient::builder()
//!     .base_url("https://api.towerview.app")
//!     .build()?;
//!
//! let depth = client.orderbooks().depth(&MarketId::from("mkt_42")).await?;
//! for row in &depth.bids.rows {
//!     println!("{} {} {:.0}%", row.price_level, row.cumulative_total, depth.bids.depth_pct(row));
//! }
//! ```

// ── Layer 1: Core ────────────────────────────────────────────────────────────

/// Shared newtypes used across all domains.
pub mod shared;

/// Domain modules: orderbook depth, pagination, emission schedule.
pub mod domain;

/// Unified error types.
pub mod error;

/// Network URL constants.
pub mod network;

// ── Layer 2: Remote ──────────────────────────────────────────────────────────

/// Remote procedure transport trait and argument types.
pub mod remote;

// ── Layer 3: Bindings ────────────────────────────────────────────────────────

/// Query/update bindings with debounce and stale-resolution guard.
pub mod binding;

// ── Layer 4: HTTP ────────────────────────────────────────────────────────────

/// HTTP transport with retry policies.
#[cfg(feature = "http")]
pub mod http;

// ── Layer 5: High-Level Client ───────────────────────────────────────────────

/// `TowerviewClient`, the primary entry point.
pub mod client;

// ── Ambient ──────────────────────────────────────────────────────────────────

/// Subscriber setup and log suppression rules.
pub mod logging;

/// Local preferences file.
pub mod storage;

// ── Prelude ──────────────────────────────────────────────────────────────────

pub mod prelude {
    // Shared newtypes
    pub use crate::shared::{MarketId, Side};

    // Remote
    pub use crate::remote::{Arg, CallArgs, CallKind, RemoteService, Reply};

    // Bindings
    pub use crate::binding::{CallSpec, CallState, Debouncer, QueryBinding, UpdateBinding};

    // Domain types: orderbook
    pub use crate::domain::orderbook::wire::LimitOrderEntry;
    pub use crate::domain::orderbook::{aggregate, DepthLadder, DepthLadders, DepthRow, LimitOrder};

    // Domain types: pagination, emission
    pub use crate::domain::emission::{EmissionCurve, EmissionPoint};
    pub use crate::domain::page::{Direction, Identified, PageRequest, PagedList};

    // Errors
    pub use crate::error::{CallError, SdkError};

    // Network
    pub use crate::network::{DEFAULT_API_URL, DEFAULT_DEBOUNCE_MS};

    // Client
    pub use crate::client::{OrderbooksClient, TowerviewClient, TowerviewClientBuilder};
    #[cfg(feature = "http")]
    pub use crate::http::{RemoteHttp, RetryConfig, RetryPolicy};

    // Ambient
    pub use crate::logging::{init_logging, LogConfig, LogFilter};
    pub use crate::storage::Preferences;
}
