//! Remote procedure layer: the transport seam every binding talks through.
//!
//! A `RemoteService` knows how to dispatch a named procedure with a typed
//! argument tuple and hand back the raw JSON result. Query procedures are
//! assumed idempotent; update procedures have side effects.

mod args;

pub use args::{Arg, CallArgs};

use crate::error::CallError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// The two access modes of a remote procedure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CallKind {
    Query,
    Update,
}

impl CallKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            CallKind::Query => "query",
            CallKind::Update => "update",
        }
    }
}

/// A named-procedure transport.
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
pub trait RemoteService: Send + Sync {
    /// Read-only call; safe to retry and to auto-invoke.
    async fn query(&self, method: &str, args: &CallArgs) -> Result<serde_json::Value, CallError>;

    /// State-mutating call; only ever invoked explicitly.
    async fn update(&self, method: &str, args: &CallArgs) -> Result<serde_json::Value, CallError>;
}

/// An application-level result: the call completed, but the payload may
/// still be a business-rule rejection.
///
/// Wire form is `{"Ok": ...}` or `{"Err": ...}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Reply<T, E> {
    Ok(T),
    Err(E),
}

impl<T, E> Reply<T, E> {
    pub fn into_result(self) -> Result<T, E> {
        match self {
            Reply::Ok(v) => Ok(v),
            Reply::Err(e) => Err(e),
        }
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, Reply::Ok(_))
    }
}

impl<T, E> From<Reply<T, E>> for Result<T, E> {
    fn from(reply: Reply<T, E>) -> Self {
        reply.into_result()
    }
}
