//! HTTP transport layer: `RemoteHttp` with per-call-kind retry policies.

pub mod client;
pub mod retry;

pub use client::RemoteHttp;
pub use retry::{RetryConfig, RetryPolicy};
