//! Network URL constants for the Towerview client.

/// Default remote-procedure gateway base URL.
pub const DEFAULT_API_URL: &str = "https://api.towerview.app";

/// Default debounce window for auto-invoked queries, in milliseconds.
pub const DEFAULT_DEBOUNCE_MS: u64 = 100;
