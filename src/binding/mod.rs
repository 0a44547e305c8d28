//! Remote-call bindings: uniform query/update access to named procedures.
//!
//! A binding owns one `CallState` and is the only thing that mutates it.
//! Query bindings re-run when their arguments change (debounced) and drop
//! results that a newer call has superseded. Update bindings only run when
//! asked to and hand their result straight back to the caller.

pub mod debounce;
pub mod query;
pub mod update;

pub use debounce::Debouncer;
pub use query::QueryBinding;
pub use update::UpdateBinding;

use crate::error::CallError;
use crate::remote::CallArgs;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::de::DeserializeOwned;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

pub type SuccessCallback<R> = Arc<dyn Fn(&R) + Send + Sync>;
pub type ErrorCallback = Arc<dyn Fn(&CallError) + Send + Sync>;

// ─── CallSpec ────────────────────────────────────────────────────────────────

/// What to call and what to do with the outcome.
pub struct CallSpec<R> {
    pub function_name: String,
    pub args: Option<CallArgs>,
    pub on_success: Option<SuccessCallback<R>>,
    pub on_error: Option<ErrorCallback>,
}

impl<R> CallSpec<R> {
    pub fn new(function_name: impl Into<String>) -> Self {
        Self {
            function_name: function_name.into(),
            args: None,
            on_success: None,
            on_error: None,
        }
    }

    pub fn args(mut self, args: CallArgs) -> Self {
        self.args = Some(args);
        self
    }

    pub fn on_success(mut self, f: impl Fn(&R) + Send + Sync + 'static) -> Self {
        self.on_success = Some(Arc::new(f));
        self
    }

    pub fn on_error(mut self, f: impl Fn(&CallError) + Send + Sync + 'static) -> Self {
        self.on_error = Some(Arc::new(f));
        self
    }
}

impl<R> Clone for CallSpec<R> {
    fn clone(&self) -> Self {
        Self {
            function_name: self.function_name.clone(),
            args: self.args.clone(),
            on_success: self.on_success.clone(),
            on_error: self.on_error.clone(),
        }
    }
}

impl<R> fmt::Debug for CallSpec<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallSpec")
            .field("function_name", &self.function_name)
            .field("args", &self.args)
            .field("on_success", &self.on_success.is_some())
            .field("on_error", &self.on_error.is_some())
            .finish()
    }
}

// ─── CallState ───────────────────────────────────────────────────────────────

/// Observable lifecycle of a binding.
#[derive(Debug, Clone)]
pub struct CallState<R> {
    pub data: Option<R>,
    pub loading: bool,
    pub error: Option<CallError>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl<R> Default for CallState<R> {
    fn default() -> Self {
        Self {
            data: None,
            loading: false,
            error: None,
            updated_at: None,
        }
    }
}

// ─── Internals shared by both modes ──────────────────────────────────────────

/// Clears `loading` when a call ends, however it ends, unless a newer call
/// has taken over the state.
pub(crate) struct LoadingGuard<'a, R> {
    pub(crate) state: &'a Mutex<CallState<R>>,
    pub(crate) generation: &'a AtomicU64,
    pub(crate) token: u64,
}

impl<R> LoadingGuard<'_, R> {
    pub(crate) fn is_current(&self) -> bool {
        self.generation.load(Ordering::SeqCst) == self.token
    }
}

impl<R> Drop for LoadingGuard<'_, R> {
    fn drop(&mut self) {
        if self.is_current() {
            self.state.lock().loading = false;
        }
    }
}

pub(crate) fn decode<R: DeserializeOwned>(value: serde_json::Value) -> Result<R, CallError> {
    serde_json::from_value(value).map_err(CallError::from)
}
