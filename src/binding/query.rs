//! Query bindings: read-only calls that follow their arguments.

use super::{decode, CallSpec, CallState, Debouncer, ErrorCallback, LoadingGuard, SuccessCallback};
use crate::error::CallError;
use crate::remote::{CallArgs, RemoteService};

use chrono::Utc;
use parking_lot::Mutex;
use serde::de::DeserializeOwned;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// A read-only binding over one named remote procedure.
///
/// Every dispatch takes a generation token. Only the call holding the latest
/// token may write `data`/`error` or clear `loading`; anything that resolves
/// after being superseded is returned to its own caller and otherwise dropped.
pub struct QueryBinding<R> {
    service: Arc<dyn RemoteService>,
    function_name: String,
    args: Mutex<Option<CallArgs>>,
    on_success: Option<SuccessCallback<R>>,
    on_error: Option<ErrorCallback>,
    state: Mutex<CallState<R>>,
    generation: AtomicU64,
    debouncer: Debouncer,
}

impl<R> QueryBinding<R>
where
    R: DeserializeOwned + Clone + Send,
{
    pub fn new(service: Arc<dyn RemoteService>, spec: CallSpec<R>, debounce: Duration) -> Self {
        Self {
            service,
            function_name: spec.function_name,
            args: Mutex::new(spec.args),
            on_success: spec.on_success,
            on_error: spec.on_error,
            state: Mutex::new(CallState::default()),
            generation: AtomicU64::new(0),
            debouncer: Debouncer::new(debounce),
        }
    }

    pub fn function_name(&self) -> &str {
        &self.function_name
    }

    /// Initial effect: fetch with the `CallSpec` args, or clear if there are none.
    pub async fn mount(&self) -> Option<Result<R, CallError>> {
        let has_args = self.args.lock().is_some();
        if has_args {
            Some(self.call(None).await)
        } else {
            self.clear();
            None
        }
    }

    /// Replace the argument tuple.
    ///
    /// Value-equal args are a no-op. `None` clears `data` without calling.
    /// Otherwise the call is debounced; `None` is returned when a later change
    /// (or a clear) arrived inside the window and took over.
    pub async fn set_args(&self, args: Option<CallArgs>) -> Option<Result<R, CallError>> {
        {
            let mut current = self.args.lock();
            if *current == args {
                return None;
            }
            *current = args.clone();
        }

        if args.is_none() {
            self.clear();
            return None;
        }

        if !self.debouncer.settle().await {
            tracing::trace!(function = %self.function_name, "argument change coalesced");
            return None;
        }
        Some(self.call(None).await)
    }

    /// Dispatch now with `override_args`, else the stored args, else `()`.
    pub async fn call(&self, override_args: Option<CallArgs>) -> Result<R, CallError> {
        let token = {
            let mut state = self.state.lock();
            let token = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
            state.loading = true;
            state.error = None;
            token
        };
        let guard = LoadingGuard {
            state: &self.state,
            generation: &self.generation,
            token,
        };

        let args = match override_args {
            Some(args) => args,
            None => self.args.lock().clone().unwrap_or_default(),
        };

        let result = match self.service.query(&self.function_name, &args).await {
            Ok(value) => decode::<R>(value),
            Err(e) => Err(e),
        };

        let committed = {
            let mut state = self.state.lock();
            if self.generation.load(Ordering::SeqCst) != token {
                false
            } else {
                match &result {
                    Ok(value) => {
                        state.data = Some(value.clone());
                        state.updated_at = Some(Utc::now());
                    }
                    Err(e) => state.error = Some(e.clone()),
                }
                true
            }
        };

        drop(guard);

        if !committed {
            tracing::debug!(function = %self.function_name, token, "discarding stale query result");
            return result;
        }

        match &result {
            Ok(value) => {
                if let Some(cb) = &self.on_success {
                    cb(value);
                }
            }
            Err(e) => {
                tracing::debug!(function = %self.function_name, error = %e, "query failed");
                if let Some(cb) = &self.on_error {
                    cb(e);
                }
            }
        }
        result
    }

    /// Drop data and supersede anything in flight or pending.
    fn clear(&self) {
        self.debouncer.cancel();
        let mut state = self.state.lock();
        self.generation.fetch_add(1, Ordering::SeqCst);
        state.data = None;
        state.error = None;
        state.loading = false;
        state.updated_at = None;
    }

    // ── Accessors ────────────────────────────────────────────────────────

    pub fn state(&self) -> CallState<R> {
        self.state.lock().clone()
    }

    pub fn data(&self) -> Option<R> {
        self.state.lock().data.clone()
    }

    pub fn loading(&self) -> bool {
        self.state.lock().loading
    }

    pub fn error(&self) -> Option<CallError> {
        self.state.lock().error.clone()
    }

    pub fn args(&self) -> Option<CallArgs> {
        self.args.lock().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::remote::Arg;
    use async_trait::async_trait;
    use std::sync::atomic::AtomicUsize;

    /// Echoes the first argument back after sleeping that many milliseconds.
    #[derive(Default)]
    struct EchoService {
        calls: Mutex<Vec<CallArgs>>,
    }

    #[async_trait]
    impl RemoteService for EchoService {
        async fn query(&self, _method: &str, args: &CallArgs) -> Result<serde_json::Value, CallError> {
            self.calls.lock().push(args.clone());
            let ms = match args.as_slice().first() {
                Some(Arg::Nat(n)) => *n as u64,
                _ => 0,
            };
            if ms == 999 {
                return Err(CallError::Rejected {
                    code: "E1".into(),
                    message: "boom".into(),
                });
            }
            tokio::time::sleep(Duration::from_millis(ms)).await;
            Ok(serde_json::json!(ms))
        }

        async fn update(&self, _method: &str, _args: &CallArgs) -> Result<serde_json::Value, CallError> {
            unreachable!("query binding never updates")
        }
    }

    fn binding(service: Arc<EchoService>, args: Option<CallArgs>) -> QueryBinding<u64> {
        let mut spec = CallSpec::new("echo");
        spec.args = args;
        QueryBinding::new(service, spec, Duration::from_millis(40))
    }

    #[tokio::test]
    async fn test_call_stores_data_and_clears_loading() {
        let service = Arc::new(EchoService::default());
        let b = binding(service.clone(), Some(CallArgs::one(5u64)));

        assert_eq!(b.call(None).await, Ok(5));
        let state = b.state();
        assert_eq!(state.data, Some(5));
        assert!(!state.loading);
        assert!(state.error.is_none());
        assert!(state.updated_at.is_some());
    }

    #[tokio::test]
    async fn test_call_without_args_sends_empty_tuple() {
        let service = Arc::new(EchoService::default());
        let b = binding(service.clone(), None);
        assert_eq!(b.call(None).await, Ok(0));
        assert_eq!(service.calls.lock()[0], CallArgs::empty());
    }

    #[tokio::test]
    async fn test_override_args_take_precedence() {
        let service = Arc::new(EchoService::default());
        let b = binding(service.clone(), Some(CallArgs::one(5u64)));
        assert_eq!(b.call(Some(CallArgs::one(1u64))).await, Ok(1));
        assert_eq!(b.args(), Some(CallArgs::one(5u64)));
    }

    #[tokio::test]
    async fn test_error_is_stored_and_reported() {
        let service = Arc::new(EchoService::default());
        let seen = Arc::new(AtomicUsize::new(0));
        let counter = seen.clone();
        let spec = CallSpec::new("echo")
            .args(CallArgs::one(999u64))
            .on_error(move |_| {
                counter.fetch_add(1, Ordering::SeqCst);
            });
        let b: QueryBinding<u64> = QueryBinding::new(service, spec, Duration::ZERO);

        let err = b.call(None).await.unwrap_err();
        assert!(matches!(err, CallError::Rejected { .. }));
        assert_eq!(b.error(), Some(err));
        assert!(!b.loading());
        assert_eq!(seen.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_loading_visible_while_in_flight() {
        let service = Arc::new(EchoService::default());
        let b = binding(service, Some(CallArgs::one(30u64)));
        let (result, observed) = tokio::join!(b.call(None), async {
            tokio::time::sleep(Duration::from_millis(5)).await;
            b.loading()
        });
        assert_eq!(result, Ok(30));
        assert!(observed);
        assert!(!b.loading());
    }

    #[tokio::test]
    async fn test_dropped_call_clears_loading() {
        let service = Arc::new(EchoService::default());
        let b = binding(service, Some(CallArgs::one(50u64)));
        let timed_out =
            tokio::time::timeout(Duration::from_millis(5), b.call(None)).await;
        assert!(timed_out.is_err());
        assert!(!b.loading());
        assert_eq!(b.data(), None);
    }

    #[tokio::test]
    async fn test_mount_without_args_does_not_call() {
        let service = Arc::new(EchoService::default());
        let b = binding(service.clone(), None);
        assert!(b.mount().await.is_none());
        assert!(service.calls.lock().is_empty());
    }

    #[tokio::test]
    async fn test_equal_args_do_not_retrigger() {
        let service = Arc::new(EchoService::default());
        let b = binding(service.clone(), Some(CallArgs::one(1u64)));
        b.mount().await;
        assert!(b.set_args(Some(CallArgs::one(1u128))).await.is_none());
        assert_eq!(service.calls.lock().len(), 1);
    }
}
