//! Update bindings: mutating calls, only ever made on request.

use super::{decode, CallSpec, CallState, ErrorCallback, LoadingGuard, QueryBinding, SuccessCallback};
use crate::error::CallError;
use crate::remote::{CallArgs, RemoteService};

use parking_lot::Mutex;
use serde::de::DeserializeOwned;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// A side-effecting binding over one named remote procedure.
///
/// Never auto-invokes and never keeps the result; `call` returns it to the
/// caller. `loading`/`error` track the most recently issued call.
pub struct UpdateBinding<R> {
    service: Arc<dyn RemoteService>,
    function_name: String,
    on_success: Option<SuccessCallback<R>>,
    on_error: Option<ErrorCallback>,
    state: Mutex<CallState<()>>,
    generation: AtomicU64,
}

impl<R> UpdateBinding<R>
where
    R: DeserializeOwned + Send,
{
    /// `CallSpec::args` is ignored; updates take their args per call.
    pub fn new(service: Arc<dyn RemoteService>, spec: CallSpec<R>) -> Self {
        Self {
            service,
            function_name: spec.function_name,
            on_success: spec.on_success,
            on_error: spec.on_error,
            state: Mutex::new(CallState::default()),
            generation: AtomicU64::new(0),
        }
    }

    pub fn function_name(&self) -> &str {
        &self.function_name
    }

    pub async fn call(&self, args: Option<CallArgs>) -> Result<R, CallError> {
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

        let args = args.unwrap_or_default();
        tracing::debug!(function = %self.function_name, args = args.len(), "dispatching update");

        let result = match self.service.update(&self.function_name, &args).await {
            Ok(value) => decode::<R>(value),
            Err(e) => Err(e),
        };

        if let Err(e) = &result {
            let mut state = self.state.lock();
            if self.generation.load(Ordering::SeqCst) == token {
                state.error = Some(e.clone());
            }
        }
        drop(guard);

        match &result {
            Ok(value) => {
                if let Some(cb) = &self.on_success {
                    cb(value);
                }
            }
            Err(e) => {
                tracing::warn!(function = %self.function_name, error = %e, "update failed");
                if let Some(cb) = &self.on_error {
                    cb(e);
                }
            }
        }
        result
    }

    /// Run the update, then re-fetch `query` so it reflects the mutation.
    ///
    /// A failed refresh lands in the query binding's own state; the update's
    /// result is still returned.
    pub async fn call_and_refresh<Q>(
        &self,
        args: Option<CallArgs>,
        query: &QueryBinding<Q>,
    ) -> Result<R, CallError>
    where
        Q: DeserializeOwned + Clone + Send,
    {
        let value = self.call(args).await?;
        if let Err(e) = query.call(None).await {
            tracing::debug!(
                function = %query.function_name(),
                error = %e,
                "refresh after update failed"
            );
        }
        Ok(value)
    }

    pub fn loading(&self) -> bool {
        self.state.lock().loading
    }

    pub fn error(&self) -> Option<CallError> {
        self.state.lock().error.clone()
    }
}
