//! The generic CRUD resource composite consumed by list pages: one
//! implementation of fetch/submit/delete with loading flags, transient
//! feedback, bounded retries, and post-mutation refetch, instantiated
//! per resource from the catalog in `resources`.

use crate::cancel::CancelSource;
use crate::error::ClientError;
use crate::messages::{MessageKind, MessageStore};
use crate::record::{CanonicalRecord, id_text, is_placeholder};
use crate::resource::{Backend, ResourceClient};
use crate::resources::ResourceSpec;
use crate::retry::{RetryPolicy, with_retry};
use payloads::PageEnvelope;
use serde_json::Value;
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Debug, Clone, Copy)]
pub struct CrudOptions {
    pub retry: RetryPolicy,
    pub message_ttl: Duration,
}

impl Default for CrudOptions {
    fn default() -> Self {
        Self {
            retry: RetryPolicy::default(),
            message_ttl: crate::messages::DEFAULT_MESSAGE_TTL,
        }
    }
}

#[derive(Default)]
struct CrudState {
    collection: Vec<CanonicalRecord>,
    is_fetching: bool,
    is_submitting: bool,
    is_deleting: bool,
    // Incremented per fetch; only the latest-issued fetch may write the
    // collection, so overlapping fetches resolve to the newest data
    // instead of whichever response happened to land last.
    fetch_epoch: u64,
}

type UnauthorizedHandler = Box<dyn Fn() + Send + Sync>;

/// A cheaply-cloneable handle over one resource's collection state and
/// operations. Clones share state, so a page and its modal form observe
/// the same collection, flags, and messages.
#[derive(Clone)]
pub struct CrudResource {
    spec: Arc<ResourceSpec>,
    client: ResourceClient,
    state: Arc<Mutex<CrudState>>,
    messages: MessageStore,
    retry: RetryPolicy,
    cancel: CancelSource,
    on_unauthorized: Arc<Mutex<Option<UnauthorizedHandler>>>,
}

impl CrudResource {
    pub fn new(backend: &Backend, spec: ResourceSpec) -> Self {
        Self::with_options(backend, spec, CrudOptions::default())
    }

    pub fn with_options(
        backend: &Backend,
        spec: ResourceSpec,
        options: CrudOptions,
    ) -> Self {
        Self {
            client: backend.resource(spec.base_path),
            spec: Arc::new(spec),
            state: Arc::new(Mutex::new(CrudState::default())),
            messages: MessageStore::new(options.message_ttl),
            retry: options.retry,
            cancel: CancelSource::new(),
            on_unauthorized: Arc::new(Mutex::new(None)),
        }
    }

    /// Invoked whenever the backend answers 401, e.g. to force a logout
    /// and redirect to the sign-in page.
    pub fn on_unauthorized(&self, handler: impl Fn() + Send + Sync + 'static) {
        *self.on_unauthorized.lock().unwrap() = Some(Box::new(handler));
    }

    pub fn spec(&self) -> &ResourceSpec {
        &self.spec
    }

    /// Snapshot of the last successfully fetched collection.
    pub fn collection(&self) -> Vec<CanonicalRecord> {
        self.state.lock().unwrap().collection.clone()
    }

    pub fn is_fetching(&self) -> bool {
        self.state.lock().unwrap().is_fetching
    }

    pub fn is_submitting(&self) -> bool {
        self.state.lock().unwrap().is_submitting
    }

    pub fn is_deleting(&self) -> bool {
        self.state.lock().unwrap().is_deleting
    }

    pub fn success_message(&self) -> Option<String> {
        self.messages.success()
    }

    pub fn error_message(&self) -> Option<String> {
        self.messages.error()
    }

    /// Cancel all in-flight work for this handle. Cancelled work neither
    /// updates the collection nor posts messages. Called when the owning
    /// screen goes away.
    pub fn detach(&self) {
        self.cancel.cancel();
        let mut state = self.state.lock().unwrap();
        state.is_fetching = false;
        state.is_submitting = false;
        state.is_deleting = false;
    }

    /// Refresh the collection. Failures are retried within the policy
    /// bound and then absorbed into the error message: the previous
    /// collection stays in place, since stale-but-present data beats a
    /// blanked screen. Never returns an error to the caller.
    #[tracing::instrument(skip_all, fields(resource = self.spec.name))]
    pub async fn fetch(&self, params: &[(&str, &str)]) {
        let epoch = {
            let mut state = self.state.lock().unwrap();
            state.fetch_epoch += 1;
            state.is_fetching = true;
            state.fetch_epoch
        };
        let token = self.cancel.token();
        let owned_params: Vec<(String, String)> = params
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        let client = self.client.clone();
        let result = with_retry(&self.retry, &token, move || {
            let client = client.clone();
            let params = owned_params.clone();
            async move { client.list(&params).await }
        })
        .await;

        let outcome = result.and_then(|body| self.normalize_rows(body));
        let mut state = self.state.lock().unwrap();
        if state.fetch_epoch != epoch {
            // A newer fetch owns the state now; this response is stale.
            return;
        }
        match outcome {
            Ok(records) => {
                let count = records.len();
                state.collection = records;
                state.is_fetching = false;
                drop(state);
                tracing::debug!(count, "collection refreshed");
                self.messages.clear(MessageKind::Error);
                self.messages.set_success(format!(
                    "Loaded {count} {} records",
                    self.spec.name
                ));
            }
            Err(ClientError::Cancelled) => {}
            Err(err) => {
                state.is_fetching = false;
                drop(state);
                tracing::warn!("fetch failed: {err:#}");
                self.notify_if_unauthorized(&err);
                self.messages.set_error(err.to_string());
            }
        }
    }

    /// Create (`is_edit == false`) or update (`is_edit == true`) one
    /// record, then refetch so the resolved future already observes the
    /// refreshed collection. Failures set a sticky error message *and*
    /// propagate, so the originating form can stay open showing them.
    #[tracing::instrument(skip_all, fields(resource = self.spec.name, is_edit))]
    pub async fn submit(
        &self,
        payload: Value,
        is_edit: bool,
    ) -> Result<(), ClientError> {
        let result = self.submit_inner(payload, is_edit).await;
        match &result {
            Ok(()) => {
                self.messages
                    .set_success(format!("{} saved", self.spec.name));
            }
            Err(ClientError::Cancelled) => {}
            Err(err) => {
                self.notify_if_unauthorized(err);
                self.messages.set_error_sticky(err.to_string());
            }
        }
        result
    }

    async fn submit_inner(
        &self,
        mut payload: Value,
        is_edit: bool,
    ) -> Result<(), ClientError> {
        let id = match payload.get(self.spec.id_field) {
            Some(value) => id_text(value),
            None => None,
        };
        if is_edit && id.is_none() {
            return Err(ClientError::Validation(format!(
                "Cannot update a {} that has not been saved yet",
                self.spec.name
            )));
        }
        if !is_edit {
            // Unsaved rows carry a client-only placeholder key (or a
            // null id); neither belongs on the wire.
            if let Some(map) = payload.as_object_mut() {
                map.remove(self.spec.id_field);
            }
        }

        self.set_flag(Flag::Submitting, true);
        let token = self.cancel.token();
        let result = tokio::select! {
            _ = token.cancelled() => Err(ClientError::Cancelled),
            result = async {
                match &id {
                    Some(id) if is_edit => {
                        self.client.update(id, &payload).await
                    }
                    _ => self.client.create(&payload).await,
                }
            } => result,
        };
        let result = match result {
            Ok(_) => {
                // Awaited before resolving: completion implies the
                // collection already reflects the authoritative state.
                self.fetch(&[]).await;
                Ok(())
            }
            Err(err) => Err(err),
        };
        self.set_flag(Flag::Submitting, false);
        result
    }

    /// Delete one record and refetch. A missing, empty, or placeholder
    /// id never reaches the network; failures are absorbed into the
    /// error message, since the caller has nothing further to do.
    #[tracing::instrument(skip_all, fields(resource = self.spec.name))]
    pub async fn remove(&self, id: &Value) {
        if is_placeholder(id) {
            self.messages.set_error(format!(
                "Cannot delete a {} that has not been saved yet",
                self.spec.name
            ));
            return;
        }
        let Some(key) = id_text(id) else {
            self.messages.set_error(format!(
                "Cannot delete this {}: no identifier",
                self.spec.name
            ));
            return;
        };

        self.set_flag(Flag::Deleting, true);
        let token = self.cancel.token();
        let result = tokio::select! {
            _ = token.cancelled() => Err(ClientError::Cancelled),
            result = self.client.remove(&key) => result,
        };
        match result {
            Ok(()) => {
                self.fetch(&[]).await;
                self.messages
                    .set_success(format!("{} deleted", self.spec.name));
            }
            Err(ClientError::Cancelled) => {}
            Err(err) => {
                tracing::warn!("delete failed: {err:#}");
                self.notify_if_unauthorized(&err);
                self.messages.set_error(err.to_string());
            }
        }
        self.set_flag(Flag::Deleting, false);
    }

    /// Non-CRUD verb on one saved record (e.g. approving a leave
    /// request). Submit-shaped: refetches on success, rethrows on
    /// failure.
    #[tracing::instrument(skip_all, fields(resource = self.spec.name, verb))]
    pub async fn action(
        &self,
        id: &Value,
        verb: &str,
        payload: Option<Value>,
    ) -> Result<(), ClientError> {
        let result = self.action_inner(id, verb, payload).await;
        match &result {
            Ok(()) => {
                self.messages
                    .set_success(format!("{} updated", self.spec.name));
            }
            Err(ClientError::Cancelled) => {}
            Err(err) => {
                self.notify_if_unauthorized(err);
                self.messages.set_error_sticky(err.to_string());
            }
        }
        result
    }

    async fn action_inner(
        &self,
        id: &Value,
        verb: &str,
        payload: Option<Value>,
    ) -> Result<(), ClientError> {
        let Some(key) = id_text(id) else {
            return Err(ClientError::Validation(format!(
                "Cannot {verb} a {} that has not been saved yet",
                self.spec.name
            )));
        };
        self.set_flag(Flag::Submitting, true);
        let token = self.cancel.token();
        let result = tokio::select! {
            _ = token.cancelled() => Err(ClientError::Cancelled),
            result = self.client.action(&key, verb, payload.as_ref()) => result,
        };
        let result = match result {
            Ok(_) => {
                self.fetch(&[]).await;
                Ok(())
            }
            Err(err) => Err(err),
        };
        self.set_flag(Flag::Submitting, false);
        result
    }

    fn normalize_rows(
        &self,
        body: Value,
    ) -> Result<Vec<CanonicalRecord>, ClientError> {
        let rows = unwrap_rows(body, self.spec.name)?;
        rows.iter()
            .map(|row| self.spec.normalize(row))
            .collect()
    }

    fn set_flag(&self, flag: Flag, value: bool) {
        let mut state = self.state.lock().unwrap();
        match flag {
            Flag::Submitting => state.is_submitting = value,
            Flag::Deleting => state.is_deleting = value,
        }
    }

    fn notify_if_unauthorized(&self, err: &ClientError) {
        if !err.is_auth_required() {
            return;
        }
        if let Some(handler) = self.on_unauthorized.lock().unwrap().as_ref() {
            handler();
        }
    }
}

enum Flag {
    Submitting,
    Deleting,
}

/// A list body is either a bare array or a pagination envelope; anything
/// else is a malformed response.
pub(crate) fn unwrap_rows(
    body: Value,
    resource: &str,
) -> Result<Vec<Value>, ClientError> {
    match body {
        Value::Array(rows) => Ok(rows),
        Value::Null => Ok(Vec::new()),
        Value::Object(_) => serde_json::from_value::<PageEnvelope>(body)
            .map(|envelope| envelope.data)
            .map_err(|_| ClientError::Normalization {
                resource: resource.to_string(),
                field: "(list)".to_string(),
                reason: "unrecognized list response shape".to_string(),
            }),
        other => Err(ClientError::Normalization {
            resource: resource.to_string(),
            field: "(list)".to_string(),
            reason: format!("unexpected list body: {other}"),
        }),
    }
}
