// ── Entity state stores ──
//
// Observable `{items, loading, error}` containers, one per entity, driven
// by action methods that call an `EntityService`. State lives in a `watch`
// channel so any number of consumers can snapshot or subscribe.

mod stream;

use std::future::Future;
use std::sync::Arc;

use tokio::sync::watch;
use tracing::debug;

use crate::error::CoreError;
use crate::model::{ApplyPatch, Identified};
use crate::service::EntityService;

pub use stream::{StateStream, StateWatchStream};

/// Snapshot of one entity store.
#[derive(Debug, Clone, PartialEq)]
pub struct EntityState<T> {
    pub items: Vec<T>,
    pub loading: bool,
    pub error: Option<String>,
}

impl<T> Default for EntityState<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            loading: false,
            error: None,
        }
    }
}

type StateCell<T> = watch::Sender<Arc<EntityState<T>>>;

/// Observable state container for one entity service.
///
/// Every action marks the store `loading` (and clears `error`) at the
/// moment it is *called*, before the returned future is first polled.
/// The future then settles the state and hands the outcome back, so a
/// failure is both recorded in `error` and returned to the caller.
///
/// Actions are not mutually excluded. When several are in flight, each
/// one writes `loading`/`error` as it completes and the last to finish
/// wins.
pub struct EntityStore<S: EntityService> {
    service: Arc<S>,
    state: Arc<StateCell<S::Entity>>,
}

impl<S: EntityService> Clone for EntityStore<S> {
    fn clone(&self) -> Self {
        Self {
            service: Arc::clone(&self.service),
            state: Arc::clone(&self.state),
        }
    }
}

impl<S: EntityService> EntityStore<S> {
    pub fn new(service: S) -> Self {
        Self::from_shared(Arc::new(service))
    }

    pub fn from_shared(service: Arc<S>) -> Self {
        let (state, _) = watch::channel(Arc::new(EntityState::default()));
        Self {
            service,
            state: Arc::new(state),
        }
    }

    pub fn service(&self) -> &Arc<S> {
        &self.service
    }

    // ── Reads ────────────────────────────────────────────────────────

    pub fn snapshot(&self) -> Arc<EntityState<S::Entity>> {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> StateStream<S::Entity> {
        StateStream::new(self.state.subscribe())
    }

    // ── Actions ──────────────────────────────────────────────────────

    /// Reload every record, replacing `items` wholesale.
    pub fn fetch_all(&self) -> impl Future<Output = Result<(), CoreError>> + Send + use<S> {
        let (service, state) = self.begin("fetch_all");
        async move {
            match service.fetch_all().await {
                Ok(items) => {
                    succeed(&state, |s| s.items = items);
                    Ok(())
                }
                Err(e) => Err(fail(&state, e, &format!("Failed to load {}", S::LABEL))),
            }
        }
    }

    /// Create a record, then reload the collection (the store only
    /// returns the new id, not the stored document). Resolves to the id.
    pub fn add(
        &self,
        draft: S::Draft,
    ) -> impl Future<Output = Result<String, CoreError>> + Send + use<S> {
        let (service, state) = self.begin("add");
        async move {
            let outcome = async {
                let id = service.create(draft).await?;
                let items = service.fetch_all().await?;
                Ok::<_, CoreError>((id, items))
            }
            .await;

            match outcome {
                Ok((id, items)) => {
                    succeed(&state, |s| s.items = items);
                    Ok(id)
                }
                Err(e) => Err(fail(&state, e, &format!("Failed to add {}", S::LABEL))),
            }
        }
    }

    /// Write `patch`, then merge it into the matching local item. No
    /// reload: the local copy may drift from server-side defaulting.
    pub fn update(
        &self,
        id: &str,
        patch: S::Patch,
    ) -> impl Future<Output = Result<(), CoreError>> + Send + use<S> {
        let (service, state) = self.begin("update");
        let id = id.to_owned();
        async move {
            match service.update(&id, &patch).await {
                Ok(()) => {
                    succeed(&state, |s| {
                        if let Some(item) = s.items.iter_mut().find(|item| item.id() == id) {
                            patch.apply_to(item);
                        }
                    });
                    Ok(())
                }
                Err(e) => Err(fail(&state, e, &format!("Failed to update {}", S::LABEL))),
            }
        }
    }

    /// Delete a record and drop it from `items`.
    pub fn delete(&self, id: &str) -> impl Future<Output = Result<(), CoreError>> + Send + use<S> {
        let (service, state) = self.begin("delete");
        let id = id.to_owned();
        async move {
            match service.delete(&id).await {
                Ok(()) => {
                    succeed(&state, |s| s.items.retain(|item| item.id() != id));
                    Ok(())
                }
                Err(e) => Err(fail(&state, e, &format!("Failed to delete {}", S::LABEL))),
            }
        }
    }

    /// Synchronous half of every action: enter `loading`, clear `error`.
    fn begin(&self, action: &'static str) -> (Arc<S>, Arc<StateCell<S::Entity>>) {
        debug!(store = S::LABEL, action, "action started");
        self.state.send_modify(|snap| {
            let s = Arc::make_mut(snap);
            s.loading = true;
            s.error = None;
        });
        (Arc::clone(&self.service), Arc::clone(&self.state))
    }
}

fn succeed<T: Clone>(state: &StateCell<T>, apply: impl FnOnce(&mut EntityState<T>)) {
    state.send_modify(|snap| {
        let s = Arc::make_mut(snap);
        apply(s);
        s.loading = false;
        s.error = None;
    });
}

/// Record `err` (or `fallback` when it has no message) and hand it back.
fn fail<T: Clone>(state: &StateCell<T>, err: CoreError, fallback: &str) -> CoreError {
    let message = err.to_string();
    let message = if message.is_empty() {
        fallback.to_owned()
    } else {
        message
    };
    state.send_modify(|snap| {
        let s = Arc::make_mut(snap);
        s.loading = false;
        s.error = Some(message);
    });
    err
}
