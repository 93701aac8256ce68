//! Generic list state store

use crate::config::{FetchFailurePolicy, ListConfig};
use crate::core::auth::{NoSession, SessionProvider};
use crate::core::error::StoreError;
use crate::core::events::{EventBus, EventEnvelope, ListEvent};
use crate::core::query::{Criteria, FilterPatch, SortDirective};
use crate::core::{EntitySource, Listable, QueryableStore};
use crate::list::persisted::Bookmarks;
use crate::list::state::{ListSnapshot, ListState};
use crate::storage::{BlobStore, InMemoryBlobStore, PersistentCell};
use serde_json::Value;
use std::sync::{Arc, PoisonError, RwLock};
use tokio::sync::broadcast;

struct Inner<T: Listable> {
    state: RwLock<ListState<T>>,
    source: Arc<dyn EntitySource<T>>,
    bookmarks: PersistentCell<Bookmarks>,
    session: Arc<dyn SessionProvider>,
    events: EventBus,
    config: ListConfig,
}

/// List state store over one entity source
///
/// Owns the authoritative collection, the criteria and the derived visible
/// list, a busy flag and a single error slot, plus persisted bookmarks and
/// recently viewed ids. Cloning is cheap and clones share state.
///
/// Actions never return errors: failures land in the error slot, which
/// views read through [`error`](ListStore::error) or a
/// [`snapshot`](ListStore::snapshot) after the action completes.
///
/// ```rust,ignore
/// let store = ListStore::builder(Arc::new(source)).build();
/// store.fetch_all().await;
/// store.set_search_query("tesla");
/// for vehicle in store.visible() {
///     println!("{}", vehicle.name);
/// }
/// ```
pub struct ListStore<T: Listable> {
    inner: Arc<Inner<T>>,
}

impl<T: Listable> Clone for ListStore<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

/// Builder for [`ListStore`]
pub struct ListStoreBuilder<T: Listable> {
    source: Arc<dyn EntitySource<T>>,
    storage: Option<Arc<dyn BlobStore>>,
    session: Option<Arc<dyn SessionProvider>>,
    events: Option<EventBus>,
    config: ListConfig,
    criteria: Criteria,
}

impl<T: Listable> ListStoreBuilder<T> {
    /// Durable storage for the persisted subset (in-memory by default)
    pub fn storage(mut self, storage: Arc<dyn BlobStore>) -> Self {
        self.storage = Some(storage);
        self
    }

    /// Provider of the acting user (no user by default)
    pub fn session(mut self, session: Arc<dyn SessionProvider>) -> Self {
        self.session = Some(session);
        self
    }

    /// Bus to publish store events on (a private bus by default)
    pub fn events(mut self, events: EventBus) -> Self {
        self.events = Some(events);
        self
    }

    pub fn config(mut self, config: ListConfig) -> Self {
        self.config = config;
        self
    }

    /// Criteria applied before the first fetch
    pub fn initial_criteria(mut self, criteria: Criteria) -> Self {
        self.criteria = criteria;
        self
    }

    pub fn build(self) -> ListStore<T> {
        let storage = self
            .storage
            .unwrap_or_else(|| Arc::new(InMemoryBlobStore::new()));
        let bookmarks = PersistentCell::load(
            storage,
            self.config.storage_key.clone(),
            self.config.storage_version,
        );

        tracing::debug!(
            resource = T::resource_name(),
            storage_key = %self.config.storage_key,
            "list store initialized"
        );

        ListStore {
            inner: Arc::new(Inner {
                state: RwLock::new(ListState::new(self.criteria)),
                source: self.source,
                bookmarks,
                session: self.session.unwrap_or_else(|| Arc::new(NoSession)),
                events: self.events.unwrap_or_default(),
                config: self.config,
            }),
        }
    }
}

/// How a resolved fetch was handled
enum FetchOutcome {
    Applied { count: usize, duplicates: usize },
    Failed(StoreError),
    Stale,
}

impl<T: Listable> ListStore<T> {
    pub fn builder(source: Arc<dyn EntitySource<T>>) -> ListStoreBuilder<T> {
        ListStoreBuilder {
            source,
            storage: None,
            session: None,
            events: None,
            config: ListConfig::default(),
            criteria: Criteria::default(),
        }
    }

    fn read<R>(&self, f: impl FnOnce(&ListState<T>) -> R) -> R {
        let state = self
            .inner
            .state
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        f(&state)
    }

    fn write<R>(&self, f: impl FnOnce(&mut ListState<T>) -> R) -> R {
        let mut state = self
            .inner
            .state
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        f(&mut state)
    }

    fn resource(&self) -> String {
        T::resource_name().to_string()
    }

    fn publish_visible(&self, visible: usize, total: usize) {
        self.inner.events.publish(ListEvent::VisibleChanged {
            resource: self.resource(),
            visible,
            total,
        });
    }

    fn publish_error(&self, err: &StoreError) {
        self.inner.events.publish(ListEvent::ErrorRaised {
            resource: self.resource(),
            code: err.error_code().to_string(),
            message: err.to_string(),
        });
    }

    /// Put an error in the slot without touching anything else
    pub(crate) fn raise(&self, err: StoreError) {
        tracing::warn!(
            resource = T::resource_name(),
            code = err.error_code(),
            error = %err,
            "store action failed"
        );
        self.write(|state| state.error = Some(err.clone()));
        self.publish_error(&err);
    }

    /// Clear the slot after a successful action outside the list itself
    pub(crate) fn settle(&self) {
        self.write(|state| state.error = None);
    }

    pub(crate) fn session(&self) -> &Arc<dyn SessionProvider> {
        &self.inner.session
    }

    pub(crate) fn events(&self) -> &EventBus {
        &self.inner.events
    }

    /// Owner to scope requests to, or an authentication error
    fn acting_owner(&self) -> Result<Option<String>, StoreError> {
        match T::owner_field() {
            Some(_) => self
                .inner
                .session
                .current_user_id()
                .map(Some)
                .ok_or_else(StoreError::unauthenticated),
            None => Ok(None),
        }
    }

    // === Criteria ===

    fn update_criteria(&self, action: &str, f: impl FnOnce(&mut Criteria)) {
        let (visible, total) = self.write(|state| {
            f(&mut state.criteria);
            state.recompute();
            (state.visible.len(), state.entities.len())
        });
        tracing::debug!(resource = T::resource_name(), action, visible, total, "criteria changed");
        self.publish_visible(visible, total);
    }

    /// Replace the free-text search; an empty string clears it
    pub fn set_search_query(&self, text: impl Into<String>) {
        let text = text.into();
        self.update_criteria("set_search_query", |criteria| criteria.search = text);
    }

    /// Merge filter constraints; null values clear their key
    pub fn set_filter_options(&self, patch: FilterPatch) {
        self.update_criteria("set_filter_options", |criteria| criteria.merge_filters(patch));
    }

    /// Clear filters, search text and sort
    pub fn reset_filters(&self) {
        self.update_criteria("reset_filters", Criteria::reset);
    }

    /// Sort by `field`, flipping the direction if already sorted by it
    pub fn set_sort(&self, field: &str) {
        self.update_criteria("set_sort", |criteria| criteria.select_sort(field));
    }

    /// Set or clear the sort directive explicitly
    pub fn set_sort_directive(&self, sort: Option<SortDirective>) {
        self.update_criteria("set_sort_directive", |criteria| criteria.sort = sort);
    }

    // === Requests ===

    /// Fetch the whole collection
    ///
    /// Returns true when the response was applied to the store.
    pub async fn fetch_all(&self) -> bool {
        let owner = match self.acting_owner() {
            Ok(owner) => owner,
            Err(e) => {
                self.raise(e);
                return false;
            }
        };

        let (seq, epoch) = self.write(|state| {
            state.latest_fetch += 1;
            (state.latest_fetch, state.begin_request())
        });
        tracing::debug!(resource = T::resource_name(), seq, "fetch_all started");

        let result = self.inner.source.list(owner.as_deref()).await;

        let discard_stale = self.inner.config.discard_stale_fetches;
        let policy = self.inner.config.fetch_failure;
        let (outcome, visible, total) = self.write(|state| {
            state.finish_request(epoch);
            if discard_stale && seq != state.latest_fetch {
                return (FetchOutcome::Stale, 0, 0);
            }
            let outcome = match result {
                Ok(entities) => {
                    let duplicates = state.replace_entities(entities);
                    state.error = None;
                    FetchOutcome::Applied {
                        count: state.entities.len(),
                        duplicates,
                    }
                }
                Err(e) => {
                    if policy == FetchFailurePolicy::Clear {
                        state.entities.clear();
                    }
                    state.error = Some(e.clone());
                    FetchOutcome::Failed(e)
                }
            };
            state.recompute();
            (outcome, state.visible.len(), state.entities.len())
        });

        match outcome {
            FetchOutcome::Applied { count, duplicates } => {
                if duplicates > 0 {
                    tracing::warn!(
                        resource = T::resource_name(),
                        duplicates,
                        "dropped entities with duplicate ids"
                    );
                }
                tracing::info!(resource = T::resource_name(), seq, count, "fetch_all completed");
                self.inner.events.publish(ListEvent::Replaced {
                    resource: self.resource(),
                    count,
                });
                self.publish_visible(visible, total);
                true
            }
            FetchOutcome::Failed(e) => {
                tracing::warn!(
                    resource = T::resource_name(),
                    seq,
                    policy = ?policy,
                    error = %e,
                    "fetch_all failed"
                );
                self.publish_error(&e);
                if policy == FetchFailurePolicy::Clear {
                    self.publish_visible(visible, total);
                }
                false
            }
            FetchOutcome::Stale => {
                tracing::warn!(resource = T::resource_name(), seq, "discarded stale fetch response");
                false
            }
        }
    }

    /// Fetch one entity without touching the collection
    pub async fn fetch_by_id(&self, id: &str) -> Option<T> {
        let epoch = self.write(ListState::begin_request);

        let result = self.inner.source.get(id).await;

        let result = match result {
            Ok(Some(entity)) => Ok(entity),
            Ok(None) => Err(StoreError::not_found(T::resource_name_singular(), id)),
            Err(e) => Err(e),
        };
        self.write(|state| {
            state.finish_request(epoch);
            state.error = result.as_ref().err().cloned();
        });

        match result {
            Ok(entity) => {
                tracing::debug!(resource = T::resource_name(), id, "fetch_by_id completed");
                Some(entity)
            }
            Err(e) => {
                tracing::warn!(resource = T::resource_name(), id, error = %e, "fetch_by_id failed");
                self.publish_error(&e);
                None
            }
        }
    }

    /// Validate a draft, then create it through the source
    ///
    /// Returns the created entity as stored by the source.
    pub async fn create(&self, draft: &T::Draft) -> Option<T> {
        let payload = match self.prepare_draft(draft) {
            Ok(payload) => payload,
            Err(e) => {
                self.raise(e);
                return None;
            }
        };

        let epoch = self.write(ListState::begin_request);

        let result = self.inner.source.create(payload).await;

        let (visible, total) = self.write(|state| {
            state.finish_request(epoch);
            match &result {
                Ok(entity) => {
                    state.upsert(entity.clone());
                    state.error = None;
                    state.recompute();
                }
                Err(e) => state.error = Some(e.clone()),
            }
            (state.visible.len(), state.entities.len())
        });

        match result {
            Ok(entity) => {
                tracing::info!(resource = T::resource_name(), id = entity.id(), "entity created");
                self.inner.events.publish(ListEvent::Created {
                    resource: self.resource(),
                    entity_id: entity.id().to_string(),
                    data: serde_json::to_value(&entity).unwrap_or(Value::Null),
                });
                self.publish_visible(visible, total);
                Some(entity)
            }
            Err(e) => {
                tracing::warn!(resource = T::resource_name(), error = %e, "create failed");
                self.publish_error(&e);
                None
            }
        }
    }

    /// Validation first, then the acting user check
    fn prepare_draft(&self, draft: &T::Draft) -> Result<Value, StoreError> {
        let payload = serde_json::to_value(draft)?;
        let mut payload = T::draft_rules().check(payload)?;

        if let Some(field) = T::owner_field() {
            let user_id = self
                .inner
                .session
                .current_user_id()
                .ok_or_else(StoreError::unauthenticated)?;
            if let Some(obj) = payload.as_object_mut() {
                obj.insert(field.to_string(), Value::String(user_id));
            }
        }
        Ok(payload)
    }

    /// Delete through the source; returns true on success
    ///
    /// Deleting an id the store does not hold is not an error.
    pub async fn delete(&self, id: &str) -> bool {
        let epoch = self.write(ListState::begin_request);

        let result = self.inner.source.delete(id).await;

        let (removed, visible, total) = self.write(|state| {
            state.finish_request(epoch);
            let before = state.entities.len();
            match &result {
                Ok(()) => {
                    state.entities.retain(|e| e.id() != id);
                    if state.selected.as_deref() == Some(id) {
                        state.selected = None;
                    }
                    state.error = None;
                    state.recompute();
                }
                Err(e) => state.error = Some(e.clone()),
            }
            (before != state.entities.len(), state.visible.len(), state.entities.len())
        });

        match result {
            Ok(()) => {
                tracing::info!(resource = T::resource_name(), id, removed, "entity deleted");
                self.inner.events.publish(ListEvent::Deleted {
                    resource: self.resource(),
                    entity_id: id.to_string(),
                });
                if removed {
                    self.publish_visible(visible, total);
                }
                true
            }
            Err(e) => {
                tracing::warn!(resource = T::resource_name(), id, error = %e, "delete failed");
                self.publish_error(&e);
                false
            }
        }
    }

    // === Persisted subset ===

    /// Flip bookmark membership of `id` and return the new membership
    pub fn toggle_bookmark(&self, id: &str) -> bool {
        let bookmarked = self.inner.bookmarks.update(|b| b.toggle(id));
        tracing::debug!(resource = T::resource_name(), id, bookmarked, "bookmark toggled");
        self.inner.events.publish(ListEvent::BookmarkToggled {
            resource: self.resource(),
            entity_id: id.to_string(),
            bookmarked,
        });
        bookmarked
    }

    pub fn is_bookmarked(&self, id: &str) -> bool {
        self.inner.bookmarks.read(|b| b.contains(id))
    }

    pub fn bookmarked_ids(&self) -> Vec<String> {
        self.inner.bookmarks.read(|b| b.bookmarked.clone())
    }

    /// Bookmarked entities present in the collection, in bookmark order
    pub fn bookmarked_entities(&self) -> Vec<T> {
        let ids = self.bookmarked_ids();
        self.resolve(&ids)
    }

    /// Push `id` to the front of the recently viewed list
    pub fn record_view(&self, id: &str) {
        let limit = self.inner.config.recently_viewed_limit;
        self.inner.bookmarks.update(|b| b.push_recent(id, limit));
    }

    /// Recently viewed entities present in the collection, most recent first
    pub fn recently_viewed(&self) -> Vec<T> {
        let ids = self.inner.bookmarks.read(|b| b.recently_viewed.clone());
        self.resolve(&ids)
    }

    fn resolve(&self, ids: &[String]) -> Vec<T> {
        self.read(|state| {
            ids.iter()
                .filter_map(|id| state.entities.iter().find(|e| e.id() == id).cloned())
                .collect()
        })
    }

    // === Selection ===

    /// Select an entity of the collection and record the view
    ///
    /// An unknown id clears the selection.
    pub fn select(&self, id: &str) -> Option<T> {
        let selected = self.write(|state| {
            let found = state.entities.iter().find(|e| e.id() == id).cloned();
            state.selected = found.as_ref().map(|e| e.id().to_string());
            found
        });
        if selected.is_some() {
            self.record_view(id);
        }
        selected
    }

    pub fn selected(&self) -> Option<T> {
        self.read(|state| {
            let id = state.selected.as_deref()?;
            state.entities.iter().find(|e| e.id() == id).cloned()
        })
    }

    pub fn clear_selection(&self) {
        self.write(|state| state.selected = None);
    }

    // === Errors ===

    /// Clear the error slot and the busy flag
    ///
    /// Requests still outstanding keep running and apply their results, but
    /// no longer hold the store busy. Requests issued afterwards do.
    pub fn clear_error(&self) {
        self.write(|state| {
            state.error = None;
            state.reset_requests();
        });
        self.inner.events.publish(ListEvent::ErrorCleared {
            resource: self.resource(),
        });
    }

    // === Accessors ===

    pub fn find(&self, id: &str) -> Option<T> {
        self.read(|state| state.entities.iter().find(|e| e.id() == id).cloned())
    }

    pub fn snapshot(&self) -> ListSnapshot<T> {
        self.read(ListState::snapshot)
    }

    pub fn visible(&self) -> Vec<T> {
        self.read(|state| state.visible.clone())
    }

    pub fn entities(&self) -> Vec<T> {
        self.read(|state| state.entities.clone())
    }

    pub fn criteria(&self) -> Criteria {
        self.read(|state| state.criteria.clone())
    }

    pub fn is_busy(&self) -> bool {
        self.read(|state| state.in_flight > 0)
    }

    pub fn error(&self) -> Option<StoreError> {
        self.read(|state| state.error.clone())
    }

    pub fn config(&self) -> &ListConfig {
        &self.inner.config
    }

    /// Subscribe to this store's bus
    pub fn subscribe(&self) -> broadcast::Receiver<EventEnvelope> {
        self.inner.events.subscribe()
    }
}

impl<T: Listable> QueryableStore<T> for ListStore<T> {
    fn list_all(&self) -> Vec<T> {
        self.entities()
    }
}
