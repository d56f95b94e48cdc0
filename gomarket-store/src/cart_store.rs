//! Cart state store.
//!
//! Owns the current cart, writes every change through a [`KeyValueStore`]
//! and notifies subscribers after each commit.
//!
//! ## Commit flow
//!
//! ```text
//! add_to_cart / increment / decrement
//!        │
//!        ▼
//!   current snapshot ──apply──► next snapshot
//!                                   │
//!                    kv.set(key, json).await
//!                                   │  (error kept, not returned yet)
//!                                   ▼
//!                 publish: current = next, version += 1,
//!                 watch channel, callbacks
//!                                   │
//!                                   ▼
//!                 Ok(next) or PersistenceWriteFailed
//! ```
//!
//! The in-memory cart is updated even when the write fails.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex as StdMutex, PoisonError, Weak};

use chrono::{DateTime, Utc};
use gomarket_core::{CartSnapshot, CoreError, KeyValueStore, NewLineItem};
use tokio::sync::{Mutex, MutexGuard, RwLock, watch};
use tracing::{debug, info, warn};

use crate::config::{CartConfig, MutationOrdering};
use crate::error::StoreError;

// ============================================================================
// Public Types
// ============================================================================

/// Lifecycle of a cart store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreState {
    /// Created; no restore attempted yet.
    Uninitialized,
    /// A restore from storage has run (whatever its outcome).
    Initialized,
}

impl std::fmt::Display for StoreState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreState::Uninitialized => write!(f, "uninitialized"),
            StoreState::Initialized => write!(f, "initialized"),
        }
    }
}

/// Identifies a callback registered with [`CartStore::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Callback = Arc<dyn Fn(&CartSnapshot) + Send + Sync>;

// ============================================================================
// Inner State
// ============================================================================

/// The published cart and its bookkeeping.
struct Current {
    snapshot: CartSnapshot,
    version: u64,
    committed_at: Option<DateTime<Utc>>,
}

/// A single cart change.
enum Mutation<'a> {
    Add(NewLineItem),
    Increment(&'a str),
    Decrement(&'a str),
}

impl Mutation<'_> {
    fn name(&self) -> &'static str {
        match self {
            Mutation::Add(_) => "add",
            Mutation::Increment(_) => "increment",
            Mutation::Decrement(_) => "decrement",
        }
    }

    fn id(&self) -> &str {
        match self {
            Mutation::Add(item) => &item.id,
            Mutation::Increment(id) | Mutation::Decrement(id) => id,
        }
    }

    fn apply(self, current: &CartSnapshot) -> Result<CartSnapshot, StoreError> {
        match self {
            Mutation::Add(item) => current.with_added(item).map_err(|e| match e {
                CoreError::InvalidData(msg) => StoreError::InvalidItem(msg),
                other => StoreError::Core(other),
            }),
            Mutation::Increment(id) => Ok(current.with_incremented(id)),
            Mutation::Decrement(id) => Ok(current.with_decremented(id)),
        }
    }
}

/// Shared state behind [`CartStore`] and its handles.
struct CartInner {
    kv: Arc<dyn KeyValueStore>,
    key: String,
    ordering: MutationOrdering,
    current: RwLock<Current>,
    commit_lock: Mutex<()>,
    initialized: AtomicBool,
    notify: watch::Sender<CartSnapshot>,
    subscribers: StdMutex<Vec<(SubscriptionId, Callback)>>,
    next_subscription: AtomicU64,
}

impl CartInner {
    fn new(kv: Arc<dyn KeyValueStore>, config: &CartConfig) -> Self {
        let (notify, _) = watch::channel(CartSnapshot::new());
        Self {
            kv,
            key: config.storage_key(),
            ordering: config.ordering,
            current: RwLock::new(Current {
                snapshot: CartSnapshot::new(),
                version: 0,
                committed_at: None,
            }),
            commit_lock: Mutex::new(()),
            initialized: AtomicBool::new(false),
            notify,
            subscribers: StdMutex::new(Vec::new()),
            next_subscription: AtomicU64::new(1),
        }
    }

    fn state(&self) -> StoreState {
        if self.initialized.load(Ordering::Acquire) {
            StoreState::Initialized
        } else {
            StoreState::Uninitialized
        }
    }

    /// Takes the commit lock when mutations are serialized.
    async fn ordering_guard(&self) -> Option<MutexGuard<'_, ()>> {
        match self.ordering {
            MutationOrdering::Serialized => Some(self.commit_lock.lock().await),
            MutationOrdering::Unordered => None,
        }
    }

    // ========================================================================
    // Restore
    // ========================================================================

    async fn initialize(&self) -> Result<(), StoreError> {
        // Held in both orderings; unordered mutations never take it
        let _guard = self.commit_lock.lock().await;
        if self.initialized.load(Ordering::Acquire) {
            debug!(key = %self.key, "Cart already initialized");
            return Ok(());
        }

        let result = self.restore().await;
        self.initialized.store(true, Ordering::Release);
        result
    }

    async fn restore(&self) -> Result<(), StoreError> {
        let raw = self
            .kv
            .get(&self.key)
            .await
            .map_err(|source| {
                warn!(key = %self.key, error = %source, "Failed to read persisted cart");
                StoreError::PersistenceReadFailed {
                    key: self.key.clone(),
                    source,
                }
            })?;

        let Some(raw) = raw else {
            debug!(key = %self.key, "No persisted cart, starting empty");
            return Ok(());
        };

        let snapshot = CartSnapshot::from_json(&raw).map_err(|source| {
            warn!(key = %self.key, error = %source, "Persisted cart is corrupt, starting empty");
            StoreError::CorruptPersistedState {
                key: self.key.clone(),
                source,
            }
        })?;

        info!(key = %self.key, items = snapshot.len(), "Restored cart");
        self.publish(snapshot).await;
        Ok(())
    }

    // ========================================================================
    // Commit
    // ========================================================================

    async fn commit(&self, mutation: Mutation<'_>) -> Result<CartSnapshot, StoreError> {
        let _guard = self.ordering_guard().await;

        let op = mutation.name();
        let id = mutation.id().to_string();
        let current = self.current.read().await.snapshot.clone();
        let next = mutation.apply(&current)?;

        let written = self.persist(&next).await;
        let version = self.publish(next.clone()).await;
        let quantity = next.get(&id).map(|item| item.quantity);
        debug!(op, id = %id, ?quantity, version, "Cart committed");

        written.map(|()| next)
    }

    async fn persist(&self, snapshot: &CartSnapshot) -> Result<(), StoreError> {
        let json = snapshot.to_json()?;
        self.kv.set(&self.key, &json).await.map_err(|source| {
            warn!(key = %self.key, error = %source, "Failed to persist cart, keeping in-memory state");
            StoreError::PersistenceWriteFailed {
                key: self.key.clone(),
                source,
            }
        })
    }

    /// Replaces the current cart and notifies subscribers.
    async fn publish(&self, snapshot: CartSnapshot) -> u64 {
        let version = {
            let mut current = self.current.write().await;
            current.version += 1;
            current.snapshot = snapshot.clone();
            current.committed_at = Some(Utc::now());
            // Sent under the lock so the watch value always matches `current`
            self.notify.send_replace(snapshot.clone());
            current.version
        };

        let callbacks: Vec<Callback> = self
            .subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|(_, cb)| Arc::clone(cb))
            .collect();
        for callback in callbacks {
            callback(&snapshot);
        }

        version
    }

    // ========================================================================
    // Subscribers
    // ========================================================================

    fn subscribe(&self, callback: Callback) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription.fetch_add(1, Ordering::Relaxed));
        self.subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((id, callback));
        debug!(subscription = id.0, "Subscriber added");
        id
    }

    fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut subscribers = self.subscribers.lock().unwrap_or_else(PoisonError::into_inner);
        let before = subscribers.len();
        subscribers.retain(|(sid, _)| *sid != id);
        before != subscribers.len()
    }
}

// ============================================================================
// Cart Store
// ============================================================================

/// Owner of the cart.
///
/// Holds the only authoritative [`CartSnapshot`], mirrors every change into
/// the injected [`KeyValueStore`] and publishes it to subscribers. Consumers
/// that should not keep the cart alive use a [`CartHandle`].
pub struct CartStore {
    inner: Arc<CartInner>,
}

impl std::fmt::Debug for CartStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CartStore")
            .field("key", &self.inner.key)
            .field("ordering", &self.inner.ordering)
            .field("state", &self.inner.state())
            .finish_non_exhaustive()
    }
}

impl CartStore {
    /// Creates a store with an empty cart. Call [`initialize`](Self::initialize)
    /// to restore the persisted cart.
    pub fn new(kv: Arc<dyn KeyValueStore>, config: &CartConfig) -> Self {
        Self {
            inner: Arc::new(CartInner::new(kv, config)),
        }
    }

    /// Creates a store and restores the persisted cart.
    ///
    /// Restore failures are logged and the store starts empty.
    pub async fn open(kv: Arc<dyn KeyValueStore>, config: &CartConfig) -> Self {
        let store = Self::new(kv, config);
        if let Err(e) = store.initialize().await {
            debug!(key = %store.storage_key(), error = %e, "Opened cart without restore");
        }
        store
    }

    /// Restores the persisted cart.
    ///
    /// A missing value leaves the cart empty. Runs once; later calls return
    /// `Ok(())` without reading storage.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::PersistenceReadFailed` if storage cannot be read
    /// and `StoreError::CorruptPersistedState` if the stored value does not
    /// parse. In both cases the cart stays empty and the store is usable.
    pub async fn initialize(&self) -> Result<(), StoreError> {
        self.inner.initialize().await
    }

    /// Returns the lifecycle state.
    pub fn state(&self) -> StoreState {
        self.inner.state()
    }

    /// Returns the storage key the cart is written under.
    pub fn storage_key(&self) -> &str {
        &self.inner.key
    }

    /// Returns how concurrent mutations are ordered.
    pub fn ordering(&self) -> MutationOrdering {
        self.inner.ordering
    }

    // ========================================================================
    // Snapshot Access
    // ========================================================================

    /// Returns a copy of the current cart.
    pub async fn products(&self) -> CartSnapshot {
        self.inner.current.read().await.snapshot.clone()
    }

    /// Number of publishes so far.
    pub async fn version(&self) -> u64 {
        self.inner.current.read().await.version
    }

    /// Time of the last publish.
    pub async fn last_committed(&self) -> Option<DateTime<Utc>> {
        self.inner.current.read().await.committed_at
    }

    // ========================================================================
    // Mutations
    // ========================================================================

    /// Adds a product, or one more unit of it if already in the cart.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::InvalidItem` if the item has an empty id or a bad
    /// price (nothing is written), and `StoreError::PersistenceWriteFailed`
    /// if storage rejects the write (the cart is still updated).
    pub async fn add_to_cart(&self, item: NewLineItem) -> Result<CartSnapshot, StoreError> {
        self.inner.commit(Mutation::Add(item)).await
    }

    /// Adds one unit to the entry for `id`. Unknown ids change nothing.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::PersistenceWriteFailed` if storage rejects the
    /// write (the cart is still updated).
    pub async fn increment(&self, id: &str) -> Result<CartSnapshot, StoreError> {
        self.inner.commit(Mutation::Increment(id)).await
    }

    /// Removes one unit from the entry for `id`, stopping at zero.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::PersistenceWriteFailed` if storage rejects the
    /// write (the cart is still updated).
    pub async fn decrement(&self, id: &str) -> Result<CartSnapshot, StoreError> {
        self.inner.commit(Mutation::Decrement(id)).await
    }

    // ========================================================================
    // Observable
    // ========================================================================

    /// Registers a callback run with the new cart after every publish.
    ///
    /// Callbacks run on the committing task and should return quickly.
    pub fn subscribe<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&CartSnapshot) + Send + Sync + 'static,
    {
        self.inner.subscribe(Arc::new(callback))
    }

    /// Removes a callback. Returns false if it was not registered.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.inner.unsubscribe(id)
    }

    /// Subscribes to cart changes through a watch channel.
    pub fn watch(&self) -> watch::Receiver<CartSnapshot> {
        self.inner.notify.subscribe()
    }

    /// Returns a handle that does not keep the store alive.
    pub fn handle(&self) -> CartHandle {
        CartHandle {
            inner: Arc::downgrade(&self.inner),
        }
    }
}

// ============================================================================
// Cart Handle
// ============================================================================

/// Non-owning access to a [`CartStore`].
///
/// Every call fails with `StoreError::ContextUnavailable` once the store has
/// been dropped.
#[derive(Debug, Clone)]
pub struct CartHandle {
    inner: Weak<CartInner>,
}

impl CartHandle {
    fn upgrade(&self) -> Result<Arc<CartInner>, StoreError> {
        self.inner.upgrade().ok_or(StoreError::ContextUnavailable)
    }

    /// Checks if the store is still alive.
    pub fn is_available(&self) -> bool {
        self.inner.strong_count() > 0
    }

    /// Returns a copy of the current cart.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::ContextUnavailable` if the store was dropped.
    pub async fn products(&self) -> Result<CartSnapshot, StoreError> {
        let inner = self.upgrade()?;
        let snapshot = inner.current.read().await.snapshot.clone();
        Ok(snapshot)
    }

    /// See [`CartStore::add_to_cart`].
    ///
    /// # Errors
    ///
    /// Returns `StoreError::ContextUnavailable` if the store was dropped,
    /// otherwise as [`CartStore::add_to_cart`].
    pub async fn add_to_cart(&self, item: NewLineItem) -> Result<CartSnapshot, StoreError> {
        self.upgrade()?.commit(Mutation::Add(item)).await
    }

    /// See [`CartStore::increment`].
    ///
    /// # Errors
    ///
    /// Returns `StoreError::ContextUnavailable` if the store was dropped,
    /// otherwise as [`CartStore::increment`].
    pub async fn increment(&self, id: &str) -> Result<CartSnapshot, StoreError> {
        self.upgrade()?.commit(Mutation::Increment(id)).await
    }

    /// See [`CartStore::decrement`].
    ///
    /// # Errors
    ///
    /// Returns `StoreError::ContextUnavailable` if the store was dropped,
    /// otherwise as [`CartStore::decrement`].
    pub async fn decrement(&self, id: &str) -> Result<CartSnapshot, StoreError> {
        self.upgrade()?.commit(Mutation::Decrement(id)).await
    }

    /// See [`CartStore::subscribe`].
    ///
    /// # Errors
    ///
    /// Returns `StoreError::ContextUnavailable` if the store was dropped.
    pub fn subscribe<F>(&self, callback: F) -> Result<SubscriptionId, StoreError>
    where
        F: Fn(&CartSnapshot) + Send + Sync + 'static,
    {
        Ok(self.upgrade()?.subscribe(Arc::new(callback)))
    }

    /// See [`CartStore::unsubscribe`].
    ///
    /// # Errors
    ///
    /// Returns `StoreError::ContextUnavailable` if the store was dropped.
    pub fn unsubscribe(&self, id: SubscriptionId) -> Result<bool, StoreError> {
        Ok(self.upgrade()?.unsubscribe(id))
    }

    /// See [`CartStore::watch`].
    ///
    /// # Errors
    ///
    /// Returns `StoreError::ContextUnavailable` if the store was dropped.
    pub fn watch(&self) -> Result<watch::Receiver<CartSnapshot>, StoreError> {
        Ok(self.upgrade()?.notify.subscribe())
    }
}

// ============================================================================
// Tests
// ============================================================================
