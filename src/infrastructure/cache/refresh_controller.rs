use super::code_list_store::CodeListStore;
use super::snapshot::{CacheEntry, Snapshot};
use crate::application::ports::CodeListSource;
use crate::application::shared::mappers::{extend_index, map_code_list_id, map_code_list_meta};
use crate::domain::entities::{CodeListKey, CodeValueIndex};
use crate::domain::value_objects::CodeListId;
use crate::shared::config::RefreshConfig;
use crate::shared::error::AppError;
use futures::future::{self, BoxFuture, FutureExt, Shared, WeakShared};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

type LoadFuture = BoxFuture<'static, Result<CacheEntry, AppError>>;

/// Partial reload results waiting for `commit`.
///
/// `epoch` counts published full reloads; loads started under an older epoch
/// are discarded instead of staged.
#[derive(Default)]
struct Staging {
    snapshot: Option<Snapshot>,
    epoch: u64,
}

/// Builds snapshots from the source and publishes them into the store.
///
/// Per-list loads are single-flight: a caller asking for a list that is
/// currently being fetched awaits the running fetch instead of issuing another
/// one. A finished fetch is never reused, so every later reload hits the source.
pub struct RefreshController {
    source: Arc<dyn CodeListSource>,
    store: Arc<CodeListStore>,
    config: RefreshConfig,
    staging: Mutex<Staging>,
    inflight: Mutex<HashMap<CodeListId, WeakShared<LoadFuture>>>,
    full_reload_lock: Mutex<()>,
}

impl RefreshController {
    pub fn new(
        source: Arc<dyn CodeListSource>,
        store: Arc<CodeListStore>,
        config: RefreshConfig,
    ) -> Self {
        Self {
            source,
            store,
            config,
            staging: Mutex::new(Staging::default()),
            inflight: Mutex::new(HashMap::new()),
            full_reload_lock: Mutex::new(()),
        }
    }

    pub fn store(&self) -> &Arc<CodeListStore> {
        &self.store
    }

    /// 全コードリストを取得してスナップショットを差し替え
    ///
    /// The live snapshot is only touched once the new one is complete; a
    /// failed fetch leaves it as it was.
    pub async fn full_reload(&self) -> Result<(), AppError> {
        let _guard = self.full_reload_lock.lock().await;
        let started = Instant::now();
        info!("Beginning code list cache initialization");

        let lists = self.source.fetch_all_code_lists().await?;
        info!(count = lists.len(), "Found code lists to load");

        let mut snapshot =
            Snapshot::with_capacity(self.config.initial_list_capacity.max(lists.len()));
        for list in &lists {
            let Some(list_id) = map_code_list_id(list) else {
                warn!(id = ?list.id, "Found unsupported code list number, skipping it");
                continue;
            };
            let mut values = CodeValueIndex::with_capacity(list.items.len());
            extend_index(&mut values, list_id, list);
            snapshot.insert(CodeListKey::new(list_id, map_code_list_meta(list)), values);
        }
        let loaded = snapshot.len();

        // Staging is held while publishing so no partial result from an older
        // epoch can be staged or committed around the swap.
        let mut staging = self.staging.lock().await;
        if let Some(discarded) = staging.snapshot.take() {
            debug!(lists = discarded.len(), "Discarding staged changes superseded by full reload");
        }
        staging.epoch += 1;
        self.inflight.lock().await.clear();
        self.store.replace_all(snapshot).await;
        drop(staging);

        info!(
            lists = loaded,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Code list cache initialization complete"
        );
        Ok(())
    }

    /// 指定IDのコードリストを再取得してステージング
    ///
    /// Disjoint ids load concurrently; ids currently in flight are joined.
    /// When any fetch fails nothing from this call is staged. Results that a
    /// full reload published in the meantime supersede are dropped.
    pub async fn partial_reload(&self, ids: &[CodeListId]) -> Result<(), AppError> {
        let mut ids = ids.to_vec();
        ids.sort_unstable();
        ids.dedup();
        if ids.is_empty() {
            return Ok(());
        }

        let epoch = self.staging.lock().await.epoch;
        let loaded = future::try_join_all(ids.iter().map(|&id| self.load_list(id))).await?;

        let mut staging = self.staging.lock().await;
        if staging.epoch != epoch {
            debug!(lists = ids.len(), "Dropping partial reload superseded by full reload");
            return Ok(());
        }
        let staged = staging
            .snapshot
            .get_or_insert_with(|| Snapshot::with_capacity(loaded.len()));
        for entry in loaded {
            staged.insert(entry.key, entry.values);
        }
        debug!(lists = ids.len(), staged = staged.len(), "Staged partial code list reload");
        Ok(())
    }

    /// ステージングされた変更をライブスナップショットへ反映
    ///
    /// Returns `false` when nothing was staged.
    pub async fn commit(&self) -> bool {
        let mut staging = self.staging.lock().await;
        let Some(snapshot) = staging.snapshot.take() else {
            return false;
        };

        let merged = snapshot.len();
        self.store.merge_in(snapshot).await;
        drop(staging);
        info!(lists = merged, "Applied staged code list changes");
        true
    }

    /// Reloads the given lists and publishes them right away.
    pub async fn reload(&self, ids: &[CodeListId]) -> Result<(), AppError> {
        self.partial_reload(ids).await?;
        self.commit().await;
        Ok(())
    }

    /// Whether a full reload or a list fetch is still running.
    pub async fn is_refreshing(&self) -> bool {
        if self.full_reload_lock.try_lock().is_err() {
            return true;
        }
        let inflight = self.inflight.lock().await;
        inflight
            .values()
            .any(|load| load.upgrade().is_some_and(|load| load.peek().is_none()))
    }

    pub async fn has_staged_changes(&self) -> bool {
        self.staging.lock().await.snapshot.is_some()
    }

    async fn load_list(&self, id: CodeListId) -> Result<CacheEntry, AppError> {
        let load = {
            let mut inflight = self.inflight.lock().await;
            // Entries whose waiters all went away no longer upgrade.
            match inflight.get(&id).and_then(WeakShared::upgrade) {
                Some(load) => {
                    debug!(list_id = %id, "Joining in-flight code list load");
                    load
                }
                None => {
                    let load = fetch_list(
                        Arc::clone(&self.source),
                        Arc::clone(&self.store),
                        id,
                        self.config.default_index_capacity,
                    )
                    .boxed()
                    .shared();
                    match load.downgrade() {
                        Some(weak) => {
                            inflight.insert(id, weak);
                        }
                        None => {
                            inflight.remove(&id);
                        }
                    }
                    load
                }
            }
        };

        let result = load.clone().await;
        self.release(id, &load).await;
        result
    }

    /// Forgets a finished load so the next caller fetches again.
    async fn release(&self, id: CodeListId, load: &Shared<LoadFuture>) {
        let mut inflight = self.inflight.lock().await;
        let stale = match inflight.get(&id).and_then(WeakShared::upgrade) {
            Some(current) => current.ptr_eq(load),
            None => true,
        };
        if stale {
            inflight.remove(&id);
        }
    }
}

async fn fetch_list(
    source: Arc<dyn CodeListSource>,
    store: Arc<CodeListStore>,
    id: CodeListId,
    default_capacity: usize,
) -> Result<CacheEntry, AppError> {
    debug!(list_id = %id, "Reinitializing code list");
    let previous = store.get(id).await;
    // Size the new index after the one it replaces.
    let capacity = previous
        .as_ref()
        .map(|entry| entry.values.len())
        .unwrap_or(default_capacity);

    let lists = source.fetch_code_list_by_id(id.into()).await?;

    let mut values = CodeValueIndex::with_capacity(capacity);
    let mut meta = None;
    for list in &lists {
        if meta.is_none() {
            meta = Some(map_code_list_meta(list));
        }
        extend_index(&mut values, id, list);
    }
    let meta = meta
        .or_else(|| previous.map(|entry| entry.key.meta))
        .unwrap_or_default();

    debug!(list_id = %id, codes = values.len(), "Fetched code list");
    Ok(CacheEntry {
        key: CodeListKey::new(id, meta),
        values: Arc::new(values),
    })
}
