use super::snapshot::{CacheEntry, Snapshot};
use crate::domain::entities::CodeListKey;
use crate::domain::value_objects::CodeListId;
use tokio::sync::{RwLock, watch};
use tracing::debug;

/// コードリストのライブスナップショットを保持するストア
///
/// Reads share the lock; `replace_all` and `merge_in` hold it exclusively
/// for the whole mutation, so readers only ever see a complete snapshot.
/// Every mutation bumps a generation counter published on a watch channel.
pub struct CodeListStore {
    live: RwLock<Snapshot>,
    generation: watch::Sender<u64>,
}

impl CodeListStore {
    pub fn new() -> Self {
        Self::with_snapshot(Snapshot::new())
    }

    pub fn with_snapshot(snapshot: Snapshot) -> Self {
        let (generation, _) = watch::channel(0);
        Self {
            live: RwLock::new(snapshot),
            generation,
        }
    }

    /// IDでコードリストを取得
    pub async fn get(&self, list_id: CodeListId) -> Option<CacheEntry> {
        let live = self.live.read().await;
        live.get(list_id)
    }

    /// 全コードリストのキーを挿入順で取得
    pub async fn get_all_keys(&self) -> Vec<CodeListKey> {
        let live = self.live.read().await;
        live.keys().cloned().collect()
    }

    /// ライブスナップショットのコピーを取得
    pub async fn snapshot(&self) -> Snapshot {
        let live = self.live.read().await;
        live.clone()
    }

    /// スナップショットを丸ごと差し替え
    pub async fn replace_all(&self, snapshot: Snapshot) {
        let mut live = self.live.write().await;
        let previous = std::mem::replace(&mut *live, snapshot);
        self.bump_generation();
        debug!(
            previous_lists = previous.len(),
            lists = live.len(),
            "Replaced live code list snapshot"
        );
    }

    /// 部分スナップショットをマージ
    pub async fn merge_in(&self, partial: Snapshot) {
        let merged = partial.len();
        let mut live = self.live.write().await;
        live.merge(partial);
        self.bump_generation();
        debug!(merged, lists = live.len(), "Merged partial code list snapshot");
    }

    pub async fn len(&self) -> usize {
        self.live.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.live.read().await.is_empty()
    }

    /// Number of mutations applied so far.
    pub fn generation(&self) -> u64 {
        *self.generation.borrow()
    }

    /// Receiver that changes whenever a new snapshot becomes live.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.generation.subscribe()
    }

    fn bump_generation(&self) {
        self.generation.send_modify(|generation| *generation += 1);
    }
}

impl Default for CodeListStore {
    fn default() -> Self {
        Self::new()
    }
}
