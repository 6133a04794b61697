#![allow(dead_code)]

use async_trait::async_trait;
use codelist_cache::{AppError, CodeListSource, SourceCodeList};
use serde_json::json;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::watch;

pub fn fixture_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join("codelists.json")
}

pub fn create_test_list(id: i64, description: &str, codes: &[&str]) -> SourceCodeList {
    let items: Vec<serde_json::Value> = codes
        .iter()
        .map(|code| {
            json!({
                "value": code,
                "description": format!("{description} {code}"),
                "statusCode": "ACTIVE"
            })
        })
        .collect();
    serde_json::from_value(json!({
        "id": id,
        "description": description,
        "items": items
    }))
    .expect("valid code list fixture")
}

/// In-memory source that counts fetches and can hold them until released.
pub struct GatedSource {
    lists: Mutex<Vec<SourceCodeList>>,
    full_fetches: AtomicUsize,
    list_fetches: Mutex<HashMap<i64, usize>>,
    failing: Mutex<bool>,
    gate: watch::Sender<bool>,
    started: watch::Sender<usize>,
}

impl GatedSource {
    pub fn new(lists: Vec<SourceCodeList>) -> Self {
        let (gate, _) = watch::channel(true);
        let (started, _) = watch::channel(0);
        Self {
            lists: Mutex::new(lists),
            full_fetches: AtomicUsize::new(0),
            list_fetches: Mutex::new(HashMap::new()),
            failing: Mutex::new(false),
            gate,
            started,
        }
    }

    pub fn set_lists(&self, lists: Vec<SourceCodeList>) {
        *self.lists.lock().unwrap() = lists;
    }

    pub fn set_failing(&self, failing: bool) {
        *self.failing.lock().unwrap() = failing;
    }

    pub fn close_gate(&self) {
        self.gate.send_replace(false);
    }

    pub fn open_gate(&self) {
        self.gate.send_replace(true);
    }

    /// Resolves once `count` fetches of any kind have reached the gate.
    pub async fn wait_for_fetches(&self, count: usize) {
        let mut rx = self.started.subscribe();
        let _ = rx.wait_for(|started| *started >= count).await;
    }

    pub fn full_fetches(&self) -> usize {
        self.full_fetches.load(Ordering::SeqCst)
    }

    pub fn fetches_for(&self, id: i64) -> usize {
        self.list_fetches
            .lock()
            .unwrap()
            .get(&id)
            .copied()
            .unwrap_or(0)
    }

    async fn pass_gate(&self) -> Result<(), AppError> {
        self.started.send_modify(|started| *started += 1);
        let mut rx = self.gate.subscribe();
        rx.wait_for(|open| *open)
            .await
            .map_err(|e| AppError::Internal(e.to_string()))?;
        if *self.failing.lock().unwrap() {
            return Err(AppError::Source("source unavailable".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl CodeListSource for GatedSource {
    async fn fetch_all_code_lists(&self) -> Result<Vec<SourceCodeList>, AppError> {
        self.full_fetches.fetch_add(1, Ordering::SeqCst);
        self.pass_gate().await?;
        Ok(self.lists.lock().unwrap().clone())
    }

    async fn fetch_code_list_by_id(&self, id: i64) -> Result<Vec<SourceCodeList>, AppError> {
        *self.list_fetches.lock().unwrap().entry(id).or_insert(0) += 1;
        self.pass_gate().await?;
        Ok(self
            .lists
            .lock()
            .unwrap()
            .iter()
            .filter(|list| list.id == Some(id))
            .cloned()
            .collect())
    }
}
