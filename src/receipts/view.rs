use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::error;

use super::repo::ReceiptStore;
use super::schema::Receipt;

/// The three user-visible failure kinds. The rendered page only distinguishes
/// error-vs-not; the message text carries the difference.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ViewError {
    #[error("No receipt slug provided.")]
    MissingSlug,
    #[error("Receipt not found.")]
    NotFound,
    #[error("Failed to load receipt: {0}")]
    Lookup(String),
}

/// One variant is authoritative at any instant, so loading / error / record
/// are mutually exclusive by construction.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewState {
    Idle,
    Loading,
    Loaded(Receipt),
    Failed(ViewError),
}

impl ViewState {
    pub fn is_loading(&self) -> bool {
        matches!(self, ViewState::Loading)
    }

    pub fn receipt(&self) -> Option<&Receipt> {
        match self {
            ViewState::Loaded(r) => Some(r),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&ViewError> {
        match self {
            ViewState::Failed(e) => Some(e),
            _ => None,
        }
    }
}

/// Detail view controller: resolves one receipt per `(slug, language)` input
/// pair and tracks the resulting state.
///
/// Every call to [`show`](Self::show) bumps a generation counter before doing
/// anything else; a lookup only commits its outcome while its generation is
/// still current. A request superseded mid-flight therefore never overwrites
/// state established by a newer input pair.
pub struct ReceiptView {
    store: Arc<dyn ReceiptStore>,
    generation: AtomicU64,
    state: Mutex<ViewState>,
}

impl ReceiptView {
    pub fn new(store: Arc<dyn ReceiptStore>) -> Self {
        Self {
            store,
            generation: AtomicU64::new(0),
            state: Mutex::new(ViewState::Idle),
        }
    }

    pub async fn state(&self) -> ViewState {
        self.state.lock().await.clone()
    }

    /// Run one request cycle for the given inputs and return the state after
    /// it settles. With no slug there is no lookup at all; the error is set
    /// synchronously.
    pub async fn show(&self, slug: Option<&str>, language: &str) -> ViewState {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;

        let slug = match slug.filter(|s| !s.is_empty()) {
            Some(s) => s.to_string(),
            None => {
                return self
                    .commit(generation, ViewState::Failed(ViewError::MissingSlug))
                    .await;
            }
        };

        self.commit(generation, ViewState::Loading).await;

        let outcome = match self.store.find_by_slug(&slug, language).await {
            Ok(Some(receipt)) => ViewState::Loaded(receipt),
            Ok(None) => ViewState::Failed(ViewError::NotFound),
            Err(e) => {
                error!(error = %e, %slug, %language, "receipt lookup failed");
                ViewState::Failed(ViewError::Lookup(lookup_message(&e)))
            }
        };
        self.commit(generation, outcome).await
    }

    /// Store `next` unless a newer request has started since `generation` was
    /// taken; either way, return a snapshot of the authoritative state.
    async fn commit(&self, generation: u64, next: ViewState) -> ViewState {
        let mut state = self.state.lock().await;
        if self.generation.load(Ordering::SeqCst) == generation {
            *state = next;
        }
        state.clone()
    }
}

fn lookup_message(e: &anyhow::Error) -> String {
    let msg = e.to_string();
    if msg.is_empty() {
        "Unknown error".to_string()
    } else {
        msg
    }
}
