use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Html,
    routing::get,
    Router,
};
use serde::Deserialize;
use std::fmt::Write as _;
use tracing::instrument;

use crate::state::AppState;

use super::render::render_view;
use super::view::{ReceiptView, ViewError, ViewState};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/receipts", get(receipt_page_without_slug))
        .route("/receipts/:slug", get(receipt_page))
}

#[derive(Debug, Deserialize)]
pub struct LanguageQuery {
    pub lang: Option<String>,
}

#[instrument(skip(state))]
pub async fn receipt_page(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Query(q): Query<LanguageQuery>,
) -> (StatusCode, Html<String>) {
    respond(&state, Some(&slug), q.lang).await
}

/// The no-slug route: reports the missing input without touching the store.
#[instrument(skip(state))]
pub async fn receipt_page_without_slug(
    State(state): State<AppState>,
    Query(q): Query<LanguageQuery>,
) -> (StatusCode, Html<String>) {
    respond(&state, None, q.lang).await
}

async fn respond(
    state: &AppState,
    slug: Option<&str>,
    lang: Option<String>,
) -> (StatusCode, Html<String>) {
    let language = lang.unwrap_or_else(|| state.config.default_language.clone());

    let view = ReceiptView::new(state.store.clone());
    let terminal = view.show(slug, &language).await;

    let title = match &terminal {
        ViewState::Loaded(receipt) => receipt.title.clone(),
        _ => "Receipt details".to_string(),
    };
    let fragment = render_view(&terminal, slug, &language);
    (status_for(&terminal), Html(page_shell(&title, &fragment)))
}

fn status_for(state: &ViewState) -> StatusCode {
    match state {
        ViewState::Loaded(_) => StatusCode::OK,
        ViewState::Failed(ViewError::MissingSlug) => StatusCode::BAD_REQUEST,
        ViewState::Failed(ViewError::NotFound) => StatusCode::NOT_FOUND,
        ViewState::Failed(ViewError::Lookup(_)) => StatusCode::INTERNAL_SERVER_ERROR,
        ViewState::Idle | ViewState::Loading => StatusCode::OK,
    }
}

/// Generic page chrome around the rendered fragment; the catalog's real
/// header and footer live outside this service.
fn page_shell(title: &str, fragment: &str) -> String {
    let mut page = String::new();
    let _ = write!(
        page,
        concat!(
            "<!doctype html><html lang=\"en\"><head><meta charset=\"utf-8\">",
            "<title>{title}</title></head><body>",
            "<header><a href=\"/\">Receipt catalog</a></header>",
            "<main>{fragment}</main>",
            "<footer>Receipt catalog</footer></body></html>"
        ),
        title = escape_title(title),
        fragment = fragment,
    );
    page
}

fn escape_title(title: &str) -> String {
    title.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}

#[cfg(test)]
mod handler_tests {
    use std::sync::Arc;

    use super::*;
    use crate::receipts::repo::MemoryStore;
    use crate::receipts::testing::receipt_with_nutrition;

    fn state_with_store(store: MemoryStore) -> AppState {
        let base = AppState::fake();
        AppState::from_parts(base.db, base.config, Arc::new(store))
    }

    fn seeded_state() -> AppState {
        let mut store = MemoryStore::default();
        store.insert(receipt_with_nutrition(
            "mango-smoothie",
            "en",
            "Mango Smoothie",
            Some(180.0),
        ));
        state_with_store(store)
    }

    #[tokio::test]
    async fn known_slug_returns_ok_with_rendered_record() {
        let state = seeded_state();
        let (status, Html(body)) = receipt_page(
            State(state),
            Path("mango-smoothie".to_string()),
            Query(LanguageQuery {
                lang: Some("en".into()),
            }),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("<title>Mango Smoothie</title>"));
        assert!(body.contains("<h1>Mango Smoothie</h1>"));
        assert!(body.contains("Calories: 180 kcal"));
    }

    #[tokio::test]
    async fn unknown_slug_returns_not_found_page() {
        let state = seeded_state();
        let (status, Html(body)) = receipt_page(
            State(state),
            Path("unknown-slug".to_string()),
            Query(LanguageQuery {
                lang: Some("en".into()),
            }),
        )
        .await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body.contains("Receipt not found."));
    }

    #[tokio::test]
    async fn missing_slug_route_returns_bad_request() {
        let state = seeded_state();
        let (status, Html(body)) =
            receipt_page_without_slug(State(state), Query(LanguageQuery { lang: None })).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body.contains("No receipt slug provided."));
    }

    #[tokio::test]
    async fn language_defaults_to_config_when_query_is_absent() {
        let mut store = MemoryStore::default();
        store.insert(receipt_with_nutrition(
            "mango-smoothie",
            "en",
            "Mango Smoothie",
            None,
        ));
        let state = state_with_store(store);

        // AppState::fake() configures "en" as the default language.
        let (status, Html(body)) = receipt_page(
            State(state),
            Path("mango-smoothie".to_string()),
            Query(LanguageQuery { lang: None }),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("<h1>Mango Smoothie</h1>"));
    }
}
