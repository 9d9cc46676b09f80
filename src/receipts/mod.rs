pub mod handlers;
pub mod render;
pub mod repo;
pub mod schema;
pub mod view;

use crate::state::AppState;
use axum::Router;

pub fn router() -> Router<AppState> {
    handlers::router()
}
