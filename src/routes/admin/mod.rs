pub mod activity;
pub mod dashboard;
pub mod places;
pub mod reports;
pub mod reviews;
pub mod users;

use axum::Router;

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .merge(dashboard::router())
        .merge(places::router())
        .merge(users::router())
        .merge(reports::router())
        .merge(reviews::router())
        .merge(activity::router())
}
