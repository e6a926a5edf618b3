pub mod activity_logs;
pub mod edit_requests;
pub mod favorites;
pub mod places;
pub mod reports;
pub mod reviews;
pub mod sessions;
pub mod users;
