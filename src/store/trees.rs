pub const USERS: &str = "users";
pub const SESSIONS: &str = "sessions";
pub const PLACES: &str = "places";
pub const REVIEWS: &str = "reviews";
pub const FAVORITES: &str = "favorites";
pub const REPORTS: &str = "reports";
pub const EDIT_REQUESTS: &str = "edit_requests";
pub const ACTIVITY_LOGS: &str = "activity_logs";
pub const META: &str = "meta";

// Secondary index trees
pub const USERS_BY_CREATED_AT: &str = "users_by_created_at";
pub const PLACES_BY_CREATED_AT: &str = "places_by_created_at";
