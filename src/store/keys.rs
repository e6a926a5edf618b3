pub fn user_key(user_id: &str) -> String {
    user_id.to_string()
}

pub fn user_email_index_key(email: &str) -> String {
    format!("email:{}", email.to_lowercase())
}

pub fn session_key(token_hash: &str) -> String {
    token_hash.to_string()
}

pub fn place_key(place_id: &str) -> String {
    place_id.to_string()
}

/// Keys in the `*_by_created_at` index trees sort by creation time because
/// the millisecond timestamp is zero-padded to a fixed width.
pub fn created_at_index_key(timestamp_ms: i64, id: &str) -> String {
    let ts = timestamp_ms.max(0) as u64;
    format!("{:020}:{}", ts, id)
}

/// Lower/upper bound for range scans over a `*_by_created_at` tree.
/// Every real key continues with `:{id}`, so the bare padded timestamp is
/// strictly below all entries of that instant: `bound(a)..bound(b)` covers
/// exactly the half-open interval `[a, b)`.
pub fn created_at_bound(timestamp_ms: i64) -> String {
    let ts = timestamp_ms.max(0) as u64;
    format!("{:020}", ts)
}

pub fn review_key(review_id: &str) -> String {
    review_id.to_string()
}

pub fn review_place_index_key(place_id: &str, review_id: &str) -> String {
    format!("place:{}:{}", place_id, review_id)
}

pub fn review_place_prefix(place_id: &str) -> String {
    format!("place:{}:", place_id)
}

pub fn review_user_index_key(user_id: &str, place_id: &str) -> String {
    format!("user:{}:{}", user_id, place_id)
}

pub fn favorite_key(user_id: &str, place_id: &str) -> String {
    format!("{}:{}", user_id, place_id)
}

pub fn favorite_user_prefix(user_id: &str) -> String {
    format!("{}:", user_id)
}

/// Reports sort by arrival within a place: place prefix, then padded
/// creation timestamp, then id as a tie breaker.
pub fn report_key(place_id: &str, timestamp_ms: i64, report_id: &str) -> String {
    let ts = timestamp_ms.max(0) as u64;
    format!("{}:{:020}:{}", place_id, ts, report_id)
}

pub fn report_user_index_key(user_id: &str, place_id: &str) -> String {
    format!("user:{}:{}", user_id, place_id)
}

pub fn edit_request_key(place_id: &str, request_id: &str) -> String {
    format!("{}:{}", place_id, request_id)
}

pub fn edit_request_place_prefix(place_id: &str) -> String {
    format!("{}:", place_id)
}

/// Reverse-timestamp key so a forward scan yields newest logs first.
pub fn activity_log_key(timestamp_ms: i64, log_id: &str) -> String {
    let ts = timestamp_ms.max(0) as u64;
    let reverse_ts = u64::MAX - ts;
    format!("{:020}:{}", reverse_ts, log_id)
}
