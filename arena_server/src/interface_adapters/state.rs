use crate::use_cases::MatchRegistry;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    // Owns every running match world task.
    pub match_registry: Arc<MatchRegistry>,
    // Match used when a client connects without `match_id`.
    pub default_match_id: Arc<str>,
}
