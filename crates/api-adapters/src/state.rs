//! Shared application state.

use std::sync::Arc;

use domains::SessionResolver;
use services::{FeedService, PostService, PreferenceService, SignupService};

use crate::dto::FeedLimits;
use crate::metrics::Metrics;

/// Everything a handler needs. Cheap to clone.
#[derive(Clone)]
pub struct AppState {
    pub feed: Arc<FeedService>,
    pub posts: Arc<PostService>,
    pub preferences: Arc<PreferenceService>,
    pub signup: Arc<SignupService>,
    pub sessions: Arc<dyn SessionResolver>,
    pub metrics: Arc<Metrics>,
    pub limits: FeedLimits,
}
