//! # Metrics
//!
//! Prometheus counters for posting and feed traffic, rendered in the
//! OpenMetrics text format at `/metrics`.

use prometheus_client::encoding::text::encode;
use prometheus_client::encoding::{EncodeLabelSet, EncodeLabelValue, LabelValueEncoder};
use prometheus_client::metrics::counter::Counter;
use prometheus_client::metrics::family::Family;
use prometheus_client::registry::Registry;
use services::ValidationResult;

pub const CONTENT_TYPE: &str = "application/openmetrics-text; version=1.0.0; charset=utf-8";

#[derive(Debug, Clone, Hash, PartialEq, Eq, EncodeLabelSet)]
pub struct RejectionLabels {
    pub reason: String,
}

#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
pub enum FeedKind {
    Global,
    User,
}

impl FeedKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Global => "global",
            Self::User => "user",
        }
    }
}

impl EncodeLabelValue for FeedKind {
    fn encode(&self, encoder: &mut LabelValueEncoder<'_>) -> Result<(), std::fmt::Error> {
        EncodeLabelValue::encode(&self.as_str(), encoder)
    }
}

#[derive(Debug, Clone, Hash, PartialEq, Eq, EncodeLabelSet)]
pub struct FeedLabels {
    pub scope: FeedKind,
}

pub struct Metrics {
    registry: Registry,
    messages_posted: Counter,
    rejections: Family<RejectionLabels, Counter>,
    feed_requests: Family<FeedLabels, Counter>,
}

impl Metrics {
    pub fn new() -> Self {
        let mut registry = Registry::default();

        let messages_posted = Counter::default();
        registry.register(
            "guestbook_messages_posted",
            "Messages accepted and stored",
            messages_posted.clone(),
        );

        let rejections = Family::<RejectionLabels, Counter>::default();
        registry.register(
            "guestbook_message_rejections",
            "Messages refused by the content policy, by violated rule",
            rejections.clone(),
        );

        let feed_requests = Family::<FeedLabels, Counter>::default();
        registry.register(
            "guestbook_feed_requests",
            "Feed pages served",
            feed_requests.clone(),
        );

        Self {
            registry,
            messages_posted,
            rejections,
            feed_requests,
        }
    }

    pub fn message_posted(&self) {
        self.messages_posted.inc();
    }

    /// One increment per violated rule.
    pub fn message_rejected(&self, verdict: &ValidationResult) {
        for violation in &verdict.errors {
            self.rejections
                .get_or_create(&RejectionLabels {
                    reason: violation.code().to_string(),
                })
                .inc();
        }
    }

    pub fn feed_served(&self, scope: FeedKind) {
        self.feed_requests.get_or_create(&FeedLabels { scope }).inc();
    }

    pub fn render(&self) -> Result<String, std::fmt::Error> {
        let mut buffer = String::new();
        encode(&mut buffer, &self.registry)?;
        Ok(buffer)
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}
