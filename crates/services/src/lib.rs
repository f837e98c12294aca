//! # services
//!
//! Content moderation, identity validation, and the visibility/preference
//! layer of the guestbook. Everything here talks to storage only through
//! the ports in `domains`.

pub mod authorize;
pub mod feed;
pub mod message;
pub mod moderation;
pub mod posting;
pub mod preferences;
pub mod signup;
pub mod username;
pub mod visibility;

pub use feed::{FeedService, PageRequest};
pub use message::{validate_message, MessageViolation, ValidationOptions, ValidationResult};
pub use moderation::ProfanityFilter;
pub use posting::{PostOutcome, PostService, PostingPolicy};
pub use preferences::PreferenceService;
pub use signup::{SignupOutcome, SignupService, UsernameAvailability};
pub use username::{validate_username, UsernameError, UsernameValidation};
pub use visibility::apply_ignore_filter;
