//! Request and response bodies of the HTTP surface.

use domains::{Result, User};
use serde::{Deserialize, Serialize};
use services::{PageRequest, UsernameAvailability};
use uuid::Uuid;

/// Page-size bounds applied to query parameters before they reach the services.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeedLimits {
    pub default_page_size: u32,
    pub max_page_size: u32,
}

impl Default for FeedLimits {
    fn default() -> Self {
        Self {
            default_page_size: 50,
            max_page_size: 100,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct FeedQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    #[serde(default)]
    pub show_ignored: bool,
}

impl FeedQuery {
    /// Missing values take defaults; oversized limits are clamped. Zero is
    /// left for `PageRequest` to reject.
    pub fn page_request(&self, limits: FeedLimits) -> Result<PageRequest> {
        let page = self.page.unwrap_or(1);
        let page_size = self
            .limit
            .unwrap_or(limits.default_page_size)
            .min(limits.max_page_size);
        PageRequest::new(page, page_size)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct PostMessageRequest {
    pub body: String,
    #[serde(default)]
    pub parent_id: Option<Uuid>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SetIgnoredRequest {
    pub ignored_usernames: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UsernameCheckRequest {
    pub username: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SignupRequest {
    pub email: String,
    pub username: String,
}

/// What a new account sees about itself. Email stays out of the response.
#[derive(Debug, Clone, Serialize)]
pub struct RegisteredUser {
    pub id: Uuid,
    pub username: String,
    pub email_verified: bool,
}

impl From<User> for RegisteredUser {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email_verified: user.email_verified,
        }
    }
}

/// Human-readable reasons for a refused signup.
pub fn availability_reasons(availability: &UsernameAvailability) -> Vec<String> {
    match availability {
        UsernameAvailability::Available { .. } => Vec::new(),
        UsernameAvailability::Taken { .. } => vec!["Username is already taken".to_string()],
        UsernameAvailability::Invalid(validation) => {
            validation.error.iter().map(ToString::to_string).collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domains::DomainError;

    #[test]
    fn defaults_and_clamping() {
        let limits = FeedLimits::default();

        let req = FeedQuery::default().page_request(limits).unwrap();
        assert_eq!((req.page(), req.page_size()), (1, 50));

        let query = FeedQuery {
            page: Some(3),
            limit: Some(500),
            show_ignored: false,
        };
        let req = query.page_request(limits).unwrap();
        assert_eq!((req.page(), req.page_size()), (3, 100));
    }

    #[test]
    fn zero_values_are_invalid() {
        let zero_page = FeedQuery {
            page: Some(0),
            ..FeedQuery::default()
        };
        assert!(matches!(
            zero_page.page_request(FeedLimits::default()),
            Err(DomainError::InvalidRequest(_))
        ));

        let zero_limit = FeedQuery {
            limit: Some(0),
            ..FeedQuery::default()
        };
        assert!(matches!(
            zero_limit.page_request(FeedLimits::default()),
            Err(DomainError::InvalidRequest(_))
        ));
    }

    #[test]
    fn taken_usernames_have_a_reason() {
        let reasons = availability_reasons(&UsernameAvailability::Taken {
            username: "alice".into(),
        });
        assert_eq!(reasons, vec!["Username is already taken".to_string()]);
    }
}
