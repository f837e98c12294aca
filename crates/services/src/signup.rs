//! # Signup
//!
//! Username validation plus uniqueness, then hand-off to the account registrar.

use std::sync::Arc;

use domains::{AccountRegistrar, NewAccount, Registration, Result, User, UserDirectory};
use serde::Serialize;

use crate::moderation::ProfanityFilter;
use crate::username::{validate_username, UsernameValidation};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum UsernameAvailability {
    Available { username: String },
    Taken { username: String },
    Invalid(UsernameValidation),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignupOutcome {
    Registered(User),
    Rejected(UsernameAvailability),
    /// Another account already uses this email address.
    EmailInUse { email: String },
}

pub struct SignupService {
    users: Arc<dyn UserDirectory>,
    registrar: Arc<dyn AccountRegistrar>,
    filter: Arc<ProfanityFilter>,
}

impl SignupService {
    pub fn new(
        users: Arc<dyn UserDirectory>,
        registrar: Arc<dyn AccountRegistrar>,
        filter: Arc<ProfanityFilter>,
    ) -> Self {
        Self {
            users,
            registrar,
            filter,
        }
    }

    /// Structural validity first; the store is only consulted for valid names.
    pub async fn check_username(&self, raw: &str) -> Result<UsernameAvailability> {
        let validation = validate_username(raw, &self.filter);
        let Some(username) = validation.sanitized.clone().filter(|_| validation.is_valid()) else {
            return Ok(UsernameAvailability::Invalid(validation));
        };

        if self.users.find_by_username(&username).await?.is_some() {
            return Ok(UsernameAvailability::Taken { username });
        }
        Ok(UsernameAvailability::Available { username })
    }

    pub async fn register(&self, email: &str, raw_username: &str) -> Result<SignupOutcome> {
        let username = match self.check_username(raw_username).await? {
            UsernameAvailability::Available { username } => username,
            rejected => {
                tracing::debug!(?rejected, "signup rejected");
                return Ok(SignupOutcome::Rejected(rejected));
            }
        };

        let email = email.trim().to_string();
        let registration = self
            .registrar
            .register_account(NewAccount {
                email: email.clone(),
                username: username.clone(),
            })
            .await?;

        match registration {
            Registration::Created(user) => {
                tracing::info!(user_id = %user.id, username = %user.username, "account registered");
                Ok(SignupOutcome::Registered(user))
            }
            Registration::UsernameTaken => {
                tracing::debug!(%username, "username claimed by a concurrent signup");
                Ok(SignupOutcome::Rejected(UsernameAvailability::Taken {
                    username,
                }))
            }
            Registration::EmailTaken => {
                tracing::debug!("signup email already registered");
                Ok(SignupOutcome::EmailInUse { email })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use domains::{MockAccountRegistrar, MockUserDirectory};
    use uuid::Uuid;

    use crate::username::UsernameError;

    fn existing(name: &str) -> User {
        User {
            id: Uuid::now_v7(),
            username: name.to_string(),
            display_username: None,
            name: None,
            email: None,
            email_verified: true,
            created_at: Utc::now(),
        }
    }

    fn service(users: MockUserDirectory, registrar: MockAccountRegistrar) -> SignupService {
        SignupService::new(
            Arc::new(users),
            Arc::new(registrar),
            Arc::new(ProfanityFilter::new()),
        )
    }

    #[tokio::test]
    async fn invalid_usernames_skip_the_store() {
        let svc = service(MockUserDirectory::new(), MockAccountRegistrar::new());
        let result = svc.check_username("ab").await.unwrap();
        match result {
            UsernameAvailability::Invalid(v) => assert_eq!(v.error, Some(UsernameError::TooShort)),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[tokio::test]
    async fn taken_usernames_are_reported() {
        let mut users = MockUserDirectory::new();
        users
            .expect_find_by_username()
            .returning(|name| Ok(Some(existing(name))));

        let svc = service(users, MockAccountRegistrar::new());
        assert_eq!(
            svc.check_username("alice").await.unwrap(),
            UsernameAvailability::Taken {
                username: "alice".into()
            }
        );
    }

    #[tokio::test]
    async fn register_forwards_accepted_username() {
        let mut users = MockUserDirectory::new();
        users.expect_find_by_username().returning(|_| Ok(None));

        let mut registrar = MockAccountRegistrar::new();
        registrar
            .expect_register_account()
            .withf(|account| account.username == "new_user" && account.email == "n@example.com")
            .times(1)
            .returning(|account| {
                let mut user = existing(&account.username);
                user.email = Some(account.email);
                user.email_verified = false;
                Ok(Registration::Created(user))
            });

        let svc = service(users, registrar);
        let outcome = svc.register(" n@example.com ", "new_user").await.unwrap();
        assert!(matches!(outcome, SignupOutcome::Registered(u) if !u.email_verified));
    }

    #[tokio::test]
    async fn lost_username_race_is_reported_as_taken() {
        let mut users = MockUserDirectory::new();
        users.expect_find_by_username().returning(|_| Ok(None));

        let mut registrar = MockAccountRegistrar::new();
        registrar
            .expect_register_account()
            .times(1)
            .returning(|_| Ok(Registration::UsernameTaken));

        let svc = service(users, registrar);
        let outcome = svc.register("a@example.com", "alice").await.unwrap();
        assert_eq!(
            outcome,
            SignupOutcome::Rejected(UsernameAvailability::Taken {
                username: "alice".into()
            })
        );
    }

    #[tokio::test]
    async fn duplicate_email_is_not_a_store_failure() {
        let mut users = MockUserDirectory::new();
        users.expect_find_by_username().returning(|_| Ok(None));

        let mut registrar = MockAccountRegistrar::new();
        registrar
            .expect_register_account()
            .returning(|_| Ok(Registration::EmailTaken));

        let svc = service(users, registrar);
        let outcome = svc.register("taken@example.com ", "someone").await.unwrap();
        assert_eq!(
            outcome,
            SignupOutcome::EmailInUse {
                email: "taken@example.com".into()
            }
        );
    }

    #[tokio::test]
    async fn register_does_not_forward_rejections() {
        let mut registrar = MockAccountRegistrar::new();
        registrar.expect_register_account().never();

        let svc = service(MockUserDirectory::new(), registrar);
        let outcome = svc.register("x@example.com", "root").await.unwrap();
        assert!(matches!(
            outcome,
            SignupOutcome::Rejected(UsernameAvailability::Invalid(_))
        ));
    }
}
