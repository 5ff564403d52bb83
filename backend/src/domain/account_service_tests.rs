//! Tests for the account service.

use std::sync::{Arc, Mutex};

use super::*;
use crate::domain::ports::MockUserRepository;
use crate::domain::{EmailAddress, ErrorCode, PasswordDigest};
use rstest::rstest;

/// Reversible stand-in so tests can assert on what reached the repository.
#[derive(Default)]
struct PlainHasher;

#[async_trait]
impl PasswordHasher for PlainHasher {
    async fn hash(&self, password: &str) -> Result<PasswordDigest, PasswordHashError> {
        Ok(PasswordDigest::new(format!("plain${password}")))
    }

    async fn verify(
        &self,
        password: &str,
        digest: &PasswordDigest,
    ) -> Result<bool, PasswordHashError> {
        match digest.as_str().strip_prefix("plain$") {
            Some(stored) => Ok(stored == password),
            None => Err(PasswordHashError::malformed_digest("missing prefix")),
        }
    }
}

fn make_service(repo: MockUserRepository) -> AccountService<MockUserRepository, PlainHasher> {
    AccountService::new(Arc::new(repo), Arc::new(PlainHasher))
}

fn alice_account(digest: &str) -> UserAccount {
    UserAccount {
        user: User::new(
            UserId::random(),
            Username::new("alice").expect("username"),
            EmailAddress::new("a@x.com").expect("email"),
        ),
        password_digest: PasswordDigest::new(digest),
    }
}

fn registration() -> Registration {
    Registration::try_from_parts("alice", "a@x.com", "pw1").expect("registration")
}

#[tokio::test]
async fn register_stores_digest_not_plaintext() {
    let stored: Arc<Mutex<Option<UserAccount>>> = Arc::default();
    let sink = Arc::clone(&stored);
    let mut repo = MockUserRepository::new();
    repo.expect_insert().times(1).returning(move |account| {
        *sink.lock().expect("sink lock") = Some(account.clone());
        Ok(())
    });

    let service = make_service(repo);
    let id = service.register(&registration()).await.expect("register");

    let account = stored
        .lock()
        .expect("sink lock")
        .clone()
        .expect("account inserted");
    assert_eq!(account.user.id(), &id);
    assert_eq!(account.user.username().as_ref(), "alice");
    assert_eq!(account.user.email().as_ref(), "a@x.com");
    assert_ne!(account.password_digest.as_str(), "pw1");
}

#[rstest]
#[case(UserPersistenceError::duplicate_username("alice"), "Username already taken")]
#[case(UserPersistenceError::duplicate_email("a@x.com"), "Email already registered")]
#[tokio::test]
async fn register_maps_duplicates_to_conflict(
    #[case] failure: UserPersistenceError,
    #[case] message: &str,
) {
    let mut repo = MockUserRepository::new();
    repo.expect_insert()
        .times(1)
        .return_once(move |_| Err(failure));

    let error = make_service(repo)
        .register(&registration())
        .await
        .expect_err("duplicate");
    assert_eq!(error.code(), ErrorCode::Conflict);
    assert_eq!(error.message(), message);
}

#[rstest]
#[case(UserPersistenceError::connection("refused"), ErrorCode::ServiceUnavailable)]
#[case(UserPersistenceError::query("syntax"), ErrorCode::InternalError)]
#[tokio::test]
async fn register_maps_store_failures(
    #[case] failure: UserPersistenceError,
    #[case] expected: ErrorCode,
) {
    let mut repo = MockUserRepository::new();
    repo.expect_insert()
        .times(1)
        .return_once(move |_| Err(failure));

    let error = make_service(repo)
        .register(&registration())
        .await
        .expect_err("store failure");
    assert_eq!(error.code(), expected);
}

#[tokio::test]
async fn authenticate_accepts_matching_password() {
    let mut repo = MockUserRepository::new();
    repo.expect_find_by_username()
        .withf(|username| username.to_string() == "alice")
        .times(1)
        .return_once(|_| Ok(Some(alice_account("plain$pw1"))));

    let creds = LoginCredentials::try_from_parts("alice", "pw1").expect("creds");
    let username = make_service(repo)
        .authenticate(&creds)
        .await
        .expect("login succeeds");
    assert_eq!(username.as_ref(), "alice");
}

#[rstest]
#[case("alice", "wrong", Some("plain$pw1"))]
#[case("bob", "pw1", None)]
#[tokio::test]
async fn authenticate_failures_are_indistinguishable(
    #[case] username: &str,
    #[case] password: &str,
    #[case] stored_digest: Option<&'static str>,
) {
    let mut repo = MockUserRepository::new();
    repo.expect_find_by_username()
        .times(1)
        .return_once(move |_| Ok(stored_digest.map(alice_account)));

    let creds = LoginCredentials::try_from_parts(username, password).expect("creds");
    let error = make_service(repo)
        .authenticate(&creds)
        .await
        .expect_err("login fails");
    assert_eq!(error.code(), ErrorCode::Unauthorized);
    assert_eq!(error.message(), INVALID_CREDENTIALS_MESSAGE);
}

#[tokio::test]
async fn authenticate_rejects_overlong_username_without_lookup() {
    let mut repo = MockUserRepository::new();
    repo.expect_find_by_username().never();

    let creds =
        LoginCredentials::try_from_parts(&"a".repeat(80), "pw1").expect("creds shape");
    let error = make_service(repo)
        .authenticate(&creds)
        .await
        .expect_err("login fails");
    assert_eq!(error.code(), ErrorCode::Unauthorized);
}

#[tokio::test]
async fn authenticate_surfaces_corrupt_digest_as_internal() {
    let mut repo = MockUserRepository::new();
    repo.expect_find_by_username()
        .times(1)
        .return_once(|_| Ok(Some(alice_account("not-a-digest"))));

    let creds = LoginCredentials::try_from_parts("alice", "pw1").expect("creds");
    let error = make_service(repo)
        .authenticate(&creds)
        .await
        .expect_err("corrupt digest");
    assert_eq!(error.code(), ErrorCode::InternalError);
}
