use crate::{
    models::User,
    services::user_store::UserStore,
    utils::{loggable, AppError},
};
use actix_web::web;
use bcrypt::{hash, verify};
use mongodb::bson::DateTime as BsonDateTime;
use serde::Deserialize;

// Request structures (form-encoded, fields may be absent)
#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct LoginForm {
    pub username: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct SignupForm {
    #[serde(rename = "signupName")]
    pub name: Option<String>,
    #[serde(rename = "signupUsername")]
    pub username: Option<String>,
    #[serde(rename = "signupPassword")]
    pub password: Option<String>,
}

#[derive(Debug)]
pub enum LoginOutcome {
    UnknownUser,
    InvalidCredentials,
    Authenticated(User),
}

#[derive(Debug)]
pub enum SignupOutcome {
    Created(User),
    UsernameTaken,
    MissingFields,
}

/// Hashes on the blocking pool; bcrypt is deliberately slow.
pub async fn hash_password(password: &str, cost: u32) -> Result<String, AppError> {
    let password = password.to_string();
    let hashed = web::block(move || hash(password, cost)).await??;
    Ok(hashed)
}

/// A malformed stored hash never matches.
pub async fn check_password(password: &str, stored_hash: &str) -> Result<bool, AppError> {
    let password = password.to_string();
    let stored_hash = stored_hash.to_string();

    match web::block(move || verify(password, &stored_hash)).await? {
        Ok(valid) => Ok(valid),
        Err(e) => {
            log::warn!("⚠️  Unverifiable password hash: {}", e);
            Ok(false)
        }
    }
}

/// Returns the user when the credentials match an active account
pub async fn authenticate(
    store: &dyn UserStore,
    username: &str,
    password: &str,
) -> Result<Option<User>, AppError> {
    let user = match store.find_by_username(username).await? {
        Some(user) => user,
        None => return Ok(None),
    };

    let stored_hash = match user.password.as_deref() {
        Some(stored_hash) if user.has_usable_password() => stored_hash,
        _ => return Ok(None),
    };

    if !check_password(password, stored_hash).await? {
        return Ok(None);
    }

    if !user.is_active {
        log::warn!("⚠️  Inactive account tried to sign in: {}", loggable(&user.username));
        return Ok(None);
    }

    Ok(Some(user))
}

// User login
pub async fn login(store: &dyn UserStore, form: &LoginForm) -> Result<LoginOutcome, AppError> {
    let username = form.username.as_deref().unwrap_or_default();
    let password = form.password.as_deref().unwrap_or_default();

    if !store.username_exists(username).await? {
        return Ok(LoginOutcome::UnknownUser);
    }

    let mut user = match authenticate(store, username, password).await? {
        Some(user) => user,
        None => return Ok(LoginOutcome::InvalidCredentials),
    };

    let now = BsonDateTime::now();
    store.record_login(&user.user_id, now).await?;
    user.last_login = Some(now);

    Ok(LoginOutcome::Authenticated(user))
}

// User registration
pub async fn signup(
    store: &dyn UserStore,
    form: &SignupForm,
    bcrypt_cost: u32,
) -> Result<SignupOutcome, AppError> {
    let name = form.name.as_deref().unwrap_or_default();
    let username = form.username.as_deref().unwrap_or_default();
    let password = form.password.as_deref().unwrap_or_default();

    if username.is_empty() || password.is_empty() {
        return Ok(SignupOutcome::MissingFields);
    }

    if store.username_exists(username).await? {
        return Ok(SignupOutcome::UsernameTaken);
    }

    let mut user = User::new(username, name);
    user.password = Some(hash_password(password, bcrypt_cost).await?);

    // A concurrent signup may have claimed the username since the check above
    match store.insert(&user).await {
        Ok(()) => {
            log::info!("✅ User registered successfully: {}", loggable(&user.username));
            Ok(SignupOutcome::Created(user))
        }
        Err(AppError::Conflict(_)) => Ok(SignupOutcome::UsernameTaken),
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::user_store::MemoryUserStore;

    const TEST_COST: u32 = 4;

    async fn seed_user(store: &MemoryUserStore, username: &str, password: &str) -> User {
        let mut user = User::new(username, "Test");
        user.password = Some(hash(password, TEST_COST).unwrap());
        store.insert(&user).await.unwrap();
        user
    }

    fn login_form(username: &str, password: &str) -> LoginForm {
        LoginForm {
            username: Some(username.to_string()),
            password: Some(password.to_string()),
        }
    }

    fn signup_form(name: &str, username: &str, password: &str) -> SignupForm {
        SignupForm {
            name: Some(name.to_string()),
            username: Some(username.to_string()),
            password: Some(password.to_string()),
        }
    }

    #[actix_web::test]
    async fn test_login_unknown_user() {
        let store = MemoryUserStore::new();

        let outcome = login(&store, &login_form("ghost", "whatever")).await.unwrap();
        assert!(matches!(outcome, LoginOutcome::UnknownUser));
    }

    #[actix_web::test]
    async fn test_login_missing_fields_is_unknown_user() {
        let store = MemoryUserStore::new();
        seed_user(&store, "ada", "lovelace").await;

        let form = LoginForm { username: None, password: None };
        let outcome = login(&store, &form).await.unwrap();
        assert!(matches!(outcome, LoginOutcome::UnknownUser));
    }

    #[actix_web::test]
    async fn test_login_wrong_password() {
        let store = MemoryUserStore::new();
        seed_user(&store, "ada", "lovelace").await;

        let outcome = login(&store, &login_form("ada", "babbage")).await.unwrap();
        assert!(matches!(outcome, LoginOutcome::InvalidCredentials));

        let stored = store.find_by_username("ada").await.unwrap().unwrap();
        assert!(stored.last_login.is_none());
    }

    #[actix_web::test]
    async fn test_login_success_records_last_login() {
        let store = MemoryUserStore::new();
        let seeded = seed_user(&store, "ada", "lovelace").await;

        let outcome = login(&store, &login_form("ada", "lovelace")).await.unwrap();
        let user = match outcome {
            LoginOutcome::Authenticated(user) => user,
            other => panic!("expected authenticated user, got {:?}", other),
        };

        assert_eq!(user.user_id, seeded.user_id);
        assert!(user.last_login.is_some());

        let stored = store.find_by_username("ada").await.unwrap().unwrap();
        assert_eq!(stored.last_login, user.last_login);
    }

    #[actix_web::test]
    async fn test_inactive_user_never_authenticates() {
        let store = MemoryUserStore::new();
        let mut user = User::new("dormant", "Dormant");
        user.password = Some(hash("secret", TEST_COST).unwrap());
        user.is_active = false;
        store.insert(&user).await.unwrap();

        let outcome = login(&store, &login_form("dormant", "secret")).await.unwrap();
        assert!(matches!(outcome, LoginOutcome::InvalidCredentials));
    }

    #[actix_web::test]
    async fn test_unusable_or_malformed_hash_never_authenticates() {
        let store = MemoryUserStore::new();
        store.insert(&User::new("nopass", "No Password")).await.unwrap();

        let mut broken = User::new("broken", "Broken");
        broken.password = Some("not-a-bcrypt-hash".to_string());
        store.insert(&broken).await.unwrap();

        assert!(authenticate(&store, "nopass", "").await.unwrap().is_none());
        assert!(authenticate(&store, "broken", "not-a-bcrypt-hash").await.unwrap().is_none());
    }

    #[actix_web::test]
    async fn test_signup_creates_hashed_account() {
        let store = MemoryUserStore::new();

        let outcome = signup(&store, &signup_form("Ada Lovelace", "ada", "lovelace"), TEST_COST)
            .await
            .unwrap();
        assert!(matches!(outcome, SignupOutcome::Created(_)));

        let stored = store.find_by_username("ada").await.unwrap().unwrap();
        let stored_hash = stored.password.unwrap();

        assert_eq!(stored.first_name, "Ada Lovelace");
        assert_ne!(stored_hash, "lovelace");
        assert!(!stored_hash.contains("lovelace"));
        assert!(verify("lovelace", &stored_hash).unwrap());
        assert_eq!(store.count().await, 1);
    }

    #[actix_web::test]
    async fn test_signup_existing_username() {
        let store = MemoryUserStore::new();
        seed_user(&store, "ada", "lovelace").await;

        let outcome = signup(&store, &signup_form("Impostor", "ada", "other"), TEST_COST)
            .await
            .unwrap();

        assert!(matches!(outcome, SignupOutcome::UsernameTaken));
        assert_eq!(store.count().await, 1);

        let stored = store.find_by_username("ada").await.unwrap().unwrap();
        assert_eq!(stored.first_name, "Test");
    }

    #[actix_web::test]
    async fn test_signup_missing_fields() {
        let store = MemoryUserStore::new();

        let form = SignupForm {
            name: Some("Nameless".to_string()),
            username: None,
            password: Some("pw".to_string()),
        };
        let outcome = signup(&store, &form, TEST_COST).await.unwrap();
        assert!(matches!(outcome, SignupOutcome::MissingFields));

        let outcome = signup(&store, &signup_form("x", "ada", ""), TEST_COST).await.unwrap();
        assert!(matches!(outcome, SignupOutcome::MissingFields));

        assert_eq!(store.count().await, 0);
    }

    #[actix_web::test]
    async fn test_concurrent_signups_create_one_account() {
        let store = MemoryUserStore::new();
        let first = signup_form("First", "race", "pw-one");
        let second = signup_form("Second", "race", "pw-two");

        let (a, b) = futures::join!(
            signup(&store, &first, TEST_COST),
            signup(&store, &second, TEST_COST)
        );

        let created = [a.unwrap(), b.unwrap()]
            .iter()
            .filter(|outcome| matches!(outcome, SignupOutcome::Created(_)))
            .count();

        assert_eq!(created, 1);
        assert_eq!(store.count().await, 1);
    }
}
