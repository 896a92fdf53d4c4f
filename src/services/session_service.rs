// ==================== SESSION ====================
// Cookie-backed session state for authenticated users

use crate::{models::User, utils::AppError};
use actix_session::{
    config::{CookieContentSecurity, PersistentSession},
    storage::CookieSessionStore,
    Session, SessionMiddleware,
};
use actix_web::cookie::{time::Duration, Key, SameSite};

pub const SESSION_COOKIE: &str = "sessionid";
const AUTH_USER_KEY: &str = "_auth_user_id";
const USERNAME_KEY: &str = "username";

/// Two weeks, like most framework defaults
const SESSION_TTL_DAYS: i64 = 14;

pub fn middleware(key: Key, secure: bool) -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), key)
        .cookie_name(SESSION_COOKIE.to_string())
        .cookie_content_security(CookieContentSecurity::Private)
        .cookie_http_only(true)
        .cookie_same_site(SameSite::Lax)
        .cookie_secure(secure)
        .session_lifecycle(PersistentSession::default().session_ttl(Duration::days(SESSION_TTL_DAYS)))
        .build()
}

/// Marks the session as authenticated for `user`.
///
/// The session is renewed so the pre-login cookie cannot be replayed, and
/// any state left by a different user is dropped first.
pub fn login(session: &Session, user: &User) -> Result<(), AppError> {
    if let Some(current) = session.get::<String>(AUTH_USER_KEY)? {
        if current != user.user_id {
            session.clear();
        }
    }

    session.renew();
    session.insert(AUTH_USER_KEY, &user.user_id)?;
    session.insert(USERNAME_KEY, &user.username)?;

    Ok(())
}

pub fn logout(session: &Session) {
    session.purge();
}

pub fn current_username(session: &Session) -> Result<Option<String>, AppError> {
    Ok(session.get::<String>(USERNAME_KEY)?)
}
