use crate::config::Config;
use crate::services::auth_service::{self, LoginForm, LoginOutcome, SignupForm, SignupOutcome};
use crate::services::{session_service, UserStore};
use crate::utils::{
    flash, loggable,
    templates::{self, PageContext, LOGIN_PAGE, SIGNUP_PAGE},
    AppError,
};
use actix_session::Session;
use actix_web::{web, HttpResponse};

pub const USER_DOES_NOT_EXIST: &str = "User does not exist. Please sign up.";
pub const INVALID_CREDENTIALS: &str = "Invalid username or password.";
pub const USERNAME_TAKEN: &str = "Username already exists";
pub const USER_CREATED: &str = "user created successfully";
pub const MISSING_SIGNUP_FIELDS: &str = "Username and password are required";

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(login_page))
        .service(
            web::resource("/login")
                .route(web::get().to(login_page))
                .route(web::post().to(login)),
        )
        .service(
            web::resource("/logout")
                .route(web::get().to(logout))
                .route(web::post().to(logout)),
        )
        .service(
            web::resource("/signup")
                .route(web::get().to(signup_page))
                .route(web::post().to(signup)),
        );
}

/// Renders a page, consuming pending flash messages
fn render_page(session: &Session, template: &str) -> Result<HttpResponse, AppError> {
    let page = PageContext {
        messages: flash::take_messages(session)?,
        username: session_service::current_username(session)?,
    };

    let html = templates::render(template, &page)?;

    Ok(HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(html))
}

#[utoipa::path(
    get,
    path = "/login",
    tag = "Accounts",
    responses(
        (status = 200, description = "Login form", body = String, content_type = "text/html")
    )
)]
pub async fn login_page(session: Session) -> Result<HttpResponse, AppError> {
    render_page(&session, LOGIN_PAGE)
}

#[utoipa::path(
    post,
    path = "/login",
    tag = "Accounts",
    request_body(content = LoginForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 200, description = "Login form re-rendered with the outcome as a flash message", body = String, content_type = "text/html"),
        (status = 400, description = "Malformed form body")
    )
)]
pub async fn login(
    store: web::Data<dyn UserStore>,
    session: Session,
    form: web::Form<LoginForm>,
) -> Result<HttpResponse, AppError> {
    let username = form.username.as_deref().unwrap_or_default();
    log::info!("🔐 POST /login - username: {}", loggable(username));

    match auth_service::login(store.get_ref(), &form).await? {
        LoginOutcome::UnknownUser => {
            log::warn!("❌ Login failed, unknown user: {}", loggable(username));
            flash::error(&session, USER_DOES_NOT_EXIST)?;
        }
        LoginOutcome::InvalidCredentials => {
            log::warn!("❌ Login failed, invalid credentials: {}", loggable(username));
            flash::error(&session, INVALID_CREDENTIALS)?;
        }
        LoginOutcome::Authenticated(user) => {
            session_service::login(&session, &user)?;
            log::info!("✅ Login successful: {}", loggable(&user.username));
        }
    }

    // The login page is rendered on success too; there is no redirect
    render_page(&session, LOGIN_PAGE)
}

#[utoipa::path(
    method(get, post),
    path = "/logout",
    tag = "Accounts",
    responses(
        (status = 200, description = "Session terminated, login form rendered", body = String, content_type = "text/html")
    )
)]
pub async fn logout(session: Session) -> Result<HttpResponse, AppError> {
    match session_service::current_username(&session) {
        Ok(Some(username)) => log::info!("👋 Logout: {}", loggable(&username)),
        _ => log::info!("👋 Logout (no active session)"),
    }

    session_service::logout(&session);
    render_page(&session, LOGIN_PAGE)
}

#[utoipa::path(
    get,
    path = "/signup",
    tag = "Accounts",
    responses(
        (status = 200, description = "Signup form", body = String, content_type = "text/html")
    )
)]
pub async fn signup_page(session: Session) -> Result<HttpResponse, AppError> {
    render_page(&session, SIGNUP_PAGE)
}

#[utoipa::path(
    post,
    path = "/signup",
    tag = "Accounts",
    request_body(content = SignupForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 200, description = "Signup form re-rendered with the outcome as a flash message", body = String, content_type = "text/html"),
        (status = 400, description = "Malformed form body")
    )
)]
pub async fn signup(
    store: web::Data<dyn UserStore>,
    config: web::Data<Config>,
    session: Session,
    form: web::Form<SignupForm>,
) -> Result<HttpResponse, AppError> {
    let username = form.username.as_deref().unwrap_or_default();
    log::info!("📝 POST /signup - username: {}", loggable(username));

    match auth_service::signup(store.get_ref(), &form, config.bcrypt_cost).await? {
        SignupOutcome::Created(user) => {
            log::info!("✅ Account created: {} ({})", loggable(&user.username), user.user_id);
            flash::info(&session, USER_CREATED)?;
        }
        SignupOutcome::UsernameTaken => {
            log::warn!("❌ Signup rejected, username taken: {}", loggable(username));
            flash::info(&session, USERNAME_TAKEN)?;
        }
        SignupOutcome::MissingFields => {
            log::warn!("❌ Signup rejected, missing fields");
            flash::warning(&session, MISSING_SIGNUP_FIELDS)?;
        }
    }

    render_page(&session, SIGNUP_PAGE)
}
