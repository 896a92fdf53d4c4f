use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Mentorix Accounts",
        version = "1.0.0",
        description = "Account pages for Mentorix: sign in, sign out and sign up.\n\n**Sessions:** a successful login sets the `sessionid` cookie. All pages answer with HTML and report outcomes as flash messages inside the page."
    ),
    paths(
        // Accounts
        crate::api::accounts::login_page,
        crate::api::accounts::login,
        crate::api::accounts::logout,
        crate::api::accounts::signup_page,
        crate::api::accounts::signup,

        // Health
        crate::api::health::health_check,
    ),
    components(
        schemas(
            crate::services::auth_service::LoginForm,
            crate::services::auth_service::SignupForm,
            crate::api::health::HealthResponse,
        )
    ),
    tags(
        (name = "Accounts", description = "Form endpoints for login, logout and signup. Requests are `application/x-www-form-urlencoded`, responses are HTML pages."),
        (name = "Health", description = "Health check for monitoring service and user store status."),
    )
)]
pub struct ApiDoc;
