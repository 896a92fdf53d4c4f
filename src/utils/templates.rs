// Page templates, embedded in the binary and parsed once on first use.

use super::error::AppError;
use super::flash::FlashMessage;
use lazy_static::lazy_static;
use serde::Serialize;
use tera::{Context, Tera};

pub const LOGIN_PAGE: &str = "login_page.html";
pub const SIGNUP_PAGE: &str = "signup_page.html";

lazy_static! {
    static ref TEMPLATES: Result<Tera, String> = load_templates();
}

fn load_templates() -> Result<Tera, String> {
    let mut tera = Tera::default();

    tera.add_raw_templates(vec![
        ("base.html", include_str!("../../templates/base.html")),
        (LOGIN_PAGE, include_str!("../../templates/login_page.html")),
        (SIGNUP_PAGE, include_str!("../../templates/signup_page.html")),
    ])
    .map_err(|e| AppError::from(e).to_string())?;

    Ok(tera)
}

/// Values every page template can read
#[derive(Debug, Default, Serialize)]
pub struct PageContext {
    pub messages: Vec<FlashMessage>,
    pub username: Option<String>,
}

pub fn render(template: &str, page: &PageContext) -> Result<String, AppError> {
    let tera = TEMPLATES
        .as_ref()
        .map_err(|e| AppError::TemplateError(e.clone()))?;

    let context = Context::from_serialize(page)?;
    Ok(tera.render(template, &context)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::flash::Level;

    #[test]
    fn test_templates_parse() {
        assert!(TEMPLATES.is_ok(), "{:?}", TEMPLATES.as_ref().err());
    }

    #[test]
    fn test_login_page_renders_messages_escaped() {
        let page = PageContext {
            messages: vec![FlashMessage::new(Level::Error, "<b>nope</b>")],
            username: None,
        };

        let html = render(LOGIN_PAGE, &page).unwrap();

        assert!(html.contains(r#"class="message error""#));
        assert!(html.contains("&lt;b&gt;nope&lt;&#x2F;b&gt;"));
        assert!(!html.contains("<b>nope</b>"));
        assert!(!html.contains("Signed in as"));
    }

    #[test]
    fn test_login_page_shows_signed_in_user() {
        let page = PageContext {
            messages: vec![],
            username: Some("ada".to_string()),
        };

        let html = render(LOGIN_PAGE, &page).unwrap();
        assert!(html.contains("Signed in as <strong>ada</strong>"));
    }

    #[test]
    fn test_signup_page_has_form_fields() {
        let html = render(SIGNUP_PAGE, &PageContext::default()).unwrap();

        assert!(html.contains(r#"name="signupName""#));
        assert!(html.contains(r#"name="signupUsername""#));
        assert!(html.contains(r#"name="signupPassword""#));
    }

    #[test]
    fn test_unknown_template_is_error() {
        let result = render("missing.html", &PageContext::default());
        assert!(matches!(result, Err(AppError::TemplateError(_))));
    }
}
