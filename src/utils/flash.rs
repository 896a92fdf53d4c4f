//! Flash messages kept in the session until the next page render.

use actix_session::Session;
use serde::{Deserialize, Serialize};

use super::error::AppError;

const MESSAGES_KEY: &str = "_messages";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlashMessage {
    pub level: Level,
    pub text: String,
}

impl FlashMessage {
    pub fn new(level: Level, text: impl Into<String>) -> Self {
        Self {
            level,
            text: text.into(),
        }
    }
}

pub fn add_message(session: &Session, level: Level, text: &str) -> Result<(), AppError> {
    let mut messages = session
        .get::<Vec<FlashMessage>>(MESSAGES_KEY)?
        .unwrap_or_default();

    messages.push(FlashMessage::new(level, text));
    session.insert(MESSAGES_KEY, messages)?;

    Ok(())
}

pub fn error(session: &Session, text: &str) -> Result<(), AppError> {
    add_message(session, Level::Error, text)
}

pub fn warning(session: &Session, text: &str) -> Result<(), AppError> {
    add_message(session, Level::Warning, text)
}

pub fn info(session: &Session, text: &str) -> Result<(), AppError> {
    add_message(session, Level::Info, text)
}

/// Drains pending messages. Rendering consumes them.
pub fn take_messages(session: &Session) -> Result<Vec<FlashMessage>, AppError> {
    let messages = session
        .get::<Vec<FlashMessage>>(MESSAGES_KEY)?
        .unwrap_or_default();

    if !messages.is_empty() {
        session.remove(MESSAGES_KEY);
    }

    Ok(messages)
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_session::SessionExt;
    use actix_web::test::TestRequest;

    #[test]
    fn test_level_serializes_as_css_tag() {
        let json = serde_json::to_string(&FlashMessage::new(Level::Error, "boom")).unwrap();
        assert_eq!(json, r#"{"level":"error","text":"boom"}"#);

        let json = serde_json::to_string(&Level::Warning).unwrap();
        assert_eq!(json, r#""warning""#);
    }

    #[test]
    fn test_messages_are_queued_in_order_and_drained() {
        let req = TestRequest::default().to_http_request();
        let session = req.get_session();

        error(&session, "first").unwrap();
        info(&session, "second").unwrap();

        let messages = take_messages(&session).unwrap();
        assert_eq!(
            messages,
            vec![
                FlashMessage::new(Level::Error, "first"),
                FlashMessage::new(Level::Info, "second"),
            ]
        );

        assert!(take_messages(&session).unwrap().is_empty());
    }

    #[test]
    fn test_take_without_messages_is_empty() {
        let req = TestRequest::default().to_http_request();
        let session = req.get_session();

        assert!(take_messages(&session).unwrap().is_empty());
    }
}
