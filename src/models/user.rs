use mongodb::bson::{oid::ObjectId, DateTime as BsonDateTime};
use serde::{Deserialize, Serialize};

/// Document stored in the "users" collection
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct User {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub _id: Option<ObjectId>,
    pub user_id: String,  // PRIMARY IDENTIFIER - stored in the session
    pub username: String,
    #[serde(default)]
    pub first_name: String,
    /// bcrypt hash; None for accounts without a usable password
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(default = "default_is_active")]
    pub is_active: bool,
    pub date_joined: Option<BsonDateTime>,
    pub last_login: Option<BsonDateTime>,
}

fn default_is_active() -> bool {
    true
}

impl User {
    /// Builds a new, active account. The password hash is set separately.
    pub fn new(username: &str, first_name: &str) -> Self {
        Self {
            _id: None,
            user_id: ObjectId::new().to_hex(),
            username: username.to_string(),
            first_name: first_name.to_string(),
            password: None,
            is_active: true,
            date_joined: Some(BsonDateTime::now()),
            last_login: None,
        }
    }

    pub fn has_usable_password(&self) -> bool {
        self.password.as_deref().is_some_and(|hash| !hash.is_empty())
    }
}
