pub mod auth_service;
pub mod session_service;
pub mod user_store;

pub use user_store::{MemoryUserStore, UserStore};
