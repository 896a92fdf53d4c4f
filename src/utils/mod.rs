// Utility functions
pub mod error;
pub mod flash;
pub mod templates;

pub use error::*;

/// Usernames come from form input; control characters are escaped before logging
pub fn loggable(value: &str) -> std::str::EscapeDebug<'_> {
    value.escape_debug()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_loggable_escapes_line_breaks() {
        let logged = loggable("ada\r\n[INFO] admin logged in").to_string();

        assert!(!logged.contains('\n'));
        assert!(!logged.contains('\r'));
        assert_eq!(logged, r"ada\r\n[INFO] admin logged in");
        assert_eq!(loggable("grace").to_string(), "grace");
    }
}
