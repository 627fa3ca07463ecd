//! Profile-existence API variant: typed JSON, existence only.
//!
//! The upstream returns a profile record whose `userId` field is the
//! existence signal. No rank data is read in this variant.

use serde::Deserialize;

/// The slice of the upstream profile record we care about. Everything
/// else in the body is ignored; the upstream schema drifts without notice.
#[derive(Debug, Deserialize)]
pub struct ProfileRecord {
    #[serde(rename = "userId")]
    pub user_id: Option<String>,
}

/// Parse a profile API body and return the user id if the profile exists.
///
/// A body that is not JSON, has no `userId`, or carries an empty one all
/// mean "no such user" — the upstream serves soft-missing profiles with
/// status 200.
pub fn existing_user_id(body: &str) -> Option<String> {
    let record: ProfileRecord = serde_json::from_str(body).ok()?;
    record.user_id.filter(|id| !id.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_id_present() {
        let body = r#"{"userId": "abc-123", "level": 120}"#;
        assert_eq!(existing_user_id(body).as_deref(), Some("abc-123"));
    }

    #[test]
    fn test_user_id_missing() {
        assert!(existing_user_id(r#"{"level": 120}"#).is_none());
    }

    #[test]
    fn test_user_id_null_or_empty() {
        assert!(existing_user_id(r#"{"userId": null}"#).is_none());
        assert!(existing_user_id(r#"{"userId": ""}"#).is_none());
        assert!(existing_user_id(r#"{"userId": "   "}"#).is_none());
    }

    #[test]
    fn test_not_json() {
        assert!(existing_user_id("<html>not json</html>").is_none());
        assert!(existing_user_id("").is_none());
    }
}
