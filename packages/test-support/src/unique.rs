//! Unique test data built from ULIDs, so repeated runs against the same
//! database never collide on the unique email/phone constraints.

use ulid::Ulid;

/// Generate a unique string with the given prefix
///
/// # Examples
/// ```
/// use test_support::unique_str;
///
/// let id1 = unique_str("user");
/// let id2 = unique_str("user");
/// assert_ne!(id1, id2);
/// assert!(id1.starts_with("user-"));
/// ```
pub fn unique_str(prefix: &str) -> String {
    format!("{}-{}", prefix, Ulid::new())
}

/// Generate a unique email address in the format `{prefix}-{ulid}@example.test`
pub fn unique_email(prefix: &str) -> String {
    format!("{}@example.test", unique_str(prefix))
}

/// Generate a phone number that fits `player_accounts.phone` (20 chars).
pub fn unique_phone() -> String {
    format!("+2547{:08}", Ulid::new().random() % 100_000_000)
}
