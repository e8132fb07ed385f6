//! User identity and the denormalised follow counters carried on it.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Validation errors returned when constructing user value types.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UserValidationError {
    #[error("user id must not be empty")]
    EmptyId,
    #[error("user id must be a valid UUID")]
    InvalidId,
    #[error("display name must not be empty")]
    EmptyDisplayName,
    #[error("display name must be at least {min} characters")]
    DisplayNameTooShort { min: usize },
    #[error("display name must be at most {max} characters")]
    DisplayNameTooLong { max: usize },
    #[error("display name may only contain letters, numbers, spaces, or underscores")]
    DisplayNameInvalidCharacters,
}

/// Stable user identifier stored as a UUID.
///
/// The original string form is retained so identifiers echo back to clients
/// exactly as they were supplied. Equality and hashing use the UUID only, so
/// differently cased spellings of one identifier compare equal.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserId(Uuid, String);

impl PartialEq for UserId {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl Eq for UserId {}

impl std::hash::Hash for UserId {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.0.hash(state);
    }
}

impl UserId {
    /// Validate and construct a [`UserId`] from borrowed input.
    ///
    /// # Examples
    /// ```
    /// use inkpost::domain::UserId;
    ///
    /// let id = UserId::new("3fa85f64-5717-4562-b3fc-2c963f66afa6").expect("valid id");
    /// assert_eq!(id.as_ref(), "3fa85f64-5717-4562-b3fc-2c963f66afa6");
    /// assert!(UserId::new("nope").is_err());
    /// ```
    pub fn new(id: impl AsRef<str>) -> Result<Self, UserValidationError> {
        Self::from_owned(id.as_ref().to_owned())
    }

    /// Wrap a UUID that is already known to be valid (e.g. a database key).
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid, uuid.to_string())
    }

    /// Generate a new random [`UserId`].
    pub fn random() -> Self {
        Self::from_uuid(Uuid::new_v4())
    }

    fn from_owned(id: String) -> Result<Self, UserValidationError> {
        if id.is_empty() {
            return Err(UserValidationError::EmptyId);
        }
        if id.trim() != id {
            return Err(UserValidationError::InvalidId);
        }

        let parsed = Uuid::parse_str(&id).map_err(|_| UserValidationError::InvalidId)?;
        Ok(Self(parsed, id))
    }

    /// Access the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl AsRef<str> for UserId {
    fn as_ref(&self) -> &str {
        self.1.as_str()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<UserId> for String {
    fn from(value: UserId) -> Self {
        let UserId(_, raw) = value;
        raw
    }
}

impl TryFrom<String> for UserId {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_owned(value)
    }
}

/// Minimum allowed length for a display name.
pub const DISPLAY_NAME_MIN: usize = 3;
/// Maximum allowed length for a display name.
pub const DISPLAY_NAME_MAX: usize = 32;

/// Human readable display name for the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DisplayName(String);

impl DisplayName {
    /// Validate and construct a [`DisplayName`] from owned input.
    pub fn new(display_name: impl Into<String>) -> Result<Self, UserValidationError> {
        Self::from_owned(display_name.into())
    }

    fn from_owned(display_name: String) -> Result<Self, UserValidationError> {
        if display_name.trim().is_empty() {
            return Err(UserValidationError::EmptyDisplayName);
        }

        let length = display_name.chars().count();
        if length < DISPLAY_NAME_MIN {
            return Err(UserValidationError::DisplayNameTooShort {
                min: DISPLAY_NAME_MIN,
            });
        }
        if length > DISPLAY_NAME_MAX {
            return Err(UserValidationError::DisplayNameTooLong {
                max: DISPLAY_NAME_MAX,
            });
        }

        let allowed = |c: char| c.is_ascii_alphanumeric() || c == '_' || c == ' ';
        if !display_name.chars().all(allowed) {
            return Err(UserValidationError::DisplayNameInvalidCharacters);
        }

        Ok(Self(display_name))
    }
}

impl AsRef<str> for DisplayName {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for DisplayName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<DisplayName> for String {
    fn from(value: DisplayName) -> Self {
        value.0
    }
}

impl TryFrom<String> for DisplayName {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_owned(value)
    }
}

/// Inbound and outbound edge counts cached on the user record.
///
/// Counts are unsigned, so the domain cannot represent a negative value; the
/// persistence layer clamps at zero when applying decrements.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FollowCounts {
    /// Number of users following this user.
    pub followers: u32,
    /// Number of users this user follows.
    pub following: u32,
}

/// Application user as seen by the follow graph.
///
/// ## Invariants
/// - `id` is a valid UUID.
/// - `display_name` satisfies [`DisplayName`] validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    id: UserId,
    display_name: DisplayName,
    counts: FollowCounts,
}

impl User {
    /// Build a user with zeroed counters.
    pub fn new(id: UserId, display_name: DisplayName) -> Self {
        Self::with_counts(id, display_name, FollowCounts::default())
    }

    /// Build a user with explicit counters, as loaded from storage.
    pub fn with_counts(id: UserId, display_name: DisplayName, counts: FollowCounts) -> Self {
        Self {
            id,
            display_name,
            counts,
        }
    }

    /// Fallible constructor from raw strings.
    ///
    /// # Examples
    /// ```
    /// use inkpost::domain::User;
    ///
    /// let user = User::try_from_strings("3fa85f64-5717-4562-b3fc-2c963f66afa6", "Ada Lovelace")
    ///     .expect("valid user");
    /// assert_eq!(user.follower_count(), 0);
    /// ```
    pub fn try_from_strings(
        id: impl AsRef<str>,
        display_name: impl Into<String>,
    ) -> Result<Self, UserValidationError> {
        let id = UserId::new(id)?;
        let display_name = DisplayName::new(display_name)?;
        Ok(Self::new(id, display_name))
    }

    /// Stable user identifier.
    pub fn id(&self) -> &UserId {
        &self.id
    }

    /// Display name shown to other users.
    pub fn display_name(&self) -> &DisplayName {
        &self.display_name
    }

    /// Cached follower/following counters.
    pub fn counts(&self) -> FollowCounts {
        self.counts
    }

    /// Number of users following this user.
    pub fn follower_count(&self) -> u32 {
        self.counts.followers
    }

    /// Number of users this user follows.
    pub fn following_count(&self) -> u32 {
        self.counts.following
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("", UserValidationError::EmptyId)]
    #[case("not-a-uuid", UserValidationError::InvalidId)]
    #[case(" 3fa85f64-5717-4562-b3fc-2c963f66afa6", UserValidationError::InvalidId)]
    fn user_id_rejects_invalid_input(#[case] raw: &str, #[case] expected: UserValidationError) {
        assert_eq!(UserId::new(raw), Err(expected));
    }

    #[rstest]
    fn user_id_preserves_input_form() {
        let raw = "3FA85F64-5717-4562-B3FC-2C963F66AFA6";
        let id = UserId::new(raw).expect("uppercase UUIDs parse");
        assert_eq!(id.to_string(), raw);
    }

    #[rstest]
    fn user_id_equality_ignores_case() {
        let lower = UserId::new("3fa85f64-5717-4562-b3fc-2c963f66afa6").expect("valid id");
        let upper = UserId::new("3FA85F64-5717-4562-B3FC-2C963F66AFA6").expect("valid id");
        assert_eq!(lower, upper);
    }

    #[rstest]
    #[case("  ", UserValidationError::EmptyDisplayName)]
    #[case("Al", UserValidationError::DisplayNameTooShort { min: DISPLAY_NAME_MIN })]
    #[case(
        "a_display_name_that_is_far_too_long",
        UserValidationError::DisplayNameTooLong { max: DISPLAY_NAME_MAX }
    )]
    #[case("Ada!", UserValidationError::DisplayNameInvalidCharacters)]
    fn display_name_rejects_invalid_input(
        #[case] raw: &str,
        #[case] expected: UserValidationError,
    ) {
        assert_eq!(DisplayName::new(raw), Err(expected));
    }

    #[rstest]
    fn with_counts_exposes_both_counters() {
        let user = User::with_counts(
            UserId::random(),
            DisplayName::new("Grace Hopper").expect("valid name"),
            FollowCounts {
                followers: 10,
                following: 3,
            },
        );
        assert_eq!(user.follower_count(), 10);
        assert_eq!(user.following_count(), 3);
    }

    #[rstest]
    fn user_id_serialises_as_plain_string() {
        let id = UserId::new("3fa85f64-5717-4562-b3fc-2c963f66afa6").expect("valid id");
        let json = serde_json::to_string(&id).expect("serialise");
        assert_eq!(json, "\"3fa85f64-5717-4562-b3fc-2c963f66afa6\"");
    }
}
