use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::Serialize;

use murmur_domain::id::{MicropostId, UserId};

/// Maximum user name length in characters.
pub const NAME_MAX_LEN: usize = 50;

/// Inclusive password length bounds in characters.
pub const PASSWORD_MIN_LEN: usize = 6;
pub const PASSWORD_MAX_LEN: usize = 40;

/// Maximum micropost length in characters, measured after trimming.
pub const CONTENT_MAX_LEN: usize = 140;

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9_+.\-]+@[A-Za-z0-9.\-]+\.[A-Za-z]+$").expect("email regex compiles")
});

/// Salted password digest. Both halves exist together or not at all.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordDigest {
    pub salt: String,
    pub encrypted_password: String,
}

/// Account record.
#[derive(Debug, Clone)]
pub struct User {
    pub id: UserId,
    pub name: String,
    /// Always lower-case.
    pub email: String,
    /// `None` until a password has been set.
    pub password: Option<PasswordDigest>,
    pub admin: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn salt(&self) -> Option<&str> {
        self.password.as_ref().map(|p| p.salt.as_str())
    }
}

/// A short text post.
#[derive(Debug, Clone)]
pub struct Micropost {
    pub id: MicropostId,
    pub user_id: UserId,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Follower/following totals shown on a profile.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FollowCounts {
    pub following: u64,
    pub followers: u64,
}

// ── Remember credential ──────────────────────────────────────────────────────

/// Non-password credential `(user id, current salt)` kept by a returning client.
///
/// Wire form is `{user_id}:{salt}`. It stops matching as soon as the user's salt rotates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RememberToken {
    pub user_id: UserId,
    pub salt: String,
}

impl RememberToken {
    /// Token for the user's current salt, or `None` if no password was ever set.
    pub fn for_user(user: &User) -> Option<Self> {
        user.salt().map(|salt| Self {
            user_id: user.id,
            salt: salt.to_owned(),
        })
    }
}

impl fmt::Display for RememberToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.user_id, self.salt)
    }
}

#[derive(Debug, thiserror::Error)]
#[error("malformed remember token")]
pub struct MalformedRememberToken;

impl FromStr for RememberToken {
    type Err = MalformedRememberToken;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (id, salt) = s.split_once(':').ok_or(MalformedRememberToken)?;
        if salt.is_empty() {
            return Err(MalformedRememberToken);
        }
        let user_id = id.parse().map_err(|_| MalformedRememberToken)?;
        Ok(Self {
            user_id,
            salt: salt.to_owned(),
        })
    }
}

// ── Validation ───────────────────────────────────────────────────────────────

/// A violated field constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum Rule {
    Presence,
    TooShort { min: usize },
    TooLong { max: usize },
    Format,
    Taken,
    Confirmation,
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Presence => f.write_str("can't be blank"),
            Self::TooShort { min } => write!(f, "is too short (minimum is {min} characters)"),
            Self::TooLong { max } => write!(f, "is too long (maximum is {max} characters)"),
            Self::Format => f.write_str("is invalid"),
            Self::Taken => f.write_str("has already been taken"),
            Self::Confirmation => f.write_str("doesn't match confirmation"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    #[serde(flatten)]
    pub rule: Rule,
}

/// Every violated rule for one input, collected rather than fail-fast.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, thiserror::Error)]
#[serde(transparent)]
#[error("validation failed")]
pub struct ValidationErrors(Vec<FieldError>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn single(field: &'static str, rule: Rule) -> Self {
        let mut errors = Self::new();
        errors.add(field, rule);
        errors
    }

    pub fn add(&mut self, field: &'static str, rule: Rule) {
        self.0.push(FieldError { field, rule });
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn has(&self, field: &str, rule: Rule) -> bool {
        self.0.iter().any(|e| e.field == field && e.rule == rule)
    }

    pub fn errors(&self) -> &[FieldError] {
        &self.0
    }

    /// `Ok(())` when nothing was collected.
    pub fn into_result(self) -> Result<(), Self> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

/// Lower-case and trim an email so lookups and the unique index are case-insensitive.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

pub fn validate_name(name: &str, errors: &mut ValidationErrors) {
    if name.trim().is_empty() {
        errors.add("name", Rule::Presence);
    }
    if name.chars().count() > NAME_MAX_LEN {
        errors.add("name", Rule::TooLong { max: NAME_MAX_LEN });
    }
}

/// Presence and format only; uniqueness needs the store.
pub fn validate_email(email: &str, errors: &mut ValidationErrors) {
    if email.trim().is_empty() {
        errors.add("email", Rule::Presence);
    }
    if !EMAIL_RE.is_match(email.trim()) {
        errors.add("email", Rule::Format);
    }
}

pub fn validate_password(password: &str, confirmation: &str, errors: &mut ValidationErrors) {
    if password.trim().is_empty() {
        errors.add("password", Rule::Presence);
    }
    let len = password.chars().count();
    if len < PASSWORD_MIN_LEN {
        errors.add("password", Rule::TooShort {
            min: PASSWORD_MIN_LEN,
        });
    }
    if len > PASSWORD_MAX_LEN {
        errors.add("password", Rule::TooLong {
            max: PASSWORD_MAX_LEN,
        });
    }
    if password != confirmation {
        errors.add("password", Rule::Confirmation);
    }
}

/// Trim and bound micropost content. Returns the trimmed text.
pub fn validate_content(content: &str) -> Result<String, ValidationErrors> {
    let trimmed = content.trim();
    if trimmed.is_empty() {
        return Err(ValidationErrors::single("content", Rule::Presence));
    }
    if trimmed.chars().count() > CONTENT_MAX_LEN {
        return Err(ValidationErrors::single("content", Rule::TooLong {
            max: CONTENT_MAX_LEN,
        }));
    }
    Ok(trimmed.to_owned())
}
