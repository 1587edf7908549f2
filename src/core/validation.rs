//! Request validation
//!
//! Every handler runs its payload through one of the `validate_*` functions
//! before touching a store. Validation happens in two passes: first field
//! presence (absent, `null` and `""` all count as missing), then field shape
//! on the trimmed values. The output is a normalized input struct ready to be
//! persisted or looked up.

use serde::Serialize;

use crate::core::auth::password::MAX_PASSWORD_BYTES;
use crate::core::auth::service::{LoginRequest, SignupRequest};
use crate::core::notes::NoteRequest;

pub const MIN_USERNAME_LENGTH: usize = 3;
pub const MAX_USERNAME_LENGTH: usize = 20;
pub const MIN_PASSWORD_LENGTH: usize = 6;
pub const MAX_TITLE_LENGTH: usize = 100;
/// Matches `users.email VARCHAR(255)`
pub const MAX_EMAIL_LENGTH: usize = 255;

pub const SIGNUP_FIELDS_REQUIRED: &str = "All fields are required";
pub const LOGIN_FIELDS_REQUIRED: &str = "Username and password are required";
pub const NOTE_FIELDS_REQUIRED: &str = "Title and content are required";

/// A single invalid field
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Validation failure
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// One or more required fields were not supplied
    #[error("{message}: {}", .fields.join(", "))]
    MissingFields {
        message: &'static str,
        fields: Vec<&'static str>,
    },

    /// Fields were supplied but are malformed
    #[error("Validation Error: {}", format_field_errors(.0))]
    Invalid(Vec<FieldError>),
}

fn format_field_errors(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| format!("{}: {}", e.field, e.message))
        .collect::<Vec<_>>()
        .join("; ")
}

/// Accumulates presence and shape problems for one payload
#[derive(Debug, Default)]
pub struct ValidationResult {
    /// Fields that were absent or empty
    pub missing: Vec<&'static str>,
    /// Fields that were present but malformed
    pub errors: Vec<FieldError>,
}

impl ValidationResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_valid(&self) -> bool {
        self.missing.is_empty() && self.errors.is_empty()
    }

    /// Record `field` as missing if `value` is absent or empty.
    ///
    /// Returns the value, or `""` when missing.
    pub fn require<'a>(&mut self, field: &'static str, value: Option<&'a str>) -> &'a str {
        match value {
            Some(v) if !v.is_empty() => v,
            _ => {
                self.missing.push(field);
                ""
            }
        }
    }

    pub fn add_error(&mut self, field: &'static str, message: impl Into<String>) {
        self.errors.push(FieldError::new(field, message));
    }

    /// Fail with `MissingFields` if any required field was absent
    pub fn ensure_present(&mut self, message: &'static str) -> Result<(), ValidationError> {
        if self.missing.is_empty() {
            Ok(())
        } else {
            Err(ValidationError::MissingFields {
                message,
                fields: std::mem::take(&mut self.missing),
            })
        }
    }

    /// Convert to Result, failing with every recorded field error
    pub fn into_result(self) -> Result<(), ValidationError> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(ValidationError::Invalid(self.errors))
        }
    }
}

// ============================================================================
// Normalized inputs
// ============================================================================

/// Signup payload after validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignupInput {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// Login payload after validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginInput {
    pub username: String,
    pub password: String,
}

/// Note payload after validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteInput {
    pub title: String,
    pub content: String,
}

// ============================================================================
// Validators
// ============================================================================

pub fn validate_signup(request: &SignupRequest) -> Result<SignupInput, ValidationError> {
    let mut result = ValidationResult::new();

    let username = result.require("username", request.username.as_deref());
    let password = result.require("password", request.password.as_deref());
    let email = result.require("email", request.email.as_deref());
    result.ensure_present(SIGNUP_FIELDS_REQUIRED)?;

    let username = username.trim();
    check_username(&mut result, username);
    check_password(&mut result, password);

    let email = email.trim().to_lowercase();
    if email.chars().count() > MAX_EMAIL_LENGTH {
        result.add_error(
            "email",
            format!("Email must be at most {} characters", MAX_EMAIL_LENGTH),
        );
    } else if !is_valid_email(&email) {
        result.add_error("email", "Please enter a valid email");
    }

    result.into_result()?;

    Ok(SignupInput {
        username: username.to_string(),
        email,
        password: password.to_string(),
    })
}

/// Login only checks presence; a username that could never exist simply is not found.
pub fn validate_login(request: &LoginRequest) -> Result<LoginInput, ValidationError> {
    let mut result = ValidationResult::new();

    let username = result.require("username", request.username.as_deref());
    let password = result.require("password", request.password.as_deref());
    result.ensure_present(LOGIN_FIELDS_REQUIRED)?;

    check_no_nul(&mut result, "username", "Username", username);
    check_no_nul(&mut result, "password", "Password", password);
    result.into_result()?;

    Ok(LoginInput {
        username: username.trim().to_string(),
        password: password.to_string(),
    })
}

pub fn validate_note(request: &NoteRequest) -> Result<NoteInput, ValidationError> {
    let mut result = ValidationResult::new();

    let title = result.require("title", request.title.as_deref());
    let content = result.require("content", request.content.as_deref());
    result.ensure_present(NOTE_FIELDS_REQUIRED)?;

    let title = title.trim();
    check_no_nul(&mut result, "title", "Title", title);
    if title.is_empty() {
        result.add_error("title", "Title is required");
    } else if title.chars().count() > MAX_TITLE_LENGTH {
        result.add_error(
            "title",
            format!("Title must be at most {} characters", MAX_TITLE_LENGTH),
        );
    }

    let content = content.trim();
    check_no_nul(&mut result, "content", "Content", content);
    if content.is_empty() {
        result.add_error("content", "Content is required");
    }

    result.into_result()?;

    Ok(NoteInput {
        title: title.to_string(),
        content: content.to_string(),
    })
}

/// Postgres text columns cannot store U+0000
fn check_no_nul(result: &mut ValidationResult, field: &'static str, label: &str, value: &str) {
    if value.contains('\0') {
        result.add_error(field, format!("{} must not contain null characters", label));
    }
}

fn check_username(result: &mut ValidationResult, username: &str) {
    check_no_nul(result, "username", "Username", username);
    let len = username.chars().count();
    if len < MIN_USERNAME_LENGTH {
        result.add_error(
            "username",
            format!("Username must be at least {} characters", MIN_USERNAME_LENGTH),
        );
    } else if len > MAX_USERNAME_LENGTH {
        result.add_error(
            "username",
            format!("Username must be at most {} characters", MAX_USERNAME_LENGTH),
        );
    }
}

fn check_password(result: &mut ValidationResult, password: &str) {
    check_no_nul(result, "password", "Password", password);
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        result.add_error(
            "password",
            format!("Password must be at least {} characters", MIN_PASSWORD_LENGTH),
        );
    } else if password.len() > MAX_PASSWORD_BYTES {
        result.add_error(
            "password",
            format!("Password must be at most {} bytes", MAX_PASSWORD_BYTES),
        );
    }
}

/// Check an (already trimmed and lowercased) email address.
///
/// Local part and domain are runs of word characters joined by single `.` or
/// `-`; the domain needs at least one dot and a final label of 2+ characters.
pub fn is_valid_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };

    if !is_joined_word_runs(local) || !is_joined_word_runs(domain) {
        return false;
    }

    match domain.rsplit_once('.') {
        Some((_, tld)) => tld.chars().count() >= 2,
        None => false,
    }
}

fn is_joined_word_runs(s: &str) -> bool {
    !s.is_empty()
        && s.split(['.', '-'])
            .all(|part| !part.is_empty() && part.chars().all(is_word_char))
}

fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signup(username: Option<&str>, password: Option<&str>, email: Option<&str>) -> SignupRequest {
        SignupRequest {
            username: username.map(str::to_string),
            password: password.map(str::to_string),
            email: email.map(str::to_string),
        }
    }

    fn note(title: Option<&str>, content: Option<&str>) -> NoteRequest {
        NoteRequest {
            title: title.map(str::to_string),
            content: content.map(str::to_string),
        }
    }

    // ===== ValidationResult Tests =====

    #[test]
    fn test_require_records_missing() {
        let mut result = ValidationResult::new();

        assert_eq!(result.require("a", Some("x")), "x");
        assert_eq!(result.require("b", Some("")), "");
        assert_eq!(result.require("c", None), "");

        assert!(!result.is_valid());
        assert_eq!(result.missing, vec!["b", "c"]);
    }

    #[test]
    fn test_ensure_present_passes_when_nothing_missing() {
        let mut result = ValidationResult::new();
        result.require("a", Some("x"));

        assert!(result.ensure_present("required").is_ok());
        assert!(result.is_valid());
    }

    #[test]
    fn test_into_result_collects_all_errors() {
        let mut result = ValidationResult::new();
        result.add_error("a", "bad a");
        result.add_error("b", "bad b");

        match result.into_result() {
            Err(ValidationError::Invalid(errors)) => {
                assert_eq!(errors.len(), 2);
                assert_eq!(errors[0], FieldError::new("a", "bad a"));
            }
            other => panic!("expected Invalid, got {:?}", other),
        }
    }

    #[test]
    fn test_validation_error_display() {
        let err = ValidationError::MissingFields {
            message: SIGNUP_FIELDS_REQUIRED,
            fields: vec!["username", "email"],
        };
        assert_eq!(err.to_string(), "All fields are required: username, email");

        let err = ValidationError::Invalid(vec![FieldError::new("title", "Title is required")]);
        assert_eq!(err.to_string(), "Validation Error: title: Title is required");
    }

    // ===== Signup Tests =====

    #[test]
    fn test_signup_valid_is_normalized() {
        let input = validate_signup(&signup(
            Some("  alice "),
            Some("secret1"),
            Some("  Alice@Example.COM "),
        ))
        .unwrap();

        assert_eq!(input.username, "alice");
        assert_eq!(input.email, "alice@example.com");
        assert_eq!(input.password, "secret1");
    }

    #[test]
    fn test_signup_password_is_not_trimmed() {
        let input = validate_signup(&signup(Some("alice"), Some(" secret1 "), Some("a@x.com"))).unwrap();
        assert_eq!(input.password, " secret1 ");
    }

    #[test]
    fn test_signup_missing_fields_listed_in_order() {
        let err = validate_signup(&signup(None, Some("secret1"), Some(""))).unwrap_err();

        assert_eq!(
            err,
            ValidationError::MissingFields {
                message: SIGNUP_FIELDS_REQUIRED,
                fields: vec!["username", "email"],
            }
        );
    }

    #[test]
    fn test_signup_all_missing() {
        let err = validate_signup(&signup(None, None, None)).unwrap_err();

        match err {
            ValidationError::MissingFields { fields, .. } => {
                assert_eq!(fields, vec!["username", "password", "email"]);
            }
            other => panic!("expected MissingFields, got {:?}", other),
        }
    }

    #[test]
    fn test_signup_username_length() {
        let short = validate_signup(&signup(Some("al"), Some("secret1"), Some("a@x.com")));
        let long = validate_signup(&signup(
            Some("abcdefghijklmnopqrstu"),
            Some("secret1"),
            Some("a@x.com"),
        ));
        let max = validate_signup(&signup(
            Some("abcdefghijklmnopqrst"),
            Some("secret1"),
            Some("a@x.com"),
        ));

        assert!(matches!(short, Err(ValidationError::Invalid(ref e)) if e[0].field == "username"));
        assert!(matches!(long, Err(ValidationError::Invalid(ref e)) if e[0].field == "username"));
        assert!(max.is_ok());
    }

    #[test]
    fn test_signup_whitespace_username_is_invalid_not_missing() {
        let err = validate_signup(&signup(Some("   "), Some("secret1"), Some("a@x.com"))).unwrap_err();
        assert!(matches!(err, ValidationError::Invalid(_)));
    }

    #[test]
    fn test_signup_password_bounds() {
        let short = validate_signup(&signup(Some("alice"), Some("12345"), Some("a@x.com")));
        assert!(matches!(short, Err(ValidationError::Invalid(ref e)) if e[0].field == "password"));

        let too_long = "x".repeat(MAX_PASSWORD_BYTES + 1);
        let long = validate_signup(&signup(Some("alice"), Some(&too_long), Some("a@x.com")));
        assert!(matches!(long, Err(ValidationError::Invalid(ref e)) if e[0].field == "password"));
    }

    #[test]
    fn test_signup_reports_every_invalid_field() {
        let err = validate_signup(&signup(Some("al"), Some("123"), Some("nope"))).unwrap_err();

        match err {
            ValidationError::Invalid(errors) => {
                let fields: Vec<_> = errors.iter().map(|e| e.field).collect();
                assert_eq!(fields, vec!["username", "password", "email"]);
            }
            other => panic!("expected Invalid, got {:?}", other),
        }
    }

    #[test]
    fn test_signup_email_length() {
        // 64 + 1 + 186 + 4 = 255
        let domain = format!("{}.com", "d".repeat(186));
        let max = format!("{}@{}", "u".repeat(64), domain);
        assert_eq!(max.len(), MAX_EMAIL_LENGTH);
        assert!(validate_signup(&signup(Some("alice"), Some("secret1"), Some(&max))).is_ok());

        let over = format!("{}@{}", "u".repeat(65), domain);
        match validate_signup(&signup(Some("alice"), Some("secret1"), Some(&over))) {
            Err(ValidationError::Invalid(errors)) => {
                assert_eq!(errors.len(), 1);
                assert_eq!(errors[0].field, "email");
                assert_eq!(errors[0].message, "Email must be at most 255 characters");
            }
            other => panic!("expected Invalid, got {:?}", other),
        }
    }

    #[test]
    fn test_signup_rejects_nul_characters() {
        let err = validate_signup(&signup(Some("ali\0ce"), Some("secr\0et1"), Some("a\0@x.com")))
            .unwrap_err();

        match err {
            ValidationError::Invalid(errors) => {
                let fields: Vec<_> = errors.iter().map(|e| e.field).collect();
                assert_eq!(fields, vec!["username", "password", "email"]);
                assert_eq!(errors[0].message, "Username must not contain null characters");
            }
            other => panic!("expected Invalid, got {:?}", other),
        }
    }

    // ===== Login Tests =====

    #[test]
    fn test_login_rejects_nul_characters() {
        let err = validate_login(&LoginRequest {
            username: Some("alice\0".to_string()),
            password: Some("secret1".to_string()),
        })
        .unwrap_err();

        assert_eq!(
            err,
            ValidationError::Invalid(vec![FieldError::new(
                "username",
                "Username must not contain null characters"
            )])
        );
    }

    #[test]
    fn test_login_valid() {
        let input = validate_login(&LoginRequest {
            username: Some(" alice ".to_string()),
            password: Some("secret1".to_string()),
        })
        .unwrap();

        assert_eq!(input.username, "alice");
        assert_eq!(input.password, "secret1");
    }

    #[test]
    fn test_login_missing_password() {
        let err = validate_login(&LoginRequest {
            username: Some("alice".to_string()),
            password: None,
        })
        .unwrap_err();

        assert_eq!(
            err,
            ValidationError::MissingFields {
                message: LOGIN_FIELDS_REQUIRED,
                fields: vec!["password"],
            }
        );
    }

    // ===== Note Tests =====

    #[test]
    fn test_note_valid_is_trimmed() {
        let input = validate_note(&note(Some("  T "), Some(" C\n"))).unwrap();

        assert_eq!(input.title, "T");
        assert_eq!(input.content, "C");
    }

    #[test]
    fn test_note_empty_title_or_content_is_missing() {
        let err = validate_note(&note(Some(""), Some("C"))).unwrap_err();
        assert_eq!(
            err,
            ValidationError::MissingFields {
                message: NOTE_FIELDS_REQUIRED,
                fields: vec!["title"],
            }
        );

        let err = validate_note(&note(Some("T"), None)).unwrap_err();
        assert!(matches!(err, ValidationError::MissingFields { ref fields, .. } if fields == &vec!["content"]));
    }

    #[test]
    fn test_note_whitespace_only() {
        let err = validate_note(&note(Some("   "), Some("\t\n"))).unwrap_err();

        match err {
            ValidationError::Invalid(errors) => {
                assert_eq!(errors.len(), 2);
                assert_eq!(errors[0].message, "Title is required");
                assert_eq!(errors[1].message, "Content is required");
            }
            other => panic!("expected Invalid, got {:?}", other),
        }
    }

    #[test]
    fn test_note_title_length() {
        let max = "t".repeat(MAX_TITLE_LENGTH);
        let over = "t".repeat(MAX_TITLE_LENGTH + 1);

        assert!(validate_note(&note(Some(&max), Some("C"))).is_ok());
        assert!(matches!(
            validate_note(&note(Some(&over), Some("C"))),
            Err(ValidationError::Invalid(_))
        ));
    }

    #[test]
    fn test_note_rejects_nul_characters() {
        match validate_note(&note(Some("T\0"), Some("C"))) {
            Err(ValidationError::Invalid(errors)) => {
                assert_eq!(errors.len(), 1);
                assert_eq!(errors[0].field, "title");
                assert_eq!(errors[0].message, "Title must not contain null characters");
            }
            other => panic!("expected Invalid, got {:?}", other),
        }

        match validate_note(&note(Some("T"), Some("body \0 text"))) {
            Err(ValidationError::Invalid(errors)) => {
                assert_eq!(errors.len(), 1);
                assert_eq!(errors[0].field, "content");
            }
            other => panic!("expected Invalid, got {:?}", other),
        }
    }

    // ===== Email Tests =====

    #[test]
    fn test_valid_emails() {
        assert!(is_valid_email("a@x.com"));
        assert!(is_valid_email("first.last@example.co.uk"));
        assert!(is_valid_email("user_name-1@sub-domain.example.io"));
        assert!(is_valid_email("test@example.info"));
    }

    #[test]
    fn test_invalid_emails() {
        assert!(!is_valid_email(""));
        assert!(!is_valid_email("plainaddress"));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email("user@"));
        assert!(!is_valid_email("user@localhost"));
        assert!(!is_valid_email("user@example.c"));
        assert!(!is_valid_email("user..name@example.com"));
        assert!(!is_valid_email("user@@example.com"));
        assert!(!is_valid_email("user name@example.com"));
        assert!(!is_valid_email(".user@example.com"));
        assert!(!is_valid_email("user@example.com."));
    }
}
