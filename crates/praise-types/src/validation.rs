//! Schema-level checks applied to every mutating payload before it reaches
//! the store. Everything here is pure: no I/O, no clock.

use thiserror::Error;
use uuid::Uuid;

use crate::api::{CreatePraiseRequest, CreateTeacherRequest, UpdateTeacherRequest};
use crate::models::Role;

pub const MESSAGE_MIN: usize = 5;
pub const MESSAGE_MAX: usize = 1000;
pub const USER_NAME_MIN: usize = 2;
pub const USER_NAME_MAX: usize = 100;
pub const USERNAME_MIN: usize = 3;
pub const USERNAME_MAX: usize = 50;
pub const FULL_NAME_MIN: usize = 5;
pub const FULL_NAME_MAX: usize = 100;
pub const SUBJECT_MIN: usize = 2;
pub const SUBJECT_MAX: usize = 100;
pub const PASSWORD_MIN: usize = 6;
pub const PASSWORD_MAX: usize = 128;

/// Characters rejected in praise text so it can be rendered without escaping
/// surprises downstream.
const FORBIDDEN_MESSAGE_CHARS: &[char] = &['<', '>', '{', '}', '[', ']'];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field} must be at least {min} characters")]
    TooShort { field: &'static str, min: usize },

    #[error("{field} must be at most {max} characters")]
    TooLong { field: &'static str, max: usize },

    #[error("{field} contains forbidden characters")]
    InvalidCharacters { field: &'static str },

    #[error("{field} is required")]
    MissingRequiredField { field: &'static str },

    #[error("{field} has an invalid format")]
    InvalidFormat { field: &'static str },
}

/// A praise submission that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPraise {
    pub teacher_id: String,
    pub message: String,
    pub is_anonymous: bool,
    pub user_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTeacher {
    pub username: String,
    pub full_name: String,
    pub subject: String,
    pub password: String,
    pub role: Role,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TeacherUpdate {
    pub full_name: Option<String>,
    pub subject: Option<String>,
    pub password: Option<String>,
}

impl TeacherUpdate {
    pub fn is_empty(&self) -> bool {
        self.full_name.is_none() && self.subject.is_none() && self.password.is_none()
    }
}

pub fn validate_praise(req: CreatePraiseRequest) -> Result<NewPraise, ValidationError> {
    let teacher_id = validate_uuid("teacher_id", &req.teacher_id)?;
    let message = validate_message(&req.message)?;

    // Anonymous submissions never keep a name, whatever the client sent.
    let user_name = if req.is_anonymous {
        None
    } else {
        let name = req
            .user_name
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .ok_or(ValidationError::MissingRequiredField { field: "user_name" })?;
        check_length("user_name", name, USER_NAME_MIN, USER_NAME_MAX)?;
        Some(name.to_string())
    };

    Ok(NewPraise {
        teacher_id,
        message,
        is_anonymous: req.is_anonymous,
        user_name,
    })
}

/// Trim and check praise text.
pub fn validate_message(raw: &str) -> Result<String, ValidationError> {
    let message = raw.trim();
    check_length("message", message, MESSAGE_MIN, MESSAGE_MAX)?;
    if message.contains(FORBIDDEN_MESSAGE_CHARS) {
        return Err(ValidationError::InvalidCharacters { field: "message" });
    }
    Ok(message.to_string())
}

pub fn validate_new_teacher(req: CreateTeacherRequest) -> Result<NewTeacher, ValidationError> {
    Ok(NewTeacher {
        username: validate_username(&req.username)?,
        full_name: validate_full_name(&req.full_name)?,
        subject: validate_subject(&req.subject)?,
        password: validate_password(&req.password)?,
        role: req.role,
    })
}

pub fn validate_teacher_update(req: UpdateTeacherRequest) -> Result<TeacherUpdate, ValidationError> {
    Ok(TeacherUpdate {
        full_name: req.full_name.as_deref().map(validate_full_name).transpose()?,
        subject: req.subject.as_deref().map(validate_subject).transpose()?,
        password: req.password.as_deref().map(validate_password).transpose()?,
    })
}

pub fn validate_username(raw: &str) -> Result<String, ValidationError> {
    let username = raw.trim();
    if username.is_empty() {
        return Err(ValidationError::MissingRequiredField { field: "username" });
    }
    check_length("username", username, USERNAME_MIN, USERNAME_MAX)?;
    if !username
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_')
    {
        return Err(ValidationError::InvalidCharacters { field: "username" });
    }
    Ok(username.to_string())
}

pub fn validate_full_name(raw: &str) -> Result<String, ValidationError> {
    let name = raw.trim();
    check_length("full_name", name, FULL_NAME_MIN, FULL_NAME_MAX)?;
    Ok(name.to_string())
}

pub fn validate_subject(raw: &str) -> Result<String, ValidationError> {
    let subject = raw.trim();
    check_length("subject", subject, SUBJECT_MIN, SUBJECT_MAX)?;
    Ok(subject.to_string())
}

/// Passwords are length-checked but kept byte-for-byte.
pub fn validate_password(raw: &str) -> Result<String, ValidationError> {
    if raw.is_empty() {
        return Err(ValidationError::MissingRequiredField { field: "password" });
    }
    check_length("password", raw, PASSWORD_MIN, PASSWORD_MAX)?;
    Ok(raw.to_string())
}

/// Accepts any RFC 4122 textual form and returns the canonical hyphenated lowercase one.
pub fn validate_uuid(field: &'static str, raw: &str) -> Result<String, ValidationError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(ValidationError::MissingRequiredField { field });
    }
    raw.parse::<Uuid>()
        .map(|id| id.to_string())
        .map_err(|_| ValidationError::InvalidFormat { field })
}

// Lengths are counted in chars: names are frequently Cyrillic.
fn check_length(
    field: &'static str,
    value: &str,
    min: usize,
    max: usize,
) -> Result<(), ValidationError> {
    let len = value.chars().count();
    if len < min {
        return Err(ValidationError::TooShort { field, min });
    }
    if len > max {
        return Err(ValidationError::TooLong { field, max });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEACHER_ID: &str = "6f1c3f5e-8a43-4c55-9d0e-2f6a0b9c1d7e";

    fn praise(message: &str, is_anonymous: bool, user_name: Option<&str>) -> CreatePraiseRequest {
        CreatePraiseRequest {
            teacher_id: TEACHER_ID.into(),
            message: message.into(),
            is_anonymous,
            user_name: user_name.map(Into::into),
        }
    }

    #[test]
    fn anonymous_praise_drops_user_name() {
        let ok = validate_praise(praise("Thank you!", true, Some("Masha"))).unwrap();
        assert!(ok.is_anonymous);
        assert_eq!(ok.user_name, None);
    }

    #[test]
    fn named_praise_requires_user_name() {
        let err = validate_praise(praise("Thank you!", false, None)).unwrap_err();
        assert_eq!(err, ValidationError::MissingRequiredField { field: "user_name" });

        let err = validate_praise(praise("Thank you!", false, Some("   "))).unwrap_err();
        assert_eq!(err, ValidationError::MissingRequiredField { field: "user_name" });

        let ok = validate_praise(praise("Thank you!", false, Some(" Masha "))).unwrap();
        assert_eq!(ok.user_name.as_deref(), Some("Masha"));
    }

    #[test]
    fn user_name_length_is_bounded() {
        let err = validate_praise(praise("Thank you!", false, Some("M"))).unwrap_err();
        assert_eq!(err, ValidationError::TooShort { field: "user_name", min: USER_NAME_MIN });

        let long = "m".repeat(USER_NAME_MAX + 1);
        let err = validate_praise(praise("Thank you!", false, Some(long.as_str()))).unwrap_err();
        assert_eq!(err, ValidationError::TooLong { field: "user_name", max: USER_NAME_MAX });
    }

    #[test]
    fn message_is_trimmed_before_length_check() {
        assert_eq!(validate_message("  Great lesson  ").unwrap(), "Great lesson");
        assert_eq!(
            validate_message("   hi!   ").unwrap_err(),
            ValidationError::TooShort { field: "message", min: MESSAGE_MIN }
        );
        assert_eq!(
            validate_message(&"a".repeat(MESSAGE_MAX + 1)).unwrap_err(),
            ValidationError::TooLong { field: "message", max: MESSAGE_MAX }
        );
        assert!(validate_message(&"a".repeat(MESSAGE_MAX)).is_ok());
    }

    #[test]
    fn message_rejects_markup_characters() {
        for bad in ["<b>thanks</b>", "thanks {x}", "thanks [1]"] {
            assert_eq!(
                validate_message(bad).unwrap_err(),
                ValidationError::InvalidCharacters { field: "message" }
            );
        }
    }

    #[test]
    fn message_length_counts_chars_not_bytes() {
        // 5 Cyrillic letters, 10 bytes.
        assert!(validate_message("Добро").is_ok());
    }

    #[test]
    fn teacher_id_must_be_uuid() {
        let mut req = praise("Thank you!", true, None);
        req.teacher_id = "not-a-uuid".into();
        assert_eq!(
            validate_praise(req).unwrap_err(),
            ValidationError::InvalidFormat { field: "teacher_id" }
        );
    }

    #[test]
    fn uuid_is_canonicalized() {
        let upper = TEACHER_ID.to_uppercase();
        assert_eq!(validate_uuid("id", &upper).unwrap(), TEACHER_ID);
    }

    #[test]
    fn username_charset() {
        assert!(validate_username("Karelina").is_ok());
        assert!(validate_username("gordeev_phys2").is_ok());
        assert_eq!(
            validate_username("bad name").unwrap_err(),
            ValidationError::InvalidCharacters { field: "username" }
        );
        assert_eq!(
            validate_username("ab").unwrap_err(),
            ValidationError::TooShort { field: "username", min: USERNAME_MIN }
        );
        assert_eq!(
            validate_username("").unwrap_err(),
            ValidationError::MissingRequiredField { field: "username" }
        );
    }

    #[test]
    fn new_teacher_defaults_and_bounds() {
        let req = CreateTeacherRequest {
            username: "new_teacher".into(),
            full_name: "  Иванова Анна  ".into(),
            subject: "Химия".into(),
            password: "secret1".into(),
            role: Role::default(),
        };
        let ok = validate_new_teacher(req.clone()).unwrap();
        assert_eq!(ok.full_name, "Иванова Анна");
        assert_eq!(ok.role, Role::Teacher);

        let err = validate_new_teacher(CreateTeacherRequest { subject: "X".into(), ..req.clone() })
            .unwrap_err();
        assert_eq!(err, ValidationError::TooShort { field: "subject", min: SUBJECT_MIN });

        let err = validate_new_teacher(CreateTeacherRequest { password: "12345".into(), ..req })
            .unwrap_err();
        assert_eq!(err, ValidationError::TooShort { field: "password", min: PASSWORD_MIN });
    }

    #[test]
    fn partial_update_only_checks_present_fields() {
        let update = validate_teacher_update(UpdateTeacherRequest {
            subject: Some("Физика".into()),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(update.subject.as_deref(), Some("Физика"));
        assert!(update.full_name.is_none());
        assert!(!update.is_empty());

        let err = validate_teacher_update(UpdateTeacherRequest {
            full_name: Some("Ann".into()),
            ..Default::default()
        })
        .unwrap_err();
        assert_eq!(err, ValidationError::TooShort { field: "full_name", min: FULL_NAME_MIN });
    }
}
