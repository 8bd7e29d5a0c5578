//! Database row types, mapped 1:1 from SQLite rows.
//! Conversion into the wire models in praise-types happens here so that
//! timestamp parsing lives next to the format it was written in.

use chrono::{DateTime, SecondsFormat, Utc};
use tracing::warn;

use praise_types::models::{PraiseMessage, PraiseMessageDetail, Role, Teacher};

pub struct TeacherRow {
    pub id: String,
    pub username: String,
    pub full_name: String,
    pub subject: String,
    pub password_hash: String,
    pub role: Role,
}

impl TeacherRow {
    pub fn to_public(&self) -> Teacher {
        Teacher {
            id: self.id.clone(),
            username: self.username.clone(),
            full_name: self.full_name.clone(),
            subject: self.subject.clone(),
            role: self.role,
        }
    }
}

pub struct PraiseRow {
    pub id: String,
    pub teacher_id: String,
    pub message: String,
    pub is_anonymous: bool,
    pub user_name: Option<String>,
    pub created_at: String,
}

impl PraiseRow {
    pub fn into_model(self) -> PraiseMessage {
        let created_at = parse_timestamp(&self.created_at, &self.id);
        PraiseMessage {
            id: self.id,
            teacher_id: self.teacher_id,
            message: self.message,
            is_anonymous: self.is_anonymous,
            user_name: self.user_name,
            created_at,
        }
    }
}

pub struct PraiseDetailRow {
    pub praise: PraiseRow,
    pub teacher_full_name: String,
    pub teacher_subject: String,
}

impl PraiseDetailRow {
    pub fn into_model(self) -> PraiseMessageDetail {
        let PraiseMessage { id, teacher_id, message, is_anonymous, user_name, created_at } =
            self.praise.into_model();
        PraiseMessageDetail {
            id,
            teacher_id,
            message,
            is_anonymous,
            user_name,
            created_at,
            teacher_full_name: self.teacher_full_name,
            teacher_subject: self.teacher_subject,
        }
    }
}

/// Row counts for the admin dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatsRow {
    pub total_teachers: i64,
    pub total_praises: i64,
    pub praises_since: i64,
}

/// Seed account with its password already hashed.
pub struct SeedTeacher {
    pub username: String,
    pub full_name: String,
    pub subject: String,
    pub password_hash: String,
    pub role: Role,
}

/// Fixed-width UTC format so that text ordering in SQLite matches time ordering.
pub fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn parse_timestamp(raw: &str, row_id: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .or_else(|_| {
            // Rows written by hand through sqlite3 use datetime('now').
            chrono::NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S").map(|ndt| ndt.and_utc())
        })
        .unwrap_or_else(|e| {
            warn!("Corrupt created_at '{}' on praise '{}': {}", raw, row_id, e);
            DateTime::default()
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn timestamp_format_is_fixed_width() {
        let a = Utc.with_ymd_and_hms(2024, 9, 1, 8, 0, 0).unwrap();
        let b = a + chrono::Duration::microseconds(1);
        let (fa, fb) = (format_timestamp(a), format_timestamp(b));
        assert_eq!(fa.len(), fb.len());
        assert!(fa < fb);
        assert_eq!(parse_timestamp(&fb, "x"), b);
    }

    #[test]
    fn sqlite_default_timestamp_is_accepted() {
        let parsed = parse_timestamp("2024-09-01 08:00:00", "x");
        assert_eq!(parsed, Utc.with_ymd_and_hms(2024, 9, 1, 8, 0, 0).unwrap());
    }
}
