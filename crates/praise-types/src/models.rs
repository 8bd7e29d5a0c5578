use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Account role. Only admins may use the `/admin/*` surface.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    Teacher,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Teacher => "teacher",
            Self::Admin => "admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "teacher" => Ok(Self::Teacher),
            "admin" => Ok(Self::Admin),
            other => Err(format!("unknown role '{}'", other)),
        }
    }
}

/// Public view of a teacher account. The password hash never leaves the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Teacher {
    pub id: String,
    pub username: String,
    pub full_name: String,
    pub subject: String,
    pub role: Role,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PraiseMessage {
    pub id: String,
    pub teacher_id: String,
    pub message: String,
    pub is_anonymous: bool,
    pub user_name: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Praise message joined with its recipient, as listed to admins.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PraiseMessageDetail {
    pub id: String,
    pub teacher_id: String,
    pub message: String,
    pub is_anonymous: bool,
    pub user_name: Option<String>,
    pub created_at: DateTime<Utc>,
    pub teacher_full_name: String,
    pub teacher_subject: String,
}
