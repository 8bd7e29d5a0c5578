use serde::{Deserialize, Serialize};

use crate::models::{Role, Teacher};

// -- Auth --

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub teacher: Teacher,
    pub token: String,
}

// -- Praise --

fn default_anonymous() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreatePraiseRequest {
    pub teacher_id: String,
    pub message: String,
    #[serde(default = "default_anonymous")]
    pub is_anonymous: bool,
    #[serde(default)]
    pub user_name: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreatePraiseResponse {
    pub success: bool,
    pub message: String,
    pub praise_id: String,
}

// -- Admin --

#[derive(Debug, Serialize, Deserialize)]
pub struct AdminStats {
    pub total_teachers: i64,
    pub total_praises: i64,
    pub praises_last_week: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateTeacherRequest {
    pub username: String,
    pub full_name: String,
    pub subject: String,
    pub password: String,
    #[serde(default)]
    pub role: Role,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateTeacherRequest {
    pub full_name: Option<String>,
    pub subject: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PageQuery {
    #[serde(default = "default_limit")]
    pub limit: u32,
    #[serde(default)]
    pub offset: u32,
}

fn default_limit() -> u32 {
    100
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SuccessResponse {
    pub success: bool,
    pub message: String,
}
