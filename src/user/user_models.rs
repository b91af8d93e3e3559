use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "text")]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Student,
    Admin,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Student => "student",
            UserRole::Admin => "admin",
        }
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Academic programs. `code` is the stored and wire value, `name` the
/// display abbreviation; they differ only for BSHS, which is recorded as
/// "BHumServ".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "text")]
#[serde(rename_all = "UPPERCASE")]
pub enum Program {
    Bsed,
    Bsba,
    Bsit,
    Bscrim,
    Bped,
    Beed,
    #[serde(rename = "BHumServ")]
    Bshs,
}

impl Program {
    pub const ALL: [Program; 7] = [
        Program::Bsed,
        Program::Bsba,
        Program::Bsit,
        Program::Bscrim,
        Program::Bped,
        Program::Beed,
        Program::Bshs,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            Program::Bsed => "BSED",
            Program::Bsba => "BSBA",
            Program::Bsit => "BSIT",
            Program::Bscrim => "BSCRIM",
            Program::Bped => "BPED",
            Program::Beed => "BEED",
            Program::Bshs => "BHumServ",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Program::Bsed => "BSED",
            Program::Bsba => "BSBA",
            Program::Bsit => "BSIT",
            Program::Bscrim => "BSCRIM",
            Program::Bped => "BPED",
            Program::Beed => "BEED",
            Program::Bshs => "BSHS",
        }
    }

    pub fn parse(code: &str) -> Option<Program> {
        Program::ALL.iter().copied().find(|p| p.code() == code)
    }
}

impl std::fmt::Display for Program {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "text")]
#[serde(rename_all = "snake_case")]
pub enum FingerprintStatus {
    NotEnrolled,
    Pending,
    Enrolled,
    Failed,
}

impl FingerprintStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            FingerprintStatus::NotEnrolled => "not_enrolled",
            FingerprintStatus::Pending => "pending",
            FingerprintStatus::Enrolled => "enrolled",
            FingerprintStatus::Failed => "failed",
        }
    }
}

impl std::fmt::Display for FingerprintStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct User {
    pub id: Uuid,
    pub student_id_no: Option<String>,
    pub first_name: String,
    pub last_name: String,
    pub middle_initial: Option<String>,
    pub program: String,
    pub role: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub fingerprint_status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UserResponse {
    pub id: Uuid,
    pub student_id_no: Option<String>,
    pub first_name: String,
    pub last_name: String,
    pub middle_initial: Option<String>,
    pub program: String,
    pub role: String,
    pub email: String,
    pub fingerprint_status: String,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            student_id_no: user.student_id_no,
            first_name: user.first_name,
            last_name: user.last_name,
            middle_initial: user.middle_initial,
            program: user.program,
            role: user.role,
            email: user.email,
            fingerprint_status: user.fingerprint_status,
            created_at: user.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_role_display() {
        assert_eq!(UserRole::Student.to_string(), "student");
        assert_eq!(UserRole::Admin.to_string(), "admin");
    }

    #[test]
    fn test_program_codes() {
        assert_eq!(Program::Bsit.code(), "BSIT");
        assert_eq!(Program::Bsit.name(), "BSIT");
        // The human-services program is the one place code and name diverge.
        assert_eq!(Program::Bshs.code(), "BHumServ");
        assert_eq!(Program::Bshs.name(), "BSHS");
    }

    #[test]
    fn test_program_parse() {
        assert_eq!(Program::parse("BSCRIM"), Some(Program::Bscrim));
        assert_eq!(Program::parse("BHumServ"), Some(Program::Bshs));
        assert_eq!(Program::parse("BSHS"), None);
        assert_eq!(Program::parse("bsit"), None);
    }

    #[test]
    fn test_fingerprint_status_display() {
        assert_eq!(FingerprintStatus::NotEnrolled.to_string(), "not_enrolled");
        assert_eq!(FingerprintStatus::Pending.to_string(), "pending");
        assert_eq!(FingerprintStatus::Enrolled.to_string(), "enrolled");
        assert_eq!(FingerprintStatus::Failed.to_string(), "failed");
    }
}
