use chrono::{Duration, Utc};
use rand::{distributions::Alphanumeric, Rng};
use tracing::warn;

use crate::auth::auth_repository::PasswordResetRepository;
use crate::auth::{create_access_token, hash_password, verify_password};
use crate::error::{AppError, Result};
use crate::mailer::Mailer;
use crate::user::user_models::{Program, User};
use crate::user::user_repository::UserRepository;
use super::auth_dto::RegisterRequest;

const RESET_TOKEN_LEN: usize = 32;
const RESET_TOKEN_TTL_MINUTES: i64 = 15;

#[derive(Clone)]
pub struct AuthService {
    user_repo: UserRepository,
    password_reset_repo: PasswordResetRepository,
    mailer: Mailer,
    jwt_secret: String,
    jwt_expiration_hours: i64,
}

impl AuthService {
    pub fn new(
        user_repo: UserRepository,
        password_reset_repo: PasswordResetRepository,
        mailer: Mailer,
        jwt_secret: String,
        jwt_expiration_hours: i64,
    ) -> Self {
        Self {
            user_repo,
            password_reset_repo,
            mailer,
            jwt_secret,
            jwt_expiration_hours,
        }
    }

    /// Create a student account. The role is always "student"; admins are
    /// provisioned directly in the database.
    pub async fn register(&self, payload: RegisterRequest) -> Result<User> {
        let program = Program::parse(&payload.program)
            .ok_or_else(|| AppError::BadRequest("Invalid program code".to_string()))?;

        if self.user_repo.find_by_email(&payload.email).await?.is_some() {
            return Err(AppError::BadRequest("Email already registered".to_string()));
        }

        if let Some(ref student_id_no) = payload.student_id_no {
            if self
                .user_repo
                .find_by_student_id(student_id_no)
                .await?
                .is_some()
            {
                return Err(AppError::BadRequest(
                    "Student ID already registered".to_string(),
                ));
            }
        }

        let password_hash = hash_password(&payload.password)?;

        self.user_repo
            .create(
                payload.student_id_no.as_deref(),
                &payload.first_name,
                &payload.last_name,
                payload.middle_initial.as_deref(),
                program.code(),
                &payload.email,
                &password_hash,
            )
            .await
            .map_err(|e| {
                // Lost a race with another registration for the same email or
                // student id between the pre-checks and the insert.
                if e.is_unique_violation() {
                    AppError::BadRequest("Email or student ID already registered".to_string())
                } else {
                    e
                }
            })
    }

    pub async fn login(&self, student_id_no: &str, password: &str) -> Result<(User, String)> {
        let user = self
            .user_repo
            .find_by_student_id(student_id_no)
            .await?
            .ok_or_else(|| {
                AppError::Unauthorized("Invalid student ID or password".to_string())
            })?;

        if !verify_password(password, &user.password_hash)? {
            return Err(AppError::Unauthorized(
                "Invalid student ID or password".to_string(),
            ));
        }

        let token = create_access_token(
            user.id,
            &user.role,
            &self.jwt_secret,
            self.jwt_expiration_hours,
        )?;

        Ok((user, token))
    }

    /// Issue a short-lived reset token and mail it to the student. The token
    /// is also returned to the caller, so a broken mail setup does not lock
    /// anyone out.
    pub async fn forgot_password(&self, student_id_no: &str) -> Result<String> {
        let user = self
            .user_repo
            .find_by_student_id(student_id_no)
            .await?
            .ok_or_else(|| AppError::NotFound("Student not found".to_string()))?;

        // Stale tokens pile up otherwise; sweep them on each new request.
        self.password_reset_repo.delete_expired().await?;

        let token = generate_reset_token();
        let expires_at = Utc::now() + Duration::minutes(RESET_TOKEN_TTL_MINUTES);

        self.password_reset_repo
            .create(user.id, &token, expires_at)
            .await?;

        let body = format!(
            "<p>Hi {},</p>\
             <p>Use this token to reset your password: <b>{}</b></p>\
             <p>It expires in {} minutes.</p>",
            user.first_name, token, RESET_TOKEN_TTL_MINUTES
        );

        if let Err(e) = self.mailer.send(&user.email, "Password Reset", &body).await {
            warn!("Password reset email to {} failed: {:?}", user.email, e);
        }

        Ok(token)
    }

    pub async fn reset_password(&self, token: &str, new_password: &str) -> Result<()> {
        let reset = self
            .password_reset_repo
            .find_valid_by_token(token)
            .await?
            .ok_or_else(|| AppError::BadRequest("Invalid or expired token".to_string()))?;

        let password_hash = hash_password(new_password)?;
        self.user_repo
            .update_password(reset.user_id, &password_hash)
            .await?;

        self.password_reset_repo.delete_by_id(reset.id).await?;

        Ok(())
    }
}

fn generate_reset_token() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(RESET_TOKEN_LEN)
        .map(char::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reset_token_shape() {
        let token = generate_reset_token();
        assert_eq!(token.len(), RESET_TOKEN_LEN);
        assert!(token.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn test_reset_tokens_are_unique() {
        assert_ne!(generate_reset_token(), generate_reset_token());
    }
}
