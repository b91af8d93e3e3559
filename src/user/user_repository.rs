use crate::error::Result;
use sqlx::PgPool;
use uuid::Uuid;
use super::user_models::User;

#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    #[allow(clippy::too_many_arguments)]
    pub async fn create(
        &self,
        student_id_no: Option<&str>,
        first_name: &str,
        last_name: &str,
        middle_initial: Option<&str>,
        program: &str,
        email: &str,
        password_hash: &str,
    ) -> Result<User> {
        let user = sqlx::query_as::<_, User>(
            "INSERT INTO users (student_id_no, first_name, last_name, middle_initial, program, email, password_hash)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING *",
        )
        .bind(student_id_no)
        .bind(first_name)
        .bind(last_name)
        .bind(middle_initial)
        .bind(program)
        .bind(email)
        .bind(password_hash)
        .fetch_one(&self.pool)
        .await?;

        Ok(user)
    }

    pub async fn find_by_id(&self, user_id: Uuid) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }

    pub async fn find_by_student_id(&self, student_id_no: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE student_id_no = $1")
            .bind(student_id_no)
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }

    /// Every registered user. The event dispatcher fans notifications out to
    /// all of them.
    pub async fn find_all(&self) -> Result<Vec<User>> {
        let users = sqlx::query_as::<_, User>("SELECT * FROM users ORDER BY created_at")
            .fetch_all(&self.pool)
            .await?;

        Ok(users)
    }

    pub async fn find_students_by_program(&self, program: &str) -> Result<Vec<User>> {
        let users = sqlx::query_as::<_, User>(
            "SELECT * FROM users
             WHERE program = $1 AND role = 'student'
             ORDER BY last_name, first_name",
        )
        .bind(program)
        .fetch_all(&self.pool)
        .await?;

        Ok(users)
    }

    /// Student head counts keyed by program code. Programs with no students
    /// are absent from the result.
    pub async fn count_students_by_program(&self) -> Result<Vec<(String, i64)>> {
        let counts = sqlx::query_as::<_, (String, i64)>(
            "SELECT program, COUNT(*) FROM users
             WHERE role = 'student'
             GROUP BY program",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(counts)
    }

    pub async fn update_password(&self, user_id: Uuid, password_hash: &str) -> Result<()> {
        sqlx::query("UPDATE users SET password_hash = $1, updated_at = NOW() WHERE id = $2")
            .bind(password_hash)
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    pub async fn update_fingerprint_status(
        &self,
        user_id: Uuid,
        status: &str,
    ) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            "UPDATE users SET fingerprint_status = $1, updated_at = NOW()
             WHERE id = $2
             RETURNING *",
        )
        .bind(status)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }
}
