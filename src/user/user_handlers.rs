use axum::{
    extract::{Path, State},
    Json,
};

use crate::{
    error::{AppError, Result},
    state::AppState,
};
use super::{
    user_dto::ProgramCount,
    user_models::{Program, UserResponse},
};

/// Student head counts for every academic program.
#[utoipa::path(
    get,
    path = "/api/programs/counts",
    responses(
        (status = 200, description = "Student counts per program", body = Vec<ProgramCount>),
        (status = 401, description = "Unauthorized")
    ),
    tag = "programs",
    security(("bearer_auth" = []))
)]
pub async fn get_program_counts(
    State(state): State<AppState>,
) -> Result<Json<Vec<ProgramCount>>> {
    let counts = state.user_repository.count_students_by_program().await?;

    // Zero-fill so every program appears even with no students yet.
    let result = Program::ALL
        .iter()
        .map(|program| {
            let students = counts
                .iter()
                .find(|(code, _)| code == program.code())
                .map(|(_, count)| *count)
                .unwrap_or(0);

            ProgramCount {
                code: program.code().to_string(),
                name: program.name().to_string(),
                students,
            }
        })
        .collect();

    Ok(Json(result))
}

/// List the students enrolled in one program.
#[utoipa::path(
    get,
    path = "/api/programs/{program_code}/students",
    params(
        ("program_code" = String, Path, description = "Program code, e.g. BSIT")
    ),
    responses(
        (status = 200, description = "Students in the program", body = Vec<UserResponse>),
        (status = 400, description = "Invalid program code"),
        (status = 401, description = "Unauthorized")
    ),
    tag = "programs",
    security(("bearer_auth" = []))
)]
pub async fn get_students_by_program(
    State(state): State<AppState>,
    Path(program_code): Path<String>,
) -> Result<Json<Vec<UserResponse>>> {
    let program = Program::parse(&program_code)
        .ok_or_else(|| AppError::BadRequest("Invalid program code".to_string()))?;

    let students = state
        .user_repository
        .find_students_by_program(program.code())
        .await?;

    Ok(Json(students.into_iter().map(UserResponse::from).collect()))
}
