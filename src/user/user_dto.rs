use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
pub struct ProgramCount {
    pub code: String,
    pub name: String,
    pub students: i64,
}
