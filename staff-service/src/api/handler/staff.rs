use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
};
use shared::{
    responses::ApiResponse,
    types::{User, UserWithSchoolYear},
};
use uuid::Uuid;

use crate::{
    api::state::StaffAppState,
    domain::{
        staff::{CreateStaff, UpdateStaff},
        user::WriteOutcome,
    },
    error::StaffServiceError,
};

#[utoipa::path(
    get,
    path = "/api/v1/school-years/{school_year_id}/staff",
    tag = "Staff",
    operation_id = "list_staff",
    params(
        ("school_year_id" = Uuid, Path, description = "School year ID")
    ),
    responses(
        (status = 200, description = "Staff of the school year", body = ApiResponse<Vec<UserWithSchoolYear>>)
    )
)]
#[tracing::instrument(skip(state))]
pub async fn find_all(
    State(state): State<Arc<StaffAppState>>,
    Path(school_year_id): Path<Uuid>,
) -> Result<Json<ApiResponse<Vec<UserWithSchoolYear>>>, StaffServiceError> {
    let output = state.staff_service.find_all(school_year_id).await?;

    Ok(Json(ApiResponse::ok(output)))
}

/// A missing staff member is not an error here: `data` is `null`.
#[utoipa::path(
    get,
    path = "/api/v1/staff/{id}",
    tag = "Staff",
    operation_id = "get_staff",
    params(
        ("id" = Uuid, Path, description = "Staff ID")
    ),
    responses(
        (status = 200, description = "Staff, or null data when absent", body = ApiResponse<User>)
    )
)]
#[tracing::instrument(skip(state))]
pub async fn find_one(
    State(state): State<Arc<StaffAppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<User>>, StaffServiceError> {
    let output = state.staff_service.find_one(id).await?;

    Ok(Json(ApiResponse {
        success: true,
        data: output,
        error: None,
        errors: None,
    }))
}

#[utoipa::path(
    post,
    path = "/api/v1/school-years/{school_year_id}/staff",
    tag = "Staff",
    operation_id = "create_staff",
    params(
        ("school_year_id" = Uuid, Path, description = "School year ID")
    ),
    request_body = CreateStaff,
    responses(
        (status = 200, description = "Staff created", body = ApiResponse<User>),
        (status = 400, description = "Duplicate rfid or email"),
        (status = 404, description = "School year not found")
    )
)]
#[tracing::instrument(skip(state))]
pub async fn create(
    State(state): State<Arc<StaffAppState>>,
    Path(school_year_id): Path<Uuid>,
    Json(staff): Json<CreateStaff>,
) -> Result<Json<ApiResponse<User>>, StaffServiceError> {
    let output = state.staff_service.create(staff, school_year_id).await?;

    Ok(Json(ApiResponse::ok(output)))
}

#[utoipa::path(
    patch,
    path = "/api/v1/staff/{id}",
    tag = "Staff",
    operation_id = "update_staff",
    params(
        ("id" = Uuid, Path, description = "Staff ID")
    ),
    request_body = UpdateStaff,
    responses(
        (status = 200, description = "Rows updated, zero when the staff does not exist", body = ApiResponse<WriteOutcome>),
        (status = 400, description = "Duplicate rfid or email")
    )
)]
#[tracing::instrument(skip(state))]
pub async fn update(
    State(state): State<Arc<StaffAppState>>,
    Path(id): Path<Uuid>,
    Json(staff): Json<UpdateStaff>,
) -> Result<Json<ApiResponse<WriteOutcome>>, StaffServiceError> {
    let output = state.staff_service.update(id, staff).await?;

    Ok(Json(ApiResponse::ok(output)))
}

#[utoipa::path(
    delete,
    path = "/api/v1/staff/{id}",
    tag = "Staff",
    operation_id = "delete_staff",
    params(
        ("id" = Uuid, Path, description = "Staff ID")
    ),
    responses(
        (status = 200, description = "Rows deleted, zero when the staff does not exist", body = ApiResponse<WriteOutcome>)
    )
)]
#[tracing::instrument(skip(state))]
pub async fn remove(
    State(state): State<Arc<StaffAppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<WriteOutcome>>, StaffServiceError> {
    let output = state.staff_service.remove(id).await?;

    Ok(Json(ApiResponse::ok(output)))
}
