use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    Json,
};
use chrono::NaiveDate;

use crate::{
    error::AppError,
    models::request::{NewRequest, Request, UpdateStatusPayload},
    repositories::{CreateRequestError, RequestRepository, RequestRepositoryTrait},
    state::AppState,
};

/// `POST /api/requests`: multipart intake with an optional `document` file.
pub async fn create_request(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<Request>), AppError> {
    let draft = read_submission(&state, &mut multipart).await?;

    let repo = RequestRepository::new();
    match repo.create(&state.pool, &draft).await {
        Ok(request) => Ok((StatusCode::CREATED, Json(request))),
        Err(err @ CreateRequestError::Duplicate { .. }) => {
            Err(AppError::BadRequest(err.to_string()))
        }
        Err(CreateRequestError::Db(err)) => {
            Err(AppError::internal_with("Failed to create request", err))
        }
    }
}

/// `GET /api/requests`
pub async fn list_requests(State(state): State<AppState>) -> Result<Json<Vec<Request>>, AppError> {
    let repo = RequestRepository::new();
    let requests = repo.find_all(&state.pool).await.map_err(|err| {
        tracing::error!(error = %err, "failed to fetch requests");
        AppError::internal("Failed to fetch requests")
    })?;
    Ok(Json(requests))
}

/// `GET /api/requests/emp/{emp_id}`
pub async fn list_requests_by_employee(
    State(state): State<AppState>,
    Path(emp_id): Path<String>,
) -> Result<Json<Vec<Request>>, AppError> {
    let repo = RequestRepository::new();
    let requests = repo
        .find_by_employee(&state.pool, &emp_id)
        .await
        .map_err(|err| {
            tracing::error!(error = %err, emp_id = %emp_id, "failed to fetch requests by employee");
            AppError::internal("Failed to fetch requests")
        })?;
    Ok(Json(requests))
}

/// `PUT /api/requests/{id}`: unconditional status overwrite.
pub async fn update_request_status(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateStatusPayload>,
) -> Result<Json<Request>, AppError> {
    let repo = RequestRepository::new();
    match repo.update_status(&state.pool, id, &payload.status).await {
        Ok(Some(request)) => Ok(Json(request)),
        Ok(None) => Err(AppError::NotFound("Request not found".to_string())),
        Err(err) => {
            tracing::error!(error = %err, id, "failed to update request");
            Err(AppError::internal("Failed to update request"))
        }
    }
}

/// Drains the multipart form into a creation draft, persisting the attachment
/// (when one is present) before the draft reaches the store. A rejected file
/// aborts the submission before any record exists.
async fn read_submission(
    state: &AppState,
    multipart: &mut Multipart,
) -> Result<NewRequest, AppError> {
    let mut draft = NewRequest::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|err| AppError::internal_with("Failed to create request", err))?
    {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };

        if name == "document" {
            let original_name = field.file_name().map(str::to_string);
            let content_type = field.content_type().map(str::to_string);
            let bytes = field
                .bytes()
                .await
                .map_err(|err| AppError::internal_with("Failed to create request", err))?;

            // A file input left empty still arrives as a part, with no filename.
            let Some(original_name) = original_name.filter(|n| !n.is_empty()) else {
                continue;
            };
            let relative = state
                .uploads
                .accept(&original_name, content_type.as_deref(), &bytes)
                .await?;
            draft.document_path = Some(relative);
        } else {
            let value = field
                .text()
                .await
                .map_err(|err| AppError::internal_with("Failed to create request", err))?;
            assign_field(&mut draft, &name, value);
        }
    }

    Ok(draft)
}

fn assign_field(draft: &mut NewRequest, name: &str, value: String) {
    let value = text_or_none(value);
    match name {
        "name" => draft.name = value,
        "email" => draft.email = value,
        "empId" => draft.emp_id = value,
        "program" => draft.program = value,
        "program_time" => draft.program_time = value,
        "date" => draft.request_date = value.as_deref().and_then(parse_request_date),
        "reason" => draft.reason = value,
        "loan_type" => draft.loan_type = value,
        "amount" => draft.amount = value.as_deref().and_then(|v| v.parse().ok()),
        // Unknown fields, including any caller-supplied status, are ignored:
        // creation always yields a Pending record.
        _ => {}
    }
}

/// Empty form values behave like missing ones and land as NULLs.
fn text_or_none(value: String) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}

fn parse_request_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_form_values_become_none() {
        assert_eq!(text_or_none(String::new()), None);
        assert_eq!(text_or_none("x".to_string()), Some("x".to_string()));
    }

    #[test]
    fn assign_field_maps_form_names_and_ignores_unknown_ones() {
        let mut draft = NewRequest::default();
        assign_field(&mut draft, "empId", "EMP-7".into());
        assign_field(&mut draft, "date", "2025-03-09".into());
        assign_field(&mut draft, "amount", "2500.50".into());
        assign_field(&mut draft, "status", "Approved".into());

        assert_eq!(draft.emp_id.as_deref(), Some("EMP-7"));
        assert_eq!(
            draft.request_date,
            NaiveDate::from_ymd_opt(2025, 3, 9)
        );
        assert_eq!(draft.amount, Some(2500.50));
        // the smuggled status never reaches the draft
        assert!(draft.name.is_none());
    }

    #[test]
    fn unparsable_date_stays_unset_and_fails_at_the_store() {
        let mut draft = NewRequest::default();
        assign_field(&mut draft, "date", "09/03/2025".into());
        assert_eq!(draft.request_date, None);
    }
}
