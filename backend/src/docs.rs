#![allow(dead_code)] // OpenAPI doc stubs are only referenced by utoipa macros.

use crate::models::request::{Request, UpdateStatusPayload};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        create_request_doc,
        list_requests_doc,
        list_requests_by_employee_doc,
        update_request_status_doc,
        download_file_doc,
    ),
    components(schemas(Request, UpdateStatusPayload)),
    tags(
        (name = "requests", description = "Employee request intake and HR review"),
        (name = "files", description = "Attachment download")
    )
)]
pub struct ApiDoc;

#[utoipa::path(
    post,
    path = "/api/requests",
    tag = "requests",
    request_body(content = String, content_type = "multipart/form-data",
        description = "Form fields name, email, empId, program, program_time?, date, \
                       reason?, loan_type?, amount?, plus an optional file field `document`"),
    responses(
        (status = 201, description = "Created request; status is always Pending", body = Request),
        (status = 400, description = "Duplicate one-time program submission or unsupported file type"),
        (status = 413, description = "Attached file exceeds the 5 MiB limit"),
        (status = 500, description = "Creation failed")
    )
)]
async fn create_request_doc() {}

#[utoipa::path(
    get,
    path = "/api/requests",
    tag = "requests",
    responses(
        (status = 200, description = "Every request, newest request date first", body = [Request]),
        (status = 500, description = "Fetch failed")
    )
)]
async fn list_requests_doc() {}

#[utoipa::path(
    get,
    path = "/api/requests/emp/{emp_id}",
    tag = "requests",
    params(("emp_id" = String, Path, description = "Exact employee identifier")),
    responses(
        (status = 200, description = "The employee's requests, newest request date first", body = [Request]),
        (status = 500, description = "Fetch failed")
    )
)]
async fn list_requests_by_employee_doc() {}

#[utoipa::path(
    put,
    path = "/api/requests/{id}",
    tag = "requests",
    params(("id" = i32, Path, description = "Request identifier")),
    request_body = UpdateStatusPayload,
    responses(
        (status = 200, description = "Updated request", body = Request),
        (status = 404, description = "Unknown request id"),
        (status = 500, description = "Update failed")
    )
)]
async fn update_request_status_doc() {}

#[utoipa::path(
    get,
    path = "/download/{filename}",
    tag = "files",
    params(("filename" = String, Path, description = "Stored attachment name; reduced to its final path component")),
    responses(
        (status = 200, description = "File content with an attachment disposition"),
        (status = 404, description = "No such file"),
        (status = 500, description = "Read failed")
    )
)]
async fn download_file_doc() {}
