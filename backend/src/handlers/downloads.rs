use axum::{
    extract::{Path, State},
    http::{header, HeaderMap, HeaderValue},
    response::IntoResponse,
};

use crate::{error::AppError, state::AppState};

/// `GET /download/{filename}`: returns the stored file as an attachment.
///
/// The requested name is reduced to its final path component before lookup,
/// so traversal attempts resolve inside the storage directory or not at all.
pub async fn download_file(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let Some((name, path)) = state.uploads.resolve(&filename) else {
        return Err(AppError::NotFound("File not found".to_string()));
    };

    if tokio::fs::metadata(&path).await.is_err() {
        tracing::warn!(requested = %filename, resolved = %name, "download target missing");
        return Err(AppError::NotFound("File not found".to_string()));
    }

    let bytes = tokio::fs::read(&path)
        .await
        .map_err(|err| AppError::internal_with("Error downloading file", err))?;

    let mut headers = HeaderMap::new();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static(content_type_for(&name)),
    );
    let disposition = format!("attachment; filename=\"{}\"", name);
    headers.insert(
        header::CONTENT_DISPOSITION,
        HeaderValue::from_str(&disposition)
            .map_err(|err| AppError::internal_with("Error downloading file", err))?,
    );

    Ok((headers, bytes))
}

fn content_type_for(name: &str) -> &'static str {
    let extension = std::path::Path::new(name)
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase());
    match extension.as_deref() {
        Some("pdf") => "application/pdf",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("png") => "image/png",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_type_follows_the_stored_extension() {
        assert_eq!(content_type_for("a.pdf"), "application/pdf");
        assert_eq!(content_type_for("a.JPG"), "image/jpeg");
        assert_eq!(content_type_for("a.jpeg"), "image/jpeg");
        assert_eq!(content_type_for("a.png"), "image/png");
        assert_eq!(content_type_for("a"), "application/octet-stream");
    }
}
