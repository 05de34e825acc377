use crate::error::AppError;
use axum::body::Body;
use axum::http::{StatusCode, header};
use axum::response::{Html, IntoResponse, Response};
use include_dir::{Dir, File, include_dir};
use mime_guess::MimeGuess;

pub const STYLESHEET_PATH: &str = "/css/github-markdown.css";

static ASSETS: Dir<'static> = include_dir!("$CARGO_MANIFEST_DIR/assets");

const FALLBACK_HELP_PAGE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <title>Model Forward</title>
</head>
<body>
    <h1>Model Forward</h1>
    <p>POST chat completions to <code>/v1/chat/completions</code>.</p>
</body>
</html>
"#;

fn asset_response(file: &'static File<'static>) -> Response {
    let mime: MimeGuess = mime_guess::from_path(file.path());
    let content_type = mime.first_or_octet_stream();
    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, content_type.as_ref())
        .body(Body::from(file.contents()))
        .unwrap_or_else(|_| StatusCode::INTERNAL_SERVER_ERROR.into_response())
}

pub async fn help_page() -> Response {
    match ASSETS.get_file("index.html") {
        Some(file) => asset_response(file),
        None => Html(FALLBACK_HELP_PAGE).into_response(),
    }
}

pub async fn stylesheet() -> Response {
    match ASSETS.get_file("css/github-markdown.css") {
        Some(file) => asset_response(file),
        None => {
            tracing::warn!("stylesheet asset missing");
            AppError::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to read github-markdown.css",
            )
            .with_code()
            .into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn embedded_assets_are_served_with_guessed_types() {
        let resp = stylesheet().await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.headers().get(header::CONTENT_TYPE).unwrap(), "text/css");
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .expect("collect body");
        assert!(bytes.starts_with(b".markdown-body"));

        let resp = help_page().await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.headers().get(header::CONTENT_TYPE).unwrap(), "text/html");
    }
}
