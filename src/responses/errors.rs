use crate::errors::ServerError;
use crate::templates::components::error_page;
use astra::{Body, Response, ResponseBuilder};

pub type ResultResp = Result<Response, ServerError>;

/// Convert a ServerError into an HTML error page
pub fn error_to_response(err: ServerError) -> Response {
    let status = err.status();
    if status >= 500 {
        tracing::error!(error = %err, "request failed");
    } else {
        tracing::debug!(error = %err, status, "request rejected");
    }

    let message = match &err {
        ServerError::NotFound => "Not Found".to_string(),
        ServerError::BadRequest(msg) | ServerError::Conflict(msg) => msg.clone(),
        other => other.to_string(),
    };

    build(status, mime::TEXT_HTML_UTF_8.as_ref(), error_page(status, &message).into_string())
}

/// Same as [`error_to_response`] but with a `{"error": ...}` body, for the JSON routes.
pub fn json_error_response(err: ServerError) -> Response {
    let status = err.status();
    if status >= 500 {
        tracing::error!(error = %err, "request failed");
    }
    let body = serde_json::json!({ "status": status, "error": err.to_string() });
    build(status, mime::APPLICATION_JSON.as_ref(), body.to_string())
}

fn build(status: u16, content_type: &str, body: String) -> Response {
    ResponseBuilder::new()
        .status(status)
        .header("Content-Type", content_type)
        .body(Body::from(body))
        .unwrap_or_else(|_| Response::new(Body::from("Internal Server Error")))
}
