use actix_web::{
    error,
    http::StatusCode,
    web, HttpResponse,
};
use derive_more::Display;
use serde_json::json;

/// Everything a handler can fail with, mapped onto the HTTP taxonomy the API
/// exposes. Store errors funnel through the `From<sqlx::Error>` impl so `?`
/// works across the db layer.
#[derive(Debug, Display)]
pub enum ApiError {
    #[display(fmt = "validation failure")]
    Validation(Vec<String>),

    #[display(fmt = "unauthorized")]
    Unauthorized(String),

    #[display(fmt = "forbidden")]
    Forbidden(String),

    #[display(fmt = "not found")]
    NotFound(String),

    #[display(fmt = "conflict")]
    Conflict(String),

    #[display(fmt = "internal error")]
    Internal(String),

    #[display(fmt = "service unavailable")]
    ServiceUnavailable,
}

impl error::ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    fn error_response(&self) -> HttpResponse {
        // Validation and authentication failures report an "errors" array,
        // everything else a single "error" string.
        let body = match self {
            ApiError::Validation(messages) => json!({ "errors": messages }),
            ApiError::Unauthorized(message) => json!({ "errors": [message] }),
            ApiError::Forbidden(message)
            | ApiError::NotFound(message)
            | ApiError::Conflict(message)
            | ApiError::Internal(message) => json!({ "error": message }),
            ApiError::ServiceUnavailable => json!({ "error": "Service Unavailable" }),
        };
        HttpResponse::build(self.status_code()).json(body)
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => ApiError::NotFound("not found".to_string()),
            other => {
                log::error!("database error: {}", other);
                ApiError::ServiceUnavailable
            }
        }
    }
}

/// Failed JSON extraction answers with the same 400 body shape as the
/// hand-rolled field validation.
pub fn json_error_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .error_handler(|err, _req| ApiError::Validation(vec![err.to_string()]).into())
}

pub fn path_error_config() -> web::PathConfig {
    web::PathConfig::default()
        .error_handler(|err, _req| ApiError::Validation(vec![err.to_string()]).into())
}

pub fn query_error_config() -> web::QueryConfig {
    web::QueryConfig::default()
        .error_handler(|err, _req| ApiError::Validation(vec![err.to_string()]).into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;
    use actix_web::error::ResponseError;
    use serde_json::Value;

    #[test]
    fn status_codes_follow_the_error_taxonomy() {
        assert_eq!(
            ApiError::Validation(vec![]).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::Unauthorized("no".into()).status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ApiError::Forbidden("no".into()).status_code(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            ApiError::NotFound("gone".into()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::Conflict("dup".into()).status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            ApiError::Internal("boom".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ApiError::ServiceUnavailable.status_code(),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }

    #[actix_web::test]
    async fn validation_body_lists_every_message() {
        let response = ApiError::Validation(vec![
            "Invalid email format".to_string(),
            "Password must be at least 6 characters long".to_string(),
        ])
        .error_response();
        let bytes = to_bytes(response.into_body()).await.expect("body");
        let value: Value = serde_json::from_slice(&bytes).expect("json body");
        let errors = value["errors"].as_array().expect("errors array");
        assert_eq!(errors.len(), 2);
        assert_eq!(errors[0], "Invalid email format");
    }

    #[actix_web::test]
    async fn store_failure_reports_service_unavailable() {
        let response = ApiError::ServiceUnavailable.error_response();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        let bytes = to_bytes(response.into_body()).await.expect("body");
        let value: Value = serde_json::from_slice(&bytes).expect("json body");
        assert_eq!(value["error"], "Service Unavailable");
    }

    #[test]
    fn row_not_found_maps_to_404() {
        let err = ApiError::from(sqlx::Error::RowNotFound);
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
    }
}
