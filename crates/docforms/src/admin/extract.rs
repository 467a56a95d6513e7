use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, Request};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

/// JSON request body whose rejections use the admin `{"error": ...}` shape.
///
/// A body that parses but fails a field constraint (slug, email, role) is a 422. Syntax errors
/// stay 400 and a missing content type stays 415.
#[derive(Debug, Clone)]
pub struct JsonBody<T>(pub T);

#[axum::async_trait]
impl<S, T> FromRequest<S> for JsonBody<T>
where
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) => Err(rejection_response(rejection)),
        }
    }
}

fn rejection_response(rejection: JsonRejection) -> Response {
    let status = match &rejection {
        JsonRejection::JsonDataError(_) => StatusCode::UNPROCESSABLE_ENTITY,
        other => other.status(),
    };
    let payload = json!({ "error": rejection.body_text() });
    (status, Json(payload)).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::header;
    use serde::Deserialize;
    use serde_json::Value;

    #[derive(Debug, Deserialize)]
    struct Named {
        name: String,
    }

    async fn extract(content_type: Option<&str>, body: &'static str) -> Result<String, Response> {
        let mut builder = axum::http::Request::builder().method("POST").uri("/");
        if let Some(content_type) = content_type {
            builder = builder.header(header::CONTENT_TYPE, content_type);
        }
        let request = builder.body(Body::from(body)).unwrap();
        JsonBody::<Named>::from_request(request, &())
            .await
            .map(|JsonBody(named)| named.name)
    }

    async fn error_body(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn well_formed_bodies_pass_through() {
        let name = extract(Some("application/json"), r#"{"name":"Maria"}"#).await;
        assert_eq!(name.ok().as_deref(), Some("Maria"));
    }

    #[tokio::test]
    async fn constraint_failures_are_unprocessable_json() {
        let response = extract(Some("application/json"), r#"{"name":7}"#)
            .await
            .unwrap_err();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "application/json"
        );
        assert!(error_body(response).await["error"].is_string());
    }

    #[tokio::test]
    async fn syntax_errors_and_missing_content_type_keep_their_status() {
        let syntax = extract(Some("application/json"), "{").await.unwrap_err();
        assert_eq!(syntax.status(), StatusCode::BAD_REQUEST);
        assert!(error_body(syntax).await["error"].is_string());

        let untyped = extract(None, r#"{"name":"Maria"}"#).await.unwrap_err();
        assert_eq!(untyped.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
    }
}
