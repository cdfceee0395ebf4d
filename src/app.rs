use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderValue, Method},
    middleware,
    routing::{get, post, put},
    Router,
};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use crate::config::{config, ApiConfig};
use crate::error::ApiError;
use crate::handlers::{admin, protected, public};
use crate::middleware::{db_pool_middleware, jwt_auth_middleware};

/// Full application router: every route lives under `/api`
pub fn router() -> Router {
    build_router(&config().api)
}

fn build_router(api: &ApiConfig) -> Router {
    let router = Router::new()
        .merge(public_routes())
        .merge(protected_routes())
        .fallback(fallback)
        // Global middleware
        .layer(DefaultBodyLimit::max(api.max_request_size_bytes))
        .layer(cors_layer());

    if api.enable_request_logging {
        router.layer(TraceLayer::new_for_http())
    } else {
        router
    }
}

fn public_routes() -> Router {
    Router::new()
        .route("/api/auth/register", post(public::register_post))
        .route("/api/auth/login", post(public::login_post))
        .layer(middleware::from_fn(db_pool_middleware))
        // Health reports on the pool itself, so it sits outside the pool layer
        .route("/api/health", get(public::health_get))
}

fn protected_routes() -> Router {
    Router::new()
        .route("/api/auth/profile", get(protected::profile_get))
        .merge(provider_routes())
        .merge(section_routes())
        .merge(question_routes())
        .merge(response_routes())
        .merge(user_routes())
        .merge(stats_routes())
        // Layers run bottom-up: the token is checked before a pool is handed out
        .layer(middleware::from_fn(db_pool_middleware))
        .layer(middleware::from_fn(jwt_auth_middleware))
}

fn provider_routes() -> Router {
    Router::new()
        .route("/api/providers", get(protected::provider_list).post(admin::provider_post))
        .route(
            "/api/providers/:id",
            get(protected::provider_get)
                .put(admin::provider_put)
                .delete(admin::provider_delete),
        )
}

fn section_routes() -> Router {
    Router::new()
        .route("/api/sections", get(protected::section_list).post(admin::section_post))
        .route(
            "/api/sections/:id",
            get(protected::section_get)
                .put(admin::section_put)
                .delete(admin::section_delete),
        )
        .route(
            "/api/sections/:id/questions",
            get(protected::section_questions).post(admin::section_question_post),
        )
        .route("/api/sections/:id/questions/reorder", put(admin::section_questions_reorder))
}

fn question_routes() -> Router {
    Router::new()
        .route("/api/questions", get(admin::question_list))
        .route("/api/questions/bulk-upload", post(admin::question_bulk_upload))
        .route("/api/questions/template/csv", get(admin::template_csv))
        .route("/api/questions/template/excel", get(admin::template_excel))
        .route("/api/questions/:id", put(admin::question_put).delete(admin::question_delete))
}

fn response_routes() -> Router {
    Router::new()
        .route("/api/responses", get(protected::response_list))
        .route("/api/responses/save", post(protected::response_save))
        .route("/api/responses/user/section/:section_id", get(protected::response_for_section))
        .route("/api/responses/:id", get(protected::response_get))
        .route("/api/responses/:id/submit", post(protected::response_submit))
}

fn user_routes() -> Router {
    Router::new()
        .route("/api/users", get(admin::user_list))
        .route(
            "/api/users/:id",
            get(admin::user_get).put(admin::user_put).delete(admin::user_delete),
        )
}

fn stats_routes() -> Router {
    Router::new()
        .route("/api/stats/admin", get(admin::stats_admin))
        .route("/api/stats/agent", get(protected::stats_agent))
}

fn cors_layer() -> CorsLayer {
    let origins: Vec<HeaderValue> = config()
        .security
        .cors_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .allow_credentials(true)
}

async fn fallback() -> ApiError {
    ApiError::not_found("Route not found")
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
    };
    use serde_json::Value;
    use tower::ServiceExt;

    async fn send(request: Request<Body>) -> (StatusCode, Value) {
        send_to(router(), request).await
    }

    async fn send_to(app: Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
    }

    #[tokio::test]
    async fn protected_routes_require_a_token() {
        let request = Request::get("/api/questions/template/csv").body(Body::empty()).unwrap();
        let (status, body) = send(request).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["message"], "Access token required");
        assert_eq!(body["success"], false);
    }

    #[tokio::test]
    async fn garbage_tokens_are_unauthorized() {
        let request = Request::post("/api/questions/bulk-upload")
            .header("authorization", "Bearer not-a-jwt")
            .body(Body::empty())
            .unwrap();
        let (status, body) = send(request).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["message"], "Invalid or expired token");
    }

    #[tokio::test]
    async fn unknown_routes_get_a_json_404() {
        let request = Request::get("/api/nope").body(Body::empty()).unwrap();
        let (status, body) = send(request).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn routes_are_served_with_request_logging_off() {
        let api = ApiConfig {
            port: 0,
            enable_request_logging: false,
            max_request_size_bytes: 1024,
        };

        let request = Request::get("/api/nope").body(Body::empty()).unwrap();
        let (status, body) = send_to(build_router(&api), request).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], "Route not found");

        let request = Request::get("/api/auth/profile").body(Body::empty()).unwrap();
        let (status, _) = send_to(build_router(&api), request).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }
}
