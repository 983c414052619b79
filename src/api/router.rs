use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use super::health;
use super::keys;
use super::middleware::{logging_middleware, response_headers_middleware};
use super::pages;
use super::state::AppState;
use super::types::ApiError;

/// Create the full router with application state
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Pages
        .route("/", get(pages::index))
        .route("/about/", get(pages::about))
        .route("/about", get(pages::about_redirect))
        .route("/robots.txt", get(pages::robots))
        // Key registry
        .route(
            "/keys",
            post(keys::create_key)
                .get(keys::list_keys)
                .delete(keys::delete_key),
        )
        .route("/keys/{id}", get(keys::get_key).patch(keys::update_key))
        // Health endpoints
        .route("/health", get(health::health_check))
        .route("/ready", get(health::ready_check))
        .route("/live", get(health::live_check))
        .fallback(not_found)
        .with_state(state)
        .layer(middleware::from_fn(response_headers_middleware))
        .layer(middleware::from_fn(logging_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
}

async fn not_found() -> ApiError {
    ApiError::not_found()
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::{to_bytes, Body},
        http::{header, Method, Request, StatusCode},
        response::Response,
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::domain::document::{DocumentStore, MockDocumentStore};
    use crate::domain::{DomainError, KeyPolicy};
    use crate::infrastructure::storage::InMemoryDocumentStore;

    const ADMIN_KEY: &str = "admin-credential-value-0000001";

    async fn seeded_state() -> AppState {
        let store = Arc::new(InMemoryDocumentStore::new());
        let state = AppState::with_store(store, KeyPolicy::default());
        state
            .registry
            .create_api_key("admin", Some(ADMIN_KEY))
            .await
            .unwrap();
        state
    }

    async fn send(
        state: &AppState,
        method: Method,
        uri: &str,
        credential: Option<&str>,
        body: Option<Value>,
    ) -> Response {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(credential) = credential {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", credential));
        }

        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        create_router(state.clone()).oneshot(request).await.unwrap()
    }

    async fn body_json(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    async fn body_text(response: Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_create_key_returns_created_record() {
        let state = seeded_state().await;

        let response = send(
            &state,
            Method::POST,
            "/keys",
            None,
            Some(json!({"name": "alpha"})),
        )
        .await;

        assert_eq!(response.status(), StatusCode::CREATED);
        let body = body_json(response).await;
        assert_eq!(body["name"], "alpha");
        assert_eq!(body["key"].as_str().unwrap().len(), 30);
        assert!(body["id"].as_str().is_some());
    }

    #[tokio::test]
    async fn test_create_key_with_supplied_key() {
        let state = seeded_state().await;

        let response = send(
            &state,
            Method::POST,
            "/keys",
            None,
            Some(json!({"name": "beta", "key": "IAmAnEmoji"})),
        )
        .await;

        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(body_json(response).await["key"], "IAmAnEmoji");
        assert!(state.registry.has_api_key("IAmAnEmoji").await.unwrap());
    }

    #[tokio::test]
    async fn test_create_key_without_name_is_forbidden() {
        let state = seeded_state().await;

        for body in [json!({}), json!({"name": ""}), json!({"name": "   "})] {
            let response = send(&state, Method::POST, "/keys", None, Some(body)).await;

            assert_eq!(response.status(), StatusCode::FORBIDDEN);
            assert!(body_json(response).await["error"].is_string());
        }

        assert_eq!(state.registry.find_all_api_keys().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_create_key_with_empty_key_is_bad_request() {
        let state = seeded_state().await;

        let response = send(
            &state,
            Method::POST,
            "/keys",
            None,
            Some(json!({"name": "alpha", "key": ""})),
        )
        .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_malformed_body_is_bad_request() {
        let state = seeded_state().await;
        let request = Request::builder()
            .method(Method::POST)
            .uri("/keys")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{not json"))
            .unwrap();

        let response = create_router(state).oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(body_json(response).await["error"].is_string());
    }

    #[tokio::test]
    async fn test_delete_key() {
        let state = seeded_state().await;
        let id = state.registry.create_api_key("doomed", None).await.unwrap();

        let response = send(
            &state,
            Method::DELETE,
            "/keys",
            Some(ADMIN_KEY),
            Some(json!({"id": id.as_str()})),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_text(response).await, "OK");
        assert!(state
            .registry
            .find_api_key(Some(&id), None)
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_delete_missing_key_is_not_found() {
        let state = seeded_state().await;

        let response = send(
            &state,
            Method::DELETE,
            "/keys",
            Some(ADMIN_KEY),
            Some(json!({"id": "does-not-exist"})),
        )
        .await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_json(response).await, json!({"error": "Not found"}));
    }

    #[tokio::test]
    async fn test_delete_with_mismatched_name_is_not_found() {
        let state = seeded_state().await;
        let id = state.registry.create_api_key("alpha", None).await.unwrap();

        let response = send(
            &state,
            Method::DELETE,
            "/keys",
            Some(ADMIN_KEY),
            Some(json!({"id": id.as_str(), "name": "beta"})),
        )
        .await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(state.registry.find_all_api_keys().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_delete_with_unknown_credential_is_unauthorized() {
        let state = seeded_state().await;
        let id = state.registry.create_api_key("alpha", None).await.unwrap();

        for credential in [None, Some("not-a-stored-key")] {
            let response = send(
                &state,
                Method::DELETE,
                "/keys",
                credential,
                Some(json!({"id": id.as_str()})),
            )
            .await;

            assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
            assert_eq!(
                body_json(response).await,
                json!({"error": "Unauthorized access"})
            );
        }

        assert_eq!(state.registry.find_all_api_keys().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_delete_without_id_is_bad_request() {
        let state = seeded_state().await;

        let response = send(
            &state,
            Method::DELETE,
            "/keys",
            Some(ADMIN_KEY),
            Some(json!({"name": "admin"})),
        )
        .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_x_api_key_header_is_accepted() {
        let state = seeded_state().await;
        let request = Request::builder()
            .uri("/keys")
            .header("x-api-key", ADMIN_KEY)
            .body(Body::empty())
            .unwrap();

        let response = create_router(state).oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body.as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_get_and_update_key() {
        let state = seeded_state().await;
        let id = state
            .registry
            .create_api_key("alpha", Some("alpha-key"))
            .await
            .unwrap();
        let uri = format!("/keys/{}", id);

        let response = send(&state, Method::GET, &uri, Some(ADMIN_KEY), None).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["name"], "alpha");

        let response = send(
            &state,
            Method::PATCH,
            &uri,
            Some(ADMIN_KEY),
            Some(json!({"name": "renamed"})),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["name"], "renamed");
        assert_eq!(body["key"], "alpha-key");
        assert_eq!(body["id"], id.as_str());
    }

    #[tokio::test]
    async fn test_get_and_update_missing_key_is_not_found() {
        let state = seeded_state().await;

        let response = send(&state, Method::GET, "/keys/missing", Some(ADMIN_KEY), None).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = send(
            &state,
            Method::PATCH,
            "/keys/missing",
            Some(ADMIN_KEY),
            Some(json!({"name": "renamed"})),
        )
        .await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_update_with_empty_name_is_bad_request() {
        let state = seeded_state().await;
        let id = state.registry.create_api_key("alpha", None).await.unwrap();

        let response = send(
            &state,
            Method::PATCH,
            &format!("/keys/{}", id),
            Some(ADMIN_KEY),
            Some(json!({"name": ""})),
        )
        .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_store_failure_is_server_error() {
        let mut store = MockDocumentStore::new();
        store.expect_backend().return_const("mock");
        store
            .expect_insert()
            .returning(|_| Err(DomainError::store_unavailable("connection refused")));
        let store: Arc<dyn DocumentStore> = Arc::new(store);
        let state = AppState::with_store(store, KeyPolicy::default());

        let response = send(
            &state,
            Method::POST,
            "/keys",
            None,
            Some(json!({"name": "alpha"})),
        )
        .await;

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_json(response).await, json!({"error": "Server error"}));
    }

    #[tokio::test]
    async fn test_unknown_route_is_not_found() {
        let state = seeded_state().await;

        let response = send(&state, Method::GET, "/nowhere", None, None).await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            response.headers().get("x-ua-compatible").unwrap(),
            "IE=Edge,chrome=1"
        );
        assert_eq!(body_json(response).await, json!({"error": "Not found"}));
    }

    #[tokio::test]
    async fn test_pages_are_cacheable() {
        let state = seeded_state().await;

        for uri in ["/", "/about/", "/robots.txt"] {
            let response = send(&state, Method::GET, uri, None, None).await;

            assert_eq!(response.status(), StatusCode::OK, "{}", uri);
            assert_eq!(
                response.headers().get(header::CACHE_CONTROL).unwrap(),
                "public, max-age=600"
            );
            assert_eq!(
                response.headers().get("x-ua-compatible").unwrap(),
                "IE=Edge,chrome=1"
            );
        }

        let response = send(&state, Method::GET, "/health", None, None).await;
        assert!(response.headers().get(header::CACHE_CONTROL).is_none());
    }

    #[tokio::test]
    async fn test_index_lists_routes() {
        let state = seeded_state().await;

        let body = body_json(send(&state, Method::GET, "/", None, None).await).await;
        let paths: Vec<&str> = body["routes"]
            .as_array()
            .unwrap()
            .iter()
            .filter_map(|route| route["path"].as_str())
            .collect();

        assert!(paths.contains(&"/keys"));
        assert!(paths.contains(&"/about/"));
    }

    #[tokio::test]
    async fn test_about_redirects_to_trailing_slash() {
        let state = seeded_state().await;

        let response = send(&state, Method::GET, "/about", None, None).await;

        assert_eq!(response.status(), StatusCode::MOVED_PERMANENTLY);
        assert_eq!(response.headers().get(header::LOCATION).unwrap(), "/about/");
    }

    #[tokio::test]
    async fn test_ready_reports_store_state() {
        let state = seeded_state().await;
        let response = send(&state, Method::GET, "/ready", None, None).await;
        assert_eq!(response.status(), StatusCode::OK);

        let mut store = MockDocumentStore::new();
        store.expect_backend().return_const("mock");
        store
            .expect_ping()
            .returning(|| Err(DomainError::store_unavailable("down")));
        let store: Arc<dyn DocumentStore> = Arc::new(store);
        let state = AppState::with_store(store, KeyPolicy::default());

        let response = send(&state, Method::GET, "/ready", None, None).await;
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body_json(response).await["status"], "unhealthy");
    }
}
