//! Router that exposes the selected function.
//!
//! The function is bound to `/` and every other path for every method, so the
//! platform can route any trigger to it. Browser probes (`/favicon.ico`,
//! `/robots.txt`) get a 404 instead of an invocation unless disabled.
//!
//! Every request runs inside a span with a generated request ID, and panics
//! raised by the function are turned into 500 responses.

use axum::{
    middleware,
    routing::{any, MethodRouter},
    Router,
};
use http::StatusCode;
use tower_http::catch_panic::CatchPanicLayer;

use crate::config::FunctionConfig;
use crate::error::panic_response;
use crate::middleware::{request_id_layer, FunctionName};

/// Paths browsers request on their own
pub const BROWSER_PROBE_PATHS: [&str; 2] = ["/favicon.ico", "/robots.txt"];

async fn not_found() -> StatusCode {
    StatusCode::NOT_FOUND
}

/// Creates the router serving `function` under the name `name`.
pub fn create_router(name: &str, function: MethodRouter, config: &FunctionConfig) -> Router {
    let mut router = Router::new();

    if config.ignore_browser_probes {
        for path in BROWSER_PROBE_PATHS {
            router = router.route(path, any(not_found));
        }
    }

    router
        .route("/", function.clone())
        .route("/{*path}", function)
        // Panic recovery sits inside the request span so the error log carries the request ID
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(middleware::from_fn_with_state(
            FunctionName::new(name),
            request_id_layer,
        ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PANIC_RESPONSE_BODY;
    use crate::functions::{self, hello_world::GREETING_LINE};
    use crate::registry::FunctionRegistry;
    use axum::body::Body;
    use axum::response::Response;
    use http::header::{HeaderValue, CONTENT_TYPE};
    use http::Request;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tower::ServiceExt;

    fn hello_router(config: &FunctionConfig) -> Router {
        let mut registry = FunctionRegistry::new();
        functions::register(&mut registry).unwrap();
        let (name, function) = registry.resolve(Some("HelloWorld")).unwrap();
        create_router(&name, function, config)
    }

    async fn send(app: Router, request: Request<Body>) -> (StatusCode, String) {
        let response: Response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, String::from_utf8(body.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn test_get_empty_body() {
        let app = hello_router(&FunctionConfig::default());
        let request = Request::builder().uri("/").body(Body::empty()).unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(CONTENT_TYPE).unwrap(),
            "text/plain; charset=utf-8"
        );

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&body[..], b"Hello, World from Go Cloud Function!\n");
    }

    #[tokio::test]
    async fn test_post_json_body() {
        let app = hello_router(&FunctionConfig::default());
        let request = Request::builder()
            .method("POST")
            .uri("/")
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(
                serde_json::json!({"name": "Alice", "nested": {"values": [1, 2, 3]}}).to_string(),
            ))
            .unwrap();

        assert_eq!(send(app, request).await, (StatusCode::OK, GREETING_LINE.to_string()));
    }

    #[tokio::test]
    async fn test_malformed_headers_and_body() {
        let app = hello_router(&FunctionConfig::default());
        let request = Request::builder()
            .method("PUT")
            .uri("/")
            .header(CONTENT_TYPE, "application/json")
            .header("x-garbage", HeaderValue::from_bytes(b"\xff\xfe not utf8").unwrap())
            .header("content-encoding", "definitely-not-a-codec")
            .header("authorization", "")
            .body(Body::from("{not json"))
            .unwrap();

        assert_eq!(send(app, request).await, (StatusCode::OK, GREETING_LINE.to_string()));
    }

    #[tokio::test]
    async fn test_any_method_and_path() {
        let config = FunctionConfig::default();
        let cases = [
            ("GET", "/?name=Bob"),
            ("DELETE", "/users/42"),
            ("PATCH", "/deeply/nested/path/"),
            ("OPTIONS", "/"),
            ("HEAD", "/health"),
        ];

        for (method, uri) in cases {
            let request = Request::builder()
                .method(method)
                .uri(uri)
                .body(Body::empty())
                .unwrap();
            let (status, body) = send(hello_router(&config), request).await;

            assert_eq!(status, StatusCode::OK, "{method} {uri}");
            if method != "HEAD" {
                assert_eq!(body, GREETING_LINE, "{method} {uri}");
            }
        }
    }

    #[tokio::test]
    async fn test_repeated_invocations_identical() {
        let app = hello_router(&FunctionConfig::default());

        for i in 0..10 {
            let request = Request::builder()
                .method(if i % 2 == 0 { "GET" } else { "POST" })
                .uri(format!("/call/{i}"))
                .body(Body::from(vec![b'x'; i * 100]))
                .unwrap();
            let (status, body) = send(app.clone(), request).await;
            assert_eq!(status, StatusCode::OK);
            assert_eq!(body, GREETING_LINE);
        }
    }

    #[tokio::test]
    async fn test_browser_probes_ignored() {
        let app = hello_router(&FunctionConfig::default());

        for path in BROWSER_PROBE_PATHS {
            let request = Request::builder().uri(path).body(Body::empty()).unwrap();
            let (status, body) = send(app.clone(), request).await;
            assert_eq!(status, StatusCode::NOT_FOUND, "{path}");
            assert!(body.is_empty());
        }
    }

    #[tokio::test]
    async fn test_browser_probes_served_when_disabled() {
        let config = FunctionConfig {
            ignore_browser_probes: false,
            ..FunctionConfig::default()
        };
        let app = hello_router(&config);

        let request = Request::builder()
            .uri("/favicon.ico")
            .body(Body::empty())
            .unwrap();
        assert_eq!(send(app, request).await, (StatusCode::OK, GREETING_LINE.to_string()));
    }

    #[tokio::test]
    async fn test_panic_becomes_500() {
        static CALLS: AtomicUsize = AtomicUsize::new(0);

        async fn flaky() -> &'static str {
            if CALLS.fetch_add(1, Ordering::SeqCst) == 0 {
                panic!("function failure");
            }
            "recovered"
        }

        let mut registry = FunctionRegistry::new();
        registry.http("Flaky", flaky).unwrap();
        let (name, function) = registry.resolve(None).unwrap();
        let app = create_router(&name, function, &FunctionConfig::default());

        let request = Request::builder().uri("/").body(Body::empty()).unwrap();
        assert_eq!(
            send(app.clone(), request).await,
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                PANIC_RESPONSE_BODY.to_string()
            )
        );

        // The same function serves the next invocation normally
        let request = Request::builder().uri("/").body(Body::empty()).unwrap();
        assert_eq!(
            send(app, request).await,
            (StatusCode::OK, "recovered".to_string())
        );
        assert_eq!(CALLS.load(Ordering::SeqCst), 2);
    }
}
