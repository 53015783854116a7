use axum::{
    body::Body,
    extract::Path,
    http::{Request, Response, StatusCode},
    response::IntoResponse,
    routing::get,
    Extension, Router,
};
use promtrack::track::UNMATCHED;
use promtrack::{Metrics, RequestName, TrackLayer};
use std::convert::Infallible;
use std::sync::Arc;
use tower::{service_fn, ServiceExt};

fn sample_count(metrics: &Metrics, class: &str, request: &str, method: &str) -> u64 {
    metrics
        .request_time()
        .with_label_values(&[class, request, method])
        .get_sample_count()
}

fn get_request(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn echo_status(Path(code): Path<u16>) -> StatusCode {
    StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
}

#[tokio::test]
async fn health_route_records_one_observation() {
    let metrics = Arc::new(Metrics::new().unwrap());
    let app = Router::new().route(
        "/health",
        get(|| async { "ok" }).layer(TrackLayer::new(Arc::clone(&metrics), "/health")),
    );

    let response = app.oneshot(get_request("/health?probe=1")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert_eq!(&body[..], b"ok");

    assert_eq!(sample_count(&metrics, "2xx", "/health", "GET"), 1);
    let sum = metrics
        .request_time()
        .with_label_values(&["2xx", "/health", "GET"])
        .get_sample_sum();
    assert!(sum >= 0.0);
}

#[tokio::test]
async fn response_passes_through_untouched() {
    let metrics = Arc::new(Metrics::new().unwrap());
    let app = Router::new().route(
        "/teapot",
        get(|| async {
            (
                StatusCode::IM_A_TEAPOT,
                [("x-brew", "earl-grey")],
                "short and stout",
            )
        })
        .layer(TrackLayer::new(Arc::clone(&metrics), "teapot")),
    );

    let response = app.oneshot(get_request("/teapot")).await.unwrap();
    assert_eq!(response.status(), StatusCode::IM_A_TEAPOT);
    assert_eq!(response.headers()["x-brew"], "earl-grey");
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert_eq!(&body[..], b"short and stout");
    assert_eq!(sample_count(&metrics, "4xx", "teapot", "GET"), 1);
}

#[tokio::test]
async fn method_is_part_of_the_key() {
    let metrics = Arc::new(Metrics::new().unwrap());
    let app = Router::new().route(
        "/items",
        get(|| async { StatusCode::OK })
            .post(|| async { StatusCode::CREATED })
            .layer(TrackLayer::new(Arc::clone(&metrics), "/items")),
    );

    app.clone().oneshot(get_request("/items")).await.unwrap();
    let post = Request::builder()
        .method("POST")
        .uri("/items")
        .body(Body::empty())
        .unwrap();
    app.oneshot(post).await.unwrap();

    assert_eq!(sample_count(&metrics, "2xx", "/items", "GET"), 1);
    assert_eq!(sample_count(&metrics, "2xx", "/items", "POST"), 1);
}

#[tokio::test]
async fn matched_path_aggregates_dynamic_segments() {
    let metrics = Arc::new(Metrics::new().unwrap());
    let app = Router::new()
        .route("/status/:code", get(echo_status))
        .layer(TrackLayer::matched_path(Arc::clone(&metrics)));

    app.clone().oneshot(get_request("/status/200")).await.unwrap();
    app.clone().oneshot(get_request("/status/204")).await.unwrap();
    app.oneshot(get_request("/status/503")).await.unwrap();

    assert_eq!(sample_count(&metrics, "2xx", "/status/:code", "GET"), 2);
    assert_eq!(sample_count(&metrics, "5xx", "/status/:code", "GET"), 1);
    assert_eq!(sample_count(&metrics, "2xx", "/status/200", "GET"), 0);
}

#[tokio::test]
async fn unmatched_requests_share_one_series() {
    let metrics = Arc::new(Metrics::new().unwrap());
    let app = Router::new()
        .route("/users/:id", get(|| async { "user" }))
        .layer(TrackLayer::matched_path(Arc::clone(&metrics)));

    for i in 0..50 {
        let response = app
            .clone()
            .oneshot(get_request(&format!("/scan/{i}")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    assert_eq!(sample_count(&metrics, "4xx", UNMATCHED, "GET"), 50);
    let family = metrics
        .registry()
        .gather()
        .into_iter()
        .find(|f| f.get_name() == "http_response_time")
        .expect("http_response_time gathered");
    assert_eq!(family.get_metric().len(), 1);
}

#[tokio::test]
async fn path_identity_strips_query() {
    let metrics = Arc::new(Metrics::new().unwrap());
    let app = Router::new()
        .route("/status/:code", get(echo_status))
        .layer(TrackLayer::path(Arc::clone(&metrics)));

    app.oneshot(get_request("/status/301?from=old")).await.unwrap();
    assert_eq!(sample_count(&metrics, "3xx", "/status/301", "GET"), 1);
}

#[tokio::test]
async fn handler_can_name_its_request() {
    let metrics = Arc::new(Metrics::new().unwrap());
    let app = Router::new().route(
        "/users/:id",
        get(|Path(id): Path<u64>| async move {
            (Extension(RequestName::new("getUser")), format!("user {id}")).into_response()
        })
        .layer(TrackLayer::new(Arc::clone(&metrics), "/users/:id")),
    );

    app.oneshot(get_request("/users/9")).await.unwrap();
    assert_eq!(sample_count(&metrics, "2xx", "getUser", "GET"), 1);
    assert_eq!(sample_count(&metrics, "2xx", "/users/:id", "GET"), 0);
}

#[tokio::test]
async fn inner_service_error_is_recorded_as_5xx() {
    let metrics = Arc::new(Metrics::new().unwrap());
    let failing = service_fn(|_req: Request<Body>| async {
        Err::<Response<Body>, &'static str>("connection reset")
    });
    let svc = tower::Layer::layer(&TrackLayer::new(Arc::clone(&metrics), "reset"), failing);

    let err = svc
        .oneshot(get_request("/reset"))
        .await
        .err()
        .expect("inner error is forwarded");
    assert_eq!(err, "connection reset");
    assert_eq!(sample_count(&metrics, "5xx", "reset", "GET"), 1);
}

#[tokio::test]
async fn dropped_request_is_still_recorded() {
    let metrics = Arc::new(Metrics::new().unwrap());
    let hanging = service_fn(|_req: Request<Body>| async {
        std::future::pending::<()>().await;
        Ok::<_, Infallible>(Response::new(Body::empty()))
    });
    let svc = tower::Layer::layer(&TrackLayer::new(Arc::clone(&metrics), "hang"), hanging);

    let call = svc.oneshot(get_request("/hang"));
    let timed_out = tokio::time::timeout(std::time::Duration::from_millis(5), call).await;
    assert!(timed_out.is_err());
    assert_eq!(sample_count(&metrics, "5xx", "hang", "GET"), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_requests_are_all_counted() {
    let metrics = Arc::new(Metrics::new().unwrap());
    let app = Router::new()
        .route("/status/:code", get(echo_status))
        .layer(TrackLayer::new(Arc::clone(&metrics), "/status/:code"));

    let codes = [200u16, 302, 404, 500];
    let mut tasks = Vec::new();
    for i in 0..1000 {
        let app = app.clone();
        let code = codes[i % codes.len()];
        tasks.push(tokio::spawn(async move {
            app.oneshot(get_request(&format!("/status/{code}")))
                .await
                .unwrap()
                .status()
        }));
    }
    for task in tasks {
        task.await.unwrap();
    }

    for class in ["2xx", "3xx", "4xx", "5xx"] {
        assert_eq!(sample_count(&metrics, class, "/status/:code", "GET"), 250, "{class}");
    }
}
