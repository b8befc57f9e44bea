//! End-to-end dispatch through the composed Axum router.

use axum::extract::Request;
use axum::http::StatusCode;
use nest_router::{from_fn, App, Next, PathParamsExt, Router};

mod common;

use common::{call_log, entries, recording, send, send_to};

#[tokio::test]
async fn test_methods_dispatch_with_trailing_slash() {
    let app = App::new();
    app.get("/test", |_req: Request| async { (StatusCode::OK, "got") })
        .post("/test", |_req: Request| async { (StatusCode::CREATED, "posted") })
        .put("/test", |_req: Request| async { (StatusCode::ACCEPTED, "put") })
        .delete("/test", |_req: Request| async { StatusCode::NO_CONTENT });
    let router = app.into_router().unwrap();

    assert_eq!(send_to(&router, "GET", "/test/").await, (StatusCode::OK, "got".into()));
    assert_eq!(send_to(&router, "GET", "/test").await, (StatusCode::OK, "got".into()));
    assert_eq!(send_to(&router, "POST", "/test/").await, (StatusCode::CREATED, "posted".into()));
    assert_eq!(send_to(&router, "PUT", "/test/").await, (StatusCode::ACCEPTED, "put".into()));
    assert_eq!(send_to(&router, "DELETE", "/test/").await.0, StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn test_response_matches_direct_invocation() {
    let app = App::new();
    app.get("/test", |_req: Request| async { (StatusCode::IM_A_TEAPOT, "brewed") });

    let (status, body) = send(app, "GET", "/test/").await;
    assert_eq!(status, StatusCode::IM_A_TEAPOT);
    assert_eq!(body, "brewed");
}

#[tokio::test]
async fn test_unmatched_paths_are_not_found() {
    let app = App::new();
    app.get("/hello", |_req: Request| async { "hi" })
        .get("/api/v1/users", |_req: Request| async { "users" });
    let router = app.into_router().unwrap();

    assert_eq!(send_to(&router, "GET", "/hello/").await.0, StatusCode::OK);
    assert_eq!(send_to(&router, "GET", "/api/v1/users/").await.0, StatusCode::OK);

    for uri in ["/nonexistent/", "/hello/world/", "/api/v1/", "/api/v1/users/7/"] {
        assert_eq!(send_to(&router, "GET", uri).await.0, StatusCode::NOT_FOUND, "{uri}");
    }
}

#[tokio::test]
async fn test_mounted_routers_dispatch() {
    let app = App::new();
    app.get("/root", |_req: Request| async { "root" });

    let router1 = Router::new();
    router1.get("/sub1", |_req: Request| async { "sub1" });
    app.mount("/api1", &router1);

    let router2 = Router::new();
    router2.get("/sub2", |_req: Request| async { "sub2" });
    app.mount("/api2", &router2);

    let router = app.into_router().unwrap();
    assert_eq!(send_to(&router, "GET", "/root/").await.1, "root");
    assert_eq!(send_to(&router, "GET", "/api1/sub1/").await.1, "sub1");
    assert_eq!(send_to(&router, "GET", "/api2/sub2/").await.1, "sub2");
    assert_eq!(send_to(&router, "GET", "/api1/sub2/").await.0, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_duplicate_app_mount_keeps_first() {
    let app = App::new();
    let first = Router::new();
    first.get("/x", |_req: Request| async { "first" });
    let second = Router::new();
    second.get("/x", |_req: Request| async { "second" });
    app.mount("/dup", &first).mount("/dup", &second);

    assert_eq!(send(app, "GET", "/dup/x").await.1, "first");
}

#[tokio::test]
async fn test_duplicate_route_keeps_first_handler() {
    let app = App::new();
    app.get("/once", |_req: Request| async { "first" })
        .get("/once", |_req: Request| async { "second" });

    assert_eq!(app.routes().len(), 1);
    assert_eq!(send(app, "GET", "/once").await.1, "first");
}

#[tokio::test]
async fn test_global_middleware_order() {
    let log = call_log();
    let app = App::new();
    app.use_middleware(recording(&log, "globalMw1"))
        .use_middleware(recording(&log, "globalMw2"));

    let handler_log = log.clone();
    app.get("/test", move |_req: Request| {
        handler_log.lock().unwrap().push("finalHandler".into());
        async { "route handled" }
    });

    let (_, body) = send(app, "GET", "/test/").await;
    assert_eq!(entries(&log), vec!["globalMw1", "globalMw2", "finalHandler"]);
    assert_eq!(body, "route handled");
}

#[tokio::test]
async fn test_router_middleware_order() {
    let log = call_log();
    let app = App::new();
    let rtr = Router::new();
    rtr.use_middleware(recording(&log, "routerMw1"))
        .use_middleware(recording(&log, "routerMw2"));

    let handler_log = log.clone();
    rtr.get("/subroute", move |_req: Request| {
        handler_log.lock().unwrap().push("finalSubHandler".into());
        async { "subroute handled" }
    });
    app.mount("/api", &rtr);

    let (_, body) = send(app, "GET", "/api/subroute/").await;
    assert_eq!(entries(&log), vec!["routerMw1", "routerMw2", "finalSubHandler"]);
    assert_eq!(body, "subroute handled");
}

#[tokio::test]
async fn test_deep_nested_middleware_order() {
    let log = call_log();
    let app = App::new();
    app.use_middleware(recording(&log, "g"));

    let r1 = Router::new();
    r1.use_middleware(recording(&log, "a"))
        .use_middleware(recording(&log, "b"));
    let r2 = Router::new();
    r2.use_middleware(recording(&log, "c"));

    let handler_log = log.clone();
    r2.get("/resource", move |_req: Request| {
        handler_log.lock().unwrap().push("h".into());
        async { "resource handled" }
    });

    r1.mount("/nested", &r2);
    app.mount("/api", &r1);

    let (status, body) = send(app, "GET", "/api/nested/resource/").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(entries(&log), vec!["g", "a", "b", "c", "h"]);
    assert_eq!(body, "resource handled");
}

#[tokio::test]
async fn test_middleware_can_halt() {
    let log = call_log();
    let app = App::new();

    let halt_log = log.clone();
    app.use_middleware(from_fn(move |_req: Request, _next: Next| {
        halt_log.lock().unwrap().push("haltingMw".to_string());
        async { StatusCode::UNAUTHORIZED }
    }));
    app.use_middleware(recording(&log, "afterHalt"));

    let inner = Router::new();
    inner.use_middleware(recording(&log, "routerMw"));
    let handler_log = log.clone();
    inner.get("/protected", move |_req: Request| {
        handler_log.lock().unwrap().push("finalHandler".into());
        async { "protected content" }
    });
    app.mount("/secure", &inner);

    let (status, body) = send(app, "GET", "/secure/protected/").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, "");
    assert_eq!(entries(&log), vec!["haltingMw"]);
}

#[tokio::test]
async fn test_middleware_can_modify_request() {
    #[derive(Clone)]
    struct UserId(&'static str);

    let app = App::new();
    app.use_middleware(from_fn(|mut req: Request, next: Next| async move {
        req.extensions_mut().insert(UserId("123"));
        next.run(req).await
    }));
    app.get("/info", |req: Request| async move {
        req.extensions()
            .get::<UserId>()
            .map(|u| u.0)
            .unwrap_or_default()
    });

    assert_eq!(send(app, "GET", "/info/").await, (StatusCode::OK, "123".into()));
}

#[tokio::test]
async fn test_path_parameter() {
    let app = App::new();
    app.get("/users/{id}", |req: Request| async move {
        format!("User ID: {}", req.path_param("id").unwrap_or_default())
    });

    assert_eq!(send(app, "GET", "/users/123/").await.1, "User ID: 123");
}

#[tokio::test]
async fn test_multiple_path_parameters() {
    let app = App::new();
    app.get("/users/{userID}/books/{bookID}", |req: Request| async move {
        format!(
            "User: {}, Book: {}",
            req.path_param("userID").unwrap_or_default(),
            req.path_param("bookID").unwrap_or_default()
        )
    });

    assert_eq!(
        send(app, "GET", "/users/user456/books/book789/").await.1,
        "User: user456, Book: book789"
    );
}

#[tokio::test]
async fn test_nested_path_parameters_from_mount_prefix() {
    let app = App::new();
    let main_router = Router::new();
    let sub_router = Router::new();

    sub_router.get("/reviews/{reviewID}", |req: Request| async move {
        format!(
            "Product: {}, Review: {}",
            req.path_param("productID").unwrap_or_default(),
            req.path_param("reviewID").unwrap_or_default()
        )
    });
    main_router.mount("/products/{productID}", &sub_router);
    app.mount("/store", &main_router);

    assert_eq!(
        send(app, "GET", "/store/products/prodA/reviews/revB/").await.1,
        "Product: prodA, Review: revB"
    );
}

#[tokio::test]
async fn test_path_parameter_visible_to_middleware() {
    let app = App::new();
    app.use_middleware(from_fn(|req: Request, next: Next| async move {
        assert_eq!(req.path_param("id"), Some("42"));
        next.run(req).await
    }));
    app.get("/items/{id}", |req: Request| async move {
        format!("Item ID: {}", req.path_param("id").unwrap_or_default())
    });

    let (status, body) = send(app, "GET", "/items/42/").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "Item ID: 42");
}

#[tokio::test]
async fn test_path_parameter_is_decoded() {
    let app = App::new();
    app.get("/files/{name}", |req: Request| async move {
        req.path_param("name").unwrap_or_default().to_string()
    });

    assert_eq!(send(app, "GET", "/files/a%20b").await, (StatusCode::OK, "a b".into()));
}

#[tokio::test]
async fn test_widget_trailing_slash_and_extra_segment() {
    let app = App::new();
    app.get("/widgets/{id}", |req: Request| async move {
        format!("Widget ID: {}", req.path_param("id").unwrap_or_default())
    });
    let router = app.into_router().unwrap();

    assert_eq!(send_to(&router, "GET", "/widgets/55/").await.1, "Widget ID: 55");
    assert_eq!(send_to(&router, "GET", "/widgets/55").await.1, "Widget ID: 55");
    assert_eq!(
        send_to(&router, "GET", "/widgets/55/extra/").await.0,
        StatusCode::NOT_FOUND
    );
}

#[tokio::test]
async fn test_routes_added_after_mount_are_served() {
    let app = App::new();
    let late = Router::new();
    app.mount("/late", &late);
    late.get("/ping", |_req: Request| async { "pong" });

    assert_eq!(send(app, "GET", "/late/ping").await.1, "pong");
}

#[tokio::test]
async fn test_wrong_method_is_rejected() {
    let app = App::new();
    app.get("/only-get", |_req: Request| async { "ok" });

    let (status, _) = send(app, "POST", "/only-get/").await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
}
