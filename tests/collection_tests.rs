//! Route registration and configuration.

mod common;

use common::log_capture;
use http::Method;
use switchyard::runtime_config::RuntimeConfig;
use switchyard::strategy::BuiltinStrategy;
use switchyard::{DispatchError, Handler, HandlerRef, RouteCollection, RouteError};

#[test]
fn test_per_verb_helpers_register_the_right_method() {
    let mut routes = RouteCollection::new();
    routes.get("/r", "h").unwrap();
    routes.post("/r", "h").unwrap();
    routes.put("/r", "h").unwrap();
    routes.patch("/r", "h").unwrap();
    routes.delete("/r", "h").unwrap();
    routes.head("/r", "h").unwrap();
    routes.options("/r", "h").unwrap();

    let methods: Vec<Method> = routes.routes().iter().map(|r| r.method().clone()).collect();
    assert_eq!(
        methods,
        vec![
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::HEAD,
            Method::OPTIONS,
        ]
    );
}

#[test]
fn test_handler_reference_forms() {
    let mut routes = RouteCollection::new();
    routes.get("/a", "SomeClass::someMethod").unwrap();
    routes.get("/b", "function_name").unwrap();
    routes.get("/c", String::from("Other::run")).unwrap();
    routes.get("/d", Handler::new(|_| Ok(().into()))).unwrap();

    let handlers: Vec<&HandlerRef> = routes.routes().iter().map(|r| r.handler()).collect();
    assert!(matches!(handlers[0], HandlerRef::Method { class, method } if class == "SomeClass" && method == "someMethod"));
    assert!(matches!(handlers[1], HandlerRef::Function(name) if name == "function_name"));
    assert!(matches!(handlers[2], HandlerRef::Method { .. }));
    assert!(matches!(handlers[3], HandlerRef::Invocable(_)));
}

#[test]
fn test_malformed_registrations_are_rejected() {
    let mut routes = RouteCollection::new();
    assert!(matches!(routes.get("/a", ""), Err(RouteError::InvalidHandler { .. })));
    assert!(matches!(routes.get("/a", "::run"), Err(RouteError::InvalidHandler { .. })));
    assert!(matches!(routes.get("relative", "h"), Err(RouteError::InvalidPattern { .. })));
    assert!(matches!(routes.get("/a/{", "h"), Err(RouteError::InvalidPattern { .. })));
    assert!(matches!(
        routes.add_route(Method::CONNECT, "/a", "h"),
        Err(RouteError::UnsupportedMethod(_))
    ));
    assert!(routes.add_pattern_matcher("has space", "[a-z]+").is_err());

    let err = routes.get("/a", "Class::").unwrap_err();
    assert_eq!(
        err.to_string(),
        "invalid handler `Class::`: missing method name after `::`"
    );
}

#[test]
fn test_duplicate_route_last_registration_wins() {
    let mut routes = RouteCollection::new();
    routes
        .get("/r", Handler::new(|args| Ok(args.into_response().unwrap_or_default().with_content("first").into())))
        .unwrap();

    let logs = log_capture::capture(|| {
        routes
            .get("/r", Handler::new(|args| Ok(args.into_response().unwrap_or_default().with_content("second").into())))
            .unwrap();
    });
    assert!(logs.contents().contains("Route registered twice"));

    let resp = routes
        .dispatcher()
        .dispatch("GET", "/r")
        .unwrap()
        .into_response()
        .unwrap();
    assert_eq!(resp.content(), "second");
    assert_eq!(routes.routes().len(), 1);
}

#[test]
fn test_config_sets_default_strategy_and_head_fallback() {
    let config = RuntimeConfig {
        default_strategy: Some(BuiltinStrategy::Restful),
        head_fallback: false,
        ..RuntimeConfig::default()
    };
    let mut routes = RouteCollection::new().with_config(config);
    routes.get("/r", "h").unwrap();
    let dispatcher = routes.dispatcher();

    let resp = dispatcher.dispatch("HEAD", "/r").unwrap().into_response().unwrap();
    assert_eq!(resp.status, 405);
    assert_eq!(resp.get_header("allow"), Some("GET"));
}

#[test]
fn test_config_from_toml_drives_collection() {
    let config = RuntimeConfig::from_toml_str(r#"default_strategy = "uri""#).unwrap();
    let mut routes = RouteCollection::new().with_config(config);
    routes.get("/r", "h").unwrap();

    assert_eq!(routes.strategy().map(|s| s.name()), Some("uri"));
    assert!(matches!(
        routes.dispatcher().dispatch("GET", "/missing"),
        Err(DispatchError::NotFound)
    ));
}
