use super::{compile, MatchResult, PatternMatchers, Route, Router};
use crate::error::RouteError;
use crate::handler::HandlerRef;
use crate::runtime_config::RuntimeConfig;
use http::Method;
use std::sync::Arc;

fn route(method: Method, pattern: &str, handler: &str) -> Arc<Route> {
    let compiled = compile(pattern, &PatternMatchers::default()).unwrap();
    Arc::new(Route::new(
        method,
        pattern.to_string(),
        compiled,
        HandlerRef::Function(handler.to_string()),
    ))
}

fn handler_of(result: &MatchResult) -> Option<String> {
    match result {
        MatchResult::Found(m) => Some(m.route.handler().to_string()),
        _ => None,
    }
}

#[test]
fn test_root_path() {
    let compiled = compile("/", &PatternMatchers::default()).unwrap();
    assert!(compiled.is_static());
    assert!(compiled.captures("/").is_some());
    assert!(compiled.captures("/x").is_none());
}

#[test]
fn test_parameterized_path() {
    let compiled = compile("/items/{id}", &PatternMatchers::default()).unwrap();
    let params = compiled.captures("/items/123").unwrap();
    assert_eq!(params.len(), 1);
    assert_eq!(params[0].0.as_ref(), "id");
    assert_eq!(params[0].1, "123");
    assert!(compiled.captures("/items/123/extra").is_none());
}

#[test]
fn test_params_in_declaration_order() {
    let compiled = compile("/route/{id}/{name}", &PatternMatchers::default()).unwrap();
    let params = compiled.captures("/route/2/phil").unwrap();
    let values: Vec<&str> = params.iter().map(|(_, v)| v.as_str()).collect();
    assert_eq!(values, vec!["2", "phil"]);
}

#[test]
fn test_typed_alias_is_rewritten() {
    let compiled = compile("/users/{id:number}", &PatternMatchers::default()).unwrap();
    assert_eq!(compiled.expanded(), "/users/{id:[0-9]+}");
    assert!(compiled.captures("/users/42").is_some());
    assert!(compiled.captures("/users/abc").is_none());
}

#[test]
fn test_inline_regex_with_braces_and_groups() {
    let compiled = compile(
        "/archive/{year:[0-9]{4}}/{slug:(draft|post)-[a-z]+}",
        &PatternMatchers::default(),
    )
    .unwrap();
    let params = compiled.captures("/archive/2024/post-hello").unwrap();
    assert_eq!(params[0].1, "2024");
    assert_eq!(params[1].0.as_ref(), "slug");
    assert_eq!(params[1].1, "post-hello");
    assert!(compiled.captures("/archive/24/post-hello").is_none());
}

#[test]
fn test_literal_segments_are_escaped() {
    let compiled = compile("/files/{name}.json", &PatternMatchers::default()).unwrap();
    assert!(compiled.captures("/files/report.json").is_some());
    assert!(compiled.captures("/files/reportXjson").is_none());
}

#[test]
fn test_invalid_patterns_are_rejected() {
    let matchers = PatternMatchers::default();
    for bad in ["", "no-slash", "/a/{id", "/a/id}", "/a/{id}/{id}", "/a/{1x}", "/a/{id:}", "/a/{id:[}"] {
        assert!(
            matches!(compile(bad, &matchers), Err(RouteError::InvalidPattern { .. })),
            "expected `{bad}` to be rejected"
        );
    }
}

#[test]
fn test_custom_matcher_rule_introspection() {
    let mut matchers = PatternMatchers::default();
    matchers.add("mockMatcher", "[a-zA-Z]").unwrap();

    assert_eq!(matchers.get("mockMatcher"), Some("[a-zA-Z]"));
    let (rule, replacement) = matchers.rules().last().unwrap();
    assert!(rule.contains("mockMatcher"));
    assert_eq!(replacement, "{${1}:[a-zA-Z]}");

    let compiled = compile("/tag/{t:mockMatcher}", &matchers).unwrap();
    assert_eq!(compiled.expanded(), "/tag/{t:[a-zA-Z]}");
}

#[test]
fn test_matcher_fragment_with_dollar_survives_rewrite() {
    let mut matchers = PatternMatchers::empty();
    matchers.add("tail", "[a-z]+$").unwrap();
    assert_eq!(matchers.apply("/{x:tail}"), "/{x:[a-z]+$}");
}

#[test]
fn test_invalid_matcher_is_rejected() {
    let mut matchers = PatternMatchers::default();
    assert!(matchers.add("bad name", "[a-z]").is_err());
    assert!(matchers.add("ok", "[a-z").is_err());
    assert_eq!(matchers.len(), 3);
}

#[test]
fn test_router_found_and_not_found() {
    let router = Router::new(
        vec![route(Method::GET, "/zoo/animals/{id}", "get_animal")],
        &RuntimeConfig::default(),
    );
    assert_eq!(
        handler_of(&router.route(&Method::GET, "/zoo/animals/7")).as_deref(),
        Some("get_animal")
    );
    assert!(matches!(
        router.route(&Method::GET, "/zoo/plants"),
        MatchResult::NotFound
    ));
}

#[test]
fn test_method_not_allowed_lists_registration_order() {
    let router = Router::new(
        vec![
            route(Method::POST, "/route", "handler"),
            route(Method::PUT, "/route", "handler"),
            route(Method::DELETE, "/route", "handler"),
            route(Method::PUT, "/{any}", "other"),
        ],
        &RuntimeConfig::default(),
    );
    match router.route(&Method::GET, "/route") {
        MatchResult::MethodNotAllowed(allowed) => {
            assert_eq!(allowed, vec![Method::POST, Method::PUT, Method::DELETE]);
        }
        other => panic!("expected MethodNotAllowed, got {other:?}"),
    }
}

#[test]
fn test_static_route_wins_over_dynamic() {
    let router = Router::new(
        vec![
            route(Method::GET, "/users/{id}", "show_user"),
            route(Method::GET, "/users/new", "new_user"),
        ],
        &RuntimeConfig::default(),
    );
    assert_eq!(
        handler_of(&router.route(&Method::GET, "/users/new")).as_deref(),
        Some("new_user")
    );
    assert_eq!(
        handler_of(&router.route(&Method::GET, "/users/9")).as_deref(),
        Some("show_user")
    );
}

#[test]
fn test_head_falls_back_to_get() {
    let routes = vec![route(Method::GET, "/health", "health")];
    let router = Router::new(routes.clone(), &RuntimeConfig::default());
    assert_eq!(
        handler_of(&router.route(&Method::HEAD, "/health")).as_deref(),
        Some("health")
    );

    let config = RuntimeConfig {
        head_fallback: false,
        ..RuntimeConfig::default()
    };
    let strict = Router::new(routes, &config);
    assert!(matches!(
        strict.route(&Method::HEAD, "/health"),
        MatchResult::MethodNotAllowed(_)
    ));
}
