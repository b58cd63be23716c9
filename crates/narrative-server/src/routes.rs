//! Route table shared by the HTTP server and the serverless dispatcher.

use axum::{
    body::Body,
    http::{HeaderValue, Method, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    routing::{on, MethodFilter, MethodRouter},
    Router,
};
use std::sync::Arc;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use crate::{api, middleware::request_id_middleware, state::AppState};

/// Operations reachable over HTTP
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Login,
    AuthCallback,
    SaveProfile,
    Posts,
    CreateCheckoutSession,
}

/// One `(method, pattern) -> route` entry
#[derive(Debug)]
pub struct RouteSpec {
    pub route: Route,
    pub method: Method,
    /// Literal segments, or `:name` for exactly one non-empty segment
    pub pattern: &'static str,
}

/// Matched in order; first match wins
pub static ROUTES: [RouteSpec; 5] = [
    RouteSpec {
        route: Route::Login,
        method: Method::GET,
        pattern: "/login",
    },
    RouteSpec {
        route: Route::AuthCallback,
        method: Method::GET,
        pattern: "/auth/callback",
    },
    RouteSpec {
        route: Route::SaveProfile,
        method: Method::POST,
        pattern: "/save-profile",
    },
    RouteSpec {
        route: Route::Posts,
        method: Method::GET,
        pattern: "/tweets/:user_id/:count",
    },
    RouteSpec {
        route: Route::CreateCheckoutSession,
        method: Method::POST,
        pattern: "/create-checkout-session",
    },
];

/// Resolve a method and path against [`ROUTES`]
pub fn resolve(method: &Method, path: &str) -> Option<Route> {
    ROUTES
        .iter()
        .find(|spec| spec.method == *method && matches_pattern(spec.pattern, path))
        .map(|spec| spec.route)
}

fn matches_pattern(pattern: &str, path: &str) -> bool {
    let mut pattern_segments = pattern.split('/');
    let mut path_segments = path.split('/');

    loop {
        match (pattern_segments.next(), path_segments.next()) {
            (None, None) => return true,
            (Some(expected), Some(actual)) => {
                let matched = if expected.starts_with(':') {
                    !actual.is_empty()
                } else {
                    expected == actual
                };
                if !matched {
                    return false;
                }
            }
            _ => return false,
        }
    }
}

/// Response for anything outside the table
pub async fn not_found() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, "Not found")
}

/// Answer 404 for any request the table does not list exactly
///
/// axum serves `HEAD` through `GET` handlers; the table does not.
async fn route_guard(req: Request<Body>, next: Next) -> Response {
    if resolve(req.method(), req.uri().path()).is_none() {
        tracing::debug!(method = %req.method(), path = %req.uri().path(), "No route for request");
        return not_found().await.into_response();
    }
    next.run(req).await
}

fn handler_for(spec: &RouteSpec) -> Option<MethodRouter<Arc<AppState>>> {
    let filter = match MethodFilter::try_from(spec.method.clone()) {
        Ok(filter) => filter,
        Err(_) => {
            tracing::warn!(pattern = spec.pattern, method = %spec.method, "Unroutable method");
            return None;
        }
    };

    let router = match spec.route {
        Route::Login => on(filter, api::auth::login),
        Route::AuthCallback => on(filter, api::auth::auth_callback),
        Route::SaveProfile => on(filter, api::profile::save_profile),
        Route::Posts => on(filter, api::posts::get_posts),
        Route::CreateCheckoutSession => on(filter, api::checkout::create_checkout_session),
    };

    Some(router.fallback(not_found))
}

fn build_cors_layer(allowed_origins: &[String]) -> CorsLayer {
    use axum::http::header::CONTENT_TYPE;

    if allowed_origins.is_empty() {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE])
        .allow_origin(AllowOrigin::list(origins))
}

/// Build the HTTP router from [`ROUTES`]
pub fn create_router(state: Arc<AppState>) -> Router {
    let cors = build_cors_layer(&state.config.allowed_origins);

    ROUTES
        .iter()
        .filter_map(|spec| handler_for(spec).map(|handler| (spec.pattern, handler)))
        .fold(Router::new(), |router, (pattern, handler)| router.route(pattern, handler))
        .fallback(not_found)
        .layer(axum::middleware::from_fn(route_guard))
        .layer(axum::middleware::from_fn(request_id_middleware))
        .layer(
            // Path only; callback query strings carry codes and state
            TraceLayer::new_for_http().make_span_with(|req: &Request<Body>| {
                tracing::info_span!("http", method = %req.method(), path = %req.uri().path())
            }),
        )
        .layer(cors)
        .with_state(state)
}
