//! HTTP server wiring for SharePaste (API, handlers, and shared state).

/// HTTP error mapping for API handlers.
pub mod error;
/// JSON extractors with API-shaped rejections.
pub mod extract;
/// HTTP handlers for paste, detection, and health endpoints.
pub mod handlers;
/// Background expiry sweeper.
pub mod sweeper;

pub use sharepaste_core::{
    config, credentials, db, detection, models, paste_ops, AppError, Config, CredentialGuard,
    Database, OriginHasher, DEFAULT_PORT,
};
pub use sweeper::{spawn_expiry_sweeper, sweep_once};

use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderValue, Method},
    routing::{get, post},
    Router,
};
use hyper::HeaderMap;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{
    compression::CompressionLayer, cors::CorsLayer, set_header::SetResponseHeaderLayer,
    trace::TraceLayer,
};

/// Slack on top of the content ceiling for JSON escaping and the other fields.
/// The core still enforces the exact byte limit on `content`.
const BODY_LIMIT_OVERHEAD: usize = 64 * 1024;

/// Shared state passed to HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<Database>,
    pub config: Arc<Config>,
    pub guard: Arc<CredentialGuard>,
    pub origin: Arc<OriginHasher>,
}

impl AppState {
    /// Construct shared application state.
    ///
    /// # Arguments
    /// - `config`: Loaded configuration.
    /// - `db`: Open database handle.
    ///
    /// # Returns
    /// A new [`AppState`] with the password hasher and origin hasher built
    /// from `config`.
    ///
    /// # Errors
    /// Returns [`AppError::Credential`] when the configured hash cost is invalid.
    pub fn new(config: Config, db: Database) -> Result<Self, AppError> {
        let guard = CredentialGuard::new(config.hash_cost)?;
        let origin = OriginHasher::from_config(config.origin_secret.as_deref());
        Ok(Self::with_parts(config, Arc::new(db), guard, origin))
    }

    /// Construct shared application state from pre-built parts.
    ///
    /// # Returns
    /// A new [`AppState`] sharing `db` with any other holder (e.g. the sweeper).
    pub fn with_parts(
        config: Config,
        db: Arc<Database>,
        guard: CredentialGuard,
        origin: OriginHasher,
    ) -> Self {
        Self {
            db,
            config: Arc::new(config),
            guard: Arc::new(guard),
            origin: Arc::new(origin),
        }
    }
}

/// Create the application router with all routes and middleware.
///
/// # Arguments
/// - `state`: Shared application state.
/// - `allow_public_access`: Whether to allow cross-origin requests from any origin.
///
/// # Returns
/// Configured `axum::Router`.
///
/// # Panics
/// Panics if the CORS origin for `state.config.port` fails to parse (should not happen).
pub fn create_app(state: AppState, allow_public_access: bool) -> Router {
    let cors_port = state.config.port;
    create_app_with_cors_port(state, allow_public_access, cors_port)
}

/// Request body ceiling for a given content limit.
pub fn body_limit_for(max_paste_size: usize) -> usize {
    max_paste_size
        .saturating_mul(2)
        .saturating_add(BODY_LIMIT_OVERHEAD)
}

/// Resolve the listener address from env var overrides and security policy.
///
/// # Arguments
/// - `config`: Server configuration containing the configured `port`.
/// - `allow_public_access`: Whether non-loopback bind targets are permitted.
///
/// # Returns
/// A validated socket address that enforces loopback when public access is disabled.
pub fn resolve_bind_address(config: &Config, allow_public_access: bool) -> SocketAddr {
    let default_bind = SocketAddr::from(([127, 0, 0, 1], config.port));
    let requested = match std::env::var("BIND") {
        Ok(value) => match value.trim().parse::<SocketAddr>() {
            Ok(addr) => addr,
            Err(err) => {
                tracing::warn!(
                    "Invalid BIND='{}': {}. Falling back to {}",
                    value,
                    err,
                    default_bind
                );
                default_bind
            }
        },
        Err(_) => default_bind,
    };

    if allow_public_access || requested.ip().is_loopback() {
        return requested;
    }

    tracing::warn!(
        "Non-loopback bind {} requested without ALLOW_PUBLIC_ACCESS; forcing 127.0.0.1",
        requested
    );
    SocketAddr::from(([127, 0, 0, 1], requested.port()))
}

fn security_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(
        header::X_CONTENT_TYPE_OPTIONS,
        HeaderValue::from_static("nosniff"),
    );
    headers.insert(header::X_FRAME_OPTIONS, HeaderValue::from_static("DENY"));
    headers.insert(
        header::CONTENT_SECURITY_POLICY,
        HeaderValue::from_static("default-src 'none'; frame-ancestors 'none'; base-uri 'none'"),
    );
    headers.insert(
        header::REFERRER_POLICY,
        HeaderValue::from_static("no-referrer"),
    );
    headers
}

fn cors_layer(allow_public_access: bool, cors_port: u16) -> CorsLayer {
    let methods = [Method::GET, Method::POST, Method::DELETE];
    if allow_public_access {
        CorsLayer::new()
            .allow_origin(tower_http::cors::Any)
            .allow_methods(methods)
            .allow_headers(tower_http::cors::Any)
    } else {
        let origins: [HeaderValue; 2] = [
            format!("http://localhost:{}", cors_port).parse().unwrap(),
            format!("http://127.0.0.1:{}", cors_port).parse().unwrap(),
        ];
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(methods)
            .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
    }
}

fn create_app_with_cors_port(state: AppState, allow_public_access: bool, cors_port: u16) -> Router {
    let body_limit = body_limit_for(state.config.max_paste_size);

    let mut router = Router::new()
        .route("/api/pastes", post(handlers::paste::create_paste))
        .route(
            "/api/pastes/:id",
            get(handlers::paste::get_paste).delete(handlers::paste::delete_paste),
        )
        .route("/api/pastes/:id/verify", post(handlers::paste::verify_paste))
        .route("/api/detect", post(handlers::meta::detect_language))
        .route("/api/health", get(handlers::meta::health))
        .fallback(handlers::meta::not_found)
        .with_state(state)
        .layer(
            tower::ServiceBuilder::new()
                .layer(DefaultBodyLimit::max(body_limit))
                .layer(TraceLayer::new_for_http())
                .layer(CompressionLayer::new())
                .layer(cors_layer(allow_public_access, cors_port)),
        );

    for (name, value) in security_headers() {
        if let Some(name) = name {
            router = router.layer(SetResponseHeaderLayer::overriding(name, value));
        }
    }
    router
}

fn listener_cors_port(listener: &tokio::net::TcpListener, fallback_port: u16) -> u16 {
    listener
        .local_addr()
        .map(|addr| addr.port())
        .unwrap_or(fallback_port)
}

/// Run the Axum server with graceful shutdown support.
///
/// The peer address of every connection is recorded so handlers can derive
/// the requester hash.
///
/// # Arguments
/// - `listener`: Bound TCP listener for the server.
/// - `state`: Shared application state.
/// - `allow_public_access`: Whether to allow cross-origin requests from any origin.
/// - `shutdown_signal`: Future that resolves when shutdown should start.
///
/// # Returns
/// `Ok(())` when the server exits cleanly.
///
/// # Errors
/// Returns any I/O error produced by `axum::serve`.
pub async fn serve_router(
    listener: tokio::net::TcpListener,
    state: AppState,
    allow_public_access: bool,
    shutdown_signal: impl Future<Output = ()> + Send + 'static,
) -> Result<(), std::io::Error> {
    let cors_port = listener_cors_port(&listener, state.config.port);
    let app = create_app_with_cors_port(state, allow_public_access, cors_port);
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal)
    .await
}

#[cfg(test)]
mod tests {
    use super::{
        body_limit_for, listener_cors_port, resolve_bind_address, security_headers, AppState,
    };
    use sharepaste_core::config::Config;
    use sharepaste_core::credentials::HashCost;
    use sharepaste_core::env::{env_lock, EnvGuard};
    use sharepaste_core::{Database, DEFAULT_PORT};
    use std::net::SocketAddr;

    fn config_with_port(port: u16) -> Config {
        Config {
            db_path: String::from("/tmp/sharepaste-db"),
            port,
            max_paste_size: 1024,
            sweep_interval_secs: 0,
            hash_cost: HashCost::default(),
            origin_secret: None,
        }
    }

    #[tokio::test]
    async fn listener_cors_port_uses_bound_listener_port() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("listener");
        let expected = listener.local_addr().expect("listener addr").port();
        let resolved = listener_cors_port(&listener, DEFAULT_PORT);
        assert_eq!(resolved, expected);
    }

    #[test]
    fn resolve_bind_address_enforces_loopback_when_public_access_disabled() {
        let _lock = env_lock().lock().expect("env lock");
        let _bind = EnvGuard::set("BIND", "0.0.0.0:4040");
        let resolved = resolve_bind_address(&config_with_port(4040), false);
        assert_eq!(resolved.ip().to_string(), "127.0.0.1");
        assert_eq!(resolved.port(), 4040);

        let public = resolve_bind_address(&config_with_port(4040), true);
        assert_eq!(public, SocketAddr::from(([0, 0, 0, 0], 4040)));
    }

    #[test]
    fn resolve_bind_address_allows_loopback_and_invalid_fallback() {
        let _lock = env_lock().lock().expect("env lock");
        let config = config_with_port(4041);
        {
            let _bind = EnvGuard::remove("BIND");
            let loopback = resolve_bind_address(&config, false);
            assert_eq!(loopback, SocketAddr::from(([127, 0, 0, 1], 4041)));
        }

        let _bind = EnvGuard::set("BIND", "bad:host");
        let fallback = resolve_bind_address(&config, false);
        assert_eq!(fallback, SocketAddr::from(([127, 0, 0, 1], 4041)));
    }

    #[test]
    fn body_limit_leaves_room_for_json_escaping() {
        assert_eq!(body_limit_for(1024), 2048 + 64 * 1024);
        assert_eq!(body_limit_for(usize::MAX), usize::MAX);
    }

    #[test]
    fn security_headers_are_static_and_complete() {
        let headers = security_headers();
        assert_eq!(headers.len(), 4);
        assert_eq!(headers["x-frame-options"], "DENY");
    }

    #[test]
    fn app_state_builds_hashers_from_config_and_rejects_bad_cost() {
        let temp_dir = tempfile::TempDir::new().expect("temp dir");
        let db_path = temp_dir.path().join("db");
        let mut config = config_with_port(4042);
        config.db_path = db_path.to_str().expect("db path").to_string();
        config.hash_cost = HashCost {
            memory_kib: 8,
            iterations: 1,
            parallelism: 1,
        };
        let db = Database::new(&config.db_path).expect("db");
        let state = AppState::new(config.clone(), db).expect("state");
        assert_eq!(state.config.port, 4042);
        let hash = state.guard.hash_password("pw").expect("hash");
        assert!(state.guard.verify_password("pw", &hash).expect("verify"));
        drop(state);

        config.hash_cost.memory_kib = 1;
        let db = Database::new(&config.db_path).expect("reopen db");
        let err = AppState::new(config, db).err().expect("invalid hash cost");
        assert!(matches!(err, sharepaste_core::AppError::Credential(_)));
    }
}
