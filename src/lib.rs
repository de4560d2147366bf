//! Root crate facade for the SharePaste server.

pub use sharepaste_server::{
    body_limit_for, config, create_app, credentials, db, detection, error, handlers, models,
    paste_ops, resolve_bind_address, serve_router, spawn_expiry_sweeper, sweep_once, AppError,
    AppState, Config, CredentialGuard, Database, OriginHasher, DEFAULT_PORT,
};
