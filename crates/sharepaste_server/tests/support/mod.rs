//! Shared integration-test server bootstrap helpers.

use axum_test::TestServer;
use sharepaste_server::{
    create_app, credentials::HashCost, AppState, Config, CredentialGuard, Database, OriginHasher,
};
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;

pub(crate) fn test_config_for_db_path(db_path: &Path) -> Config {
    Config {
        port: 0,
        db_path: db_path.to_str().expect("db path").to_string(),
        max_paste_size: 1024 * 1024,
        sweep_interval_secs: 0,
        hash_cost: HashCost {
            memory_kib: 8,
            iterations: 1,
            parallelism: 1,
        },
        origin_secret: Some("integration-origin-secret".to_string()),
    }
}

pub(crate) fn test_server_for_config(config: Config) -> (TestServer, Arc<Database>) {
    let db = Arc::new(Database::new(config.db_path.as_str()).expect("open db"));
    let guard = CredentialGuard::new(config.hash_cost).expect("hash cost");
    let origin = OriginHasher::from_config(config.origin_secret.as_deref());
    let state = AppState::with_parts(config, db.clone(), guard, origin);
    let app = create_app(state, false);
    let server = TestServer::new(app).expect("server");
    (server, db)
}

pub(crate) fn setup_test_server() -> (TestServer, TempDir, Arc<Database>) {
    let temp_dir = TempDir::new().expect("temp dir");
    let db_path = temp_dir.path().join("db");
    let config = test_config_for_db_path(&db_path);
    let (server, db) = test_server_for_config(config);
    (server, temp_dir, db)
}
