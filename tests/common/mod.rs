#![allow(dead_code)]

use axum::extract::Request;
use axum::routing::get;
use axum::{Router, ServiceExt};
use axum_test::TestServer;
use sqlx::PgPool;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use url_shortening::api::handlers::health_handler;
use url_shortening::api::routes::mapping_routes;
use url_shortening::infrastructure::persistence::{MemoryMappingRepository, PgMappingRepository};
use url_shortening::routes::app_router;
use url_shortening::state::AppState;
use url_shortening::utils::code_generator::{CodeGenerator, HashCodeGenerator};

pub const BASE_URL: &str = "http://localhost:3000";

/// Generator that hands out a fixed list of codes in a loop.
///
/// A short list forces collisions on purpose.
pub struct CyclingGenerator {
    codes: Vec<String>,
    next: AtomicUsize,
}

impl CyclingGenerator {
    pub fn new(codes: &[&str]) -> Self {
        Self {
            codes: codes.iter().map(|c| c.to_string()).collect(),
            next: AtomicUsize::new(0),
        }
    }
}

impl CodeGenerator for CyclingGenerator {
    fn generate(&self, _url: &str) -> String {
        let i = self.next.fetch_add(1, Ordering::Relaxed);
        self.codes[i % self.codes.len()].clone()
    }
}

pub fn create_memory_state() -> (AppState, Arc<MemoryMappingRepository>) {
    create_memory_state_with(Arc::new(HashCodeGenerator::default()), 5)
}

pub fn create_memory_state_with(
    generator: Arc<dyn CodeGenerator>,
    max_attempts: u32,
) -> (AppState, Arc<MemoryMappingRepository>) {
    let repository = Arc::new(MemoryMappingRepository::new());
    let state = AppState::new(repository.clone(), generator, max_attempts, BASE_URL);
    (state, repository)
}

pub fn create_pg_state(pool: PgPool) -> AppState {
    let repository = Arc::new(PgMappingRepository::new(Arc::new(pool)));
    AppState::new(
        repository,
        Arc::new(HashCodeGenerator::default()),
        5,
        BASE_URL,
    )
}

pub fn make_server(state: AppState) -> TestServer {
    let app = Router::new()
        .merge(mapping_routes())
        .route("/health", get(health_handler))
        .with_state(state);
    TestServer::new(app).unwrap()
}

/// Serves the production router, with tracing and trailing-slash normalization.
pub fn make_app_server(state: AppState) -> TestServer {
    let app = ServiceExt::<Request>::into_make_service(app_router(state));
    TestServer::new(app).unwrap()
}
