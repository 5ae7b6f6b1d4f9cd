use std::path::PathBuf;

use db::DBService;

pub mod error;
pub mod middleware;
pub mod routes;

/// Application state handed to every handler. Constructed once in `main`
/// (or by a test harness) and cloned into the router; nothing here is a
/// process-wide global.
#[derive(Clone)]
pub struct AppState {
    db: DBService,
    uploads_dir: PathBuf,
}

impl AppState {
    pub fn new(db: DBService, uploads_dir: PathBuf) -> Self {
        Self { db, uploads_dir }
    }

    pub fn db(&self) -> &DBService {
        &self.db
    }

    pub fn uploads_dir(&self) -> &PathBuf {
        &self.uploads_dir
    }
}
