//! Shared types for the API layer.

use std::path::PathBuf;
use std::sync::Arc;

use rusqlite::Connection;

use crate::db::sqlite::open_database;
use crate::db::DatabaseError;
use crate::services::extraction::BiomarkerExtractor;
use crate::services::identity::TokenVerifier;
use crate::services::mailer::MailTransport;
use crate::services::reasoning::RecommendationEngine;

/// Shared context for all routes and middleware.
///
/// External collaborators are injected here rather than reached through
/// module-level singletons, so any of them can be swapped for a mock
/// in tests.
#[derive(Clone)]
pub struct ApiContext {
    db_path: Arc<PathBuf>,
    pub extractor: Arc<dyn BiomarkerExtractor>,
    pub reasoner: Arc<dyn RecommendationEngine>,
    pub verifier: Arc<dyn TokenVerifier>,
    pub mailer: Arc<dyn MailTransport>,
}

impl ApiContext {
    pub fn new(
        db_path: PathBuf,
        extractor: Arc<dyn BiomarkerExtractor>,
        reasoner: Arc<dyn RecommendationEngine>,
        verifier: Arc<dyn TokenVerifier>,
        mailer: Arc<dyn MailTransport>,
    ) -> Self {
        Self {
            db_path: Arc::new(db_path),
            extractor,
            reasoner,
            verifier,
            mailer,
        }
    }

    /// Open a connection to the application database. Connections are
    /// opened per request; SQLite in WAL mode handles the concurrency.
    pub fn open_db(&self) -> Result<Connection, DatabaseError> {
        open_database(&self.db_path)
    }
}

/// Authenticated user context, injected into request extensions by the
/// auth middleware after the identity provider confirms the token.
#[derive(Debug, Clone)]
pub struct UserContext {
    pub user_id: String,
    pub email: String,
}
