use sea_orm::DatabaseConnection;

use crate::handlers::cookie::CookieSettings;
use crate::infra::db::{DbMicropostRepository, DbRelationshipRepository, DbUserRepository};

/// Shared application state passed to every handler via axum `State`.
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub cookie: CookieSettings,
}

impl AppState {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            db,
            cookie: CookieSettings::default(),
        }
    }

    pub fn user_repo(&self) -> DbUserRepository {
        DbUserRepository {
            db: self.db.clone(),
        }
    }

    pub fn relationship_repo(&self) -> DbRelationshipRepository {
        DbRelationshipRepository {
            db: self.db.clone(),
        }
    }

    pub fn micropost_repo(&self) -> DbMicropostRepository {
        DbMicropostRepository {
            db: self.db.clone(),
        }
    }
}

impl AsRef<DatabaseConnection> for AppState {
    fn as_ref(&self) -> &DatabaseConnection {
        &self.db
    }
}
