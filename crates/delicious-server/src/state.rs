use std::sync::Arc;

use delicious_core::{
    accounts::{MemoryUsers, UserRepository},
    config::Config,
    reviews::{MemoryReviews, ReviewRepository},
    store::{MemoryStore, StoreRepository},
};

use crate::{
    auth::Sessions,
    mail::{LogMailer, Mailer},
    photos::PhotoIntake,
};

/// Shared handles every handler can reach.
#[derive(Clone)]
pub struct AppState {
    pub stores: Arc<dyn StoreRepository>,
    pub users: Arc<dyn UserRepository>,
    pub reviews: Arc<dyn ReviewRepository>,
    pub sessions: Arc<Sessions>,
    pub photos: Arc<PhotoIntake>,
    pub mailer: Arc<dyn Mailer>,
    pub config: Arc<Config>,
}

impl AppState {
    /// In-process repositories and a mailer that writes to the log.
    pub fn in_memory(config: Config) -> Self {
        let photos = PhotoIntake::new(config.uploads.dir.clone(), config.uploads.max_width);
        Self {
            stores: Arc::new(MemoryStore::new()),
            users: Arc::new(MemoryUsers::new()),
            reviews: Arc::new(MemoryReviews::new()),
            sessions: Arc::new(Sessions::new(config.auth.session_ttl())),
            photos: Arc::new(photos),
            mailer: Arc::new(LogMailer),
            config: Arc::new(config),
        }
    }

    pub fn with_mailer(mut self, mailer: Arc<dyn Mailer>) -> Self {
        self.mailer = mailer;
        self
    }

    pub fn with_stores(mut self, stores: Arc<dyn StoreRepository>) -> Self {
        self.stores = stores;
        self
    }
}
