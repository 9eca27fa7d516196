use crate::config::{AuthMode, Config};
use crate::error::{AppError, AppResult};
use crate::middleware::{JwtSessionVerifier, SessionVerifier, TrustClaimedIdentity};
use crate::repository::{
    DirectoryRepository, InMemoryStore, MessagingRepository, PgStore, RecruitingRepository,
};
use sqlx::PgPool;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub messaging: Arc<dyn MessagingRepository>,
    pub directory: Arc<dyn DirectoryRepository>,
    pub recruiting: Arc<dyn RecruitingRepository>,
    pub sessions: Arc<dyn SessionVerifier>,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn in_memory(config: Config) -> AppResult<Self> {
        let store = Arc::new(InMemoryStore::new());
        Self::with_store(store, config)
    }

    pub fn postgres(pool: PgPool, config: Config) -> AppResult<Self> {
        let store = Arc::new(PgStore::new(pool));
        Self::with_store(store, config)
    }

    fn with_store<S>(store: Arc<S>, config: Config) -> AppResult<Self>
    where
        S: MessagingRepository + DirectoryRepository + RecruitingRepository + 'static,
    {
        let sessions = session_verifier(&config)?;
        Ok(Self {
            messaging: store.clone(),
            directory: store.clone(),
            recruiting: store,
            sessions,
            config: Arc::new(config),
        })
    }
}

fn session_verifier(config: &Config) -> AppResult<Arc<dyn SessionVerifier>> {
    match config.auth_mode {
        AuthMode::Trust => Ok(Arc::new(TrustClaimedIdentity)),
        AuthMode::Jwt => {
            let secret = config
                .jwt_secret
                .as_deref()
                .ok_or_else(|| AppError::Config("JWT_SECRET missing for AUTH_MODE=jwt".into()))?;
            Ok(Arc::new(JwtSessionVerifier::new(secret)))
        }
    }
}
