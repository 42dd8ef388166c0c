// ABOUTME: Shared application state for API handlers
// ABOUTME: Holds the SQLite pool, every store and the session settings

use sqlx::SqlitePool;
use std::sync::Arc;

use givelink_admin::AdminStorage;
use givelink_auth::{AccountStorage, TokenService};
use givelink_donations::{DonationService, DonationStorage};
use givelink_requests::RequestStorage;

/// Session and admin settings supplied by the binary
#[derive(Debug, Clone, Default)]
pub struct AuthSettings {
    pub jwt_secret: String,
    pub admin_token: Option<String>,
    pub secure_cookies: bool,
}

#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    pub request_storage: Arc<RequestStorage>,
    pub donation_storage: Arc<DonationStorage>,
    pub donation_service: Arc<DonationService>,
    pub account_storage: Arc<AccountStorage>,
    pub admin_storage: Arc<AdminStorage>,
    pub tokens: Arc<TokenService>,
    pub admin_token: Option<Arc<str>>,
    pub secure_cookies: bool,
}

impl AppState {
    pub fn new(pool: SqlitePool, settings: AuthSettings) -> Self {
        Self {
            request_storage: Arc::new(RequestStorage::new(pool.clone())),
            donation_storage: Arc::new(DonationStorage::new(pool.clone())),
            donation_service: Arc::new(DonationService::new(pool.clone())),
            account_storage: Arc::new(AccountStorage::new(pool.clone())),
            admin_storage: Arc::new(AdminStorage::new(pool.clone())),
            tokens: Arc::new(TokenService::new(settings.jwt_secret.as_bytes())),
            admin_token: settings
                .admin_token
                .filter(|token| !token.is_empty())
                .map(Arc::from),
            secure_cookies: settings.secure_cookies,
            pool,
        }
    }
}
