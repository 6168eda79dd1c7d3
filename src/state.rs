//! Shared application state injected into every handler.

use std::sync::Arc;

use tokio::sync::mpsc;

use crate::application::services::{
    AnalyticsService, AuthService, LinkService, TokenService, UserService,
};
use crate::domain::click_event::ClickEvent;
use crate::domain::repositories::{
    ClickRepository, LinkRepository, RefreshTokenRepository, UserRepository,
};

/// Repository handles the services are built from.
#[derive(Clone)]
pub struct Repositories {
    pub users: Arc<dyn UserRepository>,
    pub refresh_tokens: Arc<dyn RefreshTokenRepository>,
    pub links: Arc<dyn LinkRepository>,
    pub clicks: Arc<dyn ClickRepository>,
}

/// Cheap-to-clone handle on all services.
#[derive(Clone)]
pub struct AppState {
    pub auth_service: Arc<AuthService>,
    pub user_service: Arc<UserService>,
    pub link_service: Arc<LinkService>,
    pub analytics_service: Arc<AnalyticsService>,
    pub click_sender: mpsc::Sender<ClickEvent>,
    /// Trust `X-Forwarded-For` / `X-Real-IP` for the client address.
    pub behind_proxy: bool,
}

impl AppState {
    /// Wires services on top of `repos`.
    ///
    /// `public_base` is the origin short URLs are built on.
    pub fn new(
        repos: Repositories,
        tokens: Arc<TokenService>,
        public_base: &str,
        click_sender: mpsc::Sender<ClickEvent>,
        behind_proxy: bool,
    ) -> Self {
        Self {
            auth_service: Arc::new(AuthService::new(
                repos.users.clone(),
                repos.refresh_tokens,
                tokens,
            )),
            user_service: Arc::new(UserService::new(repos.users)),
            link_service: Arc::new(LinkService::new(repos.links.clone(), public_base)),
            analytics_service: Arc::new(AnalyticsService::new(repos.links, repos.clicks)),
            click_sender,
            behind_proxy,
        }
    }
}
