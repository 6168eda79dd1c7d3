#![allow(dead_code)]

use async_trait::async_trait;
use axum::extract::connect_info::MockConnectInfo;
use axum_test::TestServer;
use chrono::{DateTime, Utc};
use serde_json::{Value, json};
use shortlink_api::application::click_worker::ClickRecorder;
use shortlink_api::application::services::TokenService;
use shortlink_api::domain::click_event::ClickEvent;
use shortlink_api::domain::entities::{
    ClickWithDevice, LinkWithCounts, NewClick, NewDevice, NewShortLink, NewUser,
    RefreshCredential, ShortLink, User, Utm,
};
use shortlink_api::domain::repositories::{
    ClickRepository, LinkRepository, RefreshTokenRepository, UserRepository,
};
use shortlink_api::error::AppError;
use shortlink_api::infrastructure::geo::NullLocator;
use shortlink_api::routes::api_router;
use shortlink_api::state::{AppState, Repositories};
use std::net::SocketAddr;
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::mpsc;
use tower_http::cors::CorsLayer;
use uuid::Uuid;

pub const ACCESS_SECRET: &[u8] = b"test-access-secret";
pub const REFRESH_SECRET: &[u8] = b"test-refresh-secret";
pub const PUBLIC_BASE: &str = "http://short.test";
pub const PEER_ADDR: &str = "203.0.113.9:51000";

struct StoredClick {
    id: Uuid,
    click: NewClick,
    device: NewDevice,
    created_at: DateTime<Utc>,
}

#[derive(Default)]
struct Data {
    users: Vec<User>,
    refresh_tokens: Vec<RefreshCredential>,
    links: Vec<ShortLink>,
    clicks: Vec<StoredClick>,
    next_credential_id: i64,
}

impl Data {
    fn push_credential(&mut self, user_id: Uuid, token_hash: &str) {
        self.next_credential_id += 1;
        let now = Utc::now();
        self.refresh_tokens.push(RefreshCredential {
            id: self.next_credential_id,
            user_id,
            token_hash: token_hash.to_string(),
            created_at: now,
            updated_at: now,
        });
    }
}

/// In-memory stand-in for the four PostgreSQL repositories.
///
/// Mirrors the unique constraints (email, slug, one credential per user) and
/// the click → link foreign key.
#[derive(Default)]
pub struct MemoryStore {
    data: Mutex<Data>,
}

impl MemoryStore {
    fn lock(&self) -> MutexGuard<'_, Data> {
        self.data.lock().unwrap()
    }

    pub fn stored_refresh_hash(&self, user_id: Uuid) -> Option<String> {
        self.lock()
            .refresh_tokens
            .iter()
            .find(|c| c.user_id == user_id)
            .map(|c| c.token_hash.clone())
    }

    pub fn link(&self, slug: &str) -> Option<ShortLink> {
        self.lock().links.iter().find(|l| l.slug == slug).cloned()
    }

    pub fn click_count(&self) -> usize {
        self.lock().clicks.len()
    }
}

fn missing_user() -> AppError {
    AppError::not_found("User not found", json!({}))
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn create(&self, new_user: NewUser, refresh_token_hash: &str) -> Result<User, AppError> {
        let mut data = self.lock();
        if data.users.iter().any(|u| u.email == new_user.email) {
            return Err(AppError::conflict("Email already exists", json!({})));
        }
        let user = User {
            id: new_user.id,
            name: new_user.name,
            email: new_user.email,
            password_hash: new_user.password_hash,
            created_at: Utc::now(),
        };
        data.users.push(user.clone());
        data.push_credential(user.id, refresh_token_hash);
        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        Ok(self.lock().users.iter().find(|u| u.email == email).cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AppError> {
        Ok(self.lock().users.iter().find(|u| u.id == id).cloned())
    }

    async fn update_email(&self, id: Uuid, email: &str) -> Result<(), AppError> {
        let mut data = self.lock();
        if data.users.iter().any(|u| u.email == email && u.id != id) {
            return Err(AppError::conflict("Email already exists", json!({})));
        }
        let user = data
            .users
            .iter_mut()
            .find(|u| u.id == id)
            .ok_or_else(missing_user)?;
        user.email = email.to_string();
        Ok(())
    }

    async fn update_name(&self, id: Uuid, name: &str) -> Result<(), AppError> {
        let mut data = self.lock();
        let user = data
            .users
            .iter_mut()
            .find(|u| u.id == id)
            .ok_or_else(missing_user)?;
        user.name = name.to_string();
        Ok(())
    }

    async fn update_password(&self, id: Uuid, password_hash: &str) -> Result<(), AppError> {
        let mut data = self.lock();
        let user = data
            .users
            .iter_mut()
            .find(|u| u.id == id)
            .ok_or_else(missing_user)?;
        user.password_hash = password_hash.to_string();
        Ok(())
    }

    async fn count(&self) -> Result<i64, AppError> {
        Ok(self.lock().users.len() as i64)
    }
}

#[async_trait]
impl RefreshTokenRepository for MemoryStore {
    async fn upsert(&self, user_id: Uuid, token_hash: &str) -> Result<(), AppError> {
        let mut data = self.lock();
        if let Some(existing) = data.refresh_tokens.iter_mut().find(|c| c.user_id == user_id) {
            existing.token_hash = token_hash.to_string();
            existing.updated_at = Utc::now();
            return Ok(());
        }
        data.push_credential(user_id, token_hash);
        Ok(())
    }

    async fn find_by_token(
        &self,
        token_hash: &str,
    ) -> Result<Option<RefreshCredential>, AppError> {
        Ok(self
            .lock()
            .refresh_tokens
            .iter()
            .find(|c| c.token_hash == token_hash)
            .cloned())
    }

    async fn rotate(&self, user_id: Uuid, old_hash: &str, new_hash: &str) -> Result<bool, AppError> {
        let mut data = self.lock();
        match data
            .refresh_tokens
            .iter_mut()
            .find(|c| c.user_id == user_id && c.token_hash == old_hash)
        {
            Some(credential) => {
                credential.token_hash = new_hash.to_string();
                credential.updated_at = Utc::now();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_by_user_id(&self, user_id: Uuid) -> Result<(), AppError> {
        self.lock().refresh_tokens.retain(|c| c.user_id != user_id);
        Ok(())
    }
}

#[async_trait]
impl LinkRepository for MemoryStore {
    async fn create(&self, new_link: NewShortLink) -> Result<ShortLink, AppError> {
        let mut data = self.lock();
        if data.links.iter().any(|l| l.slug == new_link.slug) {
            return Err(AppError::conflict("Slug already exists", json!({})));
        }
        let now = Utc::now();
        let link = ShortLink {
            id: Uuid::new_v4(),
            user_id: new_link.user_id,
            slug: new_link.slug,
            original_url: new_link.original_url,
            utm: new_link.utm,
            is_active: true,
            created_at: now,
            updated_at: now,
        };
        data.links.push(link.clone());
        Ok(link)
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<ShortLink>, AppError> {
        Ok(self.link(slug))
    }

    async fn find_owned(&self, user_id: Uuid, slug: &str) -> Result<Option<ShortLink>, AppError> {
        Ok(self.link(slug).filter(|l| l.user_id == user_id))
    }

    async fn list_with_counts(&self, user_id: Uuid) -> Result<Vec<LinkWithCounts>, AppError> {
        let data = self.lock();
        let mut items: Vec<LinkWithCounts> = data
            .links
            .iter()
            .filter(|l| l.user_id == user_id)
            .map(|l| {
                let clicks = data.clicks.iter().filter(|c| c.click.link_id == l.id);
                let total_clicks = clicks.clone().count() as i64;
                let unique_clicks = clicks.filter(|c| c.click.is_unique).count() as i64;
                LinkWithCounts {
                    link: l.clone(),
                    total_clicks,
                    unique_clicks,
                }
            })
            .collect();
        items.sort_by(|a, b| b.link.created_at.cmp(&a.link.created_at));
        Ok(items)
    }

    async fn delete_owned(&self, user_id: Uuid, slug: &str) -> Result<bool, AppError> {
        let mut data = self.lock();
        let Some(pos) = data
            .links
            .iter()
            .position(|l| l.user_id == user_id && l.slug == slug)
        else {
            return Ok(false);
        };
        let removed = data.links.remove(pos);
        data.clicks.retain(|c| c.click.link_id != removed.id);
        Ok(true)
    }

    async fn toggle_owned(&self, user_id: Uuid, slug: &str) -> Result<Option<bool>, AppError> {
        let mut data = self.lock();
        Ok(data
            .links
            .iter_mut()
            .find(|l| l.user_id == user_id && l.slug == slug)
            .map(|l| {
                l.is_active = !l.is_active;
                l.is_active
            }))
    }

    async fn update_utm_owned(&self, user_id: Uuid, slug: &str, utm: Utm) -> Result<bool, AppError> {
        let mut data = self.lock();
        match data
            .links
            .iter_mut()
            .find(|l| l.user_id == user_id && l.slug == slug)
        {
            Some(link) => {
                link.utm = utm;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn update_slug_owned(
        &self,
        user_id: Uuid,
        slug: &str,
        new_slug: &str,
    ) -> Result<bool, AppError> {
        let mut data = self.lock();
        if !data
            .links
            .iter()
            .any(|l| l.user_id == user_id && l.slug == slug)
        {
            return Ok(false);
        }
        if data.links.iter().any(|l| l.slug == new_slug) {
            return Err(AppError::conflict("Slug already exists", json!({})));
        }
        if let Some(link) = data.links.iter_mut().find(|l| l.slug == slug) {
            link.slug = new_slug.to_string();
        }
        Ok(true)
    }

    async fn count_all(&self) -> Result<i64, AppError> {
        Ok(self.lock().links.len() as i64)
    }
}

#[async_trait]
impl ClickRepository for MemoryStore {
    async fn record(&self, click: NewClick, device: NewDevice) -> Result<Uuid, AppError> {
        let mut data = self.lock();
        if !data.links.iter().any(|l| l.id == click.link_id) {
            return Err(AppError::internal(
                "Database error",
                json!({ "reason": "foreign key violation" }),
            ));
        }
        let id = Uuid::new_v4();
        data.clicks.push(StoredClick {
            id,
            click,
            device,
            created_at: Utc::now(),
        });
        Ok(id)
    }

    async fn analytics_rows(&self, link_id: Uuid) -> Result<Vec<ClickWithDevice>, AppError> {
        Ok(self
            .lock()
            .clicks
            .iter()
            .filter(|c| c.click.link_id == link_id)
            .map(|c| ClickWithDevice {
                is_unique: c.click.is_unique,
                country: c.click.country.clone(),
                referrer: c.click.referrer.clone(),
                utm: c.click.utm.clone(),
                created_at: c.created_at,
                device: c.device.clone(),
            })
            .collect())
    }

    async fn count_all(&self) -> Result<i64, AppError> {
        Ok(self.lock().clicks.len() as i64)
    }
}

pub fn token_service() -> Arc<TokenService> {
    Arc::new(TokenService::new(
        ACCESS_SECRET,
        REFRESH_SECRET,
        chrono::Duration::minutes(15),
        chrono::Duration::days(7),
    ))
}

/// A running router backed by a [`MemoryStore`].
pub struct TestApp {
    pub server: TestServer,
    pub store: Arc<MemoryStore>,
    pub tokens: Arc<TokenService>,
    pub clicks_rx: mpsc::Receiver<ClickEvent>,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_queue_capacity(100)
    }

    pub fn with_queue_capacity(capacity: usize) -> Self {
        let store = Arc::new(MemoryStore::default());
        let tokens = token_service();
        let (tx, rx) = mpsc::channel(capacity);

        let repos = Repositories {
            users: store.clone(),
            refresh_tokens: store.clone(),
            links: store.clone(),
            clicks: store.clone(),
        };
        let state = AppState::new(repos, tokens.clone(), PUBLIC_BASE, tx, false);

        let peer: SocketAddr = PEER_ADDR.parse().unwrap();
        let app = api_router(state, CorsLayer::new()).layer(MockConnectInfo(peer));

        Self {
            server: TestServer::new(app).unwrap(),
            store,
            tokens,
            clicks_rx: rx,
        }
    }

    /// Registers an account and returns the response body.
    pub async fn register(&self, name: &str, email: &str, password: &str) -> Value {
        let response = self
            .server
            .post("/auth/register")
            .json(&json!({ "name": name, "email": email, "password": password }))
            .await;
        response.assert_status_ok();
        response.json::<Value>()
    }

    /// Registers an account and returns its access token.
    pub async fn access_token(&self, email: &str) -> String {
        let body = self.register("Test User", email, "correct-horse-1").await;
        body["accessToken"].as_str().unwrap().to_string()
    }

    /// Creates a link as the owner of `token` and returns its slug.
    pub async fn shorten(&self, token: &str, body: Value) -> String {
        let response = self
            .server
            .post("/user/shorten")
            .authorization_bearer(token)
            .json(&body)
            .await;
        response.assert_status_ok();
        let short_url = response.json::<Value>()["short_url"]
            .as_str()
            .unwrap()
            .to_string();
        short_url
            .rsplit('/')
            .next()
            .unwrap()
            .to_string()
    }

    /// Records every queued click synchronously.
    pub async fn drain_clicks(&mut self) {
        let recorder = ClickRecorder::new(self.store.clone(), Arc::new(NullLocator));
        while let Ok(event) = self.clicks_rx.try_recv() {
            recorder.record(event).await.unwrap();
        }
    }
}
