//! Short link registry scoped by owner.

use std::sync::Arc;

use serde_json::json;
use uuid::Uuid;

use crate::domain::entities::{LinkWithCounts, NewShortLink, ShortLink, Utm};
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;
use crate::utils::slug::{generate_slug, validate_custom_slug};
use crate::utils::url_normalizer::normalize_url;

/// Attempts at finding a free generated slug before giving up.
const MAX_SLUG_ATTEMPTS: usize = 10;

fn link_not_found(slug: &str) -> AppError {
    AppError::not_found("Link not found", json!({ "slug": slug }))
}

/// Service for creating and managing a user's short links.
///
/// A slug owned by someone else is reported as [`AppError::NotFound`], the
/// same as a slug that does not exist.
pub struct LinkService {
    links: Arc<dyn LinkRepository>,
    public_base: String,
}

impl LinkService {
    /// Creates a new link service.
    ///
    /// `public_base` is the origin short URLs are built on, e.g. `https://sho.rt`.
    pub fn new(links: Arc<dyn LinkRepository>, public_base: impl Into<String>) -> Self {
        Self {
            links,
            public_base: public_base.into().trim_end_matches('/').to_string(),
        }
    }

    /// Full public URL of a slug.
    pub fn short_url(&self, slug: &str) -> String {
        format!("{}/{}", self.public_base, slug)
    }

    /// Creates a short link.
    ///
    /// An empty or absent `custom_slug` gets a random 6-character slug.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if the URL or custom slug is invalid.
    /// Returns [`AppError::Conflict`] if the custom slug is taken.
    /// Returns [`AppError::Internal`] if no free slug was found.
    pub async fn shorten(
        &self,
        owner: Uuid,
        original_url: &str,
        custom_slug: Option<String>,
        utm: Utm,
    ) -> Result<ShortLink, AppError> {
        let original_url = normalize_url(original_url).map_err(|e| {
            AppError::bad_request("Invalid URL format", json!({ "reason": e.to_string() }))
        })?;

        if let Some(slug) = custom_slug.filter(|s| !s.is_empty()) {
            validate_custom_slug(&slug)?;
            return self
                .links
                .create(NewShortLink {
                    user_id: owner,
                    slug,
                    original_url,
                    utm,
                })
                .await;
        }

        for _ in 0..MAX_SLUG_ATTEMPTS {
            let new_link = NewShortLink {
                user_id: owner,
                slug: generate_slug(),
                original_url: original_url.clone(),
                utm: utm.clone(),
            };

            match self.links.create(new_link).await {
                Err(AppError::Conflict { .. }) => {
                    tracing::debug!("Generated slug collided, retrying");
                }
                result => return result,
            }
        }

        Err(AppError::internal(
            "Failed to generate unique slug",
            json!({ "reason": "Too many collisions" }),
        ))
    }

    /// Lists the owner's links with click counters.
    pub async fn list(&self, owner: Uuid) -> Result<Vec<LinkWithCounts>, AppError> {
        self.links.list_with_counts(owner).await
    }

    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the owner has no link with this slug.
    pub async fn get(&self, owner: Uuid, slug: &str) -> Result<ShortLink, AppError> {
        self.links
            .find_owned(owner, slug)
            .await?
            .ok_or_else(|| link_not_found(slug))
    }

    pub async fn delete(&self, owner: Uuid, slug: &str) -> Result<(), AppError> {
        if !self.links.delete_owned(owner, slug).await? {
            return Err(link_not_found(slug));
        }
        tracing::info!(%owner, slug, "Link deleted");
        Ok(())
    }

    /// Flips `is_active` and returns the new value.
    pub async fn toggle(&self, owner: Uuid, slug: &str) -> Result<bool, AppError> {
        self.links
            .toggle_owned(owner, slug)
            .await?
            .ok_or_else(|| link_not_found(slug))
    }

    pub async fn update_utm(&self, owner: Uuid, slug: &str, utm: Utm) -> Result<(), AppError> {
        if !self.links.update_utm_owned(owner, slug, utm).await? {
            return Err(link_not_found(slug));
        }
        Ok(())
    }

    /// Renames a link.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if `new_slug` is not a valid custom slug.
    /// Returns [`AppError::Conflict`] if `new_slug` is taken.
    /// Returns [`AppError::NotFound`] if the owner has no link with `slug`.
    pub async fn update_slug(&self, owner: Uuid, slug: &str, new_slug: &str) -> Result<(), AppError> {
        validate_custom_slug(new_slug)?;

        if !self.links.update_slug_owned(owner, slug, new_slug).await? {
            return Err(link_not_found(slug));
        }
        Ok(())
    }

    /// Counts every link in the system.
    pub async fn count_all(&self) -> Result<i64, AppError> {
        self.links.count_all().await
    }

    /// Looks up a link for the public redirect, regardless of owner.
    pub async fn resolve(&self, slug: &str) -> Result<ShortLink, AppError> {
        self.links
            .find_by_slug(slug)
            .await?
            .ok_or_else(|| link_not_found(slug))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repositories::MockLinkRepository;
    use chrono::Utc;

    fn link_from(new_link: NewShortLink) -> ShortLink {
        ShortLink {
            id: Uuid::new_v4(),
            user_id: new_link.user_id,
            slug: new_link.slug,
            original_url: new_link.original_url,
            utm: new_link.utm,
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn service(repo: MockLinkRepository) -> LinkService {
        LinkService::new(Arc::new(repo), "http://localhost:3000/")
    }

    #[test]
    fn test_short_url_joins_without_double_slash() {
        let svc = service(MockLinkRepository::new());
        assert_eq!(svc.short_url("abc123"), "http://localhost:3000/abc123");
    }

    #[tokio::test]
    async fn test_shorten_generates_slug_when_empty() {
        let mut repo = MockLinkRepository::new();
        repo.expect_create()
            .withf(|l| {
                l.slug.len() == 6 && l.original_url == "https://example.com/path" && l.utm.source == "ads"
            })
            .times(1)
            .returning(|l| Ok(link_from(l)));

        let svc = service(repo);
        let link = svc
            .shorten(
                Uuid::new_v4(),
                "HTTPS://EXAMPLE.com/path",
                Some(String::new()),
                Utm::new("ads", "", ""),
            )
            .await
            .unwrap();

        assert_eq!(link.slug.len(), 6);
    }

    #[tokio::test]
    async fn test_shorten_retries_generated_collisions() {
        let mut repo = MockLinkRepository::new();
        let mut seq = mockall::Sequence::new();
        repo.expect_create()
            .times(2)
            .in_sequence(&mut seq)
            .returning(|_| Err(AppError::conflict("Slug already exists", json!({}))));
        repo.expect_create()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|l| Ok(link_from(l)));

        let svc = service(repo);
        let result = svc
            .shorten(Uuid::new_v4(), "https://example.com", None, Utm::default())
            .await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_shorten_gives_up_after_max_attempts() {
        let mut repo = MockLinkRepository::new();
        repo.expect_create()
            .times(MAX_SLUG_ATTEMPTS)
            .returning(|_| Err(AppError::conflict("Slug already exists", json!({}))));

        let svc = service(repo);
        let result = svc
            .shorten(Uuid::new_v4(), "https://example.com", None, Utm::default())
            .await;

        assert!(matches!(result, Err(AppError::Internal { .. })));
    }

    #[tokio::test]
    async fn test_shorten_custom_slug_conflict_is_not_retried() {
        let mut repo = MockLinkRepository::new();
        repo.expect_create()
            .withf(|l| l.slug == "promo")
            .times(1)
            .returning(|_| Err(AppError::conflict("Slug already exists", json!({}))));

        let svc = service(repo);
        let result = svc
            .shorten(
                Uuid::new_v4(),
                "https://example.com",
                Some("promo".to_string()),
                Utm::default(),
            )
            .await;

        assert!(matches!(result, Err(AppError::Conflict { .. })));
    }

    #[tokio::test]
    async fn test_shorten_rejects_bad_url_and_slug() {
        let mut repo = MockLinkRepository::new();
        repo.expect_create().never();
        let svc = service(repo);

        let bad_url = svc
            .shorten(Uuid::new_v4(), "ftp://example.com", None, Utm::default())
            .await;
        assert!(matches!(bad_url, Err(AppError::Validation { .. })));

        let bad_slug = svc
            .shorten(
                Uuid::new_v4(),
                "https://example.com",
                Some("a b".to_string()),
                Utm::default(),
            )
            .await;
        assert!(matches!(bad_slug, Err(AppError::Validation { .. })));
    }

    #[tokio::test]
    async fn test_delete_not_owned_is_not_found() {
        let mut repo = MockLinkRepository::new();
        repo.expect_delete_owned().times(1).returning(|_, _| Ok(false));

        let svc = service(repo);
        let result = svc.delete(Uuid::new_v4(), "someone-elses").await;

        assert!(matches!(result, Err(AppError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_toggle_returns_new_state() {
        let mut repo = MockLinkRepository::new();
        repo.expect_toggle_owned().times(1).returning(|_, _| Ok(Some(false)));

        let svc = service(repo);
        assert!(!svc.toggle(Uuid::new_v4(), "abc").await.unwrap());
    }

    #[tokio::test]
    async fn test_update_slug_validates_before_store() {
        let mut repo = MockLinkRepository::new();
        repo.expect_update_slug_owned().never();

        let svc = service(repo);
        let result = svc.update_slug(Uuid::new_v4(), "abc", "api").await;

        assert!(matches!(result, Err(AppError::Validation { .. })));
    }

    #[tokio::test]
    async fn test_resolve_missing() {
        let mut repo = MockLinkRepository::new();
        repo.expect_find_by_slug().returning(|_| Ok(None));

        let svc = service(repo);
        assert!(matches!(
            svc.resolve("nope").await,
            Err(AppError::NotFound { .. })
        ));
    }
}
