//! PostgreSQL repository implementations.
//!
//! Concrete implementations of domain repository traits using SQLx runtime
//! queries mapped through `sqlx::FromRow` row types.
//!
//! # Repositories
//!
//! - [`PgUserRepository`] - Accounts
//! - [`PgRefreshTokenRepository`] - Refresh credential digests
//! - [`PgLinkRepository`] - Short links and per-link counters
//! - [`PgClickRepository`] - Click/device rows

pub mod pg_click_repository;
pub mod pg_link_repository;
pub mod pg_refresh_token_repository;
pub mod pg_user_repository;

pub use pg_click_repository::PgClickRepository;
pub use pg_link_repository::PgLinkRepository;
pub use pg_refresh_token_repository::PgRefreshTokenRepository;
pub use pg_user_repository::PgUserRepository;
