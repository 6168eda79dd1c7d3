//! Repository trait definitions for the domain layer.
//!
//! Traits define the contract for data operations; implementations live in
//! `crate::infrastructure::persistence`. Mock implementations are generated
//! with `mockall` for unit tests.
//!
//! # Available Repositories
//!
//! - [`UserRepository`] - Accounts and profile fields
//! - [`RefreshTokenRepository`] - One refresh credential per user
//! - [`LinkRepository`] - Short link CRUD scoped by owner
//! - [`ClickRepository`] - Click/device recording and analytics rows

pub mod click_repository;
pub mod link_repository;
pub mod refresh_token_repository;
pub mod user_repository;

pub use click_repository::ClickRepository;
pub use link_repository::LinkRepository;
pub use refresh_token_repository::RefreshTokenRepository;
pub use user_repository::UserRepository;

#[cfg(test)]
pub use click_repository::MockClickRepository;
#[cfg(test)]
pub use link_repository::MockLinkRepository;
#[cfg(test)]
pub use refresh_token_repository::MockRefreshTokenRepository;
#[cfg(test)]
pub use user_repository::MockUserRepository;
