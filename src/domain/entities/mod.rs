//! Core domain entities.
//!
//! Entities are plain data structures without persistence or transport
//! concerns. Creation inputs use separate `New*` structs.
//!
//! # Entity Types
//!
//! - [`User`] - A registered account
//! - [`RefreshCredential`] - The live refresh token digest of a user
//! - [`ShortLink`] - A slug mapped to a destination URL
//! - [`NewClick`] / [`NewDevice`] - One redirect and the device behind it
//! - [`ClickWithDevice`] - Joined row consumed by analytics

pub mod click;
pub mod link;
pub mod refresh_credential;
pub mod user;

pub use click::{ClickWithDevice, NewClick, NewDevice};
pub use link::{LinkWithCounts, NewShortLink, ShortLink, Utm};
pub use refresh_credential::RefreshCredential;
pub use user::{NewUser, User};
