//! Domain layer containing business entities and logic.
//!
//! This module has no dependencies on infrastructure or presentation layers.
//!
//! # Architecture
//!
//! - [`entities`] - Core business data structures
//! - [`repositories`] - Data access trait definitions
//! - [`analytics`] - Pure click aggregation
//! - [`click_event`] - Click captured on redirect, recorded asynchronously
//!
//! # Click Processing Flow
//!
//! 1. Redirect handler resolves the slug and answers the client
//! 2. A [`click_event::ClickEvent`] is pushed onto a bounded channel
//! 3. [`crate::application::click_worker::run_click_worker`] records it
//! 4. Click and device rows are persisted via [`repositories::ClickRepository`]

pub mod analytics;
pub mod click_event;
pub mod entities;
pub mod repositories;
