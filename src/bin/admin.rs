//! CLI administration tool for shortlink-api.
//!
//! Inspects and revokes refresh sessions, shows totals and runs database
//! diagnostics without going through the HTTP API.
//!
//! # Usage
//!
//! ```bash
//! # List users holding a refresh session
//! cargo run --bin admin -- session list
//!
//! # Force a user to sign in again
//! cargo run --bin admin -- session revoke alice@example.com
//!
//! # View totals
//! cargo run --bin admin -- stats
//!
//! # Check database connection
//! cargo run --bin admin -- db check
//! ```
//!
//! # Environment Variables
//!
//! - `DATABASE_URL` (required): PostgreSQL connection string

use shortlink_api::domain::repositories::{
    ClickRepository, LinkRepository, RefreshTokenRepository, UserRepository,
};
use shortlink_api::infrastructure::persistence::{
    PgClickRepository, PgLinkRepository, PgRefreshTokenRepository, PgUserRepository,
};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::Confirm;
use sqlx::PgPool;
use std::sync::Arc;

/// CLI tool for managing shortlink-api.
#[derive(Parser)]
#[command(name = "admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Top-level command groups.
#[derive(Subcommand)]
enum Commands {
    /// Manage refresh sessions
    Session {
        #[command(subcommand)]
        action: SessionAction,
    },

    /// Show statistics
    Stats,

    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
}

#[derive(Subcommand)]
enum SessionAction {
    /// List users with a stored refresh token
    List,

    /// Delete the refresh token of a user
    Revoke {
        /// Account email
        email: String,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },
}

/// Database operation subcommands.
#[derive(Subcommand)]
enum DbAction {
    /// Check database connection
    Check,

    /// Show database info
    Info,
}

#[derive(sqlx::FromRow)]
struct SessionRow {
    email: String,
    name: String,
    updated_at: DateTime<Utc>,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;

    let pool = PgPool::connect(&database_url)
        .await
        .context("Failed to connect to database")?;

    match cli.command {
        Commands::Session { action } => handle_session_action(action, &pool).await?,
        Commands::Stats => handle_stats(&pool).await?,
        Commands::Db { action } => handle_db_action(action, &pool).await?,
    }

    Ok(())
}

async fn handle_session_action(action: SessionAction, pool: &PgPool) -> Result<()> {
    match action {
        SessionAction::List => list_sessions(pool).await,
        SessionAction::Revoke { email, yes } => revoke_session(pool, &email, yes).await,
    }
}

/// Lists users that currently hold a refresh session, most recent first.
async fn list_sessions(pool: &PgPool) -> Result<()> {
    println!("{}", "📋 Refresh sessions".bright_blue().bold());
    println!();

    let sessions: Vec<SessionRow> = sqlx::query_as(
        r#"
        SELECT u.email, u.name, rt.updated_at
        FROM refresh_tokens rt
        JOIN users u ON u.id = rt.user_id
        ORDER BY rt.updated_at DESC
        "#,
    )
    .fetch_all(pool)
    .await?;

    if sessions.is_empty() {
        println!("{}", "  No active sessions".yellow());
        return Ok(());
    }

    println!(
        "  {:<36} {:<24} {:<20}",
        "Email".bright_white().bold(),
        "Name".bright_white().bold(),
        "Last renewed".bright_white().bold()
    );
    println!("  {}", "─".repeat(80).bright_black());

    for session in &sessions {
        println!(
            "  {:<36} {:<24} {}",
            session.email.cyan(),
            session.name,
            session
                .updated_at
                .format("%Y-%m-%d %H:%M")
                .to_string()
                .bright_black()
        );
    }

    println!();
    println!(
        "  Total: {}",
        sessions.len().to_string().bright_white().bold()
    );
    println!();

    Ok(())
}

/// Deletes the refresh credential of the account with `email`.
///
/// Outstanding access tokens stay valid until they expire; the next renewal
/// fails and the user has to sign in again.
async fn revoke_session(pool: &PgPool, email: &str, skip_confirm: bool) -> Result<()> {
    println!("{}", "🔒 Revoke session".bright_blue().bold());
    println!();

    let pool = Arc::new(pool.clone());
    let users = PgUserRepository::new(pool.clone());
    let refresh_tokens = PgRefreshTokenRepository::new(pool);

    let user = users
        .find_by_email(email.trim())
        .await
        .map_err(|e| anyhow::anyhow!("Database error: {}", e))?
        .context("User not found")?;

    println!("  User:  {}", user.name.cyan());
    println!("  Email: {}", user.email.cyan());
    println!();

    if !skip_confirm {
        let confirmed = Confirm::new()
            .with_prompt("Revoke this user's session?")
            .default(false)
            .interact()?;

        if !confirmed {
            println!("{}", "❌ Cancelled".red());
            return Ok(());
        }
    }

    refresh_tokens
        .delete_by_user_id(user.id)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to revoke session: {}", e))?;

    println!("{}", "✅ Session revoked".green().bold());
    println!();

    Ok(())
}

/// Displays users, links, clicks and active sessions.
async fn handle_stats(pool: &PgPool) -> Result<()> {
    println!("{}", "📊 Statistics".bright_blue().bold());
    println!();

    let shared = Arc::new(pool.clone());
    let users_count = PgUserRepository::new(shared.clone())
        .count()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to count users: {}", e))?;
    let links_count = PgLinkRepository::new(shared.clone())
        .count_all()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to count links: {}", e))?;
    let clicks_count = PgClickRepository::new(shared)
        .count_all()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to count clicks: {}", e))?;

    let sessions_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM refresh_tokens")
        .fetch_one(pool)
        .await?;

    println!(
        "  Users:           {}",
        users_count.to_string().bright_green().bold()
    );
    println!(
        "  Links:           {}",
        links_count.to_string().bright_green().bold()
    );
    println!(
        "  Clicks:          {}",
        clicks_count.to_string().bright_green().bold()
    );
    println!(
        "  Active sessions: {}",
        sessions_count.to_string().bright_green().bold()
    );
    println!();

    Ok(())
}

/// Handles database diagnostic commands.
async fn handle_db_action(action: DbAction, pool: &PgPool) -> Result<()> {
    match action {
        DbAction::Check => {
            println!("{}", "🔍 Checking database connection...".bright_blue());

            sqlx::query("SELECT 1").fetch_one(pool).await?;

            println!("{}", "✅ Database connection OK".green().bold());
        }
        DbAction::Info => {
            println!("{}", "ℹ️  Database Information".bright_blue().bold());
            println!();

            let version: String = sqlx::query_scalar("SELECT version()")
                .fetch_one(pool)
                .await?;
            let size: String =
                sqlx::query_scalar("SELECT pg_size_pretty(pg_database_size(current_database()))")
                    .fetch_one(pool)
                    .await?;

            println!("  PostgreSQL: {}", version.bright_white());
            println!("  Size:       {}", size.bright_white());
            println!();
        }
    }

    Ok(())
}
