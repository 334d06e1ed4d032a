//! Command execution with session handling.
//!
//! Commands that need a session first restore the persisted one. When the
//! session is missing, or the backend revokes it mid-command, the user is
//! sent to the login prompt and the command is retried once.

use std::io::{self, Write};

use anyhow::{Context, Result};
use quotapath_core::api::ApiError;
use quotapath_core::auth::SessionStore;
use quotapath_core::models::LoginCredentials;
use quotapath_core::Config;
use tracing::{info, warn};

use crate::cli::{Command, View};
use crate::output;

/// Login prompts before giving up
const MAX_LOGIN_ATTEMPTS: usize = 3;

pub struct App {
    config: Config,
    store: SessionStore,
}

impl App {
    pub fn new(config: Config, store: SessionStore) -> Self {
        Self { config, store }
    }

    pub async fn run(&mut self, command: Command) -> Result<()> {
        match command {
            Command::Help => {
                println!("{}", crate::cli::USAGE);
                Ok(())
            }
            Command::Login { username } => {
                self.store.restore().await;
                if self.store.session().is_logged_in() && username.is_none() {
                    if let Some(user) = self.store.session().user() {
                        println!("Already logged in as {}.", user.display_name());
                    }
                    return Ok(());
                }
                self.login_prompt(username).await
            }
            Command::Logout => {
                self.store.restore().await;
                self.store.logout().await;
                println!("Logged out.");
                Ok(())
            }
            Command::WhoAmI => {
                self.store.restore().await;
                match self.store.session().user() {
                    Some(user) => output::print_profile(&user),
                    None => println!("Not logged in."),
                }
                Ok(())
            }
            Command::View(view) => self.run_authenticated(&view).await,
        }
    }

    async fn run_authenticated(&mut self, view: &View) -> Result<()> {
        if !self.store.restore().await.is_logged_in() {
            self.login_prompt(self.config.last_username.clone()).await?;
        }

        match self.execute(view).await {
            Err(e) if self.store.session().state().needs_login_redirect() => {
                warn!(error = %e, "Session revoked during command");
                eprintln!("Your session has expired. Please log in again.");
                self.login_prompt(self.config.last_username.clone()).await?;
                self.execute(view).await
            }
            result => result,
        }
    }

    async fn execute(&self, view: &View) -> Result<()> {
        let api = self.store.api();
        match view {
            View::Dashboard => {
                let (stats, summary, pipeline) = tokio::try_join!(
                    api.dashboard_stats(),
                    api.commission_summary(),
                    api.pipeline_analysis(),
                )?;
                output::print_dashboard(&stats, &summary, &pipeline);
            }
            View::Deals { query } => {
                let deals = api.deals(query).await?;
                output::print_deals(&deals);
            }
            View::Commissions => {
                let overview = api.commissions_overview().await?;
                output::print_commissions(&overview);
            }
            View::Calculate { deal_ids } => {
                let ids = (!deal_ids.is_empty()).then(|| deal_ids.clone());
                let result = api.calculate_commissions(ids).await?;
                println!("{}", result.message);
            }
            View::Nav => {
                let role = self
                    .store
                    .session()
                    .role()
                    .context("No active session")?;
                output::print_nav(&role);
            }
        }
        Ok(())
    }

    /// The login entry point: prompt until the backend accepts the
    /// credentials or the attempts run out.
    async fn login_prompt(&mut self, username: Option<String>) -> Result<()> {
        println!("=== QuotaPath Login ({}) ===", self.config.api_base_url);

        let mut username = username;
        for attempt in 1..=MAX_LOGIN_ATTEMPTS {
            let name = match username.take() {
                Some(name) => name,
                None => prompt_username()?,
            };
            let password = rpassword::prompt_password("Password: ")?;
            let credentials = LoginCredentials::new(name.clone(), password);

            match self.store.login(&credentials).await {
                Ok(data) => {
                    println!("Welcome, {}.", data.user.display_name());
                    self.config.last_username = Some(name);
                    if let Err(e) = self.config.save() {
                        warn!(error = %e, "Failed to save config");
                    }
                    return Ok(());
                }
                Err(e) => {
                    info!(attempt, error = %e, "Login attempt failed");
                    eprintln!("{}", e.user_message());
                    // Only re-prompt for the password after a rejected attempt
                    if !name.trim().is_empty() {
                        username = Some(name);
                    }
                }
            }
        }
        anyhow::bail!("Login failed after {} attempts", MAX_LOGIN_ATTEMPTS)
    }
}

fn prompt_username() -> Result<String> {
    print!("Username: ");
    io::stdout().flush()?;

    let mut username = String::new();
    io::stdin().read_line(&mut username)?;
    Ok(username.trim().to_string())
}

/// One-line notification for a failed command.
pub fn notification(error: &anyhow::Error) -> String {
    match error.downcast_ref::<ApiError>() {
        Some(api_error) => api_error.user_message(),
        None => error.to_string(),
    }
}
