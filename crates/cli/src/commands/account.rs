//! Account commands.

use clap::Subcommand;
use serde::Serialize;

use shopfront_storefront::error::AppError;
use shopfront_storefront::services::Registration;
use shopfront_storefront::session::CurrentUser;
use shopfront_storefront::state::AppState;

use crate::output::Output;

#[derive(Subcommand)]
pub enum AccountAction {
    /// Sign in
    Login {
        #[arg(short, long)]
        email: String,
        #[arg(short, long, env = "SHOPFRONT_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Sign out
    Logout,
    /// Create an account and sign in
    Register {
        #[arg(short, long)]
        email: String,
        #[arg(short, long, env = "SHOPFRONT_PASSWORD", hide_env_values = true)]
        password: String,
        #[arg(long)]
        first_name: Option<String>,
        #[arg(long)]
        last_name: Option<String>,
        /// Subscribe to marketing email
        #[arg(long)]
        accepts_marketing: bool,
    },
    /// Show who is signed in
    Whoami,
}

/// Session details safe to print.
#[derive(Serialize)]
struct SessionView<'a> {
    customer_id: &'a str,
    email: &'a str,
    name: String,
    expires_at: String,
    expired: bool,
}

impl<'a> From<&'a CurrentUser> for SessionView<'a> {
    fn from(user: &'a CurrentUser) -> Self {
        Self {
            customer_id: user.customer_id.as_str(),
            email: user.email.as_str(),
            name: user.display_name(),
            expires_at: user.expires_at.to_rfc3339(),
            expired: user.is_expired(),
        }
    }
}

pub async fn run(state: &AppState, action: AccountAction, out: Output) -> Result<(), AppError> {
    let accounts = state.accounts();

    match action {
        AccountAction::Login { email, password } => {
            let user = accounts.login(&email, &password).await?;
            out.message(&format!("Signed in as {}", user.display_name()));
        }
        AccountAction::Logout => {
            accounts.logout().await?;
            out.message("Signed out");
        }
        AccountAction::Register {
            email,
            password,
            first_name,
            last_name,
            accepts_marketing,
        } => {
            let registration = Registration {
                email,
                password,
                first_name,
                last_name,
                accepts_marketing,
            };
            let user = accounts.register(&registration).await?;
            out.message(&format!("Welcome, {}", user.display_name()));
        }
        AccountAction::Whoami => match accounts.current_user()? {
            Some(user) => {
                let view = SessionView::from(&user);
                out.emit(&view, |view| {
                    println!("{} <{}>", view.name, view.email);
                    if view.expired {
                        println!("Session expired, log in again to see your orders.");
                    } else {
                        println!("Session valid until {}", view.expires_at);
                    }
                });
            }
            None => out.message("Not signed in"),
        },
    }
    Ok(())
}
