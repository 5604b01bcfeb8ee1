use crate::output::{check, print_json};
use anyhow::Context;
use clap::Subcommand;
use taskdeck_core::http::ApiClient;
use taskdeck_core::model::{Credentials, NewUser};
use taskdeck_core::slice::AuthSlice;
use taskdeck_core::types::Role;

#[derive(Subcommand)]
pub enum AuthSubcommand {
    /// Create an account and sign in
    Register {
        #[arg(long)]
        username: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        /// admin, manager, or developer
        #[arg(long, default_value = "developer")]
        role: Role,
    },
    /// Sign in with an existing account
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Clear the stored session
    Logout,
    /// Show the stored identity
    Whoami,
}

pub async fn run(client: &ApiClient, subcmd: AuthSubcommand, json: bool) -> anyhow::Result<()> {
    match subcmd {
        AuthSubcommand::Register {
            username,
            email,
            password,
            role,
        } => register(client, username, email, password, role, json).await,
        AuthSubcommand::Login { email, password } => login(client, email, password, json).await,
        AuthSubcommand::Logout => logout(client, json),
        AuthSubcommand::Whoami => whoami(client, json),
    }
}

async fn register(
    client: &ApiClient,
    username: String,
    email: String,
    password: String,
    role: Role,
    json: bool,
) -> anyhow::Result<()> {
    let mut auth = AuthSlice::new();
    auth.register(
        client,
        &NewUser {
            username,
            email,
            password,
            role,
        },
    )
    .await;
    check(auth.status(), client, false)?;

    let user = auth
        .session()
        .user
        .as_ref()
        .context("register succeeded without a user record")?;
    if json {
        print_json(user)?;
    } else {
        println!("Registered and logged in as {}", user.username);
    }
    Ok(())
}

async fn login(
    client: &ApiClient,
    email: String,
    password: String,
    json: bool,
) -> anyhow::Result<()> {
    let mut auth = AuthSlice::new();
    auth.login(client, &Credentials { email, password }).await;
    check(auth.status(), client, false)?;

    let user = auth
        .session()
        .user
        .as_ref()
        .context("login succeeded without a user record")?;
    if json {
        print_json(user)?;
    } else {
        println!("Logged in as {}", user.username);
    }
    Ok(())
}

fn logout(client: &ApiClient, json: bool) -> anyhow::Result<()> {
    let mut auth = AuthSlice::new();
    auth.restore(client);
    auth.logout(client);

    if json {
        print_json(&serde_json::json!({ "logged_out": true }))?;
    } else {
        println!("Logged out");
    }
    Ok(())
}

fn whoami(client: &ApiClient, json: bool) -> anyhow::Result<()> {
    let mut auth = AuthSlice::new();
    auth.restore(client);

    match auth.session().user.as_ref() {
        Some(user) => {
            if json {
                print_json(user)?;
                return Ok(());
            }
            println!("User:  {} <{}>", user.username, user.email);
            if let Some(role) = user.role {
                println!("Role:  {role}");
            }
        }
        None => {
            if json {
                print_json(&serde_json::Value::Null)?;
                return Ok(());
            }
            println!("Not logged in");
        }
    }
    Ok(())
}
