use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use dialoguer::{Input, Password};
use dotenvy::dotenv;
use gatekeep_cli::admin::create_admin;
use gatekeep_cli::seeder::seed_users;
use gatekeep_config::DatabaseConfig;
use gatekeep_db::{PgUserStore, UserRepository, init_db_pool, run_migrations};

#[derive(Parser)]
#[command(name = "gatekeep-cli")]
#[command(about = "Gatekeep CLI - Administrative tools for Gatekeep", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new administrator account
    CreateAdmin {
        /// Login (email address)
        #[arg(short = 'e', long)]
        email: Option<String>,

        /// Password (will be prompted securely if not provided)
        #[arg(short = 'p', long)]
        password: Option<String>,
    },
    /// Seed the database with fake users
    Seed {
        /// Number of users to create
        #[arg(short = 'c', long, default_value = "50")]
        count: usize,
    },
}

#[tokio::main]
async fn main() {
    dotenv().ok();

    if let Err(e) = run(Cli::parse()).await {
        eprintln!("\n❌ {:#}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = DatabaseConfig::from_env()?;
    let pool = init_db_pool(&config)
        .await
        .context("Failed to connect to database")?;
    run_migrations(&pool).await.context("Failed to run migrations")?;
    let store: Arc<dyn UserRepository> = Arc::new(PgUserStore::new(pool));

    match cli.command {
        Commands::CreateAdmin { email, password } => {
            handle_create_admin(store.as_ref(), email, password).await
        }
        Commands::Seed { count } => seed_users(store.as_ref(), count).await.map(|_| ()),
    }
}

async fn handle_create_admin(
    store: &dyn UserRepository,
    email: Option<String>,
    password: Option<String>,
) -> Result<()> {
    // Use provided values or prompt interactively
    let email = match email {
        Some(email) => email,
        None => Input::new()
            .with_prompt("Email address")
            .interact_text()
            .context("Failed to read email")?,
    };

    let password = match password {
        Some(password) => password,
        None => Password::new()
            .with_prompt("Password")
            .with_confirmation("Confirm password", "Passwords don't match")
            .interact()
            .context("Failed to read password")?,
    };

    let admin = create_admin(store, &email, &password)
        .await
        .context("Error creating admin")?;

    println!("\n✅ Admin created successfully!");
    println!("   ID: {}", admin.id);
    println!("   Email: {}", admin.login);
    Ok(())
}
