//! DocuAPI CLI
//!
//! Command-line client for the DocuAPI backend: sign in, inspect the
//! dashboard, manage documents and the subscription plan.

mod navigator;

use std::io::BufRead;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use docuapi_core::models::{PlanCode, SalesInquiry};
use docuapi_core::navigation::encode_component;
use docuapi_core::services::{DEFAULT_RECENT_LIMIT, DEFAULT_USAGE_DAYS};
use docuapi_core::{
    current_user, login, logout, AuthenticatedClient, DashboardApi, Database, ReqwestTransport,
    Router, Settings, SqliteStorage, SubscriptionApi,
};
use serde::Serialize;

use navigator::TerminalNavigator;

#[derive(Parser)]
#[command(name = "docuapi", version)]
#[command(about = "Command-line client for the DocuAPI document platform")]
struct Cli {
    /// API base URL (overrides settings and environment)
    #[arg(long, global = true)]
    api_base: Option<String>,

    /// Path to the local database
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Sign in with email and password
    Login {
        #[arg(long)]
        email: String,
        /// Read from stdin when omitted
        #[arg(long)]
        password: Option<String>,
    },
    /// Sign out and clear stored tokens
    Logout,
    /// Show the signed-in user
    Whoami,
    /// Dashboard summary counters
    Summary,
    /// Daily upload counts
    Usage {
        #[arg(long, default_value_t = DEFAULT_USAGE_DAYS)]
        days: u32,
    },
    /// Most recent documents
    Documents {
        #[arg(long, default_value_t = DEFAULT_RECENT_LIMIT)]
        limit: u32,
    },
    /// Delete a document
    Delete { id: String },
    /// Subscription plan
    Plan {
        #[command(subcommand)]
        action: Option<PlanAction>,
    },
    /// Ask sales about a plan
    ContactSales {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        company: Option<String>,
        #[arg(long)]
        role: Option<String>,
        #[arg(long)]
        plan: Option<PlanCode>,
        #[arg(long)]
        message: Option<String>,
    },
    /// Show or change stored settings
    Config {
        #[command(subcommand)]
        action: Option<ConfigAction>,
    },
}

#[derive(Subcommand)]
enum PlanAction {
    /// Fetch the current plan
    Show,
    /// Switch to another plan
    Set { plan: PlanCode },
    /// Show the locally cached plan
    Cached,
}

#[derive(Clone, Subcommand)]
enum ConfigAction {
    /// Print effective settings
    Show,
    SetApiBase { url: String },
    SetAppBase { url: String },
    SetLocale { locale: String },
    /// Forget stored settings
    Reset {
        /// Also clear stored tokens and the cached plan
        #[arg(long)]
        all: bool,
    },
}

impl Command {
    /// App route the command acts on, checked by the route guard.
    fn route(&self) -> Option<String> {
        match self {
            Self::Login { .. } => Some("/login".to_string()),
            Self::Logout => Some("/logout".to_string()),
            Self::Documents { limit } => Some(format!("/documents?limit={limit}")),
            Self::Delete { id } => Some(format!("/documents/{}", encode_component(id))),
            Self::Whoami
            | Self::Summary
            | Self::Usage { .. }
            | Self::Plan { .. }
            | Self::ContactSales { .. } => Some("/dashboard".to_string()),
            Self::Config { .. } => None,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let directive = if cli.verbose {
        "docuapi=debug"
    } else {
        "docuapi=info"
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(directive.parse()?)
                .add_directive(tracing::Level::WARN.into()),
        )
        .init();

    tracing::debug!("Starting DocuAPI CLI v{}", docuapi_core::VERSION);

    let db = match &cli.db {
        Some(path) => Database::open_at(path.clone())?,
        None => Database::open()?,
    };
    db.migrate()?;

    let stored = Settings::load(&db);
    let mut settings = stored.clone();
    settings.apply_env();
    if let Some(base) = &cli.api_base {
        settings.api_base = base.clone();
        settings.validate();
    }

    if let Command::Config { action } = &cli.command {
        return run_config(&db, stored, settings, action.clone());
    }
    let Some(route) = cli.command.route() else {
        bail!("Command does not target an app route");
    };

    let navigator = Arc::new(TerminalNavigator::new(
        "/",
        &settings.login_path,
        settings.app_base.clone(),
    ));
    let client = AuthenticatedClient::new(
        Arc::new(ReqwestTransport::new()?),
        Arc::new(SqliteStorage::new(db)),
        navigator.clone(),
        &settings,
    );

    let router = Router::new(
        client.tokens().clone(),
        navigator.clone(),
        settings.login_path.clone(),
    );
    let destination = router.push(&route);
    if destination != route {
        if matches!(cli.command, Command::Login { .. }) {
            println!("Already signed in. Run `docuapi logout` first to switch accounts.");
            return Ok(());
        }
        bail!("Not signed in");
    }

    let result = run(&client, cli.command).await;
    if let Err(e) = &result {
        if navigator.redirected_to_login() {
            tracing::warn!(error = %e, "Session could not be recovered");
        }
    }
    result
}

async fn run(client: &AuthenticatedClient, command: Command) -> anyhow::Result<()> {
    match command {
        Command::Login { email, password } => {
            let password = match password {
                Some(p) => p,
                None => read_password()?,
            };
            let res = login(client, &email, &password).await?;
            print_json(&res.user)?;
        }
        Command::Logout => {
            let acknowledged = logout(client).await?;
            if acknowledged {
                println!("Signed out.");
            } else {
                println!("Signed out locally.");
            }
        }
        Command::Whoami => print_json(&current_user(client).await?)?,
        Command::Summary => print_json(&DashboardApi::new(client).summary().await?)?,
        Command::Usage { days } => print_json(&DashboardApi::new(client).usage(days).await?)?,
        Command::Documents { limit } => {
            let docs = DashboardApi::new(client).recent_documents(limit).await?;
            for doc in &docs {
                println!(
                    "{:>8}  {:<40}  {}",
                    doc.id.to_string(),
                    doc.display_name(),
                    doc.created_at.as_deref().unwrap_or("-")
                );
            }
        }
        Command::Delete { id } => {
            print_json(&DashboardApi::new(client).delete_document(&id).await?)?;
        }
        Command::Plan { action } => {
            let api = SubscriptionApi::new(client);
            match action.unwrap_or(PlanAction::Show) {
                PlanAction::Show => print_json(&api.fetch_plan().await?)?,
                PlanAction::Set { plan } => print_json(&api.update_plan(plan).await?)?,
                PlanAction::Cached => match api.cached_plan() {
                    Some(plan) => print_json(&plan)?,
                    None => println!("No cached plan."),
                },
            }
        }
        Command::ContactSales {
            name,
            email,
            company,
            role,
            plan,
            message,
        } => {
            let inquiry = SalesInquiry {
                full_name: name,
                email,
                company,
                role,
                desired_plan: plan,
                message,
            };
            print_json(&SubscriptionApi::new(client).submit_sales_inquiry(&inquiry).await?)?;
        }
        Command::Config { .. } => {}
    }
    Ok(())
}

fn run_config(
    db: &Database,
    mut stored: Settings,
    effective: Settings,
    action: Option<ConfigAction>,
) -> anyhow::Result<()> {
    match action.unwrap_or(ConfigAction::Show) {
        ConfigAction::Show => {
            print_json(&effective)?;
            return Ok(());
        }
        ConfigAction::SetApiBase { url } => stored.api_base = url,
        ConfigAction::SetAppBase { url } => stored.app_base = Some(url),
        ConfigAction::SetLocale { locale } => stored.locale = locale,
        ConfigAction::Reset { all } => {
            Settings::reset(db)?;
            if all {
                db.clear_items()?;
            }
            tracing::info!(all, "Settings reset");
            return print_json(&Settings::load(db));
        }
    }
    stored.validate();
    stored.save(db)?;
    tracing::info!(path = %db.path().display(), "Settings saved");
    print_json(&stored)
}

fn read_password() -> anyhow::Result<String> {
    eprint!("Password: ");
    let mut line = String::new();
    std::io::stdin()
        .lock()
        .read_line(&mut line)
        .context("Failed to read password from stdin")?;
    let password = line.trim_end_matches(['\r', '\n']).to_string();
    if password.is_empty() {
        bail!("Password is required");
    }
    Ok(password)
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
