use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing::{error, info};

use cs_app::{
    GetSettings, ListClients, LoginUseCase, RegisterUseCase, SendTypingCommand, SetTypingSpeed,
    StopOutcome,
};
use cs_core::ids::ClientId;
use cs_core::ports::{Credentials, RemoteStorePort};
use cs_core::sync::ConnectionHealth;
use cs_infra::InMemoryRemoteStore;
use cs_platform::UserDataDirs;

mod bootstrap;

use bootstrap::{default_client_name, init_tracing_subscriber, resolve_paths, AppContext, CliOverrides};

#[derive(Parser)]
#[command(name = "clipsync", version)]
#[command(about = "Sync the clipboard through a shared server and type text sent from other machines", long_about = None)]
struct Cli {
    /// Settings file to use instead of the per-user default
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Server base URL for this invocation (saved by `login`)
    #[arg(long, global = true, value_name = "URL")]
    server: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create an account on the server
    Register {
        #[arg(short, long)]
        username: String,
        #[arg(short, long)]
        password: String,
    },
    /// Open a session and remember this machine's client id
    Login {
        #[arg(short, long)]
        username: String,
        #[arg(short, long)]
        password: String,
    },
    /// Run the sync agent until Ctrl+C
    Run {
        /// Use an in-process store instead of the server
        #[arg(long)]
        offline: bool,
    },
    /// Check whether the server is reachable
    Probe,
    /// List the clients registered to this account
    Clients,
    /// Ask another client to type TEXT
    Type {
        /// Target client id
        #[arg(short, long = "client", value_name = "ID")]
        client: String,
        /// Delay between keystrokes in milliseconds
        #[arg(short, long, value_name = "MS")]
        speed: Option<u64>,
        text: String,
    },
    /// Inspect or change stored settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Print the effective settings
    Show,
    /// Store the default typing speed
    SetSpeed {
        #[arg(value_name = "MS")]
        speed_ms: u64,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let paths = resolve_paths(cli.config.clone(), &UserDataDirs::from_env())?;
    if let Err(err) = init_tracing_subscriber(paths.logs_dir.as_deref()) {
        eprintln!("Failed to initialize tracing: {err:#}");
    }

    let overrides = CliOverrides {
        server_url: cli.server.clone(),
    };
    let ctx = AppContext::load(paths, &overrides).await?;

    let result = dispatch(&ctx, cli.command).await;
    if let Err(err) = &result {
        error!(error = %format!("{err:#}"), "Command failed");
    }
    result
}

async fn dispatch(ctx: &AppContext, command: Commands) -> Result<()> {
    match command {
        Commands::Register { username, password } => run_register(ctx, username, password).await,
        Commands::Login { username, password } => run_login(ctx, &username, &password).await,
        Commands::Run { offline } => run_agent(ctx, offline).await,
        Commands::Probe => run_probe(ctx).await,
        Commands::Clients => run_clients(ctx).await,
        Commands::Type {
            client,
            speed,
            text,
        } => run_type(ctx, client, speed, text).await,
        Commands::Config { command } => match command {
            ConfigCommands::Show => run_config_show(ctx).await,
            ConfigCommands::SetSpeed { speed_ms } => run_set_speed(ctx, speed_ms).await,
        },
    }
}

async fn run_register(ctx: &AppContext, username: String, password: String) -> Result<()> {
    let store = ctx.http_store()?;
    RegisterUseCase::new(store)
        .execute(&Credentials {
            username: username.clone(),
            password,
        })
        .await
        .context("registration failed")?;

    println!("registered {username}; run `clipsync login` next");
    Ok(())
}

async fn run_login(ctx: &AppContext, username: &str, password: &str) -> Result<()> {
    let store = ctx.http_store()?;
    let outcome = LoginUseCase::new(store, ctx.settings_port(), default_client_name())
        .with_server_url(ctx.settings.server.url.clone())
        .execute(username, password)
        .await
        .context("login failed")?;

    println!("logged in as {username} on {}", ctx.settings.server.url);
    println!("client id: {}", outcome.client_id);
    if outcome.client_id_rotated {
        println!("(new client id generated for this machine)");
    }
    Ok(())
}

async fn run_agent(ctx: &AppContext, offline: bool) -> Result<()> {
    let remote: Arc<dyn RemoteStorePort> = if offline {
        Arc::new(InMemoryRemoteStore::new())
    } else {
        ctx.http_store()?
    };

    let agent = ctx.sync_agent(remote, !offline)?;
    agent.start().await.context("failed to start sync agent")?;

    if offline {
        println!("clipsync running offline (Ctrl+C to stop)");
    } else {
        println!(
            "clipsync syncing with {} (Ctrl+C to stop)",
            ctx.settings.server.url
        );
    }

    tokio::signal::ctrl_c()
        .await
        .context("failed to listen for Ctrl+C")?;
    info!("Shutdown requested");

    match agent.stop().await? {
        StopOutcome::Joined(session) => {
            println!(
                "stopped; {} typing command(s) seen this run",
                session.processed.len()
            );
        }
        StopOutcome::Aborted => {
            println!("stopped; worker did not finish its tick in time and was aborted");
        }
    }
    Ok(())
}

async fn run_probe(ctx: &AppContext) -> Result<()> {
    let store = ctx.http_store()?;
    match store.probe().await {
        ConnectionHealth::Healthy => {
            println!("healthy: {}", ctx.settings.server.url);
            Ok(())
        }
        ConnectionHealth::Degraded => {
            println!("unhealthy: {}", ctx.settings.server.url);
            bail!("server is unreachable")
        }
    }
}

async fn run_clients(ctx: &AppContext) -> Result<()> {
    let store = ctx.http_store()?;
    let clients = ListClients::new(store)
        .execute()
        .await
        .context("failed to list clients")?;

    if clients.is_empty() {
        println!("no clients registered");
        return Ok(());
    }

    let own = ctx.settings.account.client_id.as_ref();
    for client in clients {
        let marker = if Some(&client.client_id) == own { "*" } else { " " };
        println!(
            "{marker} {}  {}  {}",
            client.client_id,
            client.client_name.as_deref().unwrap_or("-"),
            client.last_seen.as_deref().unwrap_or("-"),
        );
    }
    Ok(())
}

async fn run_type(
    ctx: &AppContext,
    client: String,
    speed: Option<u64>,
    text: String,
) -> Result<()> {
    let store = ctx.http_store()?;
    let issued = SendTypingCommand::new(store, ctx.settings_port())
        .execute(ClientId::new(client), text, speed)
        .await
        .context("failed to send typing command")?;

    println!("typing command {} sent", issued.command_id);
    Ok(())
}

async fn run_config_show(ctx: &AppContext) -> Result<()> {
    let mut settings = GetSettings::new(ctx.settings_port()).execute().await?;
    settings.server.url = ctx.settings.server.url.clone();
    if settings.account.session_token.is_some() {
        settings.account.session_token = Some("<redacted>".to_string());
    }

    println!("# {}", ctx.paths.settings_path.display());
    print!(
        "{}",
        toml::to_string_pretty(&settings).context("failed to render settings")?
    );
    Ok(())
}

async fn run_set_speed(ctx: &AppContext, speed_ms: u64) -> Result<()> {
    SetTypingSpeed::new(ctx.settings_port())
        .execute(speed_ms)
        .await
        .context("failed to update typing speed")?;

    println!("default typing speed set to {speed_ms} ms");
    Ok(())
}
