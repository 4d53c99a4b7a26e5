use std::sync::Arc;

use clap::{Parser, Subcommand};
use safechat::{
    check, cli,
    config::AppConfig,
    error::ConfigError,
    http::{self, AppState},
    model::GeminiProvider,
    session::ChatSession,
};
use tokio::{io::BufReader, net::TcpListener};
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "safechat")]
#[command(about = "Chat with Gemini through a keyword content filter")]
#[command(
    long_about = "Safechat sends your messages to Google Gemini after checking them against a list \
of blocked keywords, and redacts blocked keywords from the replies.\n\n\
Environment variables (a .env file is loaded if present):\n\
  GOOGLE_GEMINI_KEY     Gemini API key (required unless MODEL_PROVIDER=mock)\n\
  GEMINI_MODEL          Model name (default gemini-1.5-flash-latest)\n\
  SYSTEM_PROMPT         System instruction sent with every prompt\n\
  BLOCKED_KEYWORDS      Extra comma-separated keywords to block\n\
  MODEL_PROVIDER        gemini or mock\n\
  PORT / HTTP_BIND      Web server address (default 0.0.0.0:5000)"
)]
struct Args {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the interactive terminal chat (default)
    Chat,
    /// Serve the web chat and its JSON API
    Serve,
    /// List Gemini models that support generateContent
    Models,
    /// Verify configuration, the content filter, and the API connection
    Check,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();
    let command = args.command.unwrap_or(Commands::Chat);
    init_tracing(match command {
        Commands::Serve => "info",
        _ => "warn",
    });

    let result = match AppConfig::from_env() {
        Ok(config) => match command {
            Commands::Chat => run_chat(&config).await,
            Commands::Serve => run_server(&config).await,
            Commands::Models => list_models(&config).await,
            Commands::Check => run_check(&config).await,
        },
        Err(error) => Err(error.into()),
    };

    if let Err(error) = &result {
        if let Some(config_error) = error.downcast_ref::<ConfigError>() {
            eprintln!("Configuration error: {config_error}");
            eprintln!("\nPlease make sure:");
            eprintln!("1. You have a .env file or exported environment variables");
            eprintln!("2. GOOGLE_GEMINI_KEY is set");
            eprintln!("3. Your API key is valid");
            std::process::exit(1);
        }
    }

    result
}

fn init_tracing(default_directive: &str) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_directive));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

async fn run_chat(config: &AppConfig) -> anyhow::Result<()> {
    let session = ChatSession::from_config(config)?;
    let input = BufReader::new(tokio::io::stdin());

    tokio::select! {
        result = cli::run_chat_loop(&session, input, tokio::io::stdout()) => result,
        _ = tokio::signal::ctrl_c() => {
            println!("\n\nGoodbye! (Interrupted)");
            // The blocking stdin reader would otherwise keep the runtime alive.
            std::process::exit(0)
        }
    }
}

async fn run_server(config: &AppConfig) -> anyhow::Result<()> {
    let session = Arc::new(ChatSession::from_config(config)?);
    info!(
        model = %session.model_name(),
        keywords = session.filter().keyword_count(),
        "content filter ready"
    );

    let app = http::router(AppState { session });
    let listener = TcpListener::bind(config.http_bind).await?;
    info!("Safechat web UI listening on http://{}", config.http_bind);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        warn!(?error, "failed to listen for shutdown signal");
    }
    info!("shutting down");
}

async fn list_models(config: &AppConfig) -> anyhow::Result<()> {
    let provider = GeminiProvider::from_config(config)?;
    let models = provider.list_models().await?;

    println!("Models that support generateContent:\n");
    for model in &models {
        println!("{}", model.name);
        println!("   Display name: {}", model.display_name);
        println!("   Description:  {}", model.description);
        match model.input_token_limit {
            Some(limit) => println!("   Max tokens:   {limit}"),
            None => println!("   Max tokens:   n/a"),
        }
        println!();
    }
    println!("Set GEMINI_MODEL to one of the names above.");
    Ok(())
}

async fn run_check(config: &AppConfig) -> anyhow::Result<()> {
    let results = check::run_checks(config).await;

    for result in &results {
        let status = if result.passed { "PASS" } else { "FAIL" };
        println!("{status}: {} ({})", result.name, result.detail);
    }

    let passed = results.iter().filter(|result| result.passed).count();
    println!("\nChecks passed: {passed}/{}", results.len());

    if passed != results.len() {
        anyhow::bail!("{} of {} checks failed", results.len() - passed, results.len());
    }
    Ok(())
}
