use clap::Parser;
use dotenvy::dotenv;
use purse::{
    cli::{self, AppContext, Cli},
    config::{database, settings},
    errors::Result,
};
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    // 2. Load .env file (non-fatal, env vars can be set externally)
    dotenv().ok();

    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Command failed: {}", e);
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    // 3. Load settings
    let settings = settings::load_settings(&cli.config)
        .inspect_err(|e| error!("Failed to load settings: {}", e))?;

    // 4. Open the store (DATABASE_URL overrides the settings file)
    let database_url = database::get_database_url(settings.store.database_url.as_deref())?;
    let database = database::create_connection(&database_url)
        .await
        .inspect(|_| info!("Database initialized successfully."))
        .inspect_err(|e| error!("Failed to initialize database: {}", e))?;

    // 5. Run the action, then close the store whatever the outcome
    let ctx = AppContext::new(database, settings);
    let mut stdout = std::io::stdout().lock();
    let outcome = cli::run(&ctx, cli.command, &mut stdout).await;

    database::close_connection(ctx.database).await?;
    outcome
}
