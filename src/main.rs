use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use gymflow::api::{create_routes, AppState};
use gymflow::auth::AuthService;
use gymflow::catalog::ExerciseCatalog;
use gymflow::config::{run_migrations, AdminSeeder, AdminSetup, Settings};
use gymflow::services::Mailer;

#[derive(Parser)]
#[command(name = "gymflow")]
#[command(about = "Gym management web application", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the web server (default)
    Serve,

    /// Apply pending database migrations and exit
    Migrate,

    /// Create the administrator account, or promote an existing one
    SetupAdmin {
        #[arg(long, env = "ADMIN_USERNAME")]
        username: String,

        #[arg(long, env = "ADMIN_EMAIL")]
        email: Option<String>,

        #[arg(long, env = "ADMIN_PASSWORD")]
        password: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let settings = Settings::from_env()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&settings.app.log_level)),
        )
        .init();

    let cli = Cli::parse();

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => serve(settings).await,
        Commands::Migrate => {
            let pool = settings.database.create_pool().await?;
            run_migrations(&pool).await?;
            info!("Migrations applied");
            Ok(())
        }
        Commands::SetupAdmin {
            username,
            email,
            password,
        } => {
            let pool = settings.database.create_pool().await?;
            run_migrations(&pool).await?;

            let outcome = AdminSeeder::new(pool)
                .setup_admin(&username, email.as_deref(), &password)
                .await?;
            match outcome {
                AdminSetup::Created => info!("Administrator {} created", username),
                AdminSetup::Promoted => info!("Existing user {} promoted to administrator", username),
            }
            Ok(())
        }
    }
}

async fn serve(settings: Settings) -> Result<()> {
    let pool = settings.database.create_pool().await?;
    run_migrations(&pool).await?;

    let catalog = ExerciseCatalog::new(&settings.catalog).context("Failed to build exercise catalog")?;
    if !catalog.is_remote() {
        info!("Exercise catalog running on bundled data only");
    }

    let mailer = Mailer::new(&settings.mail, &settings.app.public_url);
    if !settings.mail.is_enabled() {
        warn!("SMTP_HOST not set; password reset mail will only be logged");
    }

    if settings.app.is_development() {
        info!("Running in development mode; session cookies are not marked Secure");
    } else if settings.app.jwt_secret.len() < 32 {
        warn!("JWT_SECRET is shorter than 32 characters");
    }

    let auth_service = AuthService::new(
        pool.clone(),
        &settings.app.jwt_secret,
        settings.app.session_hours,
    );
    let state = AppState::new(
        pool,
        auth_service,
        catalog,
        mailer,
        settings.app.is_production(),
    );

    let app = create_routes(state);

    let address = settings.app.server_address();
    let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind {}", address))?;
    info!("GymFlow listening on http://{}", address);
    info!("Health check available at http://{}/health", address);

    axum::serve(listener, app).await?;

    Ok(())
}
