use std::sync::Arc;

use clap::Parser;
use toeflprep::content::HttpContentProvider;
use toeflprep::db::Db;
use toeflprep::generator::GroqGenerator;
use toeflprep::AppState;

#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// SQLite database URL.
    #[arg(long, env, default_value = "sqlite://toeflprep.db")]
    database_url: String,

    /// The address to bind to.
    #[arg(short, long, env, default_value = "127.0.0.1:3000")]
    address: String,

    /// Groq API key for quiz generation.
    #[arg(long, env)]
    groq_api_key: String,

    /// Model used for quiz generation.
    #[arg(long, env, default_value = "openai/gpt-oss-20b")]
    groq_model: String,

    /// Base URL of the lesson content API.
    #[arg(long, env)]
    content_api_url: String,

    /// Set the Secure attribute on session cookies.
    #[arg(long, env, default_value_t = false)]
    secure_cookies: bool,
}

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let filter =
        std::env::var("RUST_LOG").unwrap_or_else(|_| "tracing=info,toeflprep=debug".to_owned());
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_span_events(tracing_subscriber::fmt::format::FmtSpan::CLOSE)
        .init();

    let args = Args::parse();
    tracing::info!("starting toeflprep v{}", toeflprep::utils::VERSION);

    let db = Db::new(&args.database_url).await?;
    let state = AppState {
        db,
        generator: Arc::new(GroqGenerator::new(args.groq_api_key, args.groq_model)),
        content: Arc::new(HttpContentProvider::new(args.content_api_url)),
        secure_cookies: args.secure_cookies,
    };

    let app = toeflprep::router(state);

    let listener = tokio::net::TcpListener::bind(&args.address).await?;
    tracing::info!("listening on {}", args.address);
    axum::serve(listener, app).await?;

    Ok(())
}
