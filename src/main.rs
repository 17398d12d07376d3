use lsys_books::{router, AppError, Config, Db, ServerState};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), AppError> {
	// .env is optional, real environment wins
	dotenvy::dotenv().ok();

	tracing_subscriber::fmt()
		.with_env_filter(
			EnvFilter::try_from_default_env()
				.unwrap_or_else(|_| EnvFilter::new("info,sqlx=warn")),
		)
		.init();

	let config = Config::from_env()?;

	// set up connection pool
	let db = Db::connect(&config).await?;
	db.migrate().await?;

	let app = router(ServerState::new(db));

	let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
	tracing::info!(addr = %config.bind_addr, "listening");
	axum::serve(listener, app).await?;
	Ok(())
}
