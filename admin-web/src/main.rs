use admin_web::router;
use bot_core::init_tracing;
use dotenvy::dotenv;
use storage::DialogRepository;
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();

    init_tracing("logs/admin-web.log")?;

    let database_url =
        std::env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite:bot.db".to_string());
    let bind_addr =
        std::env::var("ADMIN_BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:5000".to_string());

    let pool = storage::connect(&database_url).await?;
    let dialogs = DialogRepository::new(pool).await?;

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    info!("Admin view listening on {bind_addr}");

    axum::serve(listener, router(dialogs)).await?;

    Ok(())
}
