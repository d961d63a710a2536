use mock_server::MockOptions;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), std::io::Error> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let port = std::env::var("PORT").unwrap_or_else(|_| "3000".to_string());
    let options = MockOptions {
        token: std::env::var("MOCK_ADMIN_TOKEN").unwrap_or_else(|_| mock_server::DEFAULT_TOKEN.to_string()),
        fail_uploads: std::env::var("MOCK_FAIL_UPLOADS").is_ok_and(|v| v == "1"),
    };
    let addr = format!("127.0.0.1:{port}");
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!(%addr, "mock admin backend listening");
    mock_server::run_with(listener, options).await
}
