use argh::FromArgs;
use grounded_detect::{DetectionService, server};
use std::sync::Arc;

// defaults for the server
const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8000;

#[derive(FromArgs)]
/// Detection backend for the Grounded AR app.
struct ServerArgs {
    /// the host to run the server on
    #[argh(option, short = 'h', default = "DEFAULT_HOST.to_string()")]
    host: String,

    /// the port to run the server on
    #[argh(option, short = 'p', default = "DEFAULT_PORT")]
    port: u16,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args: ServerArgs = argh::from_env();

    let addr = format!("{}:{}", args.host, args.port);

    // No real inference backend is wired in yet; serve canned detections.
    let service = Arc::new(DetectionService::simulated());
    log::info!("Model initialized (simulation mode)");

    let app = server::router(service);

    log::info!("Starting the Grounded AR Detection API");
    log::info!("Listening on: {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
