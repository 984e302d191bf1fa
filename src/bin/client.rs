use argh::FromArgs;
use base64::{Engine as _, engine::general_purpose::STANDARD as B64};
use grounded_detect::messages::DetectionRequest;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

// defaults for the client
const DEFAULT_HOST: &str = "localhost";
const DEFAULT_PORT: u16 = 8000;

#[derive(FromArgs)]
/// Client for the Grounded AR detection backend.
struct ClientArgs {
    /// the host to connect to
    #[argh(option, short = 'h', default = "DEFAULT_HOST.to_string()")]
    host: String,

    /// the port to connect to
    #[argh(option, short = 'p', default = "DEFAULT_PORT")]
    port: u16,

    #[argh(subcommand)]
    command: ClientCommands,
}

#[derive(FromArgs)]
#[argh(subcommand)]
enum ClientCommands {
    Detect(DetectCommand),
    Health(HealthCommand),
    Classes(ClassesCommand),
    Stats(StatsCommand),
}

#[derive(FromArgs)]
/// Submit an image file for detection
#[argh(subcommand, name = "detect")]
struct DetectCommand {
    /// the path to the image
    #[argh(option, short = 'i')]
    image_path: PathBuf,

    /// the frame id to tag the request with
    #[argh(option, short = 'f', default = "0")]
    frame_id: i64,
}

#[derive(FromArgs)]
/// Check service health
#[argh(subcommand, name = "health")]
struct HealthCommand {}

#[derive(FromArgs)]
/// Fetch the COCO class table
#[argh(subcommand, name = "classes")]
struct ClassesCommand {}

#[derive(FromArgs)]
/// Fetch service statistics
#[argh(subcommand, name = "stats")]
struct StatsCommand {}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: ClientArgs = argh::from_env();

    let client = reqwest::Client::new();

    let addr = format!("{}:{}", args.host, args.port);

    let result = match args.command {
        ClientCommands::Detect(detect) => {
            let bytes = std::fs::read(&detect.image_path)?;
            let timestamp = SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_secs_f64())
                .unwrap_or(0.0);

            client
                .post(format!("http://{addr}/upload_image"))
                .json(&DetectionRequest {
                    image: format!("data:image/png;base64,{}", B64.encode(bytes)),
                    timestamp,
                    frame_id: detect.frame_id,
                    detection_type: "coco".to_string(),
                })
                .send()
                .await?
                .json::<serde_json::Value>()
                .await?
        }
        ClientCommands::Health(_) => {
            client
                .get(format!("http://{addr}/health"))
                .send()
                .await?
                .json::<serde_json::Value>()
                .await?
        }
        ClientCommands::Classes(_) => {
            client
                .get(format!("http://{addr}/classes"))
                .send()
                .await?
                .json::<serde_json::Value>()
                .await?
        }
        ClientCommands::Stats(_) => {
            client
                .get(format!("http://{addr}/stats"))
                .send()
                .await?
                .json::<serde_json::Value>()
                .await?
        }
    };

    println!("Result: {}", serde_json::to_string_pretty(&result)?);

    Ok(())
}
