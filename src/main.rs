use std::env;
use std::fs;
use std::path::PathBuf;

use tryon::models::{decode_data_uri, extension_for_mime, BACKGROUND_PRESETS};
use tryon::{Config, GenerationOrchestrator, GenerationRequest, ModelGender};

const USAGE: &str = "usage: tryon <clothing-image-url> <male|female> <background> [output-dir]\n       tryon --backgrounds";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let dotenv_loaded = dotenv::dotenv().is_ok();

    tryon::logger::init_with_config(
        tryon::logger::LoggerConfig::development().with_level(tryon::logger::LogLevel::Info),
    )?;

    if dotenv_loaded {
        log::info!("✅ .env file loaded");
    } else {
        log::warn!("⚠️  No .env file found, using system environment variables");
    }

    let args: Vec<String> = env::args().skip(1).collect();
    if args.first().map(String::as_str) == Some("--backgrounds") {
        for preset in BACKGROUND_PRESETS {
            println!("{:<14} {}", preset.id, preset.name);
        }
        return Ok(());
    }

    let (image_url, gender, background) = match args.as_slice() {
        [image_url, gender, background, ..] => (image_url, gender, background),
        _ => {
            eprintln!("{}", USAGE);
            std::process::exit(2);
        }
    };
    let output_dir = args
        .get(3)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."));

    let config = Config::from_env();
    log::info!(
        "⚙️  Model: {} | timeout: {}ms | attempts: {}",
        config.gemini.model,
        config.retry.timeout.as_millis(),
        config.retry.max_attempts
    );

    let orchestrator = GenerationOrchestrator::from_config(&config)?;
    let request = GenerationRequest::new(
        image_url.as_str(),
        gender.parse::<ModelGender>()?,
        background.as_str(),
    );

    let result = orchestrator.generate(&request).await?;
    if result.is_empty() {
        log::warn!("The model did not return any image");
        return Ok(());
    }

    fs::create_dir_all(&output_dir)?;
    for (index, uri) in result.images.iter().enumerate() {
        let (mime_type, bytes) = decode_data_uri(uri)?;
        let path = output_dir.join(format!(
            "tryon-{}.{}",
            index + 1,
            extension_for_mime(&mime_type)
        ));
        fs::write(&path, bytes)?;
        println!("{}", path.display());
    }

    Ok(())
}
