//! The `pokelens identify` command: run the pipeline on a local file.

use clap::Args;
use pokelens_core::{Config, ImageSubmission, Pokedex, DEFAULT_LANG};
use std::path::{Path, PathBuf};

/// Arguments for the `identify` command.
#[derive(Args, Debug)]
pub struct IdentifyArgs {
    /// Image file to identify
    #[arg(required = true)]
    pub image: PathBuf,

    /// Language for the description and error messages
    #[arg(short, long, default_value = DEFAULT_LANG)]
    pub lang: String,

    /// Override the image MIME type (otherwise inferred from the extension)
    #[arg(long)]
    pub media_type: Option<String>,
}

/// Execute the identify command.
pub async fn execute(args: IdentifyArgs, config: Config) -> anyhow::Result<()> {
    let pokedex = Pokedex::from_config(&config)?;
    let image = load_image(&args.image, args.media_type.as_deref()).await?;

    match pokedex.identify_pokemon(image, &args.lang).await {
        Ok(record) => {
            println!("{}", serde_json::to_string_pretty(&record)?);
            Ok(())
        }
        Err(not_found) => {
            tracing::debug!("identify failed: {}", not_found.kind);
            anyhow::bail!("{}", not_found.detail)
        }
    }
}

async fn load_image(path: &Path, media_type: Option<&str>) -> anyhow::Result<ImageSubmission> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to read {}: {e}", path.display()))?;

    let media_type = media_type.map(String::from).unwrap_or_else(|| {
        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
        ImageSubmission::media_type_for_extension(ext).to_string()
    });

    let mut image = ImageSubmission::new(bytes, media_type);
    if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
        image = image.with_file_name(name);
    }
    Ok(image)
}
