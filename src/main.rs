use std::path::Path;
use std::sync::Arc;

use clap::Parser;
use color_eyre::eyre::{Result, WrapErr, eyre};
use tracing::{debug, info};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use pqa_media::application::{ImageExtractor, ImageOutcome, SaveDocumentUseCase, SaveRequest};
use pqa_media::domain::{
    ContentIdentifier, DocumentId, DocumentStorePort, MediaStorePort, PaperMetadata,
};
use pqa_media::infrastructure::{
    AppConfig, CliArgs, CloudinaryClient, Command, ConfigOrigin, FileDocumentStore,
    StorageManager,
};

fn init_logging(config: &AppConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_level.to_string()));

    if let Some(log_path) = &config.log_path {
        if let Some(parent) = log_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(log_path)?;

        let file_layer = fmt::layer()
            .with_writer(file)
            .with_ansi(false)
            .with_target(true)
            .with_thread_ids(false);

        tracing_subscriber::registry()
            .with(filter)
            .with(file_layer)
            .init();

        info!(path = %log_path.display(), "Logging initialized");
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
            .init();
    }

    Ok(())
}

fn load_config(args: &CliArgs) -> Result<(AppConfig, ConfigOrigin)> {
    let manager = StorageManager::new()?;
    let (mut config, origin) = manager
        .load_config(args.config.as_deref())
        .wrap_err("Failed to load configuration")?;

    config.apply_env();
    config.merge_with_args(args);

    Ok((config, origin))
}

fn media_store(config: &AppConfig) -> Result<Arc<dyn MediaStorePort>> {
    let credentials = config.cloudinary.credentials()?;
    let client = match &config.cloudinary.api_base {
        Some(api_base) => CloudinaryClient::with_base_url(credentials, api_base.clone())?,
        None => CloudinaryClient::new(credentials)?,
    };

    Ok(Arc::new(client.with_folder(config.cloudinary.folder.clone())))
}

fn document_store(config: &AppConfig) -> Result<Arc<FileDocumentStore>> {
    let data_dir = config
        .effective_data_dir()
        .ok_or_else(|| eyre!("cannot determine data directory, pass --data-dir"))?;

    debug!(path = %data_dir.display(), "Using document directory");
    Ok(Arc::new(FileDocumentStore::new(&data_dir)))
}

fn read_metadata(path: Option<&Path>) -> Result<PaperMetadata> {
    let Some(path) = path else {
        return Ok(PaperMetadata::default());
    };

    let content = std::fs::read_to_string(path)
        .wrap_err_with(|| format!("Failed to read metadata file {}", path.display()))?;
    toml::from_str(&content).wrap_err("Failed to parse metadata file")
}

fn describe(outcome: &ImageOutcome) -> String {
    match outcome {
        ImageOutcome::Uploaded { source, asset } => format!("uploaded  {source} -> {}", asset.url),
        ImageOutcome::UploadFailed { source, error } => format!("FAILED    upload {source}: {error}"),
        ImageOutcome::Deleted { reference, .. } => format!("deleted   {reference}"),
        ImageOutcome::DeletionFailed {
            reference, error, ..
        } => format!("FAILED    delete {reference}: {error}"),
        ImageOutcome::Unresolvable { reference } => {
            format!("skipped   {reference}: no public id")
        }
    }
}

async fn run(command: Command, config: &AppConfig) -> Result<()> {
    match command {
        Command::Extract { html } => {
            let html = tokio::fs::read_to_string(&html)
                .await
                .wrap_err_with(|| format!("Failed to read {}", html.display()))?;
            for reference in ImageExtractor::extract(&html) {
                println!("{reference}");
            }
        }
        Command::PublicId { url } => {
            let id = ContentIdentifier::derive(&url)
                .ok_or_else(|| eyre!("no public id: URL does not follow the /upload/ layout"))?;
            println!("{id}");
        }
        Command::Save {
            document,
            body,
            metadata,
        } => {
            let body = tokio::fs::read_to_string(&body)
                .await
                .wrap_err_with(|| format!("Failed to read {}", body.display()))?;
            let metadata = read_metadata(metadata.as_deref())?;

            let use_case = SaveDocumentUseCase::new(document_store(config)?, media_store(config)?);
            let mut request = SaveRequest::new(body, metadata);
            if let Some(id) = document {
                request = request.for_document(DocumentId::new(id));
            }

            let response = use_case.execute(request).await?;

            for outcome in &response.reconciliation.outcomes {
                eprintln!("{}", describe(outcome));
            }
            if response.reconciliation.needs_attention() {
                eprintln!("saved, but some image requests were rejected; check the media store settings");
            } else if response.is_partial() {
                eprintln!("saved with image failures; they are retried on the next save");
            }
            println!("{}", response.document_id);
        }
        Command::Show { document } => {
            let store = document_store(config)?;
            let stored = store
                .read(&DocumentId::new(&document))
                .await?
                .ok_or_else(|| eyre!("document {document} not found"))?;
            println!("{}", serde_json::to_string_pretty(&stored)?);
        }
        Command::Upload { file, metadata } => {
            let metadata = read_metadata(metadata.as_deref())?;
            let bytes = tokio::fs::read(&file)
                .await
                .wrap_err_with(|| format!("Failed to read {}", file.display()))?;
            let file_name = file
                .file_name()
                .and_then(|name| name.to_str())
                .unwrap_or("image");

            let asset = media_store(config)?
                .upload_file(file_name, bytes, &metadata)
                .await?;
            println!("{}", asset.url);
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    dotenvy::dotenv().ok();

    let args = CliArgs::parse();
    let (config, origin) = load_config(&args)?;

    init_logging(&config)?;

    info!(version = pqa_media::VERSION, "Starting {}", pqa_media::NAME);
    origin.log();

    run(args.command, &config).await
}
