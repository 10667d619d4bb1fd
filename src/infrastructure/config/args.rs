use super::app_config::LogLevel;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(
    name = "pqa-media",
    version,
    about = "Keeps question-paper images in sync with Cloudinary",
    long_about = None
)]
pub struct CliArgs {
    /// Configuration file path.
    #[arg(short, long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Log file path.
    #[arg(long, value_name = "PATH", global = true)]
    pub log_path: Option<PathBuf>,

    /// Log verbosity level.
    #[arg(long, value_enum, global = true)]
    pub log_level: Option<LogLevel>,

    /// Directory holding saved documents.
    #[arg(long, value_name = "PATH", global = true)]
    pub data_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print the image URLs of an HTML file in document order.
    Extract {
        /// HTML file to scan.
        html: PathBuf,
    },

    /// Print the Cloudinary public id of a delivery URL.
    PublicId {
        /// Image URL.
        url: String,
    },

    /// Save an edited body, re-hosting new images and deleting dropped ones.
    Save {
        /// Existing document id; a new document is created when omitted.
        #[arg(short, long)]
        document: Option<String>,

        /// HTML file with the edited body.
        #[arg(short, long, value_name = "PATH")]
        body: PathBuf,

        /// TOML file with the paper metadata.
        #[arg(short, long, value_name = "PATH")]
        metadata: Option<PathBuf>,
    },

    /// Print a stored document as JSON.
    Show {
        /// Document id.
        document: String,
    },

    /// Upload a local image file and print its URL.
    Upload {
        /// Image file.
        file: PathBuf,

        /// TOML file with the paper metadata.
        #[arg(short, long, value_name = "PATH")]
        metadata: Option<PathBuf>,
    },
}
