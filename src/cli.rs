use clap::{Parser, Subcommand};
use std::path::PathBuf;
use xray_edge_common::Variant;

#[derive(Parser)]
#[command(name = "xray-edge")]
#[command(about = "Submit X-ray images for edge detection and browse the results", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// API base URL (overrides config and XRAY_EDGE_API_BASE_URL)
    #[arg(long, global = true)]
    pub base_url: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Upload images and open the results viewer
    Process {
        /// Image files or folders (folders contribute their direct image files)
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// Where downloads are saved (default: config, then current directory)
        #[arg(short, long)]
        download_dir: Option<PathBuf>,

        /// Print a summary instead of opening the interactive viewer
        #[arg(long)]
        no_interactive: bool,

        /// Non-interactive: download every result in --variant
        #[arg(long)]
        download_all: bool,

        /// Variant for --download-all (canny/fuzzy)
        #[arg(long, default_value = "canny")]
        variant: Variant,

        /// Non-interactive: also write the normalized results as JSON
        #[arg(long)]
        json: Option<PathBuf>,
    },

    /// Print the retrieval URL of a processed image
    Url {
        /// Server-assigned image id
        #[arg(required = true)]
        image_id: String,

        /// canny/fuzzy
        #[arg(long, default_value = "canny")]
        variant: Variant,
    },

    /// Show or edit settings
    Config {
        /// Set the API base URL
        #[arg(long)]
        set_base_url: Option<String>,

        /// Set the request timeout in seconds
        #[arg(long)]
        set_timeout: Option<u64>,

        /// Show settings
        #[arg(long)]
        show: bool,
    },
}
