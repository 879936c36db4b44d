use clap::Parser;
use dialoguer::{Confirm, Input};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing_subscriber::EnvFilter;
use xray_edge::{cli, config, controller, error, gateway, images, interactive, scanner};
use cli::{Cli, Commands};
use config::Config;
use controller::{SubmitOutcome, UploadController};
use error::{EdgeClientError, Result};
use gateway::EdgeApiClient;
use interactive::ViewerExit;
use xray_edge_common::{Navigator, ResultsEntry, ResultsViewer, Variant, VariantUrlResolver};

struct ProcessOptions {
    download_dir: PathBuf,
    interactive: bool,
    download_all: bool,
    variant: Variant,
    json: Option<PathBuf>,
}

fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("warn,xray_edge={level},xray_edge_common={level}")));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let config = Config::load()?;
    let base_url = config.resolve_base_url(cli.base_url.as_deref());

    match cli.command {
        Commands::Process { paths, download_dir, no_interactive, download_all, variant, json } => {
            println!("🩻 xray-edge - edge detection\n");

            let files = scanner::select_files(&paths)?;
            println!("✔ {} image(s) selected\n", files.len());

            let client = EdgeApiClient::new(base_url, Duration::from_secs(config.timeout_seconds))?;
            let controller = UploadController::new(client);
            controller.select_files(files)?;

            let options = ProcessOptions {
                download_dir: download_dir
                    .or_else(|| config.download_dir.clone())
                    .unwrap_or_else(|| PathBuf::from(".")),
                interactive: !no_interactive,
                download_all,
                variant,
                json,
            };
            let mut navigator = Navigator::new(config.max_visible_pages);
            run_process(&controller, &mut navigator, &options).await?;
        }

        Commands::Url { image_id, variant } => {
            let client = EdgeApiClient::new(base_url, Duration::from_secs(config.timeout_seconds))?;
            println!("{}", client.variant_url(&image_id, variant));
        }

        Commands::Config { set_base_url, set_timeout, show } => {
            let mut config = config;

            if let Some(url) = set_base_url {
                config.set_base_url(url)?;
                println!("✔ Base URL saved");
            }

            if let Some(seconds) = set_timeout {
                config.set_timeout(seconds)?;
                println!("✔ Timeout saved");
            }

            if show {
                println!("Settings:");
                println!("  Base URL:      {}", config.base_url);
                println!("  Effective URL: {}", config.resolve_base_url(None));
                println!("  Timeout:       {}s", config.timeout_seconds);
                println!("  Visible pages: {}", config.max_visible_pages);
                println!(
                    "  Download dir:  {}",
                    config
                        .download_dir
                        .as_ref()
                        .map(|p| p.display().to_string())
                        .unwrap_or_else(|| "(current directory)".into())
                );
            }
        }
    }

    Ok(())
}

/// Upload view and results view, until the user quits.
async fn run_process(
    controller: &UploadController<EdgeApiClient>,
    navigator: &mut Navigator,
    options: &ProcessOptions,
) -> Result<()> {
    loop {
        let count = controller.selected_count();
        let bar = ProgressBar::new_spinner();
        bar.set_style(ProgressStyle::default_spinner());
        bar.set_message(format!("Processing {} image(s)...", count));
        bar.enable_steady_tick(Duration::from_millis(100));

        // dropping the submit future aborts the request
        let outcome = tokio::select! {
            outcome = controller.submit() => outcome,
            _ = tokio::signal::ctrl_c() => {
                bar.finish_and_clear();
                return Err(EdgeClientError::Cancelled);
            }
        };
        bar.finish_and_clear();

        match outcome {
            SubmitOutcome::Navigate(payload) => navigator.navigate_to_results(payload),
            SubmitOutcome::Failed(message) => {
                println!("✖ {}", message);
                if options.interactive && confirm("Retry with the same selection?")? {
                    continue;
                }
                return Err(EdgeClientError::Request(message));
            }
            SubmitOutcome::NothingSelected => {
                return Err(EdgeClientError::NoImagesFound("nothing selected".into()));
            }
            SubmitOutcome::Busy => return Err(EdgeClientError::Busy),
        }

        match navigator.enter_results() {
            ResultsEntry::Show(viewer) => {
                println!("✔ {} result(s)", viewer.len());
                if !options.interactive {
                    return report(controller.api(), &viewer, options).await;
                }
                match interactive::run_results_view(controller.api(), viewer, &options.download_dir).await? {
                    ViewerExit::Quit => return Ok(()),
                    ViewerExit::UploadAnother => {
                        navigator.back_to_upload();
                        let selection = scanner::select_with_retry(|previous| {
                            if let Some(err) = previous {
                                println!("✖ {}", err);
                            }
                            prompt_paths()
                        })?;
                        match selection {
                            Some(files) => controller.select_files(files)?,
                            None => return Ok(()),
                        }
                    }
                }
            }
            ResultsEntry::RedirectToUpload => return Ok(()),
            ResultsEntry::NoResults => {
                println!("The server returned no processable images");
                return Ok(());
            }
            ResultsEntry::Invalid(err) => return Err(err.into()),
        }
    }
}

/// Non-interactive output: summary, optional JSON and downloads.
async fn report(client: &EdgeApiClient, viewer: &ResultsViewer, options: &ProcessOptions) -> Result<()> {
    println!("\n{}", interactive::render_summary(viewer, client, options.variant));

    if let Some(path) = &options.json {
        let json = serde_json::to_string_pretty(&viewer.results().results)?;
        std::fs::write(path, json)?;
        println!("✔ Results saved: {}", path.display());
    }

    if options.download_all {
        for request in images::download_requests(viewer, options.variant) {
            match images::save_variant(client, &request, &options.download_dir).await {
                Ok(path) => println!("✔ Saved {}", path.display()),
                Err(e) => println!("✖ {}: {}", request.filename, e),
            }
        }
    }

    Ok(())
}

fn confirm(prompt: &str) -> Result<bool> {
    Confirm::new()
        .with_prompt(prompt)
        .default(false)
        .interact()
        .map_err(|e| EdgeClientError::Interaction(e.to_string()))
}

fn prompt_paths() -> Result<Option<Vec<PathBuf>>> {
    let input: String = Input::new()
        .with_prompt("Image files or folders (space separated, empty to quit)")
        .allow_empty(true)
        .interact_text()
        .map_err(|e| EdgeClientError::Interaction(e.to_string()))?;

    let paths: Vec<PathBuf> = input.split_whitespace().map(|p| Path::new(p).to_path_buf()).collect();
    Ok(if paths.is_empty() { None } else { Some(paths) })
}
