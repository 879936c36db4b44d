//! Interactive results view
//!
//! Terminal front end for [`ResultsViewer`]: shows the current result, its
//! processing details, the variant toggle and the page window, then asks for
//! the next action.

use crate::error::{EdgeClientError, Result};
use crate::gateway::EdgeApiClient;
use crate::images;
use dialoguer::{Input, Select};
use indicatif::{ProgressBar, ProgressStyle};
use std::fmt::Write as _;
use std::path::Path;
use std::time::Duration;
use xray_edge_common::viewer::IMAGE_LOAD_ERROR;
use xray_edge_common::{PageAction, ResultsViewer, SlotState, Variant, VariantUrlResolver};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewerAction {
    ToggleVariant,
    Download,
    Page(PageAction),
    /// Ask for a page number
    ChoosePage,
    UploadAnother,
    Quit,
}

/// How the results view was left.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewerExit {
    UploadAnother,
    Quit,
}

/// Actions that are currently enabled, in menu order.
pub fn available_actions(viewer: &ResultsViewer) -> Vec<ViewerAction> {
    let mut actions = vec![ViewerAction::ToggleVariant, ViewerAction::Download];
    if let Some(pagination) = viewer.pagination() {
        if !pagination.next_disabled() {
            actions.push(ViewerAction::Page(PageAction::Next));
        }
        if !pagination.prev_disabled() {
            actions.push(ViewerAction::Page(PageAction::Previous));
        }
        actions.push(ViewerAction::ChoosePage);
    }
    actions.push(ViewerAction::UploadAnother);
    actions.push(ViewerAction::Quit);
    actions
}

fn action_label(action: ViewerAction, viewer: &ResultsViewer) -> String {
    match action {
        ViewerAction::ToggleVariant => format!("Show {}", viewer.selected_variant().toggled()),
        ViewerAction::Download => format!("Download ({})", viewer.download_filename()),
        ViewerAction::Page(PageAction::Next) => "Next".to_string(),
        ViewerAction::Page(PageAction::Previous) => "Prev".to_string(),
        ViewerAction::Page(PageAction::Goto(page)) => format!("Page {}", page + 1),
        ViewerAction::ChoosePage => "Go to page...".to_string(),
        ViewerAction::UploadAnother => "Upload another image".to_string(),
        ViewerAction::Quit => "Quit".to_string(),
    }
}

fn variant_toggle(selected: Variant) -> String {
    Variant::ALL
        .iter()
        .map(|v| if *v == selected { format!("[{}]", v) } else { v.to_string() })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Text rendering of the current view.
pub fn render_view(viewer: &ResultsViewer, image_url: &str) -> String {
    let current = viewer.current();
    let file = viewer.current_file();
    let title = file
        .map(|f| f.name.as_str())
        .or(current.filename.as_deref())
        .unwrap_or("(unnamed)");

    let mut out = String::new();
    let _ = writeln!(out, "[{}/{}] {}", viewer.current_index() + 1, viewer.len(), title);
    let _ = writeln!(out, "  Variant: {}", variant_toggle(viewer.selected_variant()));
    let _ = writeln!(out, "  URL:     {}", image_url);
    let image_line = match viewer.slot() {
        SlotState::Loading => "Processing image…".to_string(),
        SlotState::Loaded(d) => format!("{}x{} px", d.width, d.height),
        SlotState::Failed(_) => IMAGE_LOAD_ERROR.to_string(),
    };
    let _ = writeln!(out, "  Image:   {}", image_line);

    if let Some(timing) = &current.timing {
        let _ = writeln!(out, "  Processing Details");
        if let Some(file) = file {
            let _ = writeln!(out, "    {:<22}{}", "File name", file.name);
            let _ = writeln!(out, "    {:<22}{}", "Format", file.format_label());
        }
        for (label, ms) in timing.rows_ms() {
            let _ = writeln!(out, "    {:<22}{} ms", label, ms);
        }
    }

    if let Some(pagination) = viewer.pagination() {
        let _ = writeln!(out, "  {}", pagination.render());
    }
    out
}

fn prompt_error(e: dialoguer::Error) -> EdgeClientError {
    EdgeClientError::Interaction(e.to_string())
}

fn prompt_action(viewer: &ResultsViewer) -> Result<ViewerAction> {
    let actions = available_actions(viewer);
    let labels: Vec<String> = actions.iter().map(|a| action_label(*a, viewer)).collect();

    let choice = Select::new()
        .with_prompt("Action")
        .items(&labels)
        .default(0)
        .interact()
        .map_err(prompt_error)?;

    match actions[choice] {
        ViewerAction::ChoosePage => {
            let total = viewer.len();
            let page: usize = Input::new()
                .with_prompt(format!("Page (1-{})", total))
                .validate_with(|p: &usize| -> std::result::Result<(), String> {
                    if (1..=total).contains(p) {
                        Ok(())
                    } else {
                        Err(format!("enter a page between 1 and {}", total))
                    }
                })
                .interact_text()
                .map_err(prompt_error)?;
            Ok(ViewerAction::Page(PageAction::Goto(page - 1)))
        }
        other => Ok(other),
    }
}

fn spinner(message: String) -> ProgressBar {
    let bar = ProgressBar::new_spinner();
    bar.set_style(ProgressStyle::default_spinner());
    bar.set_message(message);
    bar.enable_steady_tick(Duration::from_millis(100));
    bar
}

/// Run the results view until the user leaves it.
pub async fn run_results_view(
    client: &EdgeApiClient,
    mut viewer: ResultsViewer,
    download_dir: &Path,
) -> Result<ViewerExit> {
    loop {
        if viewer.is_loading() {
            let bar = spinner("Processing image…".to_string());
            images::load_current(client, &mut viewer).await;
            bar.finish_and_clear();
        }

        println!("\n{}", render_view(&viewer, &viewer.image_url(client)));

        match prompt_action(&viewer)? {
            ViewerAction::ToggleVariant => viewer.toggle_variant(),
            ViewerAction::Download => match images::download_current(client, &viewer, download_dir).await {
                Ok(path) => println!("✔ Saved {}", path.display()),
                Err(e) => println!("✖ {}", e),
            },
            ViewerAction::Page(action) => {
                viewer.apply(action);
            }
            ViewerAction::ChoosePage => {}
            ViewerAction::UploadAnother => return Ok(ViewerExit::UploadAnother),
            ViewerAction::Quit => return Ok(ViewerExit::Quit),
        }
    }
}

/// Non-interactive summary table, with URLs for `variant`.
pub fn render_summary(viewer: &ResultsViewer, resolver: &dyn VariantUrlResolver, variant: Variant) -> String {
    let results = viewer.results();
    let mut out = String::new();
    let _ = writeln!(out, "{:<4}{:<28}{:<38}{:>10}", "#", "File", "Image ID", "Total ms");
    for (index, result) in results.results.iter().enumerate() {
        let name = results
            .file_for(index)
            .map(|f| f.name.clone())
            .or_else(|| result.filename.clone())
            .unwrap_or_else(|| "-".to_string());
        let total = result
            .timing
            .map(|t| t.rows_ms()[3].1.to_string())
            .unwrap_or_else(|| "-".to_string());
        let _ = writeln!(out, "{:<4}{:<28}{:<38}{:>10}", index + 1, name, result.image_id, total);
        let _ = writeln!(
            out,
            "    {}",
            resolver.variant_url(&result.image_id, variant)
        );
    }
    out
}
