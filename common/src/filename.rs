//! Local filename for downloaded variants

use crate::types::Variant;
use lazy_static::lazy_static;
use regex::Regex;

/// Base name used when neither the submitted file nor the server knows one.
pub const DEFAULT_BASE_NAME: &str = "image";

lazy_static! {
    static ref EXTENSION: Regex = Regex::new(r"\.\w+$").unwrap();
}

/// Derive `<stem>_<variant>.png`.
///
/// The stem comes from the submitted file name when known, else the name the
/// server reported, else `image`. A trailing extension is stripped first.
///
/// # Examples
/// ```
/// use xray_edge_common::{download_filename, Variant};
///
/// assert_eq!(download_filename(Some("scan.jpg"), None, Variant::Fuzzy), "scan_fuzzy.png");
/// assert_eq!(download_filename(None, None, Variant::Canny), "image_canny.png");
/// ```
pub fn download_filename(original: Option<&str>, reported: Option<&str>, variant: Variant) -> String {
    let base = [original, reported]
        .into_iter()
        .flatten()
        .find(|name| !name.is_empty())
        .unwrap_or(DEFAULT_BASE_NAME);
    let stem = EXTENSION.replace(base, "");
    format!("{}_{}.png", stem, variant)
}
