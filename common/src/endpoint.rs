//! Edge-detection API endpoints

use crate::types::Variant;

pub const EDGE_DETECT_PATH: &str = "/edge-detect";
pub const BATCH_EDGE_DETECT_PATH: &str = "/batch-edge-detect";

/// Multipart field both submission endpoints read.
pub const UPLOAD_FIELD: &str = "file";

/// Base address used when nothing is configured.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// Anything that can turn an image id into a retrieval URL.
pub trait VariantUrlResolver {
    fn variant_url(&self, image_id: &str, variant: Variant) -> String;
}

/// Build `<base>/image/<image_id>/<variant>`.
///
/// `image_id` is not validated; whether the URL resolves is the fetcher's
/// concern.
pub fn resolve_variant_url(base_url: &str, image_id: &str, variant: Variant) -> String {
    format!("{}/image/{}/{}", base_url.trim_end_matches('/'), image_id, variant)
}

/// Join an endpoint path onto a base address.
pub fn endpoint_url(base_url: &str, path: &str) -> String {
    format!("{}{}", base_url.trim_end_matches('/'), path)
}
