//! Variant image loading and download
//!
//! Loading fetches the variant bytes and decodes them to confirm they are a
//! displayable image. Download fetches the same bytes and saves them under
//! the viewer's computed filename, never overwriting an existing file; it
//! never touches the viewer's state.

use crate::error::{EdgeClientError, Result};
use crate::gateway::EdgeApiClient;
use std::fs::{File, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use xray_edge_common::{DownloadRequest, ImageDimensions, ResultsViewer, Variant};

/// Decode image bytes and report their size.
pub fn decode_dimensions(bytes: &[u8]) -> Result<ImageDimensions> {
    let image = image::load_from_memory(bytes).map_err(|e| EdgeClientError::ImageLoad(e.to_string()))?;
    Ok(ImageDimensions {
        width: image.width(),
        height: image.height(),
    })
}

/// Fetch and decode one variant. The error string is the reason recorded
/// on the viewer slot.
pub async fn load_variant(
    client: &EdgeApiClient,
    image_id: &str,
    variant: Variant,
) -> std::result::Result<ImageDimensions, String> {
    let bytes = client.fetch_variant(image_id, variant).await.map_err(|e| e.to_string())?;
    decode_dimensions(&bytes).map_err(|e| e.to_string())
}

/// Load the image the viewer currently shows and record the outcome.
/// Returns `false` when the viewer moved on before the load finished.
pub async fn load_current(client: &EdgeApiClient, viewer: &mut ResultsViewer) -> bool {
    let ticket = viewer.load_ticket();
    let image_id = viewer.current().image_id.clone();
    let outcome = load_variant(client, &image_id, ticket.variant).await;
    if let Err(reason) = &outcome {
        tracing::warn!(%image_id, variant = %ticket.variant, %reason, "image load failed");
    }
    let recorded = viewer.finish_load(ticket, outcome);
    if !recorded {
        tracing::debug!(%image_id, variant = %ticket.variant, "stale load discarded");
    }
    recorded
}

/// Create `dir/<filename>`, or `<stem>_2.<ext>`, `<stem>_3.<ext>`, ... when
/// that name is taken. Existing files are never overwritten.
pub fn create_unique_file(dir: &Path, filename: &str) -> Result<(PathBuf, File)> {
    let (stem, ext) = match filename.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => (stem, Some(ext)),
        _ => (filename, None),
    };

    let mut n = 1;
    loop {
        let name = match (n, ext) {
            (1, _) => filename.to_string(),
            (_, Some(ext)) => format!("{}_{}.{}", stem, n, ext),
            (_, None) => format!("{}_{}", stem, n),
        };
        let path = dir.join(&name);
        match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(file) => return Ok((path, file)),
            Err(e) if e.kind() == ErrorKind::AlreadyExists => n += 1,
            Err(e) => return Err(e.into()),
        }
    }
}

/// Fetch a variant and save it as `dir/<request.filename>`, picking a free
/// name when that file already exists.
pub async fn save_variant(client: &EdgeApiClient, request: &DownloadRequest, dir: &Path) -> Result<PathBuf> {
    let bytes = client
        .fetch_variant(&request.image_id, request.variant)
        .await
        .map_err(|e| EdgeClientError::Download(e.to_string()))?;

    std::fs::create_dir_all(dir)?;
    let (path, mut file) = create_unique_file(dir, &request.filename)?;
    file.write_all(&bytes)?;
    if path.file_name().and_then(|n| n.to_str()) != Some(request.filename.as_str()) {
        tracing::warn!(wanted = %request.filename, saved = %path.display(), "download name taken");
    }

    tracing::info!(path = %path.display(), bytes = bytes.len(), "variant saved");
    Ok(path)
}

/// Download what the viewer currently shows.
pub async fn download_current(client: &EdgeApiClient, viewer: &ResultsViewer, dir: &Path) -> Result<PathBuf> {
    save_variant(client, &viewer.download_request(), dir).await
}

/// Download requests for every result in `variant`, in result order.
pub fn download_requests(viewer: &ResultsViewer, variant: Variant) -> Vec<DownloadRequest> {
    let mut cursor = viewer.clone();
    cursor.select_variant(variant);
    (0..cursor.len())
        .map(|index| {
            cursor.go_to(index);
            cursor.download_request()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageBuffer, ImageFormat, Luma};
    use std::io::Cursor;

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img: ImageBuffer<Luma<u8>, Vec<u8>> = ImageBuffer::new(width, height);
        let mut out = Cursor::new(Vec::new());
        img.write_to(&mut out, ImageFormat::Png).unwrap();
        out.into_inner()
    }

    #[test]
    fn test_decode_dimensions() {
        let dims = decode_dimensions(&png_bytes(7, 3)).unwrap();
        assert_eq!(dims, ImageDimensions { width: 7, height: 3 });
    }

    #[test]
    fn test_unique_file_keeps_free_name() {
        let dir = tempfile::tempdir().unwrap();
        let (path, _) = create_unique_file(dir.path(), "scan_canny.png").unwrap();
        assert_eq!(path, dir.path().join("scan_canny.png"));
    }

    #[test]
    fn test_unique_file_never_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("scan_canny.png"), b"first").unwrap();
        std::fs::write(dir.path().join("scan_canny_2.png"), b"second").unwrap();

        let (path, _) = create_unique_file(dir.path(), "scan_canny.png").unwrap();
        assert_eq!(path, dir.path().join("scan_canny_3.png"));
        assert_eq!(std::fs::read(dir.path().join("scan_canny.png")).unwrap(), b"first");
    }

    #[test]
    fn test_decode_garbage_fails() {
        let err = decode_dimensions(b"not an image").unwrap_err();
        assert!(matches!(err, EdgeClientError::ImageLoad(_)));
    }
}
