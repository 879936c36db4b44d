//! File selection
//!
//! Turns command-line paths into the in-memory [`SelectedFile`] list the
//! upload controller submits. Folders contribute their direct image
//! children, sorted by name; explicit files keep the order given.

use crate::error::{EdgeClientError, Result};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;
use xray_edge_common::SelectedFile;

const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png"];

fn is_image_path(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .is_some_and(|ext| IMAGE_EXTENSIONS.contains(&ext.as_str()))
}

/// Image files directly inside `folder`, sorted by file name.
pub fn scan_folder(folder: &Path) -> Result<Vec<PathBuf>> {
    if !folder.exists() {
        return Err(EdgeClientError::FolderNotFound(folder.display().to_string()));
    }

    let mut images: Vec<PathBuf> = WalkDir::new(folder)
        .min_depth(1)
        .max_depth(1)
        .into_iter()
        .filter_map(|e| e.ok())
        .map(|e| e.into_path())
        .filter(|p| p.is_file() && is_image_path(p))
        .collect();

    images.sort_by_key(|p| p.file_name().map(|n| n.to_os_string()));
    Ok(images)
}

/// Read one file into a [`SelectedFile`].
pub fn read_selected_file(path: &Path) -> Result<SelectedFile> {
    if !path.is_file() {
        return Err(EdgeClientError::FileNotFound(path.display().to_string()));
    }

    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();
    let mime_type = mime_guess::from_path(path)
        .first_or_octet_stream()
        .essence_str()
        .to_string();
    let content = std::fs::read(path)?;

    Ok(SelectedFile::new(name, mime_type, content))
}

/// Expand and read every path. Non-image files are skipped with a warning.
pub fn select_files(paths: &[PathBuf]) -> Result<Vec<SelectedFile>> {
    let mut selected = Vec::new();

    for path in paths {
        let candidates = if path.is_dir() {
            scan_folder(path)?
        } else if !path.exists() {
            return Err(EdgeClientError::FileNotFound(path.display().to_string()));
        } else if is_image_path(path) {
            vec![path.clone()]
        } else {
            tracing::warn!(path = %path.display(), "skipping non-image file");
            Vec::new()
        };

        for candidate in candidates {
            selected.push(read_selected_file(&candidate)?);
        }
    }

    if selected.is_empty() {
        let joined = paths
            .iter()
            .map(|p| p.display().to_string())
            .collect::<Vec<_>>()
            .join(", ");
        return Err(EdgeClientError::NoImagesFound(joined));
    }

    tracing::debug!(count = selected.len(), "files selected");
    Ok(selected)
}

/// Ask for paths until they select something.
///
/// `ask` receives the error from the previous attempt, if any, and returns
/// `None` to give up. Prompt failures end the loop; selection failures ask
/// again.
pub fn select_with_retry<F>(mut ask: F) -> Result<Option<Vec<SelectedFile>>>
where
    F: FnMut(Option<&EdgeClientError>) -> Result<Option<Vec<PathBuf>>>,
{
    let mut previous: Option<EdgeClientError> = None;
    loop {
        let Some(paths) = ask(previous.as_ref())? else {
            return Ok(None);
        };
        match select_files(&paths) {
            Ok(files) => return Ok(Some(files)),
            Err(err) => {
                tracing::warn!(error = %err, "selection failed, asking again");
                previous = Some(err);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_is_image_path() {
        assert!(is_image_path(Path::new("a.jpg")));
        assert!(is_image_path(Path::new("a.JPG")));
        assert!(is_image_path(Path::new("a.jpeg")));
        assert!(is_image_path(Path::new("a.png")));
        assert!(!is_image_path(Path::new("a.txt")));
        assert!(!is_image_path(Path::new("a.gif")));
        assert!(!is_image_path(Path::new("noext")));
    }

    #[test]
    fn test_scan_folder_not_found() {
        let result = scan_folder(Path::new("/nonexistent/folder"));
        assert!(matches!(result, Err(EdgeClientError::FolderNotFound(_))));
    }

    #[test]
    fn test_scan_folder_sorted_images_only() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("c.png"), b"c").unwrap();
        fs::write(dir.path().join("a.jpg"), b"a").unwrap();
        fs::write(dir.path().join("b.JPEG"), b"b").unwrap();
        fs::write(dir.path().join("notes.txt"), b"t").unwrap();
        fs::create_dir(dir.path().join("nested.png")).unwrap();

        let found = scan_folder(dir.path()).unwrap();
        let names: Vec<_> = found
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["a.jpg", "b.JPEG", "c.png"]);
    }

    #[test]
    fn test_read_selected_file_mime() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("scan.jpg");
        fs::write(&path, b"jpegbytes").unwrap();

        let file = read_selected_file(&path).unwrap();
        assert_eq!(file.name, "scan.jpg");
        assert_eq!(file.mime_type, "image/jpeg");
        assert_eq!(file.content, b"jpegbytes");
    }

    #[test]
    fn test_select_files_keeps_argument_order() {
        let dir = tempdir().unwrap();
        let b = dir.path().join("b.png");
        let a = dir.path().join("a.png");
        fs::write(&b, b"b").unwrap();
        fs::write(&a, b"a").unwrap();

        let files = select_files(&[b, a]).unwrap();
        assert_eq!(files[0].name, "b.png");
        assert_eq!(files[1].name, "a.png");
    }

    #[test]
    fn test_select_files_nothing_usable() {
        let dir = tempdir().unwrap();
        let txt = dir.path().join("readme.txt");
        fs::write(&txt, b"x").unwrap();
        assert!(matches!(select_files(&[txt]), Err(EdgeClientError::NoImagesFound(_))));
    }

    #[test]
    fn test_select_files_missing_path() {
        let result = select_files(&[PathBuf::from("/nonexistent/x.png")]);
        assert!(matches!(result, Err(EdgeClientError::FileNotFound(_))));
    }

    #[test]
    fn test_select_with_retry_asks_again_after_bad_path() {
        let dir = tempdir().unwrap();
        let good = dir.path().join("chest.png");
        fs::write(&good, b"png").unwrap();

        let mut seen = Vec::new();
        let mut answers = vec![vec![PathBuf::from("/nonexistent/typo.png")], vec![good]].into_iter();
        let files = select_with_retry(|previous| {
            seen.push(previous.map(|e| e.to_string()));
            Ok(answers.next())
        })
        .unwrap()
        .unwrap();

        assert_eq!(files.len(), 1);
        assert_eq!(files[0].name, "chest.png");
        assert_eq!(seen.len(), 2);
        assert!(seen[0].is_none());
        assert!(seen[1].as_deref().unwrap().contains("typo.png"));
    }

    #[test]
    fn test_select_with_retry_empty_input_gives_up() {
        let result = select_with_retry(|_| Ok(None)).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_select_with_retry_prompt_error_ends_loop() {
        let result = select_with_retry(|_| Err(EdgeClientError::Interaction("closed".into())));
        assert!(matches!(result, Err(EdgeClientError::Interaction(_))));
    }
}
