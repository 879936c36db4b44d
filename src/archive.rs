//! Batch archive builder
//!
//! Packs the selected files into one in-memory zip for
//! `POST /batch-edge-detect`. Entry order follows selection order, contents
//! are stored unmodified. Zip entry names must be unique, so a name that
//! collides with an earlier entry gets a numeric suffix (`scan.png`,
//! `scan_2.png`); no file is ever dropped.

use crate::error::{EdgeClientError, Result};
use std::collections::HashSet;
use std::io::{Cursor, Write};
use xray_edge_common::SelectedFile;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

pub const BATCH_ARCHIVE_NAME: &str = "batch.zip";
pub const ARCHIVE_MEDIA_TYPE: &str = "application/zip";

/// A built archive, ready to upload.
#[derive(Clone)]
pub struct Archive {
    pub name: String,
    pub media_type: String,
    pub bytes: Vec<u8>,
    /// Entry name of each input file, index-aligned with the input.
    pub entry_names: Vec<String>,
}

impl std::fmt::Debug for Archive {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Archive")
            .field("name", &self.name)
            .field("media_type", &self.media_type)
            .field("len", &self.bytes.len())
            .field("entry_names", &self.entry_names)
            .finish()
    }
}

/// Assign each file a unique entry name, keeping originals where possible.
pub fn entry_names(files: &[SelectedFile]) -> Vec<String> {
    let mut taken: HashSet<String> = HashSet::new();
    let mut names = Vec::with_capacity(files.len());

    for file in files {
        let name = if taken.contains(&file.name) {
            let (stem, ext) = match file.name.rsplit_once('.') {
                Some((stem, ext)) if !stem.is_empty() => (stem, Some(ext)),
                _ => (file.name.as_str(), None),
            };
            let mut n = 2;
            loop {
                let candidate = match ext {
                    Some(ext) => format!("{}_{}.{}", stem, n, ext),
                    None => format!("{}_{}", stem, n),
                };
                if !taken.contains(&candidate) {
                    tracing::warn!(original = %file.name, renamed = %candidate, "duplicate name in batch");
                    break candidate;
                }
                n += 1;
            }
        } else {
            file.name.clone()
        };
        taken.insert(name.clone());
        names.push(name);
    }

    names
}

/// Build the batch archive.
pub fn build_archive(files: &[SelectedFile]) -> Result<Archive> {
    let names = entry_names(files);
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    for (file, name) in files.iter().zip(&names) {
        writer
            .start_file(name.as_str(), options)
            .map_err(|e| EdgeClientError::Archive(format!("{}: {}", name, e)))?;
        writer.write_all(&file.content)?;
    }

    let bytes = writer
        .finish()
        .map_err(|e| EdgeClientError::Archive(e.to_string()))?
        .into_inner();

    tracing::debug!(entries = names.len(), bytes = bytes.len(), "batch archive built");

    Ok(Archive {
        name: BATCH_ARCHIVE_NAME.into(),
        media_type: ARCHIVE_MEDIA_TYPE.into(),
        bytes,
        entry_names: names,
    })
}
