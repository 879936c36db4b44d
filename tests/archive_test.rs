//! Batch archive tests
//!
//! Reads built archives back with `zip::ZipArchive`.

use std::io::{Cursor, Read};
use xray_edge::archive::{build_archive, ARCHIVE_MEDIA_TYPE, BATCH_ARCHIVE_NAME};
use xray_edge_common::SelectedFile;

fn read_entries(bytes: &[u8]) -> Vec<(String, Vec<u8>)> {
    let mut zip = zip::ZipArchive::new(Cursor::new(bytes.to_vec())).unwrap();
    (0..zip.len())
        .map(|i| {
            let mut entry = zip.by_index(i).unwrap();
            let mut content = Vec::new();
            entry.read_to_end(&mut content).unwrap();
            (entry.name().to_string(), content)
        })
        .collect()
}

#[test]
fn test_entries_keep_selection_order() {
    let files: Vec<SelectedFile> = ["z.png", "a.jpg", "m.png"]
        .iter()
        .map(|n| SelectedFile::new(*n, "image/png", n.as_bytes().to_vec()))
        .collect();

    let archive = build_archive(&files).unwrap();
    assert_eq!(archive.name, BATCH_ARCHIVE_NAME);
    assert_eq!(archive.media_type, ARCHIVE_MEDIA_TYPE);

    let names: Vec<String> = read_entries(&archive.bytes).into_iter().map(|(n, _)| n).collect();
    assert_eq!(names, vec!["z.png", "a.jpg", "m.png"]);
    assert_eq!(archive.entry_names, names);
}

#[test]
fn test_binary_content_is_unmodified() {
    let content: Vec<u8> = (0..=255u8).cycle().take(10_000).collect();
    let files = vec![
        SelectedFile::new("one.png", "image/png", content.clone()),
        SelectedFile::new("empty.png", "image/png", Vec::new()),
    ];

    let entries = read_entries(&build_archive(&files).unwrap().bytes);
    assert_eq!(entries[0].1, content);
    assert!(entries[1].1.is_empty());
}

#[test]
fn test_duplicate_names_are_all_packed() {
    let files = vec![
        SelectedFile::new("scan.png", "image/png", b"first".to_vec()),
        SelectedFile::new("scan.png", "image/png", b"second".to_vec()),
        SelectedFile::new("scan_2.png", "image/png", b"third".to_vec()),
    ];

    let archive = build_archive(&files).unwrap();
    let entries = read_entries(&archive.bytes);

    assert_eq!(entries.len(), 3);
    assert_eq!(entries[0], ("scan.png".to_string(), b"first".to_vec()));
    assert_eq!(entries[1], ("scan_2.png".to_string(), b"second".to_vec()));
    assert_eq!(entries[2], ("scan_2_2.png".to_string(), b"third".to_vec()));
}
