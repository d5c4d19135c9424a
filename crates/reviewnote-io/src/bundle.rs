//! Question-image bundle reader.
//!
//! The bundle is a ZIP file with one top-level folder per module:
//!
//! ```text
//! M1/1.png
//! M1/2.jpg
//! M2/1.png
//! ```
//!
//! The file stem is the question key. Folder names and extensions are
//! matched case-insensitively; anything else in the archive is ignored.

use std::io::{Cursor, Read, Seek};
use std::path::Path;

use anyhow::{Context, Result};
use thiserror::Error;
use zip::read::ZipArchive;

use reviewnote_core::model::{AssetBundle, Module, QuestionImage};

/// Accepted image extensions, lowercase.
pub const IMAGE_EXTENSIONS: [&str; 4] = ["png", "jpg", "jpeg", "webp"];

#[derive(Debug, Error)]
pub enum BundleError {
    #[error("uncompressed bundle size exceeds the allowed maximum of {limit} bytes")]
    TooLarge { limit: u64 },

    #[error("bundle contains no question images under m1/ or m2/")]
    NoImages,
}

/// Load a bundle from a ZIP file on disk.
pub fn load_bundle(path: &Path, max_bytes: u64) -> Result<AssetBundle> {
    let bytes = std::fs::read(path)
        .with_context(|| format!("failed to read image bundle: {}", path.display()))?;
    read_bundle(Cursor::new(bytes), max_bytes)
        .with_context(|| format!("failed to load image bundle: {}", path.display()))
}

/// Read a bundle from any seekable ZIP source.
pub fn read_bundle<R: Read + Seek>(reader: R, max_bytes: u64) -> Result<AssetBundle> {
    let mut archive = ZipArchive::new(reader).context("not a valid ZIP archive")?;
    let mut bundle = AssetBundle::new();
    let mut total_uncompressed_size = 0u64;

    for i in 0..archive.len() {
        let mut file = archive.by_index(i)?;
        if file.is_dir() {
            continue;
        }
        let entry_name = file.name().to_string();
        let Some((module, key, file_name)) = classify_entry(&entry_name) else {
            tracing::debug!("ignoring bundle entry {entry_name}");
            continue;
        };

        // Both the declared size and the bytes actually read count.
        let remaining = max_bytes - total_uncompressed_size;
        if file.size() > remaining {
            return Err(BundleError::TooLarge { limit: max_bytes }.into());
        }

        let mut bytes = Vec::with_capacity(file.size() as usize);
        file.by_ref()
            .take(remaining.saturating_add(1))
            .read_to_end(&mut bytes)
            .with_context(|| format!("failed to extract {entry_name}"))?;
        if bytes.len() as u64 > remaining {
            return Err(BundleError::TooLarge { limit: max_bytes }.into());
        }
        total_uncompressed_size += bytes.len() as u64;

        let image = QuestionImage {
            module,
            key,
            file_name,
            bytes,
        };
        if let Some(previous) = bundle.insert(image) {
            tracing::warn!(
                "{} question {} has more than one image; using {entry_name}",
                module,
                previous.key
            );
        }
    }

    if bundle.is_empty() {
        return Err(BundleError::NoImages.into());
    }
    tracing::debug!(
        "bundle loaded: {} module 1 images, {} module 2 images",
        bundle.module(Module::Module1).len(),
        bundle.module(Module::Module2).len()
    );
    Ok(bundle)
}

/// Split an entry path into module, question key and file name.
fn classify_entry(entry_name: &str) -> Option<(Module, String, String)> {
    let parts: Vec<&str> = entry_name.split('/').filter(|p| !p.is_empty()).collect();
    if parts.len() < 2 {
        return None;
    }
    let module = match parts[0].to_lowercase().as_str() {
        "m1" => Module::Module1,
        "m2" => Module::Module2,
        _ => return None,
    };

    let file_name = *parts.last()?;
    let path = Path::new(file_name);
    let ext = path.extension()?.to_str()?.to_lowercase();
    if !IMAGE_EXTENSIONS.contains(&ext.as_str()) {
        return None;
    }
    let key = path.file_stem()?.to_str()?.to_string();
    Some((module, key, file_name.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use zip::write::SimpleFileOptions;
    use zip::ZipWriter;

    fn make_zip(entries: &[(&str, &[u8])]) -> Vec<u8> {
        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        let options = SimpleFileOptions::default();
        for (name, data) in entries {
            if name.ends_with('/') {
                zip.add_directory(*name, options).unwrap();
            } else {
                zip.start_file(*name, options).unwrap();
                zip.write_all(data).unwrap();
            }
        }
        zip.finish().unwrap().into_inner()
    }

    #[test]
    fn classify_paths() {
        assert_eq!(
            classify_entry("M1/7.PNG"),
            Some((Module::Module1, "7".into(), "7.PNG".into()))
        );
        assert_eq!(
            classify_entry("m2/sub/12.jpeg"),
            Some((Module::Module2, "12".into(), "12.jpeg".into()))
        );
        assert_eq!(classify_entry("7.png"), None);
        assert_eq!(classify_entry("m3/7.png"), None);
        assert_eq!(classify_entry("m1/notes.txt"), None);
        assert_eq!(classify_entry("__MACOSX/m1/._7.png"), None);
    }

    #[test]
    fn reads_module_folders() {
        let bytes = make_zip(&[
            ("M1/", b""),
            ("M1/1.png", b"one"),
            ("M1/3.jpg", b"three"),
            ("M2/2.webp", b"two"),
            ("readme.txt", b"hello"),
        ]);
        let bundle = read_bundle(Cursor::new(bytes), 1024).unwrap();
        assert_eq!(bundle.len(), 3);
        assert_eq!(bundle.get(Module::Module1, "3").unwrap().bytes, b"three");
        assert!(bundle.get(Module::Module2, "2").is_some());
        assert!(bundle.get(Module::Module2, "1").is_none());
    }

    #[test]
    fn size_limit_is_enforced() {
        let bytes = make_zip(&[("m1/1.png", &[0u8; 64]), ("m1/2.png", &[0u8; 64])]);
        let err = read_bundle(Cursor::new(bytes), 100).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<BundleError>(),
            Some(BundleError::TooLarge { limit: 100 })
        ));
    }

    #[test]
    fn size_limit_counts_bytes_read() {
        let bytes = make_zip(&[("m1/1.png", &[0u8; 64]), ("m2/1.png", &[0u8; 64])]);
        let bundle = read_bundle(Cursor::new(bytes.clone()), 128).unwrap();
        assert_eq!(bundle.module(Module::Module2).len(), 1);

        let err = read_bundle(Cursor::new(bytes), 127).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<BundleError>(),
            Some(BundleError::TooLarge { limit: 127 })
        ));
    }

    #[test]
    fn bundle_without_images_is_rejected() {
        let bytes = make_zip(&[("docs/readme.txt", b"nothing here")]);
        let err = read_bundle(Cursor::new(bytes), 1024).unwrap_err();
        assert!(matches!(err.downcast_ref::<BundleError>(), Some(BundleError::NoImages)));
    }

    #[test]
    fn not_a_zip() {
        assert!(read_bundle(Cursor::new(b"plain text".to_vec()), 1024).is_err());
    }

    #[test]
    fn load_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("questions.zip");
        std::fs::write(&path, make_zip(&[("m1/4.png", b"four")])).unwrap();
        let bundle = load_bundle(&path, 1024).unwrap();
        assert_eq!(bundle.get(Module::Module1, "4").unwrap().archive_path(), "assets/m1/4.png");
    }
}
