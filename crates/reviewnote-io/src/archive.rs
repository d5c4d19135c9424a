//! Packaging of rendered review notes into one ZIP archive.
//!
//! Documents sit at the archive root as `{name}_{title}.{ext}`. Every
//! question image referenced by at least one note is stored once under
//! `assets/m1/` or `assets/m2/`, which is where rendered documents point.

use std::collections::{BTreeSet, HashSet};
use std::io::{Seek, Write};
use std::path::Path;

use anyhow::{Context, Result};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use reviewnote_core::selection::StudentNote;
use reviewnote_core::traits::DocumentRenderer;

/// What ended up in the archive.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArchiveSummary {
    /// Document entry names, in note order.
    pub documents: Vec<String>,
    /// Number of distinct image entries.
    pub images: usize,
}

/// Render every note and write the archive to `writer`.
pub fn write_note_archive<W: Write + Seek>(
    writer: W,
    notes: &[StudentNote<'_>],
    renderer: &dyn DocumentRenderer,
) -> Result<ArchiveSummary> {
    let mut zip = ZipWriter::new(writer);
    let doc_options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
    let image_options = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);

    let mut summary = ArchiveSummary::default();
    let mut taken = HashSet::new();
    let mut written_images = BTreeSet::new();

    for note in notes {
        let bytes = renderer
            .render(note)
            .with_context(|| format!("failed to render note for {}", note.name))?;
        let entry = unique_name(&sanitize_file_stem(&note.stem()), renderer.extension(), &mut taken);
        if entry != format!("{}.{}", note.stem(), renderer.extension()) {
            tracing::debug!("note for {} stored as {entry}", note.name);
        }

        zip.start_file(entry.as_str(), doc_options)
            .with_context(|| format!("failed to add {entry} to archive"))?;
        zip.write_all(&bytes)?;
        summary.documents.push(entry);

        for image in note.sections.iter().flat_map(|s| s.images.iter()) {
            let path = image.archive_path();
            if !written_images.insert(path.clone()) {
                continue;
            }
            zip.start_file(path.as_str(), image_options)
                .with_context(|| format!("failed to add {path} to archive"))?;
            zip.write_all(&image.bytes)?;
        }
    }

    zip.finish().context("failed to finalize archive")?;
    summary.images = written_images.len();
    tracing::info!(
        "archived {} notes with {} images",
        summary.documents.len(),
        summary.images
    );
    Ok(summary)
}

/// Render every note into a ZIP file at `path`.
pub fn write_note_archive_to_path(
    path: &Path,
    notes: &[StudentNote<'_>],
    renderer: &dyn DocumentRenderer,
) -> Result<ArchiveSummary> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let file = std::fs::File::create(path)
        .with_context(|| format!("failed to create archive at {}", path.display()))?;
    write_note_archive(file, notes, renderer)
}

/// Replace characters that are not allowed in file names on common platforms.
pub fn sanitize_file_stem(stem: &str) -> String {
    let cleaned: String = stem
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();
    let cleaned = cleaned.trim().trim_end_matches('.');
    if cleaned.is_empty() {
        "note".to_string()
    } else {
        cleaned.to_string()
    }
}

/// `stem.ext`, or `stem (2).ext`, `stem (3).ext`... when already taken.
fn unique_name(stem: &str, ext: &str, taken: &mut HashSet<String>) -> String {
    let mut candidate = format!("{stem}.{ext}");
    let mut n = 2;
    while !taken.insert(candidate.to_lowercase()) {
        candidate = format!("{stem} ({n}).{ext}");
        n += 1;
    }
    candidate
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Cursor, Read};

    use reviewnote_core::model::{AssetBundle, Module, ParsedAnswer, QuestionImage, StudentRecord};
    use reviewnote_core::selection::build_note;
    use zip::read::ZipArchive;

    struct PlainRenderer;

    impl DocumentRenderer for PlainRenderer {
        fn extension(&self) -> &str {
            "txt"
        }

        fn render(&self, note: &StudentNote<'_>) -> Result<Vec<u8>> {
            Ok(format!("{} ({} images)", note.stem(), note.image_count()).into_bytes())
        }
    }

    struct FailingRenderer;

    impl DocumentRenderer for FailingRenderer {
        fn extension(&self) -> &str {
            "txt"
        }

        fn render(&self, _note: &StudentNote<'_>) -> Result<Vec<u8>> {
            anyhow::bail!("renderer exploded")
        }
    }

    fn bundle() -> AssetBundle {
        let mut bundle = AssetBundle::new();
        for (module, key) in [(Module::Module1, "1"), (Module::Module1, "3"), (Module::Module2, "2")] {
            bundle.insert(QuestionImage {
                module,
                key: key.into(),
                file_name: format!("{key}.png"),
                bytes: key.as_bytes().to_vec(),
            });
        }
        bundle
    }

    fn entry_names(bytes: Vec<u8>) -> Vec<String> {
        let archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
        archive.file_names().map(str::to_string).collect()
    }

    #[test]
    fn sanitize() {
        assert_eq!(sanitize_file_stem("hong_25 S2/Mock"), "hong_25 S2_Mock");
        assert_eq!(sanitize_file_stem("a:b*c?"), "a_b_c_");
        assert_eq!(sanitize_file_stem("  ..."), "note");
        assert_eq!(sanitize_file_stem("홍길동_모의고사"), "홍길동_모의고사");
    }

    #[test]
    fn duplicate_names_get_suffixes() {
        let mut taken = HashSet::new();
        assert_eq!(unique_name("kim_T", "html", &mut taken), "kim_T.html");
        assert_eq!(unique_name("kim_T", "html", &mut taken), "kim_T (2).html");
        assert_eq!(unique_name("KIM_T", "html", &mut taken), "KIM_T (3).html");
    }

    #[test]
    fn archive_holds_documents_and_shared_images_once() {
        let bundle = bundle();
        let records = [
            StudentRecord::new("hong", ParsedAnswer::Missed(vec![1, 3]), ParsedAnswer::Missed(vec![2])),
            StudentRecord::new("kim", ParsedAnswer::Missed(vec![3]), ParsedAnswer::AllCorrect),
            StudentRecord::new("kim", ParsedAnswer::AllCorrect, ParsedAnswer::AllCorrect),
        ];
        let notes: Vec<_> = records.iter().map(|r| build_note(r, "Mock", &bundle)).collect();

        let mut buffer = Cursor::new(Vec::new());
        let summary = write_note_archive(&mut buffer, &notes, &PlainRenderer).unwrap();
        assert_eq!(
            summary.documents,
            vec!["hong_Mock.txt", "kim_Mock.txt", "kim_Mock (2).txt"]
        );
        assert_eq!(summary.images, 3);

        let names = entry_names(buffer.into_inner());
        assert_eq!(names.len(), 6);
        assert!(names.contains(&"assets/m1/3.png".to_string()));
        assert!(names.contains(&"assets/m2/2.png".to_string()));
    }

    #[test]
    fn document_content_comes_from_renderer() {
        let bundle = bundle();
        let record = StudentRecord::new("lee", ParsedAnswer::Missed(vec![1]), ParsedAnswer::AllCorrect);
        let notes = vec![build_note(&record, "Final", &bundle)];

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out").join("notes.zip");
        write_note_archive_to_path(&path, &notes, &PlainRenderer).unwrap();

        let mut archive = ZipArchive::new(std::fs::File::open(&path).unwrap()).unwrap();
        let mut content = String::new();
        archive
            .by_name("lee_Final.txt")
            .unwrap()
            .read_to_string(&mut content)
            .unwrap();
        assert_eq!(content, "lee_Final (1 images)");
    }

    #[test]
    fn empty_note_list_gives_empty_archive() {
        let mut buffer = Cursor::new(Vec::new());
        let summary = write_note_archive(&mut buffer, &[], &PlainRenderer).unwrap();
        assert!(summary.documents.is_empty());
        assert!(entry_names(buffer.into_inner()).is_empty());
    }

    #[test]
    fn render_failure_names_the_student() {
        let bundle = bundle();
        let record = StudentRecord::new("park", ParsedAnswer::AllCorrect, ParsedAnswer::AllCorrect);
        let notes = vec![build_note(&record, "Mock", &bundle)];
        let err = write_note_archive(Cursor::new(Vec::new()), &notes, &FailingRenderer).unwrap_err();
        assert!(format!("{err:#}").contains("park"));
    }
}
