use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use rusqlite::Connection;
use tracing::{debug, info, warn};

use crate::db::{self, SavedCounts, SectionImport};
use crate::parser::parse_questions;

pub struct ImportCounts {
    pub files: usize,
    pub skipped: usize,
    pub saved: SavedCounts,
}

impl ImportCounts {
    pub fn print(&self) {
        println!(
            "Imported {} sections ({} skipped): {} questions, {} answers.",
            self.files, self.skipped, self.saved.questions, self.saved.answers,
        );
    }
}

/// Expand `paths` into markdown files. Directories are scanned one level deep.
pub fn collect_markdown_files(paths: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for path in paths {
        if path.is_dir() {
            let mut found: Vec<PathBuf> = std::fs::read_dir(path)
                .with_context(|| format!("Failed to read directory {}", path.display()))?
                .filter_map(|entry| entry.ok().map(|e| e.path()))
                .filter(|p| p.is_file() && is_markdown(p))
                .collect();
            found.sort();
            files.extend(found);
        } else {
            files.push(path.clone());
        }
    }
    Ok(files)
}

fn is_markdown(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("md"))
}

/// Section id is the file stem; title is the first `# ` line, else the stem.
pub fn build_section(path: &Path, markdown: &str) -> SectionImport {
    let id = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let title = markdown
        .lines()
        .find_map(|l| l.strip_prefix("# "))
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| id.clone());
    let questions = parse_questions(markdown);
    if questions.is_empty() {
        warn!("No questions found in {}", path.display());
    }
    SectionImport {
        id,
        title,
        source_path: Some(path.display().to_string()),
        questions,
    }
}

/// Parse files in parallel and persist each chunk in one transaction.
pub fn import_files(conn: &Connection, files: &[PathBuf], chunk_size: usize) -> Result<ImportCounts> {
    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({per_sec})")?
            .progress_chars("#>-"),
    );

    let mut counts = ImportCounts {
        files: 0,
        skipped: 0,
        saved: SavedCounts::default(),
    };

    for chunk in files.chunks(chunk_size.max(1)) {
        let results: Vec<_> = chunk
            .par_iter()
            .map(|path| {
                std::fs::read_to_string(path)
                    .with_context(|| format!("Failed to read {}", path.display()))
                    .map(|md| build_section(path, &md))
            })
            .collect();

        let mut sections = Vec::with_capacity(results.len());
        for result in results {
            match result {
                Ok(section) => {
                    debug!(section = %section.id, questions = section.questions.len(), "parsed");
                    sections.push(section);
                }
                Err(e) => {
                    warn!("Skipping file: {:#}", e);
                    counts.skipped += 1;
                }
            }
        }

        counts.files += sections.len();
        counts.saved.add(db::save_sections(conn, &sections)?);
        pb.inc(chunk.len() as u64);
    }

    pb.finish_and_clear();
    info!(
        "Imported {} sections, {} questions, {} answers",
        counts.files, counts.saved.questions, counts.saved.answers
    );
    Ok(counts)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn memory_db() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        db::init_schema(&conn).unwrap();
        conn
    }

    #[test]
    fn section_from_fixture() {
        let path = Path::new("tests/fixtures/javascript.md");
        let md = std::fs::read_to_string(path).unwrap();
        let section = build_section(path, &md);
        assert_eq!(section.id, "javascript");
        assert_eq!(section.title, "JavaScript");
        assert_eq!(section.questions.len(), 4);
    }

    #[test]
    fn title_falls_back_to_stem() {
        let section = build_section(Path::new("notes/react.md"), "### 1. Hooks?\n");
        assert_eq!(section.id, "react");
        assert_eq!(section.title, "react");
    }

    #[test]
    fn directory_scan_keeps_only_markdown() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("b.md"), "### 1. B?\n").unwrap();
        std::fs::write(dir.path().join("a.MD"), "### 1. A?\n").unwrap();
        std::fs::write(dir.path().join("notes.txt"), "### 1. no").unwrap();
        std::fs::create_dir(dir.path().join("nested.md")).unwrap();

        let files = collect_markdown_files(&[dir.path().to_path_buf()]).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.MD", "b.md"]);
    }

    #[test]
    fn import_skips_unreadable_files() {
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("css.md");
        std::fs::write(&good, "# CSS\n### 1. Flexbox?\n**Ответ:**\nраскладка\n").unwrap();
        let missing = dir.path().join("missing.md");

        let conn = memory_db();
        let counts = import_files(&conn, &[good, missing], 1).unwrap();
        assert_eq!(counts.files, 1);
        assert_eq!(counts.skipped, 1);
        assert_eq!(counts.saved, SavedCounts { questions: 1, answers: 1 });

        let stats = db::get_stats(&conn).unwrap();
        assert_eq!(stats.sections, 1);
        assert_eq!(stats.answers_ru, 1);
    }

    #[test]
    fn import_fixture_directory_twice_is_stable() {
        let conn = memory_db();
        let files = collect_markdown_files(&[PathBuf::from("tests/fixtures")]).unwrap();
        import_files(&conn, &files, 4).unwrap();
        let first = db::get_stats(&conn).unwrap();
        import_files(&conn, &files, 4).unwrap();
        let second = db::get_stats(&conn).unwrap();
        assert_eq!(first.questions, second.questions);
        assert_eq!(first.sections, second.sections);
    }
}
