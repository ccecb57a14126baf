use std::path::Path;

use anyhow::{Context, Result};
use rusqlite::Connection;

use crate::parser::answers::AnswerKind;
use crate::parser::ParsedQuestion;

pub fn connect(path: &Path) -> Result<Connection> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create database directory {}", dir.display()))?;
    }
    let conn = Connection::open(path)
        .with_context(|| format!("Failed to open database {}", path.display()))?;
    conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")?;
    Ok(conn)
}

pub fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS sections (
            id             TEXT PRIMARY KEY,
            title          TEXT NOT NULL,
            source_path    TEXT,
            question_count INTEGER NOT NULL DEFAULT 0,
            imported_at    TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE TABLE IF NOT EXISTS questions (
            id            INTEGER PRIMARY KEY,
            section_id    TEXT NOT NULL REFERENCES sections(id) ON DELETE CASCADE,
            number        INTEGER NOT NULL,
            anchor        TEXT NOT NULL,
            question      TEXT NOT NULL,
            question_raw  TEXT NOT NULL,
            raw_markdown  TEXT NOT NULL,
            code_blocks   TEXT NOT NULL DEFAULT '[]',
            UNIQUE(section_id, number)
        );
        CREATE INDEX IF NOT EXISTS idx_questions_section ON questions(section_id);

        CREATE TABLE IF NOT EXISTS answers (
            id           INTEGER PRIMARY KEY,
            question_id  INTEGER NOT NULL REFERENCES questions(id) ON DELETE CASCADE,
            lang         TEXT NOT NULL CHECK(lang IN ('ru','en','senior')),
            content      TEXT NOT NULL,
            UNIQUE(question_id, lang)
        );
        CREATE INDEX IF NOT EXISTS idx_answers_question ON answers(question_id);
        ",
    )?;
    Ok(())
}

// ── Import ──

pub struct SectionImport {
    pub id: String,
    pub title: String,
    pub source_path: Option<String>,
    pub questions: Vec<ParsedQuestion>,
}

/// Rows written for one section.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SavedCounts {
    pub questions: usize,
    pub answers: usize,
}

impl SavedCounts {
    pub fn add(&mut self, other: SavedCounts) {
        self.questions += other.questions;
        self.answers += other.answers;
    }
}

/// Replace a section's questions and answers in one transaction.
pub fn save_sections(conn: &Connection, sections: &[SectionImport]) -> Result<SavedCounts> {
    let tx = conn.unchecked_transaction()?;
    let mut counts = SavedCounts::default();
    {
        let mut s_stmt = tx.prepare(
            "INSERT INTO sections (id, title, source_path, question_count, imported_at)
             VALUES (?1, ?2, ?3, ?4, datetime('now'))
             ON CONFLICT(id) DO UPDATE SET
                 title = excluded.title,
                 source_path = excluded.source_path,
                 question_count = excluded.question_count,
                 imported_at = excluded.imported_at",
        )?;
        let mut clear_answers = tx.prepare(
            "DELETE FROM answers
             WHERE question_id IN (SELECT id FROM questions WHERE section_id = ?1)",
        )?;
        let mut clear_questions = tx.prepare("DELETE FROM questions WHERE section_id = ?1")?;
        let mut q_stmt = tx.prepare(
            "INSERT INTO questions
             (section_id, number, anchor, question, question_raw, raw_markdown, code_blocks)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        )?;
        let mut a_stmt = tx.prepare(
            "INSERT INTO answers (question_id, lang, content) VALUES (?1, ?2, ?3)",
        )?;

        for section in sections {
            s_stmt.execute(rusqlite::params![
                section.id,
                section.title,
                section.source_path,
                section.questions.len(),
            ])?;
            clear_answers.execute(rusqlite::params![section.id])?;
            clear_questions.execute(rusqlite::params![section.id])?;

            for q in &section.questions {
                let code_blocks = serde_json::to_string(&q.code_blocks)?;
                q_stmt.execute(rusqlite::params![
                    section.id, q.number, q.id, q.question, q.question_raw, q.raw_markdown,
                    code_blocks,
                ])?;
                let question_id = tx.last_insert_rowid();
                counts.questions += 1;

                for kind in [AnswerKind::Ru, AnswerKind::En, AnswerKind::Senior] {
                    if let Some(content) = q.answer(kind) {
                        a_stmt.execute(rusqlite::params![question_id, kind.lang(), content])?;
                        counts.answers += 1;
                    }
                }
            }
        }
    }
    tx.commit()?;
    Ok(counts)
}

// ── Overview ──

pub struct OverviewRow {
    pub section_id: String,
    pub number: u32,
    pub question: String,
    pub has_ru: bool,
    pub has_en: bool,
    pub has_senior: bool,
    pub code_blocks: usize,
}

pub fn fetch_overview(
    conn: &Connection,
    section: Option<&str>,
    limit: usize,
) -> Result<Vec<OverviewRow>> {
    let where_clause = if section.is_some() {
        " WHERE q.section_id = ?1"
    } else {
        ""
    };

    let sql = format!(
        "SELECT q.section_id, q.number, q.question,
                EXISTS(SELECT 1 FROM answers a WHERE a.question_id = q.id AND a.lang = 'ru'),
                EXISTS(SELECT 1 FROM answers a WHERE a.question_id = q.id AND a.lang = 'en'),
                EXISTS(SELECT 1 FROM answers a WHERE a.question_id = q.id AND a.lang = 'senior'),
                json_array_length(q.code_blocks)
         FROM questions q{}
         ORDER BY q.section_id, q.number
         LIMIT {}",
        where_clause, limit
    );

    let mut stmt = conn.prepare(&sql)?;
    let map_row = |row: &rusqlite::Row| -> rusqlite::Result<OverviewRow> {
        Ok(OverviewRow {
            section_id: row.get(0)?,
            number: row.get(1)?,
            question: row.get(2)?,
            has_ru: row.get(3)?,
            has_en: row.get(4)?,
            has_senior: row.get(5)?,
            code_blocks: row.get(6)?,
        })
    };
    let rows = match section {
        Some(s) => stmt.query_map([s], map_row)?.collect::<Result<Vec<_>, _>>()?,
        None => stmt.query_map([], map_row)?.collect::<Result<Vec<_>, _>>()?,
    };
    Ok(rows)
}

// ── Stats ──

pub struct Stats {
    pub sections: usize,
    pub questions: usize,
    pub answers_ru: usize,
    pub answers_en: usize,
    pub answers_senior: usize,
    pub unanswered: usize,
}

pub fn get_stats(conn: &Connection) -> Result<Stats> {
    let count_lang = |lang: &str| -> rusqlite::Result<usize> {
        conn.query_row(
            "SELECT COUNT(*) FROM answers WHERE lang = ?1",
            [lang],
            |r| r.get(0),
        )
    };
    let sections: usize = conn.query_row("SELECT COUNT(*) FROM sections", [], |r| r.get(0))?;
    let questions: usize = conn.query_row("SELECT COUNT(*) FROM questions", [], |r| r.get(0))?;
    let unanswered: usize = conn.query_row(
        "SELECT COUNT(*) FROM questions q
         WHERE NOT EXISTS (SELECT 1 FROM answers a WHERE a.question_id = q.id)",
        [],
        |r| r.get(0),
    )?;
    Ok(Stats {
        sections,
        questions,
        answers_ru: count_lang("ru")?,
        answers_en: count_lang("en")?,
        answers_senior: count_lang("senior")?,
        unanswered,
    })
}
