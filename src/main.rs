use std::path::PathBuf;
use std::time::Instant;

use anyhow::Context;
use clap::{Parser, Subcommand};

use qa_markdown::config::Config;
use qa_markdown::parser::{parse_questions, training::parse_for_training};
use qa_markdown::{db, import};

#[derive(Parser)]
#[command(name = "qa_markdown", about = "Interview Q&A markdown parser and importer")]
struct Cli {
    /// SQLite database path (overrides QA_DB_PATH)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse one markdown file and print questions as JSON
    Parse {
        file: PathBuf,
        /// Attach a section id and answer flags (training shape)
        #[arg(short, long)]
        section: Option<String>,
        /// Single-line JSON instead of pretty-printed
        #[arg(long)]
        compact: bool,
    },
    /// Import markdown files or directories into the database
    Import {
        #[arg(required = true)]
        paths: Vec<PathBuf>,
        /// Max files to import
        #[arg(short = 'n', long)]
        limit: Option<usize>,
    },
    /// Show database statistics
    Stats,
    /// Questions overview table
    Overview {
        /// Filter by section id (e.g. "javascript")
        #[arg(short, long)]
        section: Option<String>,
        /// Max rows to display
        #[arg(short = 'n', long, default_value = "50")]
        limit: usize,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let t0 = Instant::now();
    let cli = Cli::parse();
    let config = Config::from_env()?;
    let db_path = cli.db.unwrap_or_else(|| config.db_path.clone());

    let result = match cli.command {
        Commands::Parse {
            file,
            section,
            compact,
        } => {
            let markdown = std::fs::read_to_string(&file)
                .with_context(|| format!("Failed to read {}", file.display()))?;
            let value = match section {
                Some(id) => serde_json::to_value(parse_for_training(&markdown, &id))?,
                None => serde_json::to_value(parse_questions(&markdown))?,
            };
            let out = if compact {
                serde_json::to_string(&value)?
            } else {
                serde_json::to_string_pretty(&value)?
            };
            println!("{}", out);
            Ok(())
        }
        Commands::Import { paths, limit } => {
            let conn = db::connect(&db_path)?;
            db::init_schema(&conn)?;
            let mut files = import::collect_markdown_files(&paths)?;
            if let Some(n) = limit {
                files.truncate(n);
            }
            if files.is_empty() {
                println!("No markdown files found.");
                return Ok(());
            }
            println!("Importing {} files into {}...", files.len(), db_path.display());
            let counts = import::import_files(&conn, &files, config.import_chunk)?;
            counts.print();
            Ok(())
        }
        Commands::Overview { section, limit } => {
            let conn = db::connect(&db_path)?;
            db::init_schema(&conn)?;
            let rows = db::fetch_overview(&conn, section.as_deref(), limit)?;
            if rows.is_empty() {
                println!("No questions found. Run 'import' first.");
                return Ok(());
            }

            println!(
                "{:<16} | {:>4} | {:<48} | {:^2} | {:^2} | {:^2} | {:>4}",
                "Section", "#", "Question", "RU", "EN", "SR", "Code"
            );
            println!("{}", "-".repeat(96));

            for r in &rows {
                println!(
                    "{:<16} | {:>4} | {:<48} | {:^2} | {:^2} | {:^2} | {:>4}",
                    truncate(&r.section_id, 16),
                    r.number,
                    truncate(&r.question, 48),
                    flag(r.has_ru),
                    flag(r.has_en),
                    flag(r.has_senior),
                    r.code_blocks
                );
            }

            println!("\n{} questions | anchor: #question-<n>", rows.len());
            Ok(())
        }
        Commands::Stats => {
            let conn = db::connect(&db_path)?;
            db::init_schema(&conn)?;
            let s = db::get_stats(&conn)?;
            println!("Sections:   {}", s.sections);
            println!("Questions:  {}", s.questions);
            println!("Answers RU: {}", s.answers_ru);
            println!("Answers EN: {}", s.answers_en);
            println!("Senior:     {}", s.answers_senior);
            println!("Unanswered: {}", s.unanswered);
            Ok(())
        }
    };

    let elapsed = t0.elapsed();
    if elapsed.as_secs() >= 1 {
        eprintln!("\nDone in {}", format_duration(elapsed));
    }

    result
}

fn flag(present: bool) -> &'static str {
    if present {
        "+"
    } else {
        "-"
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", truncated)
    }
}

fn format_duration(d: std::time::Duration) -> String {
    let secs = d.as_secs();
    if secs < 60 {
        format!("{:.1}s", d.as_secs_f64())
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else {
        format!("{}h {}m {}s", secs / 3600, (secs % 3600) / 60, secs % 60)
    }
}
