use std::path::PathBuf;

use anyhow::{bail, Context, Result};

const DEFAULT_DB_PATH: &str = "data/questions.sqlite";
const DEFAULT_IMPORT_CHUNK: usize = 64;

/// Runtime configuration from the environment (and `.env` when present).
#[derive(Debug, Clone)]
pub struct Config {
    pub db_path: PathBuf,
    pub import_chunk: usize,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let db_path = get("QA_DB_PATH")
            .filter(|p| !p.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DB_PATH));

        let import_chunk = match get("QA_IMPORT_CHUNK") {
            Some(raw) => {
                let n = raw
                    .trim()
                    .parse::<usize>()
                    .with_context(|| format!("QA_IMPORT_CHUNK must be a positive integer, got '{raw}'"))?;
                if n == 0 {
                    bail!("QA_IMPORT_CHUNK must be greater than zero");
                }
                n
            }
            None => DEFAULT_IMPORT_CHUNK,
        };

        Ok(Config {
            db_path,
            import_chunk,
        })
    }
}
