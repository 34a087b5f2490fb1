use std::str::FromStr;

use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Every setting has a default suited to a local LM Studio setup.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    pub llm_base_url: String,
    pub llm_model: String,
    pub llm_api_key: String,
    pub embedding_base_url: String,
    pub embedding_model: String,
    pub corpus_path: String,
    pub chunk_size: usize,
    pub chunk_overlap: usize,
    pub request_timeout_secs: u64,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let llm_base_url = env_or("LLM_BASE_URL", "http://127.0.0.1:1234/v1");

        Ok(Config {
            port: parse_env("PORT", 8080)?,
            rust_log: env_or("RUST_LOG", "info"),
            embedding_base_url: env_or("EMBEDDING_BASE_URL", &llm_base_url),
            llm_base_url,
            llm_model: env_or("LLM_MODEL", "gemma-2-9b-it"),
            llm_api_key: env_or("LLM_API_KEY", "not-needed"),
            embedding_model: env_or("EMBEDDING_MODEL", "sentence-transformers/all-MiniLM-L6-v2"),
            corpus_path: env_or("CORPUS_PATH", "./data/resumes.json"),
            chunk_size: parse_env("CHUNK_SIZE", 1000)?,
            chunk_overlap: parse_env("CHUNK_OVERLAP", 200)?,
            request_timeout_secs: parse_env("REQUEST_TIMEOUT_SECS", 300)?,
        })
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("{key} must be a valid number, got '{raw}'")),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_env_default_when_unset() {
        let value: usize = parse_env("SHORTLIST_TEST_UNSET_VARIABLE", 42).unwrap();
        assert_eq!(value, 42);
    }

    #[test]
    fn test_parse_env_rejects_garbage() {
        std::env::set_var("SHORTLIST_TEST_BAD_PORT", "eighty");
        let result: Result<u16> = parse_env("SHORTLIST_TEST_BAD_PORT", 8080);
        assert!(result.is_err());
        std::env::remove_var("SHORTLIST_TEST_BAD_PORT");
    }
}
