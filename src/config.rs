use anyhow::{bail, Context, Result};
use std::env;
use url::Url;

use crate::domain::tasks::FilterCriterion;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Dev,
    Staging,
    Prod,
}

impl Environment {
    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "prod" | "production" => Self::Prod,
            "staging" => Self::Staging,
            _ => Self::Dev,
        }
    }

    pub fn is_dev(&self) -> bool {
        matches!(self, Self::Dev)
    }

    pub fn is_prod(&self) -> bool {
        matches!(self, Self::Prod)
    }
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub env: Environment,

    // Task service
    pub api_url: Url,
    pub api_token: Option<String>,
    pub api_timeout_seconds: u64,

    // List view
    pub default_filter: FilterCriterion,
}

impl Settings {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build settings from an arbitrary variable source.
    pub fn from_lookup(var: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let env = Environment::from_str(&var("ENV").unwrap_or_else(|| "dev".to_string()));

        // Task service
        let raw_url = var("TASKS_API_URL").context("TASKS_API_URL must be set")?;
        let api_url = parse_api_url(&raw_url)?;
        let api_token = var("TASKS_API_TOKEN")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());
        let api_timeout_seconds = var("TASKS_API_TIMEOUT_SECONDS")
            .and_then(|s| s.parse().ok())
            .unwrap_or(30);

        // List view
        let default_filter = match var("TASKS_DEFAULT_FILTER") {
            Some(raw) => raw
                .trim()
                .parse()
                .with_context(|| format!("TASKS_DEFAULT_FILTER has unknown value '{raw}'"))?,
            None => FilterCriterion::All,
        };

        Ok(Settings {
            env,
            api_url,
            api_token,
            api_timeout_seconds,
            default_filter,
        })
    }
}

fn parse_api_url(raw: &str) -> Result<Url> {
    let url = Url::parse(raw.trim().trim_end_matches('/'))
        .with_context(|| format!("TASKS_API_URL is not a valid URL: {raw}"))?;

    if !matches!(url.scheme(), "http" | "https") {
        bail!("TASKS_API_URL must use http or https, got {}", url.scheme());
    }

    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::tasks::TaskStatus;
    use std::collections::HashMap;

    fn settings(vars: &[(&str, &str)]) -> Result<Settings> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Settings::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults() {
        let s = settings(&[("TASKS_API_URL", "https://tasks.example.com/api/")]).unwrap();

        assert_eq!(s.env, Environment::Dev);
        assert_eq!(s.api_url.as_str(), "https://tasks.example.com/api");
        assert_eq!(s.api_token, None);
        assert_eq!(s.api_timeout_seconds, 30);
        assert_eq!(s.default_filter, FilterCriterion::All);
    }

    #[test]
    fn reads_overrides() {
        let s = settings(&[
            ("ENV", "production"),
            ("TASKS_API_URL", "http://localhost:5000/api"),
            ("TASKS_API_TOKEN", " abc "),
            ("TASKS_API_TIMEOUT_SECONDS", "5"),
            ("TASKS_DEFAULT_FILTER", "completed"),
        ])
        .unwrap();

        assert!(s.env.is_prod());
        assert_eq!(s.api_token.as_deref(), Some("abc"));
        assert_eq!(s.api_timeout_seconds, 5);
        assert_eq!(s.default_filter, FilterCriterion::Status(TaskStatus::Completed));
    }

    #[test]
    fn rejects_bad_values() {
        assert!(settings(&[]).is_err());
        assert!(settings(&[("TASKS_API_URL", "not a url")]).is_err());
        assert!(settings(&[("TASKS_API_URL", "ftp://tasks.example.com")]).is_err());
        assert!(settings(&[
            ("TASKS_API_URL", "https://tasks.example.com"),
            ("TASKS_DEFAULT_FILTER", "done"),
        ])
        .is_err());
    }
}
