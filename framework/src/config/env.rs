use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::error::ConfigError;

/// A source of environment variables
///
/// Configuration constructors take a source instead of calling
/// `std::env::var` directly, so the process environment is read in exactly
/// one place and tests can supply their own values.
pub trait EnvSource {
    /// Look up a variable, `None` when unset
    fn var(&self, key: &str) -> Option<String>;
}

/// The real process environment
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

impl EnvSource for HashMap<String, String> {
    fn var(&self, key: &str) -> Option<String> {
        self.get(key).cloned()
    }
}

impl<const N: usize> EnvSource for [(&str, &str); N] {
    fn var(&self, key: &str) -> Option<String> {
        self.iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| (*v).to_string())
    }
}

/// Environment type enumeration
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Local,
    Development,
    Staging,
    Production,
    Testing,
    Custom(String),
}

impl Environment {
    /// Detect environment from APP_ENV or default to Local
    pub fn detect(source: &dyn EnvSource) -> Self {
        match source.var("APP_ENV").as_deref() {
            Some("production") => Self::Production,
            Some("staging") => Self::Staging,
            Some("development") => Self::Development,
            Some("testing") => Self::Testing,
            Some("local") | Some("") | None => Self::Local,
            Some(other) => Self::Custom(other.to_string()),
        }
    }

    /// Get the .env file suffix for this environment
    pub fn env_file_suffix(&self) -> &str {
        match self {
            Self::Local => "local",
            Self::Production => "production",
            Self::Staging => "staging",
            Self::Development => "development",
            Self::Testing => "testing",
            Self::Custom(name) => name.as_str(),
        }
    }

    /// Check if this is a production environment
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }

    /// Check if this is a development environment (local or development)
    pub fn is_development(&self) -> bool {
        matches!(self, Self::Local | Self::Development)
    }
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.env_file_suffix())
    }
}

/// What [`load_dotenv`] did
///
/// Loading runs before the tracing subscriber exists, so nothing is logged
/// while it happens. Call [`DotenvReport::log`] once logging is up.
#[derive(Debug)]
pub struct DotenvReport {
    /// Environment detected before any file was read
    pub environment: Environment,
    /// Files that were read, in load order
    pub loaded: Vec<PathBuf>,
    /// Files that exist but could not be read or parsed
    pub failed: Vec<(PathBuf, dotenvy::Error)>,
}

impl DotenvReport {
    pub fn log(&self) {
        for path in &self.loaded {
            tracing::debug!(file = %path.display(), "loaded env file");
        }
        for (path, error) in &self.failed {
            tracing::warn!(file = %path.display(), %error, "failed to load env file");
        }
    }
}

/// Load environment variables from .env files with proper precedence
///
/// Precedence (later files override earlier):
/// 1. .env (base defaults)
/// 2. .env.local (local overrides, not committed)
/// 3. .env.{environment} (environment-specific)
/// 4. .env.{environment}.local (environment-specific local overrides)
/// 5. Actual system environment variables (highest priority)
///
/// Missing files are skipped silently; every other failure is returned.
pub fn load_dotenv(project_root: &Path) -> DotenvReport {
    let environment = Environment::detect(&ProcessEnv);
    let suffix = environment.env_file_suffix();

    // dotenvy never overwrites a variable that is already set, so files are
    // loaded most specific first.
    let mut files = vec![
        format!(".env.{}.local", suffix),
        format!(".env.{}", suffix),
        ".env.local".to_string(),
        ".env".to_string(),
    ];
    // `local` names .env.local twice
    files.dedup();

    let mut loaded = Vec::new();
    let mut failed = Vec::new();
    for file in files {
        let path = project_root.join(&file);
        match dotenvy::from_path(&path) {
            Ok(()) => loaded.push(path),
            Err(e) if e.not_found() => {}
            Err(e) => failed.push((path, e)),
        }
    }

    DotenvReport {
        environment,
        loaded,
        failed,
    }
}

/// Raw lookup treating empty and whitespace-only values as unset
fn lookup(source: &dyn EnvSource, key: &str) -> Option<String> {
    source.var(key).filter(|v| !v.trim().is_empty())
}

/// Parse the value as given, then with surrounding whitespace removed
///
/// Strings always parse on the first attempt and are kept verbatim.
fn parse<T: FromStr>(key: &str, raw: String) -> Result<T, ConfigError> {
    match raw.parse().or_else(|_| raw.trim().parse()) {
        Ok(value) => Ok(value),
        Err(_) => Err(ConfigError::invalid(key, raw, short_type_name::<T>())),
    }
}

fn short_type_name<T>() -> &'static str {
    let full = std::any::type_name::<T>();
    full.rsplit("::").next().unwrap_or(full)
}

/// Get an environment variable with a default value
///
/// Unset or empty variables yield `default`. A value that is present but does
/// not parse is an error rather than a silent fallback.
///
/// # Example
/// ```
/// use roster::config::env_or;
///
/// let source = [("SERVER_PORT", "8080")];
/// let port: u16 = env_or(&source, "SERVER_PORT", 3000).unwrap();
/// assert_eq!(port, 8080);
/// ```
pub fn env_or<T: FromStr>(source: &dyn EnvSource, key: &str, default: T) -> Result<T, ConfigError> {
    match lookup(source, key) {
        Some(raw) => parse(key, raw),
        None => Ok(default),
    }
}

/// Get a required environment variable
pub fn env_required<T: FromStr>(source: &dyn EnvSource, key: &str) -> Result<T, ConfigError> {
    let raw = lookup(source, key).ok_or_else(|| ConfigError::missing(key))?;
    parse(key, raw)
}

/// Get an optional environment variable
pub fn env_optional<T: FromStr>(source: &dyn EnvSource, key: &str) -> Result<Option<T>, ConfigError> {
    lookup(source, key).map(|raw| parse(key, raw)).transpose()
}
