use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// How the typed per-field predicates are combined.
/// Deserializes through `FromStr`, so config, request bodies and CLI flags accept the same spellings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum MatchMode {
    /// a row matches when any predicate holds; missing data never matches
    #[default]
    Any,
    /// a row matches when every predicate holds; missing data passes
    All,
}

impl TryFrom<String> for MatchMode {
    type Error = String;
    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl FromStr for MatchMode {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "any" | "or" => Ok(Self::Any),
            "all" | "and" => Ok(Self::All),
            other => Err(format!("unknown match mode '{other}' (expected any|all)")),
        }
    }
}

impl fmt::Display for MatchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Any => "any",
            Self::All => "all",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl FromStr for LogLevel {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "error" => Ok(Self::Error),
            "warn" | "warning" => Ok(Self::Warn),
            "info" => Ok(Self::Info),
            "debug" => Ok(Self::Debug),
            "trace" => Ok(Self::Trace),
            other => Err(format!("unknown log level '{other}'")),
        }
    }
}

impl TryFrom<String> for LogLevel {
    type Error = String;
    fn try_from(s: String) -> Result<Self, <LogLevel as TryFrom<String>>::Error> {
        s.parse()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_true")]
    pub cors_permissive: bool,
}

fn default_host() -> String {
    "127.0.0.1".into()
}
fn default_port() -> u16 {
    5000
}
fn default_true() -> bool {
    true
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_permissive: true,
        }
    }
}

impl ServerConfig {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Maps each logical profile field to the header it is read from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnMap {
    #[serde(default = "col_name")]
    pub name: String,
    #[serde(default = "col_age")]
    pub age: String,
    #[serde(default = "col_gender")]
    pub gender: String,
    #[serde(default = "col_salary")]
    pub salary: String,
    #[serde(default = "col_hobbies")]
    pub hobbies: String,
    #[serde(default = "col_qualities")]
    pub qualities: String,
    #[serde(default = "col_location")]
    pub location: String,
    #[serde(default = "col_job")]
    pub job: String,
}

fn col_name() -> String { "name".into() }
fn col_age() -> String { "age".into() }
fn col_gender() -> String { "gender".into() }
fn col_salary() -> String { "salary".into() }
fn col_hobbies() -> String { "hobbies".into() }
fn col_qualities() -> String { "qualities".into() }
fn col_location() -> String { "location".into() }
fn col_job() -> String { "job".into() }

impl Default for ColumnMap {
    fn default() -> Self {
        Self {
            name: col_name(),
            age: col_age(),
            gender: col_gender(),
            salary: col_salary(),
            hobbies: col_hobbies(),
            qualities: col_qualities(),
            location: col_location(),
            job: col_job(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetConfig {
    #[serde(default = "default_dataset_path")]
    pub path: String,
    #[serde(default = "default_delimiter")]
    pub delimiter: char,
    #[serde(default)]
    pub columns: ColumnMap,
}

fn default_dataset_path() -> String {
    "./gopaldataset.csv".into() // resolved against the working directory
}
fn default_delimiter() -> char {
    ','
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            path: default_dataset_path(),
            delimiter: default_delimiter(),
            columns: ColumnMap::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    #[serde(default)]
    pub default_mode: MatchMode,
    #[serde(default = "default_separator")]
    pub term_separator: char,
}

fn default_separator() -> char {
    ','
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            default_mode: MatchMode::default(),
            term_separator: default_separator(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct LoggingConfig {
    #[serde(default)]
    pub level: LogLevel,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub dataset: DatasetConfig,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    pub fn config_path() -> PathBuf {
        if let Ok(env_path) = std::env::var("PROFILE_SEARCH_CONFIG") {
            return PathBuf::from(env_path); // $PROFILE_SEARCH_CONFIG overrides default config path
        }
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("profile-search")
            .join("config.toml")
    }

    pub fn load() -> crate::Result<Self> {
        Self::load_from(&Self::config_path())
    }

    /// missing file yields defaults
    pub fn load_from(path: &std::path::Path) -> crate::Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> crate::Result<Self> {
        toml::from_str(content).map_err(|e| crate::ProfileSearchError::Config(e.to_string()))
    }

    pub fn save_to(&self, path: &std::path::Path) -> crate::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)
            .map_err(|e| crate::ProfileSearchError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn save(&self) -> crate::Result<()> {
        self.save_to(&Self::config_path())
    }
}
