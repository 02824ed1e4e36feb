use std::fs;
use std::path::{Path, PathBuf};

use camino::Utf8PathBuf;
use directories::BaseDirs;
use serde::{Deserialize, Serialize};

use crate::domain::{Endpoint, InputKind};
use crate::error::GdcError;

pub const DEFAULT_API_URL: &str = "https://api.gdc.cancer.gov/files";
pub const DEFAULT_LEGACY_API_URL: &str = "https://api.gdc.cancer.gov/legacy/files";
pub const DEFAULT_RESULT_SIZE: u32 = 10_000;
pub const DEFAULT_PREFIX: &str = "metadata";
const LOCAL_SETTINGS_FILE: &str = "gdc-tsv.json";

#[derive(Debug, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub api_url: Option<String>,
    #[serde(default)]
    pub legacy_api_url: Option<String>,
    #[serde(default)]
    pub size: Option<u32>,
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiSettings {
    pub api_url: String,
    pub legacy_api_url: String,
    pub size: u32,
    pub timeout_secs: Option<u64>,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            legacy_api_url: DEFAULT_LEGACY_API_URL.to_string(),
            size: DEFAULT_RESULT_SIZE,
            timeout_secs: None,
        }
    }
}

impl ApiSettings {
    pub fn url(&self, endpoint: Endpoint) -> &str {
        match endpoint {
            Endpoint::Current => &self.api_url,
            Endpoint::Legacy => &self.legacy_api_url,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FieldSelection {
    pub clinical: bool,
    pub biospecimen: bool,
}

impl FieldSelection {
    /// `-c` alone drops biospecimen, `-b` alone drops clinical, both or
    /// neither keep both, and `-s` drops everything but the base fields.
    pub fn from_flags(clinical_only: bool, biospecimen_only: bool, simple: bool) -> Self {
        if simple {
            return Self {
                clinical: false,
                biospecimen: false,
            };
        }
        match (clinical_only, biospecimen_only) {
            (true, false) => Self {
                clinical: true,
                biospecimen: false,
            },
            (false, true) => Self {
                clinical: false,
                biospecimen: true,
            },
            _ => Self {
                clinical: true,
                biospecimen: true,
            },
        }
    }

    pub fn is_simple(&self) -> bool {
        !self.clinical && !self.biospecimen
    }
}

#[derive(Debug, Clone)]
pub struct RunConfig {
    pub input: PathBuf,
    pub input_kind: InputKind,
    pub output_prefix: String,
    pub endpoint: Endpoint,
    pub fields: FieldSelection,
    pub include_maf: bool,
    pub keep_all_columns: bool,
    pub api: ApiSettings,
}

impl RunConfig {
    pub fn output_path(&self, suffix: &str) -> Utf8PathBuf {
        Utf8PathBuf::from(format!("{}{}", self.output_prefix, suffix))
    }
}

pub struct ConfigLoader;

impl ConfigLoader {
    pub fn resolve(path: Option<&Path>) -> Result<ApiSettings, GdcError> {
        let candidate = match path {
            Some(path) => Some(path.to_path_buf()),
            None => Self::discover(),
        };
        let Some(config_path) = candidate else {
            return Ok(ApiSettings::default());
        };

        let content = fs::read_to_string(&config_path)
            .map_err(|_| GdcError::ConfigRead(config_path.clone()))?;
        let settings: Settings = serde_json::from_str(&content)
            .map_err(|err| GdcError::ConfigParse(err.to_string()))?;
        Ok(Self::resolve_settings(settings))
    }

    pub fn resolve_settings(settings: Settings) -> ApiSettings {
        let defaults = ApiSettings::default();
        ApiSettings {
            api_url: settings.api_url.unwrap_or(defaults.api_url),
            legacy_api_url: settings.legacy_api_url.unwrap_or(defaults.legacy_api_url),
            size: settings.size.unwrap_or(defaults.size),
            timeout_secs: settings.timeout_secs,
        }
    }

    fn discover() -> Option<PathBuf> {
        let local = PathBuf::from(LOCAL_SETTINGS_FILE);
        if local.exists() {
            return Some(local);
        }
        BaseDirs::new()
            .map(|dirs| dirs.config_dir().join("gdc-tsv").join("config.json"))
            .filter(|path| path.exists())
    }
}
