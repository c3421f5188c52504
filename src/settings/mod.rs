// src/settings/mod.rs

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    env, fs,
    io::Write,
    path::{Path, PathBuf},
};
use tracing::debug;

/// API version used when none is stored.
pub const DEFAULT_API_VERSION: &str = "2024-01";

pub const ENV_DOMAIN: &str = "SHOP_DOMAIN";
pub const ENV_ACCESS_TOKEN: &str = "SHOP_ACCESS_TOKEN";
pub const ENV_API_VERSION: &str = "SHOP_API_VERSION";
pub const ENV_TIME_ZONE: &str = "SHOP_TIME_ZONE";
pub const ENV_SETTINGS_PATH: &str = "CODORDERS_SETTINGS";

/// Stored store settings. Any field may be missing; blank strings count as missing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_zone: Option<String>,
}

/// What the order source needs to make a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShopAuth {
    pub domain: String,
    pub access_token: String,
    pub api_version: String,
}

fn present(v: &Option<String>) -> Option<&str> {
    v.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

impl Settings {
    pub fn new(domain: impl Into<String>, access_token: impl Into<String>) -> Self {
        Self {
            domain: Some(domain.into()),
            access_token: Some(access_token.into()),
            ..Default::default()
        }
    }

    /// `None` when the domain or the token is missing.
    pub fn shop_auth(&self) -> Option<ShopAuth> {
        let domain = present(&self.domain)?;
        let access_token = present(&self.access_token)?;
        let api_version = present(&self.api_version).unwrap_or(DEFAULT_API_VERSION);
        Some(ShopAuth {
            domain: domain.to_string(),
            access_token: access_token.to_string(),
            api_version: api_version.to_string(),
        })
    }

    pub fn time_zone(&self) -> Option<&str> {
        present(&self.time_zone)
    }

    /// Field-wise: keep our value when present, otherwise take `fallback`'s.
    pub fn or(self, fallback: Settings) -> Settings {
        fn pick(a: Option<String>, b: Option<String>) -> Option<String> {
            if present(&a).is_some() {
                a
            } else {
                b
            }
        }
        Settings {
            domain: pick(self.domain, fallback.domain),
            access_token: pick(self.access_token, fallback.access_token),
            api_version: pick(self.api_version, fallback.api_version),
            time_zone: pick(self.time_zone, fallback.time_zone),
        }
    }
}

/// Somewhere settings can be read from.
pub trait CredentialStore {
    fn load(&self) -> Result<Settings>;
}

impl CredentialStore for Settings {
    fn load(&self) -> Result<Settings> {
        Ok(self.clone())
    }
}

/// Settings from `SHOP_*` environment variables.
#[derive(Debug, Default, Clone, Copy)]
pub struct EnvCredentials;

impl EnvCredentials {
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Settings {
        Settings {
            domain: lookup(ENV_DOMAIN),
            access_token: lookup(ENV_ACCESS_TOKEN),
            api_version: lookup(ENV_API_VERSION),
            time_zone: lookup(ENV_TIME_ZONE),
        }
    }
}

impl CredentialStore for EnvCredentials {
    fn load(&self) -> Result<Settings> {
        Ok(Self::from_lookup(|k| env::var(k).ok()))
    }
}

/// Settings persisted as pretty JSON on disk.
#[derive(Debug, Clone)]
pub struct JsonCredentials {
    path: PathBuf,
}

impl JsonCredentials {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path from `CODORDERS_SETTINGS`, or `settings.json` in the working directory.
    pub fn from_env() -> Self {
        Self::new(env::var(ENV_SETTINGS_PATH).unwrap_or_else(|_| "settings.json".to_string()))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write atomically: to a tmp file beside the target, then rename over it.
    pub fn save(&self, settings: &Settings) -> Result<()> {
        let dir = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&dir).with_context(|| format!("creating {:?}", dir))?;

        let file_name = self
            .path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "settings.json".to_string());
        let tmp_path = dir.join(format!(".{}.tmp", file_name));
        let mut tmp =
            fs::File::create(&tmp_path).with_context(|| format!("creating {:?}", tmp_path))?;
        serde_json::to_writer_pretty(&mut tmp, settings).context("serializing settings")?;
        tmp.write_all(b"\n")?;
        drop(tmp);

        fs::rename(&tmp_path, &self.path)
            .with_context(|| format!("renaming {:?} -> {:?}", tmp_path, self.path))?;
        debug!(path = %self.path.display(), "saved settings");
        Ok(())
    }
}

impl CredentialStore for JsonCredentials {
    /// A missing file is an empty configuration, not an error.
    fn load(&self) -> Result<Settings> {
        if !self.path.exists() {
            debug!(path = %self.path.display(), "no settings file");
            return Ok(Settings::default());
        }
        let f = fs::File::open(&self.path)
            .with_context(|| format!("opening {}", self.path.display()))?;
        serde_json::from_reader(f).with_context(|| format!("parsing {}", self.path.display()))
    }
}

/// Environment first, then the settings file.
pub fn load_layered(env: &dyn CredentialStore, file: &dyn CredentialStore) -> Result<Settings> {
    Ok(env.load()?.or(file.load()?))
}
