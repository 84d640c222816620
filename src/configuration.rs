use crate::session::Messages;
use anyhow::Context;
use config::ConfigError;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::{env, fs, io};

/// Prefix of environment variables overriding the configuration file,
/// e.g. `DONDISCO__API__BASE_URL`.
const ENV_PREFIX: &str = "DONDISCO";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub api: ApiSettings,
    pub search: SearchSettings,
    pub messages: Messages,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApiSettings {
    pub base_url: String,
    pub timeout_secs: u64,
}

impl ApiSettings {
    pub fn new(url: &str, timeout_secs: u64) -> Self {
        Self {
            base_url: url.to_string(),
            timeout_secs,
        }
    }
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self::new("http://localhost:8000", 10)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SearchSettings {
    pub base_url: String,
    /// Last.fm API key. Autocomplete is disabled while empty.
    pub api_key: String,
    pub timeout_secs: u64,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            base_url: "https://ws.audioscrobbler.com/2.0/".to_string(),
            api_key: String::new(),
            timeout_secs: 5,
        }
    }
}

/// Loads settings from `cfg_file` (optional) layered under `DONDISCO__*` environment variables.
pub fn get_configuration(cfg_file: &Path) -> Result<Settings, ConfigError> {
    let settings = config::Config::builder()
        .add_source(
            config::File::from(cfg_file)
                .format(config::FileFormat::Yaml)
                .required(false),
        )
        .add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    settings.try_deserialize::<Settings>()
}

pub struct ConfigFolder {
    pub config_dir: PathBuf,
    pub config_file: PathBuf,
}

impl ConfigFolder {
    pub fn new() -> anyhow::Result<Self> {
        let home_dir = env::var("HOME").context("Failed to get HOME environment variable")?;
        Ok(Self::in_home(Path::new(&home_dir)))
    }

    pub fn in_home(home_dir: &Path) -> Self {
        let config_dir = home_dir.join(".dondisco");
        Self {
            config_file: config_dir.join("config.yaml"),
            config_dir,
        }
    }
}

pub fn create_config(cfg_folder: ConfigFolder) -> anyhow::Result<()> {
    println!("\x1b[1m\x1b[32mCreating configuration...\x1b[0m");

    if cfg_folder.config_file.exists() && !confirm_overwrite()? {
        println!("\x1b[33mOperation cancelled.\x1b[0m");
        return Ok(());
    }

    write_template(&cfg_folder)?;

    println!("\x1b[32mConfiguration file created at:");
    println!("  -> {}", cfg_folder.config_file.display());
    println!("\x1b[0mPlease edit the configuration file with your specific settings.");

    Ok(())
}

fn write_template(cfg_folder: &ConfigFolder) -> io::Result<()> {
    fs::create_dir_all(&cfg_folder.config_dir)?;
    fs::write(
        &cfg_folder.config_file,
        include_str!("config_template.yaml"),
    )
}

fn confirm_overwrite() -> Result<bool, io::Error> {
    println!("\x1b[31mThe configuration file already exists.");
    println!("Do you want to overwrite it? Your settings will be lost. (y/N)\x1b[0m");

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;

    Ok(input.trim().eq_ignore_ascii_case("y"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_uses_defaults() {
        let temp_dir = TempDir::new().unwrap();

        let settings = get_configuration(&temp_dir.path().join("absent.yaml")).unwrap();

        assert_eq!(settings.api.base_url, "http://localhost:8000");
        assert_eq!(settings.api.timeout_secs, 10);
        assert!(settings.search.api_key.is_empty());
        assert_eq!(settings.messages, Messages::default());
    }

    #[test]
    fn test_partial_file_keeps_remaining_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let file = temp_dir.path().join("config.yaml");
        fs::write(
            &file,
            "api:\n  base_url: \"http://recs.local:9000\"\nmessages:\n  no_results: \"Nothing found\"\n",
        )
        .unwrap();

        let settings = get_configuration(&file).unwrap();

        assert_eq!(settings.api.base_url, "http://recs.local:9000");
        assert_eq!(settings.api.timeout_secs, 10);
        assert_eq!(settings.messages.no_results, "Nothing found");
        assert_eq!(settings.messages.validation, Messages::default().validation);
    }

    #[test]
    fn test_template_parses() {
        let temp_dir = TempDir::new().unwrap();
        let folder = ConfigFolder::in_home(temp_dir.path());

        write_template(&folder).unwrap();
        let settings = get_configuration(&folder.config_file).unwrap();

        assert_eq!(settings.api.base_url, "http://localhost:8000");
        assert_eq!(settings.search.timeout_secs, 5);
    }

    #[test]
    fn test_config_folder_layout() {
        let folder = ConfigFolder::in_home(Path::new("/home/someone"));

        assert_eq!(folder.config_dir, Path::new("/home/someone/.dondisco"));
        assert_eq!(
            folder.config_file,
            Path::new("/home/someone/.dondisco/config.yaml")
        );
    }
}
