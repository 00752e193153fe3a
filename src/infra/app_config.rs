use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const CONFIG_PATH_ENV: &str = "LIVELIHOOD_CONFIG_PATH";
pub const DATA_HOME_ENV: &str = "LIVELIHOOD_DATA_HOME";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Overrides the platform data directory location of the database file.
    pub database_path: Option<PathBuf>,
    /// Write the default admin account into an empty `users` table.
    pub seed_admin: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_path: None,
            seed_admin: true,
        }
    }
}

pub fn load_config() -> AppConfig {
    load_config_from(config_path())
}

pub fn load_config_from(path: PathBuf) -> AppConfig {
    let Ok(contents) = std::fs::read_to_string(&path) else {
        return AppConfig::default();
    };
    toml::from_str(&contents).unwrap_or_else(|err| {
        log::warn!("Ignoring malformed config {}: {}", path.display(), err);
        AppConfig::default()
    })
}

pub fn save_config_to(config: &AppConfig, path: PathBuf) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let contents = toml::to_string_pretty(config).unwrap_or_default();
    std::fs::write(path, contents)
}

pub fn config_path() -> PathBuf {
    if let Ok(path) = std::env::var(CONFIG_PATH_ENV) {
        return PathBuf::from(path);
    }

    app_data_dir().join("config.toml")
}

pub fn app_data_dir() -> PathBuf {
    if let Ok(path) = std::env::var(DATA_HOME_ENV) {
        return PathBuf::from(path);
    }

    #[cfg(target_os = "macos")]
    {
        if let Some(home) = home::home_dir() {
            return home
                .join("Library")
                .join("Application Support")
                .join("Livelihood");
        }
    }

    #[cfg(target_os = "windows")]
    {
        if let Some(appdata) = std::env::var_os("APPDATA") {
            return PathBuf::from(appdata).join("Livelihood");
        }
    }

    #[cfg(target_os = "linux")]
    {
        if let Some(xdg) = std::env::var_os("XDG_DATA_HOME") {
            return PathBuf::from(xdg).join("livelihood");
        }
        if let Some(home) = home::home_dir() {
            return home.join(".local").join("share").join("livelihood");
        }
    }

    std::env::current_dir()
        .unwrap_or_else(|_| PathBuf::from("."))
        .join(".livelihood")
}
