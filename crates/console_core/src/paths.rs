use std::path::PathBuf;

/// Console configuration directory (~/.x9x-console)
pub fn console_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join(".x9x-console")
}

/// config.json path inside the console directory
pub fn config_json_path() -> PathBuf {
    console_dir().join("config.json")
}

/// Fallback TOML config in the working directory
pub fn config_toml_path() -> PathBuf {
    PathBuf::from("config.toml")
}
