//! Configuration loading

use std::path::Path;

use crate::error::{Error, Result};
use crate::Config;

/// Environment variable naming an explicit config file
pub const CONFIG_PATH_ENV: &str = "LIVEWATCH_CONFIG_PATH";

const CWD_CONFIG: &str = "config.yaml";
const MOUNTED_CONFIG: &str = "/config/config.yaml";

/// Load and validate configuration.
///
/// A `.env` file in the working directory is read first, if present.
/// Config file search order:
/// 1. `explicit` (from the command line)
/// 2. `LIVEWATCH_CONFIG_PATH`
/// 3. ./config.yaml
/// 4. /config/config.yaml
/// 5. Environment variables only
pub fn load_config(explicit: Option<&str>) -> Result<Config> {
    // Missing .env is normal
    let _ = dotenvy::dotenv();

    let env_path = std::env::var(CONFIG_PATH_ENV).ok();
    let config = match find_config_file(explicit, env_path.as_deref()) {
        Some(path) => {
            eprintln!("Loading config from {path}");
            Config::from_file(&path)?
        }
        None => {
            eprintln!("No config file found, using environment variables");
            Config::from_env()?
        }
    };

    if let Err(errors) = config.validate() {
        for error in &errors {
            eprintln!("Config validation error: {error}");
        }
        return Err(Error::InvalidConfig(errors));
    }

    Ok(config)
}

/// First existing file among the candidates, in priority order
fn find_config_file(explicit: Option<&str>, env_path: Option<&str>) -> Option<String> {
    [explicit, env_path, Some(CWD_CONFIG), Some(MOUNTED_CONFIG)]
        .into_iter()
        .flatten()
        .find(|p| Path::new(p).exists())
        .map(str::to_string)
}
