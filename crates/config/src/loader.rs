use crate::{ConfigError, HtmlIdConfig, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Config file names to search for, in order of preference
pub const CONFIG_FILES: &[&str] = &[
    ".htmlidrc.json",
    ".htmlidrc.yml",
    ".htmlidrc.yaml",
    ".htmlidrc",
    "htmlid.config.json",
    "htmlid.config.yml",
    "htmlid.config.yaml",
];

/// Find a config file by walking up the directory tree from `start_dir`.
#[tracing::instrument(fields(start = %start_dir.display()))]
pub fn find_config(start_dir: &Path) -> Result<Option<PathBuf>> {
    let mut current_dir = start_dir.to_path_buf();
    let mut checked_dirs = 0;

    loop {
        tracing::trace!(dir = %current_dir.display(), "Checking directory for config files");
        for file_name in CONFIG_FILES {
            let config_path = current_dir.join(file_name);
            if config_path.is_file() {
                tracing::info!(path = %config_path.display(), checked_dirs, "Found config file");
                return Ok(Some(config_path));
            }
        }

        checked_dirs += 1;
        if !current_dir.pop() {
            tracing::debug!(checked_dirs, "No config file found");
            break;
        }
    }

    Ok(None)
}

/// Load a config file, detecting the format from its name.
///
/// A relative `completionDatabase` is resolved against the directory that
/// holds the file.
#[tracing::instrument(fields(path = %path.display()))]
pub fn load_config(path: &Path) -> Result<HtmlIdConfig> {
    tracing::debug!("Reading config file");
    let contents = fs::read_to_string(path)?;
    let mut config = load_config_from_str(&contents, path)?;
    if let Some(base_dir) = path.parent() {
        config = config.resolve_paths(base_dir);
    }
    tracing::info!(
        completion_database = ?config.completion_database,
        duplicate_ids = %config.duplicate_id_severity(),
        "Config loaded successfully"
    );
    Ok(config)
}

/// Parse a config from a string.
/// The path is used for error messages and format detection.
#[tracing::instrument(skip(contents), fields(path = %path.display(), size = contents.len()))]
pub fn load_config_from_str(contents: &str, path: &Path) -> Result<HtmlIdConfig> {
    let extension = path.extension().and_then(|ext| ext.to_str()).unwrap_or("");

    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("");

    tracing::debug!(extension, file_name, "Detecting config format");

    let config = match extension {
        "yml" | "yaml" => {
            tracing::trace!("Parsing as YAML");
            parse_yaml(contents, path)?
        }
        "json" => {
            tracing::trace!("Parsing as JSON");
            parse_json(contents, path)?
        }
        "" if file_name == ".htmlidrc" => {
            tracing::trace!("Trying YAML then JSON for .htmlidrc");
            parse_yaml(contents, path).or_else(|_| parse_json(contents, path))?
        }
        _ => return Err(ConfigError::UnsupportedFormat(path.to_path_buf())),
    };

    validate_config(&config, path)?;

    Ok(config)
}

fn parse_yaml(contents: &str, path: &Path) -> Result<HtmlIdConfig> {
    // An empty YAML document is an empty config
    if contents.trim().is_empty() {
        return Ok(HtmlIdConfig::default());
    }
    serde_saphyr::from_str(contents).map_err(|e| ConfigError::Invalid {
        path: path.to_path_buf(),
        message: format!("YAML parse error: {e}"),
    })
}

fn parse_json(contents: &str, path: &Path) -> Result<HtmlIdConfig> {
    serde_json::from_str(contents).map_err(|e| ConfigError::Invalid {
        path: path.to_path_buf(),
        message: format!("JSON parse error: {e}"),
    })
}

fn validate_config(config: &HtmlIdConfig, path: &Path) -> Result<()> {
    if let Some(database) = &config.completion_database {
        if database.as_os_str().is_empty() {
            return Err(ConfigError::Invalid {
                path: path.to_path_buf(),
                message: "completionDatabase must not be empty".to_string(),
            });
        }
    }

    tracing::debug!("Config validation passed");
    Ok(())
}
