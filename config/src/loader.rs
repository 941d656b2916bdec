use crate::{ConfigError, FmshConfig, LogLevel};
use regex::Regex;
use std::path::{Path, PathBuf};
use tracing::debug;

pub struct ConfigLoader {
    explicit_file: Option<PathBuf>,
    search_paths: Vec<PathBuf>,
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigLoader {
    pub fn new() -> Self {
        let mut search_paths = Vec::new();

        if let Some(home) = dirs::home_dir() {
            search_paths.push(home.join(".config/fmsh/fmsh.yaml"));
        }
        search_paths.push(PathBuf::from("./fmsh.yaml"));

        Self {
            explicit_file: None,
            search_paths,
        }
    }

    pub fn with_file(mut self, path: impl AsRef<Path>) -> Self {
        self.explicit_file = Some(path.as_ref().to_path_buf());
        self
    }

    pub fn load(&self) -> Result<FmshConfig, ConfigError> {
        let mut config = FmshConfig::default();

        if let Some(ref explicit) = self.explicit_file {
            config = self.parse_yaml(&read_file(explicit)?)?;
        } else if let Ok(env_path) = std::env::var("FMSH_CONFIG") {
            config = self.parse_yaml(&read_file(Path::new(&env_path))?)?;
        } else {
            for path in &self.search_paths {
                if path.exists() {
                    if let Ok(content) = std::fs::read_to_string(path) {
                        debug!(path = %path.display(), "merging config file");
                        config = self.merge_yaml(&config, &content)?;
                    }
                }
            }
        }

        self.apply_env_overrides(&mut config);
        validate(&config)?;
        Ok(config)
    }

    fn parse_yaml(&self, content: &str) -> Result<FmshConfig, ConfigError> {
        let expanded = self.expand_env_vars(content)?;
        Ok(serde_yaml::from_str(&expanded)?)
    }

    fn merge_yaml(&self, base: &FmshConfig, content: &str) -> Result<FmshConfig, ConfigError> {
        let overlay = self.parse_yaml(content)?;
        Ok(self.merge_configs(base, &overlay))
    }

    fn merge_configs(&self, base: &FmshConfig, overlay: &FmshConfig) -> FmshConfig {
        let defaults = FmshConfig::default();
        let mut result = base.clone();

        if overlay.shell.prompt != defaults.shell.prompt {
            result.shell.prompt = overlay.shell.prompt.clone();
        }
        if overlay.shell.start_dir.is_some() {
            result.shell.start_dir = overlay.shell.start_dir.clone();
        }
        if overlay.shell.history != defaults.shell.history {
            result.shell.history = overlay.shell.history.clone();
        }
        if overlay.engine != defaults.engine {
            result.engine = overlay.engine.clone();
        }
        if overlay.logging != defaults.logging {
            result.logging = overlay.logging.clone();
        }

        result
    }

    fn expand_env_vars(&self, content: &str) -> Result<String, ConfigError> {
        let re = Regex::new(r"\$\{([^}]+)\}")
            .map_err(|e| ConfigError::InvalidValue(e.to_string()))?;
        Ok(re
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_default()
            })
            .to_string())
    }

    fn apply_env_overrides(&self, config: &mut FmshConfig) {
        if let Ok(level) = std::env::var("FMSH_LOG_LEVEL") {
            if let Ok(l) = serde_yaml::from_str::<LogLevel>(&level) {
                config.logging.level = l;
            }
        }
        if let Ok(dir) = std::env::var("FMSH_START_DIR") {
            if !dir.is_empty() {
                config.shell.start_dir = Some(dir);
            }
        }
        if let Ok(file) = std::env::var("FMSH_HISTORY_FILE") {
            if !file.is_empty() {
                config.shell.history.file = file;
            }
        }
        if let Ok(prompt) = std::env::var("FMSH_PROMPT") {
            config.shell.prompt = prompt;
        }
    }
}

fn read_file(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|e| ConfigError::ReadFile {
        path: path.to_path_buf(),
        source: e,
    })
}

fn validate(config: &FmshConfig) -> Result<(), ConfigError> {
    if config.engine.buffer_size == 0 {
        return Err(ConfigError::InvalidValue(
            "engine.buffer_size must be greater than zero".to_string(),
        ));
    }
    if config.engine.archive_suffix.is_empty() {
        return Err(ConfigError::InvalidValue(
            "engine.archive_suffix must not be empty".to_string(),
        ));
    }
    Ok(())
}

/// Expands a leading `~/` to the home directory.
pub fn expand_home(path: &str) -> PathBuf {
    match (path.strip_prefix("~/"), dirs::home_dir()) {
        (Some(rest), Some(home)) => home.join(rest),
        _ => PathBuf::from(path),
    }
}
