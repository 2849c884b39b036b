use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use automate_config::{AutomateConfig, CONFIG_FILE_NAME};

/// Load automate.json from the current directory.
pub fn load_config() -> Result<AutomateConfig> {
    let path = PathBuf::from(CONFIG_FILE_NAME);
    if !path.exists() {
        anyhow::bail!("{} not found. Run 'automate init' first.", CONFIG_FILE_NAME);
    }
    read_config(path)
}

/// Load config from a specific path.
pub fn load_config_from_path(path: PathBuf) -> Result<AutomateConfig> {
    if !path.exists() {
        anyhow::bail!("{} not found at: {}", CONFIG_FILE_NAME, path.display());
    }
    read_config(path)
}

/// Load config from project root, with fallback to defaults.
pub fn load_config_or_default(project_root: Option<PathBuf>) -> Result<AutomateConfig> {
    let config_path = match project_root {
        Some(root) => root.join(CONFIG_FILE_NAME),
        None => PathBuf::from(CONFIG_FILE_NAME),
    };

    if config_path.exists() {
        load_config_from_path(config_path)
    } else {
        tracing::debug!(path = %config_path.display(), "no config file, using defaults");
        Ok(AutomateConfig::default())
    }
}

fn read_config(path: PathBuf) -> Result<AutomateConfig> {
    let content = fs::read_to_string(&path)
        .with_context(|| format!("read {}", path.display()))?;
    let config: AutomateConfig = serde_json::from_str(&content)
        .with_context(|| format!("parse {}", path.display()))?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::path::Path;
    use tempfile::tempdir;

    struct CwdGuard {
        original: PathBuf,
    }

    impl CwdGuard {
        fn new(dir: &Path) -> Self {
            let original = std::env::current_dir().unwrap();
            std::env::set_current_dir(dir).unwrap();
            Self { original }
        }
    }

    impl Drop for CwdGuard {
        fn drop(&mut self) {
            let _ = std::env::set_current_dir(&self.original);
        }
    }

    #[test]
    #[serial]
    fn load_config_fails_without_file() {
        let tmp = tempdir().unwrap();
        let _guard = CwdGuard::new(tmp.path());

        let err = load_config().unwrap_err();
        assert!(err.to_string().contains("Run 'automate init' first"));
    }

    #[test]
    #[serial]
    fn load_config_reads_current_directory() {
        let tmp = tempdir().unwrap();
        let _guard = CwdGuard::new(tmp.path());
        fs::write(
            CONFIG_FILE_NAME,
            r#"{"type": "midway", "camelCase": true, "dir": "app/model"}"#,
        )
        .unwrap();

        let config = load_config().unwrap();
        assert_eq!(config.r#type, "midway");
        assert!(config.camel_case);
        assert_eq!(config.models_dir(), Path::new("app/model"));
        assert_eq!(config.types_dir(), Path::new("app/model"));
    }

    #[test]
    fn load_config_from_path_reports_missing_file() {
        let tmp = tempdir().unwrap();
        let err = load_config_from_path(tmp.path().join("nope.json")).unwrap_err();
        assert!(err.to_string().contains("not found at"));
    }

    #[test]
    fn load_config_from_path_reports_parse_errors() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join(CONFIG_FILE_NAME);
        fs::write(&path, "{ not json").unwrap();

        let err = load_config_from_path(path).unwrap_err();
        assert!(err.to_string().starts_with("parse "));
    }

    #[test]
    fn load_config_or_default_falls_back() {
        let tmp = tempdir().unwrap();
        let config = load_config_or_default(Some(tmp.path().to_path_buf())).unwrap();
        assert_eq!(config, AutomateConfig::default());
    }

    #[test]
    fn load_config_or_default_prefers_file() {
        let tmp = tempdir().unwrap();
        fs::write(tmp.path().join(CONFIG_FILE_NAME), r#"{"type": "ts", "tsNoCheck": true}"#).unwrap();

        let config = load_config_or_default(Some(tmp.path().to_path_buf())).unwrap();
        assert_eq!(config.r#type, "ts");
        assert!(config.ts_no_check);
    }
}
