use dirs::home_dir;
use std::{
    env, fs, io,
    path::{Path, PathBuf},
};

const DEFAULT_DIR_NAME: &str = ".pocket_ledger";
const CONFIG_FILE: &str = "config.json";
pub const HOME_ENV: &str = "POCKET_LEDGER_HOME";

/// Resolves the directories the presenter keeps its preferences in.
pub struct PathResolver;

impl PathResolver {
    /// Returns the application data directory, defaulting to `~/.pocket_ledger`.
    pub fn base_dir() -> PathBuf {
        if let Some(custom) = env::var_os(HOME_ENV) {
            return PathBuf::from(custom);
        }
        home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(DEFAULT_DIR_NAME)
    }

    pub fn config_file_in(base: &Path) -> PathBuf {
        base.join(CONFIG_FILE)
    }
}

pub fn ensure_dir(path: &Path) -> io::Result<()> {
    if !path.exists() {
        fs::create_dir_all(path)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ensure_dir_creates_nested_directories() {
        let temp = tempfile::tempdir().unwrap();
        let nested = temp.path().join("a").join("b");
        ensure_dir(&nested).unwrap();
        assert!(nested.is_dir());
        ensure_dir(&nested).unwrap();
    }

    #[test]
    fn config_file_lives_under_base() {
        let base = Path::new("/tmp/ledger-home");
        assert_eq!(
            PathResolver::config_file_in(base),
            PathBuf::from("/tmp/ledger-home/config.json")
        );
    }
}
