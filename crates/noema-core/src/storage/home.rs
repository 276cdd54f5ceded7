use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};

use crate::error::CoreError;
use crate::model::MemoryTier;

/// Environment override for the store root; tests point this at a tempdir.
pub const HOME_ENV: &str = "NOEMA_HOME";

const DEFAULT_DIR: &str = ".noema";
const STATE_FILE: &str = "state.json";

/// Root of the per-user store: `working/`, one directory per memory tier,
/// and `logs/`. Passed explicitly into every store so isolated instances
/// can coexist (nothing here is a process-wide global).
#[derive(Debug, Clone)]
pub struct MemoryHome {
    root: PathBuf,
}

impl MemoryHome {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Resolve the store root: `NOEMA_HOME` override, else `~/.noema`.
    pub fn resolve() -> Result<Self, CoreError> {
        if let Some(dir) = env::var_os(HOME_ENV) {
            return Ok(Self::new(PathBuf::from(dir)));
        }
        let home = env::var_os("HOME").map(PathBuf::from).ok_or_else(|| {
            CoreError::NotFound("home directory (set NOEMA_HOME or HOME)".into())
        })?;
        Ok(Self::new(home.join(DEFAULT_DIR)))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn working_dir(&self) -> PathBuf {
        self.root.join("working")
    }

    pub fn tier_dir(&self, tier: MemoryTier) -> PathBuf {
        self.root.join(tier.dir_name())
    }

    pub fn logs_dir(&self) -> PathBuf {
        self.root.join("logs")
    }

    /// The single working-state record.
    pub fn state_file(&self) -> PathBuf {
        self.working_dir().join(STATE_FILE)
    }

    /// Idempotent; safe to call on every operation.
    pub fn ensure_dirs(&self) -> Result<(), CoreError> {
        fs::create_dir_all(self.working_dir())?;
        for tier in MemoryTier::ALL {
            fs::create_dir_all(self.tier_dir(tier))?;
        }
        fs::create_dir_all(self.logs_dir())?;
        Ok(())
    }
}

/// 8-hex-char digest of a directory path, stable per working directory.
pub fn project_hash(path: &Path) -> String {
    let digest = format!("{:x}", Sha256::digest(path.to_string_lossy().as_bytes()));
    digest[..8].to_string()
}

/// Hash of the current working directory, for callers that supply none.
pub fn current_project_hash() -> Result<String, CoreError> {
    Ok(project_hash(&env::current_dir()?))
}
