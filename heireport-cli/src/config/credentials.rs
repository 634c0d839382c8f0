//! Stored session token

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

const CREDENTIALS_FILE: &str = "credentials.toml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Credentials {
    pub token: String,
    pub email: Option<String>,
    /// API the token was issued by
    pub api_url: String,
    pub saved_at: DateTime<Utc>,
}

impl Credentials {
    pub fn new(token: impl Into<String>, email: Option<String>, api_url: &str) -> Self {
        Self {
            token: token.into(),
            email,
            api_url: api_url.to_string(),
            saved_at: Utc::now(),
        }
    }

    pub fn path(dir: &Path) -> PathBuf {
        dir.join(CREDENTIALS_FILE)
    }

    pub fn load(dir: &Path) -> Result<Option<Self>> {
        let path = Self::path(dir);
        if !path.exists() {
            return Ok(None);
        }
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let credentials =
            toml::from_str(&content).with_context(|| format!("Invalid credentials in {}", path.display()))?;
        Ok(Some(credentials))
    }

    /// Write the credentials file, readable by the owner only on unix
    pub fn save(&self, dir: &Path) -> Result<PathBuf> {
        std::fs::create_dir_all(dir).with_context(|| format!("Failed to create {}", dir.display()))?;
        let path = Self::path(dir);
        let content = toml::to_string_pretty(self).context("Failed to serialize credentials")?;
        std::fs::write(&path, content).with_context(|| format!("Failed to write {}", path.display()))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o600))
                .with_context(|| format!("Failed to restrict permissions on {}", path.display()))?;
        }

        Ok(path)
    }

    /// Remove stored credentials; returns whether a file was removed
    pub fn delete(dir: &Path) -> Result<bool> {
        let path = Self::path(dir);
        if !path.exists() {
            return Ok(false);
        }
        std::fs::remove_file(&path).with_context(|| format!("Failed to remove {}", path.display()))?;
        Ok(true)
    }

    /// Token with the middle masked, e.g. `12|a…mnop`
    pub fn masked_token(&self) -> String {
        let chars: Vec<char> = self.token.chars().collect();
        if chars.len() <= 8 {
            return "*".repeat(chars.len());
        }
        let head: String = chars[..4].iter().collect();
        let tail: String = chars[chars.len() - 4..].iter().collect();
        format!("{}…{}", head, tail)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_dir() -> PathBuf {
        std::env::temp_dir().join(format!("heireport-credentials-{}", uuid::Uuid::new_v4()))
    }

    #[test]
    fn test_save_load_delete() {
        let dir = temp_dir();
        assert_eq!(Credentials::load(&dir).unwrap(), None);

        let credentials = Credentials::new("12|abcdefghijklmnop", None, "https://hei.example.gov/api");
        credentials.save(&dir).unwrap();
        assert_eq!(Credentials::load(&dir).unwrap(), Some(credentials));

        assert!(Credentials::delete(&dir).unwrap());
        assert!(!Credentials::delete(&dir).unwrap());
    }

    #[cfg(unix)]
    #[test]
    fn test_file_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let dir = temp_dir();
        let path = Credentials::new("token-value-123", None, "http://localhost")
            .save(&dir)
            .unwrap();
        let mode = std::fs::metadata(path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[test]
    fn test_masked_token() {
        let credentials = Credentials::new("12|abcdefghijklmnop", None, "http://localhost");
        assert_eq!(credentials.masked_token(), "12|a…mnop");
        assert_eq!(Credentials::new("short", None, "x").masked_token(), "*****");
    }
}
