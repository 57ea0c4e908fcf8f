use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use crate::errors::CoreError;
use crate::models::identity::Identity;

/// Durable store for the single piece of persisted client state: the
/// identity token. One plain-text file, written once per installation.
pub struct IdentityStore {
    path: PathBuf,
}

impl IdentityStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the previously stored token. A missing or blank file means no
    /// identity has been created yet.
    pub fn load(&self) -> Result<Option<Identity>, CoreError> {
        match std::fs::read_to_string(&self.path) {
            Ok(contents) => {
                let token = contents.trim();
                if token.is_empty() {
                    Ok(None)
                } else {
                    Ok(Some(Identity::new(token)))
                }
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Return the stored token, synthesizing one on first run: 32 bytes
    /// from the system's cryptographically secure random source,
    /// hex-encoded to 64 characters, persisted before it is returned.
    pub fn load_or_create(&self) -> Result<Identity, CoreError> {
        if let Some(identity) = self.load()? {
            return Ok(identity);
        }
        let identity = generate_token()?;
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(&self.path, identity.as_str())?;
        Ok(identity)
    }
}

impl std::fmt::Debug for IdentityStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // The token itself is deliberately not printed.
        f.debug_struct("IdentityStore").field("path", &self.path).finish()
    }
}

fn generate_token() -> Result<Identity, CoreError> {
    let mut bytes = [0u8; 32];
    getrandom::getrandom(&mut bytes)
        .map_err(|e| CoreError::Storage(format!("entropy source failed: {e}")))?;
    let mut token = String::with_capacity(bytes.len() * 2);
    for byte in bytes {
        let _ = write!(token, "{byte:02x}");
    }
    Ok(Identity::new(token))
}
