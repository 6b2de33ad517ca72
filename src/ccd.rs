pub mod error;
pub mod record;
pub mod scanner;

use std::{
    io,
    path::{Component, Path, PathBuf},
};

pub use error::*;
pub use record::UserRecord;
use tracing::{instrument, warn};

/// Read-only view over an OpenVPN client config directory.
///
/// Nothing is cached: every call goes back to the filesystem.
#[derive(Debug, Clone)]
pub struct ConfigDir {
    path: PathBuf,
}

impl ConfigDir {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn list_files(&self) -> Result<Vec<String>, CcdError> {
        scanner::list_files(&self.path)
    }

    /// Parses every client in the directory. Clients whose file can't be read are left out.
    #[instrument]
    pub fn list_files_with_records(&self) -> Result<Vec<UserRecord>, CcdError> {
        let names = scanner::list_files(&self.path)?;
        let mut records = Vec::with_capacity(names.len());

        for name in names {
            match record::parse(&name, &self.path.join(&name)) {
                Ok(r) => records.push(r),
                Err(e) => warn!("dropping client {name}: {e}"),
            }
        }

        Ok(records)
    }

    #[instrument]
    pub fn get_record(&self, name: &str) -> Result<UserRecord, CcdError> {
        let path = self.path.join(name);
        if !is_plain_name(name) {
            return Err(CcdError::FileUnreadable {
                path,
                source: io::Error::new(io::ErrorKind::InvalidInput, "invalid client name"),
            });
        }

        record::parse(name, &path)
    }
}

fn is_plain_name(name: &str) -> bool {
    let mut components = Path::new(name).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(c)), None) if c == name
    )
}
