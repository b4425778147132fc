use std::{
    fs,
    path::{Path, PathBuf},
};

use tracing::info;

use crate::core::error::Result;

/// Request/response documents stored as `{action}_request.xml` and `{action}_response.xml`.
#[derive(Debug, Clone)]
pub struct Fixtures {
    directory: PathBuf,
}

impl Fixtures {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self { directory: directory.into() }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    pub fn request_path(&self, action: &str) -> PathBuf {
        self.directory.join(format!("{action}_request.xml"))
    }

    pub fn response_path(&self, action: &str) -> PathBuf {
        self.directory.join(format!("{action}_response.xml"))
    }

    pub fn load_request(&self, action: &str) -> Result<String> {
        Ok(fs::read_to_string(self.request_path(action))?)
    }

    pub fn load_response(&self, action: &str) -> Result<String> {
        Ok(fs::read_to_string(self.response_path(action))?)
    }

    pub fn save_response(&self, action: &str, xml: &str) -> Result<PathBuf> {
        let path = self.response_path(action);
        fs::create_dir_all(&self.directory)?;
        fs::write(&path, xml)?;
        info!(path=%path.display(), "saved response");
        Ok(path)
    }
}
