//! The two editing overlays and their supporting state.

pub mod autocaption;
pub mod meme;
pub mod quota;
pub mod sticker;

use std::path::{Path, PathBuf};

use anyhow::Context;

use crate::foundation::error::ForgeResult;

/// A finished PNG offered for download under a fixed file name.
#[derive(Clone, PartialEq, Eq)]
pub struct Export {
    pub file_name: String,
    pub png: Vec<u8>,
}

impl std::fmt::Debug for Export {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Export")
            .field("file_name", &self.file_name)
            .field("png_len", &self.png.len())
            .finish()
    }
}

impl Export {
    /// Write the PNG as `dir/file_name` and return the full path.
    pub fn save_in(&self, dir: &Path) -> ForgeResult<PathBuf> {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("create export dir '{}'", dir.display()))?;
        let path = dir.join(&self.file_name);
        std::fs::write(&path, &self.png)
            .with_context(|| format!("write export '{}'", path.display()))?;
        Ok(path)
    }
}
