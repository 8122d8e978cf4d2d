use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
};

use anyhow::Context;

use crate::{
    effects::outline::OutlineSpec,
    foundation::{
        core::{Rgba8, Tolerance},
        error::{ForgeError, ForgeResult},
    },
    render::{caption::CaptionStyle, text::CaptionFont},
};

/// Overrides [`ForgeSettings::font_path`].
pub const ENV_FONT: &str = "MEMEFORGE_FONT";
/// Overrides [`ForgeSettings::quota_path`].
pub const ENV_QUOTA_PATH: &str = "MEMEFORGE_QUOTA_PATH";

/// Top-level settings, loaded from JSON. Every field has a default.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ForgeSettings {
    /// Caption font file. System fonts are searched when unset.
    pub font_path: Option<PathBuf>,
    /// Where the daily auto-caption quota is stored.
    pub quota_path: PathBuf,
    pub meme: MemeSettings,
    pub sticker: StickerSettings,
}

impl Default for ForgeSettings {
    fn default() -> Self {
        Self {
            font_path: None,
            quota_path: PathBuf::from("meme_gen_limit.json"),
            meme: MemeSettings::default(),
            sticker: StickerSettings::default(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct MemeSettings {
    pub daily_limit: u32,
    pub export_name: String,
    pub caption: CaptionStyle,
}

impl Default for MemeSettings {
    fn default() -> Self {
        Self {
            daily_limit: 3,
            export_name: "meme-forge-export.png".to_string(),
            caption: CaptionStyle::default(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct StickerSettings {
    pub tolerance: f64,
    pub outline_width: u32,
    pub contrast_pct: f32,
    pub halo_rgba: Rgba8,
    pub export_name: String,
    /// Integer upscale applied on export.
    pub export_scale: u32,
}

impl Default for StickerSettings {
    fn default() -> Self {
        Self {
            tolerance: 30.0,
            outline_width: 5,
            contrast_pct: 0.0,
            halo_rgba: [255, 255, 255, 255],
            export_name: "custom-sticker.png".to_string(),
            export_scale: 2,
        }
    }
}

impl StickerSettings {
    pub fn tolerance(&self) -> ForgeResult<Tolerance> {
        Tolerance::new(self.tolerance)
    }

    pub fn outline(&self) -> OutlineSpec {
        OutlineSpec {
            width: self.outline_width,
            contrast_pct: self.contrast_pct,
            color: self.halo_rgba,
        }
    }
}

impl ForgeSettings {
    /// Read settings from `path` (or defaults), then apply environment overrides.
    pub fn load(path: Option<&Path>) -> ForgeResult<Self> {
        let mut settings = match path {
            Some(path) => {
                let f = File::open(path)
                    .with_context(|| format!("open settings '{}'", path.display()))?;
                serde_json::from_reader(BufReader::new(f))
                    .with_context(|| format!("parse settings JSON '{}'", path.display()))?
            }
            None => Self::default(),
        };
        settings.apply_env(|key| std::env::var_os(key));
        settings.validate()?;
        Ok(settings)
    }

    /// Apply `MEMEFORGE_*` overrides from `lookup`.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<std::ffi::OsString>) {
        if let Some(font) = lookup(ENV_FONT).filter(|v| !v.is_empty()) {
            self.font_path = Some(PathBuf::from(font));
        }
        if let Some(quota) = lookup(ENV_QUOTA_PATH).filter(|v| !v.is_empty()) {
            self.quota_path = PathBuf::from(quota);
        }
    }

    pub fn validate(&self) -> ForgeResult<()> {
        self.meme.caption.validate()?;
        if self.meme.daily_limit == 0 {
            return Err(ForgeError::validation("meme.daily_limit must be > 0"));
        }
        if self.meme.export_name.trim().is_empty() || self.sticker.export_name.trim().is_empty() {
            return Err(ForgeError::validation("export names must be non-empty"));
        }
        self.sticker.tolerance()?;
        if !self.sticker.contrast_pct.is_finite() {
            return Err(ForgeError::validation("sticker.contrast_pct must be finite"));
        }
        if self.sticker.export_scale == 0 {
            return Err(ForgeError::validation("sticker.export_scale must be > 0"));
        }
        Ok(())
    }

    /// Load the configured caption font, or discover one on the system.
    pub fn caption_font(&self) -> ForgeResult<CaptionFont> {
        match &self.font_path {
            Some(path) => CaptionFont::from_file(path),
            None => CaptionFont::discover(),
        }
    }
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
