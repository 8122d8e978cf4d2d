use std::{path::Path, sync::Arc};

use crate::foundation::error::{ForgeError, ForgeResult};

/// Families tried, in order, when no caption font is configured.
pub const CAPTION_FAMILIES: &[&str] = &[
    "Impact",
    "Anton",
    "Oswald",
    "Arial Black",
    "Liberation Sans",
    "DejaVu Sans",
];

/// Font bytes used for caption glyph outlines.
#[derive(Clone)]
pub struct CaptionFont {
    bytes: Arc<Vec<u8>>,
    index: u32,
    source: String,
}

impl std::fmt::Debug for CaptionFont {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CaptionFont")
            .field("bytes_len", &self.bytes.len())
            .field("index", &self.index)
            .field("source", &self.source)
            .finish()
    }
}

impl CaptionFont {
    pub fn from_bytes(bytes: Vec<u8>, index: u32, source: impl Into<String>) -> ForgeResult<Self> {
        if bytes.is_empty() {
            return Err(ForgeError::validation("font bytes are empty"));
        }
        Ok(Self {
            bytes: Arc::new(bytes),
            index,
            source: source.into(),
        })
    }

    pub fn from_file(path: &Path) -> ForgeResult<Self> {
        let bytes = std::fs::read(path).map_err(|e| {
            ForgeError::validation(format!("read caption font '{}': {e}", path.display()))
        })?;
        Self::from_bytes(bytes, 0, path.display().to_string())
    }

    /// Find a bold, impact-style face among the installed system fonts.
    #[tracing::instrument]
    pub fn discover() -> ForgeResult<Self> {
        use usvg::fontdb;

        let mut db = fontdb::Database::new();
        db.load_system_fonts();

        let families: Vec<fontdb::Family<'_>> = CAPTION_FAMILIES
            .iter()
            .map(|&name| fontdb::Family::Name(name))
            .chain([fontdb::Family::SansSerif])
            .collect();
        let query = fontdb::Query {
            families: &families,
            weight: fontdb::Weight::BOLD,
            stretch: fontdb::Stretch::Normal,
            style: fontdb::Style::Normal,
        };

        let id = db
            .query(&query)
            .or_else(|| {
                db.faces()
                    .find(|f| f.weight.0 >= fontdb::Weight::BOLD.0)
                    .or_else(|| db.faces().next())
                    .map(|f| f.id)
            })
            .ok_or_else(|| ForgeError::validation("no system fonts available for captions"))?;

        let family = db
            .face(id)
            .and_then(|f| f.families.first().map(|(name, _)| name.clone()))
            .unwrap_or_else(|| "unknown".to_string());
        let (bytes, index) = db
            .with_face_data(id, |data, index| (data.to_vec(), index))
            .ok_or_else(|| ForgeError::validation("system font data is unavailable"))?;

        tracing::debug!(%family, "discovered caption font");
        Self::from_bytes(bytes, index, format!("system:{family}"))
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn index(&self) -> u32 {
        self.index
    }

    /// Where the font came from: a path or `system:<family>`.
    pub fn source(&self) -> &str {
        &self.source
    }

    pub(crate) fn font_data(&self) -> vello_cpu::peniko::FontData {
        vello_cpu::peniko::FontData::new(
            vello_cpu::peniko::Blob::from(self.bytes.as_ref().clone()),
            self.index,
        )
    }
}

/// Stateful helper for building single-line Parley layouts from a [`CaptionFont`].
pub struct TextLayoutEngine {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<()>,
    registered: Option<(Arc<Vec<u8>>, String)>,
}

impl Default for TextLayoutEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl TextLayoutEngine {
    pub fn new() -> Self {
        Self {
            font_ctx: parley::FontContext::default(),
            layout_ctx: parley::LayoutContext::new(),
            registered: None,
        }
    }

    /// Family name of the most recently registered font.
    pub fn family_name(&self) -> Option<&str> {
        self.registered.as_ref().map(|(_, name)| name.as_str())
    }

    fn family_for(&mut self, font: &CaptionFont) -> ForgeResult<String> {
        if let Some((bytes, name)) = &self.registered
            && Arc::ptr_eq(bytes, &font.bytes)
        {
            return Ok(name.clone());
        }

        let families = self
            .font_ctx
            .collection
            .register_fonts(parley::fontique::Blob::from(font.bytes.as_ref().clone()), None);
        let family_id = families.first().map(|(id, _)| *id).ok_or_else(|| {
            ForgeError::validation("no font families registered from font bytes")
        })?;

        let family_name = self
            .font_ctx
            .collection
            .family_name(family_id)
            .ok_or_else(|| ForgeError::validation("registered font family has no name"))?
            .to_string();
        self.registered = Some((font.bytes.clone(), family_name.clone()));
        Ok(family_name)
    }

    /// Shape `text` on one line (no wrapping) at `size_px`.
    pub fn layout_line(
        &mut self,
        text: &str,
        font: &CaptionFont,
        size_px: f32,
    ) -> ForgeResult<parley::Layout<()>> {
        if !size_px.is_finite() || size_px <= 0.0 {
            return Err(ForgeError::validation(
                "text size_px must be finite and > 0",
            ));
        }
        let family_name = self.family_for(font)?;

        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(std::borrow::Cow::Owned(family_name)),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(size_px));

        let mut layout: parley::Layout<()> = builder.build(text);
        layout.break_all_lines(None);
        Ok(layout)
    }
}
