//! Memeforge: the pixel work behind a meme maker and a sticker maker.
//!
//! - [`Compositor`] draws stroked, centered top/bottom captions over an image.
//! - [`remove_background`] is a magic-wand eraser driven by RGB color distance.
//! - [`synthesize_outline`] describes an eight-direction halo plus contrast
//!   adjustment, rasterized by [`RenderSpec::render`].
//! - [`check_and_consume`] enforces the daily auto-caption budget.
//!
//! [`MemeSession`] and [`StickerSession`] tie these together the way the editing
//! overlays use them.
#![forbid(unsafe_code)]

pub mod assets;
pub mod config;
pub mod effects;
pub mod foundation;
pub mod render;
pub mod tools;

pub use crate::assets::codec::{decode_image, encode_png, load_image_file, save_png};
pub use crate::assets::slot::{ImageSlot, LoadTicket, SlotUpdate};
pub use crate::config::ForgeSettings;
pub use crate::effects::outline::{OutlineSpec, RenderSpec, synthesize_outline};
pub use crate::effects::wand::{EraseMode, EraseReport, remove_background};
pub use crate::foundation::core::{Rgba8, SeedPoint, Tolerance};
pub use crate::foundation::error::{ForgeError, ForgeResult};
pub use crate::foundation::raster::RasterImage;
pub use crate::render::caption::{CaptionPair, CaptionStyle, Compositor};
pub use crate::render::text::CaptionFont;
pub use crate::tools::Export;
pub use crate::tools::meme::MemeSession;
pub use crate::tools::quota::{DailyQuota, QuotaStore, check_and_consume};
pub use crate::tools::sticker::StickerSession;
