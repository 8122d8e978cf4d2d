//! Meme overlay state: one image, two captions, and the daily auto-caption budget.

use chrono::NaiveDate;
use rand::Rng;

use crate::{
    assets::{
        codec::encode_png,
        slot::{ImageSlot, LoadTicket, SlotUpdate},
    },
    config::MemeSettings,
    foundation::{
        error::{ForgeError, ForgeResult},
        raster::RasterImage,
    },
    render::caption::{CaptionPair, Compositor},
    tools::{
        Export,
        autocaption::auto_caption,
        quota::{DailyQuota, QuotaStore, check_and_consume},
    },
};

pub struct MemeSession {
    settings: MemeSettings,
    slot: ImageSlot,
    captions: CaptionPair,
    store: QuotaStore,
    quota: DailyQuota,
}

impl MemeSession {
    /// Open the overlay, reading the quota state once for `today`.
    pub fn open(settings: MemeSettings, store: QuotaStore, today: NaiveDate) -> ForgeResult<Self> {
        let quota = store.open(today, settings.daily_limit)?;
        tracing::debug!(remaining = quota.remaining, "meme session opened");
        Ok(Self {
            settings,
            slot: ImageSlot::new(),
            captions: CaptionPair::default(),
            store,
            quota,
        })
    }

    pub fn slot(&self) -> &ImageSlot {
        &self.slot
    }

    pub fn begin_load(&mut self) -> LoadTicket {
        self.slot.begin_load()
    }

    pub fn complete_load(&mut self, ticket: LoadTicket, bytes: &[u8]) -> SlotUpdate {
        self.slot.complete_bytes(ticket, bytes)
    }

    pub fn set_image(&mut self, image: RasterImage) {
        self.slot.set(image);
    }

    pub fn image(&self) -> Option<&RasterImage> {
        self.slot.image()
    }

    pub fn captions(&self) -> &CaptionPair {
        &self.captions
    }

    pub fn set_captions(&mut self, captions: CaptionPair) {
        self.captions = captions;
    }

    pub fn remaining(&self) -> u32 {
        self.quota.remaining
    }

    /// Spend one credit and replace both captions with a canned pair.
    ///
    /// The new quota is persisted before the captions change. Once the day's
    /// credits are gone this returns [`ForgeError::QuotaExhausted`] and leaves
    /// the captions alone.
    pub fn auto_generate<R: Rng + ?Sized>(
        &mut self,
        today: NaiveDate,
        rng: &mut R,
    ) -> ForgeResult<&CaptionPair> {
        let (allowed, next) = check_and_consume(self.quota, today, self.settings.daily_limit);
        if next != self.quota {
            self.store.save(&next)?;
            self.quota = next;
        }
        if !allowed {
            tracing::info!("auto-caption denied, daily limit reached");
            return Err(ForgeError::QuotaExhausted);
        }
        self.captions = auto_caption(rng);
        tracing::info!(remaining = self.quota.remaining, "auto-caption generated");
        Ok(&self.captions)
    }

    /// Compose the current captions over the loaded image.
    pub fn render(&self, compositor: &mut Compositor) -> ForgeResult<RasterImage> {
        let image = self
            .slot
            .image()
            .ok_or_else(|| ForgeError::empty_buffer("no meme image loaded"))?;
        compositor.compose(image, &self.captions)
    }

    pub fn export(&self, compositor: &mut Compositor) -> ForgeResult<Export> {
        let rendered = self.render(compositor)?;
        Ok(Export {
            file_name: self.settings.export_name.clone(),
            png: encode_png(&rendered)?,
        })
    }

    /// Close the overlay. Loads still in flight are discarded when they land.
    pub fn close(&mut self) {
        self.slot.close();
        self.captions = CaptionPair::default();
    }
}

#[cfg(test)]
#[path = "../../tests/unit/tools/meme.rs"]
mod tests;
