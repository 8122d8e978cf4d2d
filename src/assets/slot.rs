use crate::{
    assets::codec::decode_image,
    foundation::{
        error::{ForgeError, ForgeResult},
        raster::RasterImage,
    },
};

/// Handle for one in-flight image load.
///
/// Only the ticket from the most recent [`ImageSlot::begin_load`] is current;
/// closing the slot invalidates every outstanding ticket.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[must_use]
pub struct LoadTicket {
    generation: u64,
}

/// What happened to a completed load.
#[derive(Debug)]
pub enum SlotUpdate {
    /// The decoded image replaced the slot contents.
    Applied,
    /// The ticket was superseded or the slot closed; the result was dropped.
    Stale,
    /// Decoding failed; the previous image, if any, is kept.
    Failed(ForgeError),
}

/// Holds the image an editing overlay works on and guards it against late decodes.
#[derive(Debug, Default)]
pub struct ImageSlot {
    generation: u64,
    pending: Option<u64>,
    image: Option<RasterImage>,
}

impl ImageSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a load. Earlier tickets become stale.
    pub fn begin_load(&mut self) -> LoadTicket {
        self.generation += 1;
        self.pending = Some(self.generation);
        LoadTicket {
            generation: self.generation,
        }
    }

    pub fn is_current(&self, ticket: LoadTicket) -> bool {
        self.pending == Some(ticket.generation)
    }

    /// Deliver a decode result for `ticket`.
    pub fn complete(&mut self, ticket: LoadTicket, result: ForgeResult<RasterImage>) -> SlotUpdate {
        if !self.is_current(ticket) {
            return self.discard(ticket);
        }
        self.pending = None;
        match result {
            Ok(img) => {
                self.image = Some(img);
                SlotUpdate::Applied
            }
            Err(err) => {
                tracing::warn!(error = %err, "image load failed, keeping previous image");
                SlotUpdate::Failed(err)
            }
        }
    }

    /// Decode `bytes` and deliver the result for `ticket`.
    ///
    /// A stale ticket skips decoding entirely.
    pub fn complete_bytes(&mut self, ticket: LoadTicket, bytes: &[u8]) -> SlotUpdate {
        if !self.is_current(ticket) {
            return self.discard(ticket);
        }
        self.complete(ticket, decode_image(bytes))
    }

    fn discard(&self, ticket: LoadTicket) -> SlotUpdate {
        tracing::warn!(
            ticket = ticket.generation,
            current = self.generation,
            "discarding stale image load"
        );
        SlotUpdate::Stale
    }

    /// Load synchronously: begin, decode, complete.
    pub fn load_bytes(&mut self, bytes: &[u8]) -> SlotUpdate {
        let ticket = self.begin_load();
        self.complete_bytes(ticket, bytes)
    }

    /// Put an already decoded image in the slot, superseding pending loads.
    pub fn set(&mut self, img: RasterImage) {
        self.generation += 1;
        self.pending = None;
        self.image = Some(img);
    }

    /// Drop the image and invalidate pending loads.
    pub fn close(&mut self) {
        self.generation += 1;
        self.pending = None;
        self.image = None;
    }

    pub fn image(&self) -> Option<&RasterImage> {
        self.image.as_ref()
    }

    pub fn image_mut(&mut self) -> Option<&mut RasterImage> {
        self.image.as_mut()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/slot.rs"]
mod tests;
