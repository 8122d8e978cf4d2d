//! "AI" caption suggestions: a uniform pick from a fixed list.

use rand::{Rng, seq::SliceRandom};

use crate::render::caption::CaptionPair;

/// Canned `(top, bottom)` caption pairs.
pub const CANNED_CAPTIONS: &[(&str, &str)] = &[
    ("WHEN THE CODE", "COMPILES FIRST TRY"),
    ("DEPLOYING TO PROD", "ON A FRIDAY"),
    ("IT'S NOT A BUG", "IT'S A FEATURE"),
    ("MY CODE DOESN'T WORK", "I HAVE NO IDEA WHY"),
    ("AI WILL TAKE OUR JOBS", "AI CAN'T CENTER A DIV"),
];

pub fn auto_caption<R: Rng + ?Sized>(rng: &mut R) -> CaptionPair {
    let (top, bottom) = CANNED_CAPTIONS
        .choose(rng)
        .copied()
        .unwrap_or(CANNED_CAPTIONS[0]);
    CaptionPair::new(top, bottom)
}
