pub mod codec;
pub mod slot;
pub mod templates;
