pub mod caption;
pub mod text;
