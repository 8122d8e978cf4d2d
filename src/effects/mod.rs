pub mod composite;
pub mod outline;
pub mod wand;
