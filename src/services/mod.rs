pub mod interrupt;
pub mod templates;
