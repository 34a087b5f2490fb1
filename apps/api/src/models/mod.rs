pub mod chunk;
pub mod resume;
