pub mod articles;
pub mod assets;
