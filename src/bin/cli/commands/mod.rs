pub mod favorites;
pub mod import;
pub mod lists;
pub mod play;
pub mod words;
