pub mod cache;
pub mod coin;
pub mod settings;
pub mod sort;
