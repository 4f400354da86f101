pub mod config;
pub mod review;
pub mod segments;
pub mod settings;
