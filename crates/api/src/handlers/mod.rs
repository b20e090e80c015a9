pub mod auth;
pub mod gallery;
pub mod generate;
pub mod styles;
