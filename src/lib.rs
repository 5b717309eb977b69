pub mod common;
pub mod processing;
pub mod server;

pub use common::messages::{Image, ImageInfo, Rectangle};
pub use server::{create_app, AppState};
