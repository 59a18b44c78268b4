//! Core UMD reader module

pub mod codec;
pub mod cursor;
pub mod document;
pub mod format;
pub mod iter;
pub mod reader;
pub mod types;
mod utils;

pub use document::UmdDocument;
pub use reader::{ParseOutcome, UmdReader};
pub use types::error::{Result, UmdError};
