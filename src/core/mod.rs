pub mod emitter;
pub mod engine;
pub mod loader;
pub mod sources;
pub mod template;

pub use crate::domain::model::{Letter, Record};
pub use crate::domain::ports::{ConfigProvider, RecordSource, Storage};
pub use crate::utils::error::Result;
