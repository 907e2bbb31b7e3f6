pub mod loader;

pub use loader::{DatasetLoadError, DatasetLoader};
