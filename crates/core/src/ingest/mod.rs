pub mod fetch;

pub use fetch::{HttpPageFetcher, PageFetcher};
