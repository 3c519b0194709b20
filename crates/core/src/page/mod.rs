pub mod classifier;

pub use classifier::{classify, extract_detail, Classification, DETAIL_FALLBACK};
