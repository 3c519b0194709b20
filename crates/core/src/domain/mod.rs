pub mod model;
pub mod severity;
pub mod timeline;
