pub mod core;
pub mod gate;

// Team-based access control
pub mod access;

// Tree view over the object store
pub mod archive;

// Optional components
pub mod logging;

pub use gate::{ArchiveGate, DOWNLOAD_URL_TTL};
