pub mod client;
pub mod config;
pub mod error;
pub mod io;
pub mod refresh;
pub mod render;
pub mod surface;
pub mod types;

pub use client::{DeviceSource, HttpSource};
pub use error::{RdmError, Result};
pub use refresh::{Fragments, RefreshController, RefreshReport, Snapshot, Step};
pub use surface::{DisplaySurface, FileSurface, MemorySurface, Region};
