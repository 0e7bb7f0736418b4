use crate::error::Result;
use crate::io;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// Region
// ---------------------------------------------------------------------------

/// One of the three display targets of the status page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Region {
    Config,
    Queue,
    Display,
}

impl Region {
    pub const ALL: [Region; 3] = [Region::Config, Region::Queue, Region::Display];

    /// Element id on the status page.
    pub fn element_id(self) -> &'static str {
        match self {
            Region::Config => "idCfg",
            Region::Queue => "idQue",
            Region::Display => "idDis",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Region::Config => "config",
            Region::Queue => "queue",
            Region::Display => "display",
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// DisplaySurface
// ---------------------------------------------------------------------------

/// Something the refresh controller can write fragments into.
///
/// Each call replaces the region's content wholesale.
pub trait DisplaySurface {
    fn set_region(&mut self, region: Region, html: String) -> Result<()>;
}

// ---------------------------------------------------------------------------
// MemorySurface
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemorySurface {
    regions: BTreeMap<Region, String>,
    writes: u64,
}

impl MemorySurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, region: Region) -> Option<&str> {
        self.regions.get(&region).map(String::as_str)
    }

    /// Number of region assignments since creation.
    pub fn writes(&self) -> u64 {
        self.writes
    }

    /// Region contents keyed by element id. Unset regions are empty strings.
    pub fn by_element_id(&self) -> BTreeMap<&'static str, String> {
        Region::ALL
            .iter()
            .map(|r| (r.element_id(), self.get(*r).unwrap_or_default().to_string()))
            .collect()
    }
}

impl DisplaySurface for MemorySurface {
    fn set_region(&mut self, region: Region, html: String) -> Result<()> {
        self.regions.insert(region, html);
        self.writes += 1;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// FileSurface
// ---------------------------------------------------------------------------

/// Writes each region to `<dir>/<element id>.html`.
#[derive(Debug, Clone)]
pub struct FileSurface {
    dir: PathBuf,
}

impl FileSurface {
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        io::ensure_dir(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, region: Region) -> PathBuf {
        self.dir.join(format!("{}.html", region.element_id()))
    }
}

impl DisplaySurface for FileSurface {
    fn set_region(&mut self, region: Region, html: String) -> Result<()> {
        io::atomic_write(&self.path_for(region), html.as_bytes())
    }
}
