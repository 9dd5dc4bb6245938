use thiserror::Error;

/// All errors that can occur while reading or calculating volume layouts
#[derive(Debug, Error)]
pub enum Error {
    #[error("Device '{0}' not found or cannot be opened")]
    DeviceNotFound(String),

    #[error("Device sector size {0} is not supported (expected 512, 1024, 2048, or 4096)")]
    UnsupportedSectorSize(u32),

    #[error("Not a valid FAT32 filesystem: {0}")]
    InvalidFAT32(String),

    #[error("Boot sector validation failed: {0}")]
    BootSectorValidation(String),

    #[error("FSInfo sector validation failed: {0}")]
    FSInfoValidation(String),

    #[error("Backup boot sector does not match primary boot sector")]
    BackupMismatch,

    #[error("Invalid geometry: {0}")]
    InvalidGeometry(String),

    #[error("Layout overflow: {0}")]
    LayoutOverflow(String),

    #[error("Layout validation failed: {0}")]
    LayoutValidation(#[from] LayoutViolation),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// A violated layout invariant
///
/// Every variant carries the computed value and the limit that was exceeded
/// so the caller can report a precise diagnostic.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum LayoutViolation {
    #[error("{region} region starts at sector {found}, but the previous region ends at sector {expected}")]
    RegionGapOrOverlap {
        region: &'static str,
        found: u64,
        expected: u64,
    },

    #[error("Data region spans {found} sectors, less than one cluster ({minimum} sectors)")]
    InsufficientClusters { found: u64, minimum: u64 },

    #[error("Layout needs {needed} sectors, but the volume only has {available}")]
    VolumeTooSmall { needed: u64, available: u64 },

    #[error("Data region spans {found} sectors, but the cluster count requires exactly {expected}")]
    ClusterCountMismatch { found: u64, expected: u64 },
}

pub type Result<T> = std::result::Result<T, Error>;
