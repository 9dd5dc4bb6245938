pub mod device;
pub mod error;
pub mod fat32;
pub mod layout;
pub mod system;

pub use device::Device;
pub use error::{Error, LayoutViolation, Result};
pub use fat32::{BootSector, ClusterId, FSInfo, SectorNum};
pub use layout::{
    check_volume, compute, inspect_volume, validate, CheckReport, GeometryParams,
    LayoutDescriptor, Region, VolumeReport,
};
pub use system::get_block_device_size;
