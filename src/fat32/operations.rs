use crate::device::Device;
use crate::error::{Error, Result};
use crate::fat32::structs::{BootSector, FSInfo};
use crate::fat32::validation::{validate_boot_sector, validate_fsinfo};

/// Maximum sector size supported by FAT32 (4096 bytes)
const MAX_SECTOR_SIZE: usize = 4096;

/// Valid FAT32 sector sizes
const VALID_SECTOR_SIZES: &[u16] = &[512, 1024, 2048, 4096];

/// Read and parse the boot sector from a device, bootstrapping the sector size
///
/// This reads enough bytes to cover the maximum sector size (4096), then
/// parses the boot sector to determine the actual sector size. The device's
/// sector size is then updated for subsequent operations.
pub fn read_boot_sector(device: &mut Device) -> Result<BootSector> {
    // Read max sector size bytes to ensure we have the complete boot sector
    let data = device.read_bytes_at(0, MAX_SECTOR_SIZE)?;

    // Parse the boot sector (validates minimum 512 bytes)
    let boot = BootSector::from_bytes(&data)?;

    // Validate the sector size is a valid FAT32 size
    let sector_size = boot.bytes_per_sector();
    if !VALID_SECTOR_SIZES.contains(&sector_size) {
        return Err(Error::UnsupportedSectorSize(sector_size as u32));
    }

    // Update device to use the actual sector size
    device.set_sector_size(sector_size as u32);

    // Re-parse with the correct sector size (trimmed to actual size)
    let boot = BootSector::from_bytes(&data[..sector_size as usize])?;
    validate_boot_sector(&boot)?;
    Ok(boot)
}

/// Read and parse the backup boot sector
pub fn read_backup_boot_sector(device: &Device, sector: u16) -> Result<BootSector> {
    let data = device.read_sector(sector as u64)?;
    BootSector::from_bytes(&data)
}

/// Read and parse the FSInfo sector
pub fn read_fsinfo(device: &Device, sector: u16) -> Result<FSInfo> {
    let data = device.read_sector(sector as u64)?;
    let fsinfo = FSInfo::from_bytes(&data)?;
    validate_fsinfo(&fsinfo)?;
    Ok(fsinfo)
}
