use crate::error::{Error, Result};
use std::fs::File;
use std::os::unix::fs::FileExt;
use std::path::{Path, PathBuf};

use crate::system::get_block_device_size;

/// Read-only wrapper around a block device or image file for sector-based I/O
pub struct Device {
    file: File,
    path: PathBuf,
    sector_size: u32,
    total_sectors: u64,
}

impl std::fmt::Debug for Device {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Device")
            .field("path", &self.path)
            .field("sector_size", &self.sector_size)
            .field("total_sectors", &self.total_sectors)
            .finish_non_exhaustive()
    }
}

impl Device {
    /// Open a device or image file for read-only access
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path_buf = path.as_ref().to_path_buf();
        let path_display = path_buf.display().to_string();

        let file = File::open(&path_buf).map_err(|_| Error::DeviceNotFound(path_display))?;

        let metadata = file.metadata()?;
        let size = if metadata.is_file() {
            // Regular file (image)
            metadata.len()
        } else {
            // Block device - ask the kernel for its size
            get_block_device_size(&path_buf)?
        };

        // Default to 512-byte sectors (most common)
        // Updated after the boot sector has been read
        let sector_size = 512u32;
        let total_sectors = size / sector_size as u64;

        Ok(Self {
            file,
            path: path_buf,
            sector_size,
            total_sectors,
        })
    }

    /// Get the device path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Get the sector size in bytes
    pub fn sector_size(&self) -> u32 {
        self.sector_size
    }

    /// Update sector size (called after reading the boot sector)
    pub fn set_sector_size(&mut self, size: u32) {
        self.sector_size = size;
        // Recalculate total sectors with new size
        if let Ok(file_size) = self.size_bytes() {
            self.total_sectors = file_size / size as u64;
        }
    }

    /// Get total number of sectors
    pub fn total_sectors(&self) -> u64 {
        self.total_sectors
    }

    /// Get total device size in bytes
    pub fn size_bytes(&self) -> Result<u64> {
        let metadata = self.file.metadata()?;
        if metadata.is_file() {
            Ok(metadata.len())
        } else {
            get_block_device_size(&self.path)
        }
    }

    /// Read sectors starting at the given sector number
    pub fn read_sectors(&self, start_sector: u64, count: u32) -> Result<Vec<u8>> {
        let offset = start_sector * self.sector_size as u64;
        let size = count as usize * self.sector_size as usize;
        let mut buffer = vec![0u8; size];

        self.file.read_exact_at(&mut buffer, offset)?;
        Ok(buffer)
    }

    /// Read a single sector
    pub fn read_sector(&self, sector: u64) -> Result<Vec<u8>> {
        self.read_sectors(sector, 1)
    }

    /// Read raw bytes from a byte offset (used for bootstrapping before sector size is known)
    pub fn read_bytes_at(&self, offset: u64, size: usize) -> Result<Vec<u8>> {
        let mut buffer = vec![0u8; size];
        self.file.read_exact_at(&mut buffer, offset)?;
        Ok(buffer)
    }
}
