use crate::device::Device;
use crate::error::{Error, LayoutViolation, Result};
use crate::fat32::{
    boot_sectors_match, media, read_backup_boot_sector, read_boot_sector, read_fsinfo, FSInfo,
};
use crate::layout::calculator::{compute, GeometryParams, LayoutDescriptor};
use crate::layout::validator::validate;

/// Report about a FAT32 volume and its computed region layout
#[derive(Debug)]
pub struct VolumeReport {
    pub device_path: String,
    pub oem_name: String,
    pub volume_label: String,
    pub volume_id: u32,
    pub media_type: u8,
    pub bytes_per_sector: u16,
    pub sectors_per_cluster: u8,
    pub reserved_sectors: u16,
    pub num_fats: u8,
    pub fat_size_sectors: u32,
    pub total_sectors: u32,
    pub root_cluster: u32,
    pub fsinfo_sector: u16,
    pub backup_boot_sector: u16,
    pub free_clusters: u32,
    pub backup_matches: bool,
    pub device_sectors: u64,
    pub layout: LayoutDescriptor,
}

/// Read a FAT32 volume and compute its region layout without modifying it
pub fn inspect_volume(device_path: &str) -> Result<VolumeReport> {
    let mut device = Device::open(device_path)?;
    let boot = read_boot_sector(&mut device)?;

    let backup_sector = boot.backup_boot_sector();
    let backup_boot = read_backup_boot_sector(&device, backup_sector)?;
    let backup_matches = boot_sectors_match(&boot, &backup_boot);

    let fsinfo = read_fsinfo(&device, boot.fs_info_sector())?;

    let params = GeometryParams::from_boot_sector(&boot);
    let layout = compute(&params)?;

    Ok(VolumeReport {
        device_path: device_path.to_string(),
        oem_name: String::from_utf8_lossy(boot.oem_name()).trim_end().to_string(),
        volume_label: String::from_utf8_lossy(boot.volume_label())
            .trim_end()
            .to_string(),
        volume_id: boot.volume_id(),
        media_type: boot.media_type(),
        bytes_per_sector: boot.bytes_per_sector(),
        sectors_per_cluster: boot.sectors_per_cluster(),
        reserved_sectors: boot.reserved_sectors(),
        num_fats: boot.num_fats(),
        fat_size_sectors: boot.fat_size(),
        total_sectors: boot.total_sectors(),
        root_cluster: boot.root_cluster(),
        fsinfo_sector: boot.fs_info_sector(),
        backup_boot_sector: backup_sector,
        free_clusters: fsinfo.free_count(),
        backup_matches,
        device_sectors: device.total_sectors(),
        layout,
    })
}

impl std::fmt::Display for VolumeReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "FAT32 Volume Layout")?;
        writeln!(f, "===================")?;
        writeln!(f, "Device: {}", self.device_path)?;
        writeln!(f)?;
        writeln!(f, "Identity:")?;
        writeln!(f, "  OEM name: {}", self.oem_name)?;
        writeln!(f, "  Volume label: {}", self.volume_label)?;
        writeln!(f, "  Volume serial: {:#010X}", self.volume_id)?;
        writeln!(
            f,
            "  Media type: {:#04X} ({})",
            self.media_type,
            media::describe(self.media_type)
        )?;
        writeln!(f)?;
        writeln!(f, "Geometry:")?;
        writeln!(f, "  Bytes per sector: {}", self.bytes_per_sector)?;
        writeln!(f, "  Sectors per cluster: {}", self.sectors_per_cluster)?;
        writeln!(
            f,
            "  Bytes per cluster: {}",
            self.bytes_per_sector as u32 * self.sectors_per_cluster as u32
        )?;
        writeln!(f, "  Number of FATs: {}", self.num_fats)?;
        writeln!(f, "  FAT size (sectors): {}", self.fat_size_sectors)?;
        writeln!(f)?;
        writeln!(f, "Regions:")?;
        writeln!(f, "  Reserved:       {}", self.layout.reserved)?;
        writeln!(f, "  FAT:            {}", self.layout.fat)?;
        writeln!(f, "  Root directory: {}", self.layout.root_dir)?;
        writeln!(f, "  Data:           {}", self.layout.data)?;
        writeln!(f, "  Data clusters: {}", self.layout.cluster_count)?;
        writeln!(f)?;
        writeln!(f, "Special sectors:")?;
        writeln!(f, "  Root directory cluster: {}", self.root_cluster)?;
        writeln!(f, "  FSInfo sector: {}", self.fsinfo_sector)?;
        writeln!(f, "  Backup boot sector: {}", self.backup_boot_sector)?;
        writeln!(
            f,
            "  Backup matches primary: {}",
            if self.backup_matches { "Yes" } else { "NO" }
        )?;
        writeln!(f)?;
        writeln!(f, "Usage:")?;
        if self.free_clusters == FSInfo::UNKNOWN_FREE {
            writeln!(f, "  Free clusters: Unknown")?;
        } else {
            let free_bytes = self.free_clusters as u64
                * self.bytes_per_sector as u64
                * self.sectors_per_cluster as u64;
            writeln!(
                f,
                "  Free clusters: {} ({} bytes)",
                self.free_clusters, free_bytes
            )?;
        }
        writeln!(f)?;
        writeln!(f, "Size:")?;
        writeln!(f, "  Declared sectors: {}", self.total_sectors)?;
        writeln!(f, "  Device sectors: {}", self.device_sectors)?;
        Ok(())
    }
}

/// Result of a full layout check
#[derive(Debug)]
pub struct CheckReport {
    pub device_path: String,
    /// Total sectors declared in the BPB
    pub declared_sectors: u32,
    /// Sectors actually present on the media
    pub device_sectors: u64,
    pub layout: LayoutDescriptor,
    /// First violated layout invariant, if any
    pub violation: Option<LayoutViolation>,
}

impl CheckReport {
    pub fn is_ok(&self) -> bool {
        self.violation.is_none()
    }
}

impl std::fmt::Display for CheckReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Layout check: {}", self.device_path)?;
        writeln!(
            f,
            "  Declared sectors: {} / on device: {}",
            self.declared_sectors, self.device_sectors
        )?;
        writeln!(
            f,
            "  Layout spans {} sectors in 4 regions",
            self.layout.total_sectors()
        )?;
        match &self.violation {
            None => writeln!(f, "  Result: OK"),
            Some(v) => writeln!(f, "  Result: FAILED - {}", v),
        }
    }
}

/// Check a FAT32 volume's layout end to end
///
/// Performs structural validation (boot sector, FSInfo, backup agreement),
/// then computes the region layout and cross-checks it against the actual
/// media size. Layout violations are reported in the `CheckReport` rather
/// than returned as errors, so callers can print the diagnostic and decide
/// how to proceed.
pub fn check_volume(device_path: &str) -> Result<CheckReport> {
    let mut device = Device::open(device_path)?;
    let boot = read_boot_sector(&mut device)?;

    let backup_boot = read_backup_boot_sector(&device, boot.backup_boot_sector())?;
    if !boot_sectors_match(&boot, &backup_boot) {
        return Err(Error::BackupMismatch);
    }

    read_fsinfo(&device, boot.fs_info_sector())?;

    // Validate against the measured media size, not the declared BPB total:
    // undersized media is exactly the failure this check exists to catch
    let params =
        GeometryParams::from_boot_sector(&boot).with_total_sectors(device.total_sectors());
    let layout = compute(&params)?;
    let violation = validate(&layout, &params).err();

    Ok(CheckReport {
        device_path: device_path.to_string(),
        declared_sectors: boot.total_sectors(),
        device_sectors: device.total_sectors(),
        layout,
        violation,
    })
}
