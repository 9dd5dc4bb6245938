use crate::error::{Error, Result};

// ===== Newtype Wrappers for Type Safety =====

/// A cluster ID in a FAT32 filesystem.
///
/// Cluster IDs start at 2 (clusters 0 and 1 are reserved).
/// This newtype prevents accidentally mixing up cluster IDs with sector numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ClusterId(u32);

impl ClusterId {
    /// The first valid data cluster (cluster 2)
    pub const FIRST_DATA_CLUSTER: Self = Self(2);

    /// Create a new ClusterId from a raw value.
    ///
    /// Note: This does not validate that the cluster ID is >= 2.
    /// Use `new_checked` for validation.
    #[inline]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Create a new ClusterId with validation.
    ///
    /// Returns `None` if the cluster ID is less than 2 (reserved).
    #[inline]
    pub const fn new_checked(id: u32) -> Option<Self> {
        if id >= 2 {
            Some(Self(id))
        } else {
            None
        }
    }

    /// Get the raw cluster ID value.
    #[inline]
    pub const fn get(self) -> u32 {
        self.0
    }

    /// Get the cluster index (0-based offset from cluster 2).
    ///
    /// This is what sector-offset calculations work with.
    #[inline]
    pub const fn index(self) -> u32 {
        self.0.saturating_sub(2)
    }
}

impl From<u32> for ClusterId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl From<ClusterId> for u32 {
    fn from(id: ClusterId) -> Self {
        id.0
    }
}

impl std::fmt::Display for ClusterId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "cluster {}", self.0)
    }
}

/// An absolute sector number on a volume.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SectorNum(u64);

impl SectorNum {
    /// Create a new SectorNum from a raw value.
    #[inline]
    pub const fn new(sector: u64) -> Self {
        Self(sector)
    }

    /// Get the raw sector number.
    #[inline]
    pub const fn get(self) -> u64 {
        self.0
    }

    /// Add an offset to this sector number.
    #[inline]
    pub const fn offset(self, offset: u64) -> Self {
        Self(self.0 + offset)
    }

    /// Calculate byte offset from start of device given a sector size.
    #[inline]
    pub const fn to_byte_offset(self, sector_size: u32) -> u64 {
        self.0 * sector_size as u64
    }
}

impl From<u64> for SectorNum {
    fn from(sector: u64) -> Self {
        Self(sector)
    }
}

impl From<SectorNum> for u64 {
    fn from(sector: SectorNum) -> Self {
        sector.0
    }
}

impl std::fmt::Display for SectorNum {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "sector {}", self.0)
    }
}

// ===== FAT32 Structures =====

/// FAT32 Boot Sector / BIOS Parameter Block
///
/// Represents the first sector of a FAT32 filesystem. All multi-byte values
/// are stored in little-endian format. Supports sector sizes of 512, 1024,
/// 2048, or 4096 bytes. Accessors are read-only; this crate never writes
/// back to a volume.
#[derive(Clone)]
pub struct BootSector {
    /// Full sector data (512 to 4096 bytes depending on sector size)
    raw: Vec<u8>,
}

impl BootSector {
    /// Valid boot sector signature value
    pub const VALID_SIGNATURE: u16 = 0xAA55;

    /// Parse a boot sector from raw bytes
    ///
    /// The input must be at least 512 bytes (the minimum sector size).
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < 512 {
            return Err(Error::BootSectorValidation(format!(
                "Boot sector too small: {} bytes",
                bytes.len()
            )));
        }

        Ok(Self {
            raw: bytes.to_vec(),
        })
    }

    // ===== BPB Fields (BIOS Parameter Block) =====

    /// OEM Name (offset 3, 8 bytes)
    pub fn oem_name(&self) -> &[u8] {
        &self.raw[3..11]
    }

    /// Bytes per sector (offset 11, 2 bytes) - typically 512
    pub fn bytes_per_sector(&self) -> u16 {
        u16::from_le_bytes([self.raw[11], self.raw[12]])
    }

    /// Sectors per cluster (offset 13, 1 byte)
    pub fn sectors_per_cluster(&self) -> u8 {
        self.raw[13]
    }

    /// Reserved sector count (offset 14, 2 bytes) - includes boot sector
    pub fn reserved_sectors(&self) -> u16 {
        u16::from_le_bytes([self.raw[14], self.raw[15]])
    }

    /// Number of FAT copies (offset 16, 1 byte) - typically 2
    pub fn num_fats(&self) -> u8 {
        self.raw[16]
    }

    /// Root directory entries for FAT12/16 (offset 17, 2 bytes) - 0 for FAT32
    pub fn root_entry_count(&self) -> u16 {
        u16::from_le_bytes([self.raw[17], self.raw[18]])
    }

    /// Total sectors 16-bit for FAT12/16 (offset 19, 2 bytes) - 0 for FAT32
    pub fn total_sectors_16(&self) -> u16 {
        u16::from_le_bytes([self.raw[19], self.raw[20]])
    }

    /// Media descriptor byte (offset 21, 1 byte) - 0xF8 for hard disks
    pub fn media_type(&self) -> u8 {
        self.raw[21]
    }

    /// Sectors per FAT for FAT12/16 (offset 22, 2 bytes) - 0 for FAT32
    pub fn fat_size_16(&self) -> u16 {
        u16::from_le_bytes([self.raw[22], self.raw[23]])
    }

    /// Total sectors 32-bit (offset 32, 4 bytes)
    pub fn total_sectors_32(&self) -> u32 {
        u32::from_le_bytes([self.raw[32], self.raw[33], self.raw[34], self.raw[35]])
    }

    // ===== FAT32 Extended BPB Fields =====

    /// Sectors per FAT for FAT32 (offset 36, 4 bytes)
    pub fn fat_size_32(&self) -> u32 {
        u32::from_le_bytes([self.raw[36], self.raw[37], self.raw[38], self.raw[39]])
    }

    /// Root directory cluster (offset 44, 4 bytes) - typically 2
    pub fn root_cluster(&self) -> u32 {
        u32::from_le_bytes([self.raw[44], self.raw[45], self.raw[46], self.raw[47]])
    }

    /// FSInfo sector number (offset 48, 2 bytes) - typically 1
    pub fn fs_info_sector(&self) -> u16 {
        u16::from_le_bytes([self.raw[48], self.raw[49]])
    }

    /// Backup boot sector location (offset 50, 2 bytes) - typically 6
    pub fn backup_boot_sector(&self) -> u16 {
        u16::from_le_bytes([self.raw[50], self.raw[51]])
    }

    /// Volume serial number (offset 67, 4 bytes)
    pub fn volume_id(&self) -> u32 {
        u32::from_le_bytes([self.raw[67], self.raw[68], self.raw[69], self.raw[70]])
    }

    /// Volume label (offset 71, 11 bytes)
    pub fn volume_label(&self) -> &[u8] {
        &self.raw[71..82]
    }

    /// File system type string (offset 82, 8 bytes) - "FAT32   "
    pub fn fs_type(&self) -> &[u8] {
        &self.raw[82..90]
    }

    /// Boot signature at end of sector (offset 510, 2 bytes) - must be 0xAA55
    pub fn boot_signature(&self) -> u16 {
        u16::from_le_bytes([self.raw[510], self.raw[511]])
    }

    /// Check if the boot sector signature is valid
    pub fn is_signature_valid(&self) -> bool {
        self.boot_signature() == Self::VALID_SIGNATURE
    }

    // ===== Calculated Values =====

    /// Get total sectors (prefers 32-bit value)
    pub fn total_sectors(&self) -> u32 {
        let total16 = self.total_sectors_16();
        if total16 == 0 {
            self.total_sectors_32()
        } else {
            total16 as u32
        }
    }

    /// Get FAT size in sectors
    pub fn fat_size(&self) -> u32 {
        let fat16 = self.fat_size_16();
        if fat16 == 0 {
            self.fat_size_32()
        } else {
            fat16 as u32
        }
    }

    /// Total data sectors
    pub fn data_sectors(&self) -> u64 {
        let root_dir_sectors =
            (self.root_entry_count() as u64 * 32).div_ceil(self.bytes_per_sector() as u64);

        (self.total_sectors() as u64)
            .saturating_sub(self.reserved_sectors() as u64)
            .saturating_sub(self.num_fats() as u64 * self.fat_size() as u64)
            .saturating_sub(root_dir_sectors)
    }

    /// Total number of data clusters
    pub fn data_clusters(&self) -> u32 {
        if self.sectors_per_cluster() == 0 {
            return 0;
        }
        (self.data_sectors() / self.sectors_per_cluster() as u64) as u32
    }

    /// Bytes per cluster
    pub fn bytes_per_cluster(&self) -> u32 {
        self.bytes_per_sector() as u32 * self.sectors_per_cluster() as u32
    }
}

impl std::fmt::Debug for BootSector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BootSector")
            .field("bytes_per_sector", &self.bytes_per_sector())
            .field("sectors_per_cluster", &self.sectors_per_cluster())
            .field("reserved_sectors", &self.reserved_sectors())
            .field("num_fats", &self.num_fats())
            .field("total_sectors", &self.total_sectors())
            .field("fat_size", &self.fat_size())
            .field("root_cluster", &self.root_cluster())
            .field("fs_info_sector", &self.fs_info_sector())
            .field("backup_boot_sector", &self.backup_boot_sector())
            .field("data_clusters", &self.data_clusters())
            .finish()
    }
}

/// FSInfo Sector structure (FAT32 only)
///
/// Contains hints about free cluster count and next free cluster.
/// Supports sector sizes of 512, 1024, 2048, or 4096 bytes.
#[derive(Clone)]
pub struct FSInfo {
    /// Full sector data (variable size)
    raw: Vec<u8>,
}

impl FSInfo {
    /// Lead signature value (offset 0)
    pub const LEAD_SIG: u32 = 0x41615252;
    /// Structure signature value (offset 484)
    pub const STRUC_SIG: u32 = 0x61417272;
    /// Trail signature value (offset 508)
    pub const TRAIL_SIG: u32 = 0xAA550000;
    /// Unknown free count value
    pub const UNKNOWN_FREE: u32 = 0xFFFFFFFF;

    /// Parse FSInfo from raw bytes
    ///
    /// The input must be at least 512 bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < 512 {
            return Err(Error::FSInfoValidation(format!(
                "FSInfo sector too small: {} bytes",
                bytes.len()
            )));
        }

        Ok(Self {
            raw: bytes.to_vec(),
        })
    }

    /// Lead signature (offset 0, 4 bytes) - must be 0x41615252
    pub fn lead_sig(&self) -> u32 {
        u32::from_le_bytes([self.raw[0], self.raw[1], self.raw[2], self.raw[3]])
    }

    /// Structure signature (offset 484, 4 bytes) - must be 0x61417272
    pub fn struc_sig(&self) -> u32 {
        u32::from_le_bytes([self.raw[484], self.raw[485], self.raw[486], self.raw[487]])
    }

    /// Free cluster count (offset 488, 4 bytes)
    /// 0xFFFFFFFF means unknown
    pub fn free_count(&self) -> u32 {
        u32::from_le_bytes([self.raw[488], self.raw[489], self.raw[490], self.raw[491]])
    }

    /// Next free cluster hint (offset 492, 4 bytes)
    /// 0xFFFFFFFF means unknown
    pub fn next_free(&self) -> u32 {
        u32::from_le_bytes([self.raw[492], self.raw[493], self.raw[494], self.raw[495]])
    }

    /// Trail signature (offset 508, 4 bytes) - must be 0xAA550000
    pub fn trail_sig(&self) -> u32 {
        u32::from_le_bytes([self.raw[508], self.raw[509], self.raw[510], self.raw[511]])
    }
}

impl std::fmt::Debug for FSInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FSInfo")
            .field("lead_sig", &format!("{:#010X}", self.lead_sig()))
            .field("struc_sig", &format!("{:#010X}", self.struc_sig()))
            .field("free_count", &self.free_count())
            .field("next_free", &self.next_free())
            .field("trail_sig", &format!("{:#010X}", self.trail_sig()))
            .finish()
    }
}

/// Media descriptor byte constants
///
/// The historical catalog of media descriptor values. FAT32 volumes on hard
/// disks carry 0xF8; removable media carry 0xF0.
pub mod media {
    /// 8-inch single-sided diskette
    pub const EIGHT_INCH: u8 = 0xE5;
    /// Non-standard custom partition
    pub const NON_STANDARD_CUSTOM: u8 = 0xEE;
    /// Non-standard superfloppy
    pub const NON_STANDARD_SUPERFLOPPY: u8 = 0xEF;
    /// 3.5-inch or other removable media
    pub const REMOVABLE: u8 = 0xF0;
    /// Double density diskette
    pub const DOUBLE_DENSITY: u8 = 0xF4;
    /// Fixed disk, 4-sided
    pub const FIXED_DISK_4_SIDED: u8 = 0xF5;
    /// Fixed disk (the common hard-disk value)
    pub const FIXED_DISK: u8 = 0xF8;
    /// 3.5-inch double-sided diskette
    pub const THREE_INCH_DOUBLE_SIDED: u8 = 0xF9;

    /// Check whether a media descriptor byte is acceptable for FAT32
    /// (0xF0 or 0xF8-0xFF)
    pub fn is_valid(byte: u8) -> bool {
        byte == REMOVABLE || (0xF8..=0xFF).contains(&byte)
    }

    /// Human-readable name for a media descriptor byte
    pub fn describe(byte: u8) -> &'static str {
        match byte {
            EIGHT_INCH => "8-inch diskette",
            0xED => "5.25-inch diskette",
            NON_STANDARD_CUSTOM => "non-standard custom partition",
            NON_STANDARD_SUPERFLOPPY => "non-standard superfloppy",
            REMOVABLE => "removable media",
            DOUBLE_DENSITY => "double density diskette",
            FIXED_DISK_4_SIDED => "fixed disk (4-sided)",
            FIXED_DISK => "fixed disk",
            THREE_INCH_DOUBLE_SIDED => "3.5-inch double-sided diskette",
            0xFA..=0xFF => "legacy diskette",
            _ => "unknown",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cluster_id() {
        assert_eq!(ClusterId::new_checked(0), None);
        assert_eq!(ClusterId::new_checked(1), None);
        assert_eq!(ClusterId::new_checked(2), Some(ClusterId::FIRST_DATA_CLUSTER));
        assert_eq!(ClusterId::new(5).index(), 3);
        assert_eq!(ClusterId::FIRST_DATA_CLUSTER.index(), 0);
    }

    #[test]
    fn test_sector_num() {
        let s = SectorNum::new(60);
        assert_eq!(s.offset(4).get(), 64);
        assert_eq!(s.to_byte_offset(512), 30720);
        assert_eq!(format!("{}", s), "sector 60");
    }

    #[test]
    fn test_media_descriptors() {
        assert!(media::is_valid(media::FIXED_DISK));
        assert!(media::is_valid(media::REMOVABLE));
        assert!(media::is_valid(0xFF));
        assert!(!media::is_valid(0x00));
        assert!(!media::is_valid(media::EIGHT_INCH)); // pre-FAT32 value

        assert_eq!(media::describe(media::FIXED_DISK), "fixed disk");
        assert_eq!(media::describe(0x00), "unknown");
    }

    #[test]
    fn test_boot_sector_parsing() {
        // Create a minimal valid FAT32 boot sector
        let mut data = [0u8; 512];

        // Jump instruction
        data[0] = 0xEB;
        data[1] = 0x58;
        data[2] = 0x90;

        // OEM name
        data[3..11].copy_from_slice(b"MSDOS5.0");

        // Bytes per sector (512)
        data[11..13].copy_from_slice(&512u16.to_le_bytes());

        // Sectors per cluster (8)
        data[13] = 0x08;

        // Reserved sectors (32)
        data[14..16].copy_from_slice(&32u16.to_le_bytes());

        // Number of FATs (2)
        data[16] = 0x02;

        // Media type
        data[21] = media::FIXED_DISK;

        // Total sectors 32 (1000000)
        data[32..36].copy_from_slice(&1_000_000u32.to_le_bytes());

        // FAT size 32 (7813)
        data[36..40].copy_from_slice(&7813u32.to_le_bytes());

        // Root cluster (2)
        data[44..48].copy_from_slice(&2u32.to_le_bytes());

        // FSInfo sector (1)
        data[48] = 0x01;

        // Backup boot sector (6)
        data[50] = 0x06;

        // Boot signature
        data[510] = 0x55;
        data[511] = 0xAA;

        let boot = BootSector::from_bytes(&data).unwrap();

        assert_eq!(boot.oem_name(), b"MSDOS5.0");
        assert_eq!(boot.bytes_per_sector(), 512);
        assert_eq!(boot.sectors_per_cluster(), 8);
        assert_eq!(boot.reserved_sectors(), 32);
        assert_eq!(boot.num_fats(), 2);
        assert_eq!(boot.media_type(), 0xF8);
        assert_eq!(boot.total_sectors(), 1_000_000);
        assert_eq!(boot.fat_size(), 7813);
        assert_eq!(boot.root_cluster(), 2);
        assert_eq!(boot.fs_info_sector(), 1);
        assert_eq!(boot.backup_boot_sector(), 6);
        assert!(boot.is_signature_valid());

        // Derived: (1000000 - 32 - 2*7813) / 8
        assert_eq!(boot.data_sectors(), 1_000_000 - 32 - 2 * 7813);
        assert_eq!(boot.data_clusters(), (1_000_000 - 32 - 2 * 7813) / 8);
        assert_eq!(boot.bytes_per_cluster(), 4096);
    }

    #[test]
    fn test_boot_sector_too_small() {
        let result = BootSector::from_bytes(&[0u8; 100]);
        assert!(matches!(result, Err(Error::BootSectorValidation(_))));
    }

    #[test]
    fn test_fat16_fields_preferred_when_set() {
        let mut data = [0u8; 512];
        data[11..13].copy_from_slice(&512u16.to_le_bytes());
        data[13] = 4;
        // FAT16-style 16-bit totals
        data[19..21].copy_from_slice(&40_000u16.to_le_bytes());
        data[22..24].copy_from_slice(&150u16.to_le_bytes());

        let boot = BootSector::from_bytes(&data).unwrap();
        assert_eq!(boot.total_sectors(), 40_000);
        assert_eq!(boot.fat_size(), 150);
    }

    #[test]
    fn test_fsinfo_parsing() {
        let mut data = [0u8; 512];

        data[0..4].copy_from_slice(&FSInfo::LEAD_SIG.to_le_bytes());
        data[484..488].copy_from_slice(&FSInfo::STRUC_SIG.to_le_bytes());
        data[488..492].copy_from_slice(&12345u32.to_le_bytes());
        data[492..496].copy_from_slice(&100u32.to_le_bytes());
        data[508..512].copy_from_slice(&FSInfo::TRAIL_SIG.to_le_bytes());

        let fsinfo = FSInfo::from_bytes(&data).unwrap();

        assert_eq!(fsinfo.lead_sig(), FSInfo::LEAD_SIG);
        assert_eq!(fsinfo.struc_sig(), FSInfo::STRUC_SIG);
        assert_eq!(fsinfo.free_count(), 12345);
        assert_eq!(fsinfo.next_free(), 100);
        assert_eq!(fsinfo.trail_sig(), FSInfo::TRAIL_SIG);
    }
}
