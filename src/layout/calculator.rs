use crate::error::{Error, Result};
use crate::fat32::structs::{BootSector, ClusterId, SectorNum};

/// Size of one directory entry in bytes (fixed by the on-disk format)
const DIR_ENTRY_SIZE: u64 = 32;

/// Raw geometry of a FAT volume, the input to the layout calculator
///
/// `number_root_entries` is nonzero only for FAT12/16-style volumes with a
/// fixed root directory region; FAT32 stores the root directory as a cluster
/// chain and uses 0 here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeometryParams {
    /// Bytes per sector, nonzero power of two
    pub bytes_per_sector: u32,
    /// Sectors per cluster, nonzero power of two
    pub sectors_per_cluster: u32,
    /// Number of FAT copies
    pub number_of_fats: u32,
    /// Sectors per FAT copy
    pub sectors_per_fat: u32,
    /// Root directory entries (0 for FAT32)
    pub number_root_entries: u32,
    /// Sectors preceding the first FAT
    pub reserved_sector_count: u32,
    /// Total data clusters
    pub number_of_clusters: u32,
    /// Total sectors available on the media, if known (enables the
    /// volume-size cross-check in the validator)
    pub total_sectors: Option<u64>,
}

impl GeometryParams {
    /// Derive geometry from a parsed boot sector
    ///
    /// The cluster count is derived from the BPB totals the same way a FAT
    /// driver derives it; the declared total sector count becomes the media
    /// cross-check.
    pub fn from_boot_sector(boot: &BootSector) -> Self {
        Self {
            bytes_per_sector: boot.bytes_per_sector() as u32,
            sectors_per_cluster: boot.sectors_per_cluster() as u32,
            number_of_fats: boot.num_fats() as u32,
            sectors_per_fat: boot.fat_size(),
            number_root_entries: boot.root_entry_count() as u32,
            reserved_sector_count: boot.reserved_sectors() as u32,
            number_of_clusters: boot.data_clusters(),
            total_sectors: Some(boot.total_sectors() as u64),
        }
    }

    /// Replace the media-size cross-check with a measured device size
    pub fn with_total_sectors(mut self, total: u64) -> Self {
        self.total_sectors = Some(total);
        self
    }
}

/// A contiguous run of sectors on the volume
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region {
    /// Absolute sector where the region begins
    pub start_sector: u64,
    /// Number of sectors in the region (may be 0)
    pub length_sectors: u64,
}

impl Region {
    /// First sector past the end of the region
    ///
    /// Saturates instead of wrapping so hand-built pathological regions
    /// cannot panic the validator.
    pub const fn end_sector(&self) -> u64 {
        self.start_sector.saturating_add(self.length_sectors)
    }

    pub const fn is_empty(&self) -> bool {
        self.length_sectors == 0
    }
}

impl std::fmt::Display for Region {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "sectors {}..{} ({} sectors)",
            self.start_sector,
            self.end_sector(),
            self.length_sectors
        )
    }
}

/// The computed on-disk layout of a FAT volume
///
/// Regions are contiguous and non-overlapping, in the fixed order
/// Reserved, FAT, Root Directory, Data. A descriptor is derived once from a
/// `GeometryParams` value and never mutated afterwards; recomputation
/// requires fresh params.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutDescriptor {
    /// Boot sector and reserved area
    pub reserved: Region,
    /// All FAT copies, back to back
    pub fat: Region,
    /// Fixed root directory area (zero-length for FAT32)
    pub root_dir: Region,
    /// Cluster-addressed file and directory content
    pub data: Region,
    /// Total data clusters
    pub cluster_count: u32,
    sectors_per_cluster: u64,
}

impl LayoutDescriptor {
    /// Total sectors covered by the layout
    pub fn total_sectors(&self) -> u64 {
        self.data.end_sector()
    }

    /// Map a cluster ID to its first absolute sector
    ///
    /// Returns `None` for the reserved IDs 0 and 1 and for clusters past the
    /// end of the data region.
    pub fn sector_of_cluster(&self, cluster: ClusterId) -> Option<SectorNum> {
        ClusterId::new_checked(cluster.get())?;
        let index = cluster.index() as u64;
        if index >= self.cluster_count as u64 {
            return None;
        }
        Some(SectorNum::new(
            self.data.start_sector + index * self.sectors_per_cluster,
        ))
    }
}

/// Extend the running sector cursor past one more region
fn advance(cursor: u64, length: u64, region: &'static str) -> Result<u64> {
    cursor.checked_add(length).ok_or_else(|| {
        Error::LayoutOverflow(format!(
            "{} region end exceeds the 64-bit sector range",
            region
        ))
    })
}

/// Compute the region layout for the given geometry
///
/// Region boundaries are produced by cumulative summation in the fixed order
/// Reserved, FAT, Root Directory, Data, using exact unsigned 64-bit
/// arithmetic. The only rounding is the ceiling division that turns root
/// directory entries into whole sectors. Pure function: identical inputs
/// always produce identical descriptors.
pub fn compute(params: &GeometryParams) -> Result<LayoutDescriptor> {
    if params.bytes_per_sector == 0 || !params.bytes_per_sector.is_power_of_two() {
        return Err(Error::InvalidGeometry(format!(
            "bytes per sector {} is not a nonzero power of two",
            params.bytes_per_sector
        )));
    }
    if params.sectors_per_cluster == 0 || !params.sectors_per_cluster.is_power_of_two() {
        return Err(Error::InvalidGeometry(format!(
            "sectors per cluster {} is not a nonzero power of two",
            params.sectors_per_cluster
        )));
    }
    if params.number_of_fats == 0 {
        return Err(Error::InvalidGeometry("number of FATs is 0".to_string()));
    }
    if params.sectors_per_fat == 0 {
        return Err(Error::InvalidGeometry("sectors per FAT is 0".to_string()));
    }
    if params.number_of_clusters == 0 {
        return Err(Error::InvalidGeometry("cluster count is 0".to_string()));
    }

    let reserved = Region {
        start_sector: 0,
        length_sectors: params.reserved_sector_count as u64,
    };
    let mut cursor = advance(0, reserved.length_sectors, "Reserved")?;

    // u32 * u32 cannot overflow u64; only the cumulative ends can
    let fat = Region {
        start_sector: cursor,
        length_sectors: params.number_of_fats as u64 * params.sectors_per_fat as u64,
    };
    cursor = advance(cursor, fat.length_sectors, "FAT")?;

    let root_dir = Region {
        start_sector: cursor,
        length_sectors: (params.number_root_entries as u64 * DIR_ENTRY_SIZE)
            .div_ceil(params.bytes_per_sector as u64),
    };
    cursor = advance(cursor, root_dir.length_sectors, "Root directory")?;

    let data = Region {
        start_sector: cursor,
        length_sectors: params.number_of_clusters as u64 * params.sectors_per_cluster as u64,
    };
    advance(cursor, data.length_sectors, "Data")?;

    Ok(LayoutDescriptor {
        reserved,
        fat,
        root_dir,
        data,
        cluster_count: params.number_of_clusters,
        sectors_per_cluster: params.sectors_per_cluster as u64,
    })
}
