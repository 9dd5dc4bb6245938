use crate::error::LayoutViolation;
use crate::layout::calculator::{GeometryParams, LayoutDescriptor};

/// Cross-check a computed layout against its geometry
///
/// Checks run in a fixed order and short-circuit on the first violation:
///
/// 1. Region ordering: every region starts exactly where the previous one
///    ends (and the reserved region starts at sector 0).
/// 2. Non-degenerate data region: at least one cluster of sectors.
/// 3. Media sufficiency, when `total_sectors` is known: the layout must fit
///    on the volume. Undersized media is the most common real-world failure.
/// 4. Cluster-count consistency: the data region must hold exactly
///    `number_of_clusters` clusters.
pub fn validate(
    desc: &LayoutDescriptor,
    params: &GeometryParams,
) -> Result<(), LayoutViolation> {
    let ordering = [
        ("Reserved", &desc.reserved, 0),
        ("FAT", &desc.fat, desc.reserved.end_sector()),
        ("Root directory", &desc.root_dir, desc.fat.end_sector()),
        ("Data", &desc.data, desc.root_dir.end_sector()),
    ];
    for (region, r, expected) in ordering {
        if r.start_sector != expected {
            return Err(LayoutViolation::RegionGapOrOverlap {
                region,
                found: r.start_sector,
                expected,
            });
        }
    }

    let minimum = params.sectors_per_cluster as u64;
    if desc.data.length_sectors < minimum {
        return Err(LayoutViolation::InsufficientClusters {
            found: desc.data.length_sectors,
            minimum,
        });
    }

    if let Some(available) = params.total_sectors {
        let needed = desc.data.end_sector();
        if needed > available {
            return Err(LayoutViolation::VolumeTooSmall { needed, available });
        }
    }

    let expected = params.number_of_clusters as u64 * params.sectors_per_cluster as u64;
    if desc.data.length_sectors != expected {
        return Err(LayoutViolation::ClusterCountMismatch {
            found: desc.data.length_sectors,
            expected,
        });
    }

    Ok(())
}
