//! Filesystem size and FAT variant selection.
//!
//! The numbers here decide the geometry handed to the formatter, so they are
//! fixed constants rather than options: the same inputs always produce the
//! same volume size.

use serde::{Deserialize, Serialize};
use std::fmt;

pub const KIB: u64 = 1024;
pub const MIB: u64 = 1024 * KIB;

/// Inputs below this total go on FAT12, everything else on FAT16.
pub const FAT12_THRESHOLD: u64 = 20 * MIB;

/// Smallest FAT12 volume we create.
pub const FAT12_MIN_SIZE: u64 = MIB;

/// mkfs.vfat refuses FAT16 volumes much below this.
pub const FAT16_MIN_SIZE: u64 = 33 * MIB;

/// Headroom for boot sector, FATs and directory entries, in percent.
pub const OVERHEAD_PERCENT: u64 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FatVariant {
    Fat12,
    Fat16,
}

impl FatVariant {
    /// FAT entry width, as passed to `mkfs.vfat -F`.
    pub fn bits(self) -> u8 {
        match self {
            FatVariant::Fat12 => 12,
            FatVariant::Fat16 => 16,
        }
    }
}

impl fmt::Display for FatVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FAT{}", self.bits())
    }
}

pub fn select_fat_variant(total_bytes: u64) -> FatVariant {
    if total_bytes < FAT12_THRESHOLD {
        FatVariant::Fat12
    } else {
        FatVariant::Fat16
    }
}

/// Volume size in whole KiB, rounded up.
pub fn compute_filesystem_size_kb(total_bytes: u64, variant: FatVariant) -> u64 {
    let size_bytes = match variant {
        FatVariant::Fat12 => {
            let padded = total_bytes * (100 + OVERHEAD_PERCENT) / 100;
            padded.max(FAT12_MIN_SIZE)
        }
        FatVariant::Fat16 => {
            let overhead = total_bytes * OVERHEAD_PERCENT / 100;
            (total_bytes + overhead).max(FAT16_MIN_SIZE)
        }
    };
    size_bytes.div_ceil(KIB)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SizingDecision {
    pub total_input_bytes: u64,
    pub variant: FatVariant,
    pub size_kb: u64,
}

impl SizingDecision {
    pub fn for_total(total_input_bytes: u64) -> Self {
        let variant = select_fat_variant(total_input_bytes);
        Self {
            total_input_bytes,
            variant,
            size_kb: compute_filesystem_size_kb(total_input_bytes, variant),
        }
    }

    pub fn size_bytes(&self) -> u64 {
        self.size_kb * KIB
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_variant_threshold() {
        assert_eq!(select_fat_variant(0), FatVariant::Fat12);
        assert_eq!(select_fat_variant(4_000_000), FatVariant::Fat12);
        assert_eq!(select_fat_variant(FAT12_THRESHOLD - 1), FatVariant::Fat12);
        assert_eq!(select_fat_variant(FAT12_THRESHOLD), FatVariant::Fat16);
        assert_eq!(select_fat_variant(2 * 1024 * MIB), FatVariant::Fat16);
    }

    #[test]
    fn test_fat12_floor() {
        assert_eq!(compute_filesystem_size_kb(0, FatVariant::Fat12), 1024);
        assert_eq!(compute_filesystem_size_kb(500_000, FatVariant::Fat12), 1024);
    }

    #[test]
    fn test_fat12_overhead_rounds_up() {
        // 4_000_000 * 1.1 = 4_400_000 bytes = 4296.875 KiB
        assert_eq!(compute_filesystem_size_kb(4_000_000, FatVariant::Fat12), 4297);
    }

    #[test]
    fn test_fat16_floor() {
        assert_eq!(compute_filesystem_size_kb(30 * MIB, FatVariant::Fat16), 33792);
        assert_eq!(compute_filesystem_size_kb(20 * MIB, FatVariant::Fat16), 33792);
    }

    #[test]
    fn test_fat16_overhead() {
        assert_eq!(compute_filesystem_size_kb(100 * MIB, FatVariant::Fat16), 112640);
        // 31 MiB + 3.1 MiB is past the floor
        let expected = (31 * MIB + 31 * MIB / 10).div_ceil(KIB);
        assert_eq!(compute_filesystem_size_kb(31 * MIB, FatVariant::Fat16), expected);
    }

    #[test]
    fn test_capacity_always_holds_inputs() {
        let samples = [
            1,
            1023,
            1025,
            MIB + 1,
            FAT12_THRESHOLD - 1,
            FAT12_THRESHOLD,
            40 * MIB + 7,
            700 * MIB + 3,
        ];
        for total in samples {
            let decision = SizingDecision::for_total(total);
            assert!(
                decision.size_bytes() >= total,
                "{} bytes does not fit in {} KiB",
                total,
                decision.size_kb
            );
        }
    }

    #[test]
    fn test_decision_matches_parts() {
        let decision = SizingDecision::for_total(4_000_000);
        assert_eq!(decision.variant, FatVariant::Fat12);
        assert_eq!(decision.size_kb, 4297);
        assert_eq!(decision.size_bytes(), 4297 * 1024);
        assert_eq!(decision.variant.to_string(), "FAT12");
        assert_eq!(FatVariant::Fat16.bits(), 16);
    }
}
