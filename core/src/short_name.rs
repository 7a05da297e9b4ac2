//! 8.3 short-name derivation for root directory entries.

use std::collections::BTreeMap;
use std::path::Path;

pub const BASE_LEN: usize = 8;
pub const EXT_LEN: usize = 3;

/// Upper-cases and truncates a file name to `BASE.EXT`.
///
/// The base is the file stem and the extension the last suffix. Inner dots
/// stay in the base, so `archive.tar.gz` becomes `ARCHIVE..GZ`. A name without
/// an extension yields just the base.
///
/// A trailing dot is dropped deliberately rather than kept in the base:
/// `name.` has an empty extension and becomes `NAME`, not `NAME.`, since FAT
/// names cannot end in a dot.
///
/// Distinct inputs may map to the same short name.
pub fn derive_short_name(filename: &str) -> String {
    let path = Path::new(filename);
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let ext = path
        .extension()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();

    let base: String = stem.to_uppercase().chars().take(BASE_LEN).collect();
    let ext: String = ext.to_uppercase().chars().take(EXT_LEN).collect();

    if ext.is_empty() {
        base
    } else {
        format!("{}.{}", base, ext)
    }
}

/// Location of a file in the image's root directory.
pub fn image_path(short_name: &str) -> String {
    format!("/{}", short_name)
}

/// Groups of source names that share a short name, keyed by that short name.
pub fn find_collisions<'a, I>(names: I) -> BTreeMap<String, Vec<String>>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut groups: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for name in names {
        groups
            .entry(derive_short_name(name))
            .or_default()
            .push(name.to_string());
    }
    groups.retain(|_, sources| sources.len() > 1);
    groups
}
