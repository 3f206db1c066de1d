//! crates/relay_core/src/naming.rs
//!
//! Server-side names for stored uploads: `{unix_millis}-{6 base-36 chars}{.ext}`.

use chrono::Utc;
use rand::Rng;
use std::path::Path;

/// Largest accepted upload, in bytes (50 MiB).
pub const MAX_UPLOAD_BYTES: u64 = 50 * 1024 * 1024;

const SUFFIX_LEN: usize = 6;
const BASE36: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Generates a fresh name for a file whose client-side name was `original_name`.
pub fn generate_name(original_name: &str) -> String {
    generate_name_at(original_name, Utc::now().timestamp_millis())
}

/// Same as [`generate_name`] with an explicit timestamp.
pub fn generate_name_at(original_name: &str, unix_millis: i64) -> String {
    format!("{}-{}{}", unix_millis, random_suffix(), extension_of(original_name))
}

fn random_suffix() -> String {
    let mut rng = rand::thread_rng();
    (0..SUFFIX_LEN)
        .map(|_| BASE36[rng.gen_range(0..BASE36.len())] as char)
        .collect()
}

/// Returns `.ext` for the original filename, or an empty string.
///
/// Only ASCII alphanumeric extensions survive; anything else could smuggle
/// separators or control characters into the stored name.
pub fn extension_of(original_name: &str) -> String {
    Path::new(original_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .filter(|ext| !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric()))
        .map(|ext| format!(".{ext}"))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn name_has_timestamp_suffix_and_extension() {
        let name = generate_name_at("holiday photo.JPG", 1_700_000_000_123);
        let (stamp, rest) = name.split_once('-').unwrap();
        assert_eq!(stamp, "1700000000123");
        assert_eq!(rest.len(), SUFFIX_LEN + ".JPG".len());
        assert!(rest.ends_with(".JPG"));
        assert!(rest[..SUFFIX_LEN]
            .chars()
            .all(|c| c.is_ascii_digit() || c.is_ascii_lowercase()));
    }

    #[test]
    fn extension_comes_from_filename_only() {
        assert_eq!(extension_of("report.pdf"), ".pdf");
        assert_eq!(extension_of("archive.tar.gz"), ".gz");
        assert_eq!(extension_of("README"), "");
        assert_eq!(extension_of(".bashrc"), "");
        assert_eq!(extension_of("trailing."), "");
    }

    #[test]
    fn hostile_extensions_are_dropped() {
        assert_eq!(extension_of("evil.p\u{0}hp"), "");
        assert_eq!(extension_of("x.a b"), "");
        assert_eq!(extension_of("../../etc/passwd"), "");
        let name = generate_name_at("a.sh;rm", 1);
        assert!(!name.contains(';'));
    }

    #[test]
    fn upload_ceiling_is_fifty_mebibytes() {
        assert_eq!(MAX_UPLOAD_BYTES, 52_428_800);
    }

    #[test]
    fn sequential_names_do_not_collide() {
        let names: HashSet<String> = (0..10_000).map(|_| generate_name("same.txt")).collect();
        assert_eq!(names.len(), 10_000);
    }
}
