//! Merge ordering by the first number in a file name.
//!
//! The key of a file is the first run of decimal digits in its file name,
//! compared as an unbounded non-negative integer. Any Unicode decimal digit
//! counts (`report２.pdf` is 2, `ch٣.pdf` is 3), not only ASCII. Names
//! without digits sort after every name that has one. The sort is stable, so
//! files with equal keys keep the order they were produced in.

use std::cmp::Ordering;
use std::path::{Path, PathBuf};

/// Code point of the zero of every Unicode decimal digit block (Nd).
///
/// Each block holds the ten digits zero to nine at consecutive code points.
const DIGIT_ZEROS: [u32; 66] = [
    0x0030, 0x0660, 0x06F0, 0x07C0, 0x0966, 0x09E6, 0x0A66, 0x0AE6, 0x0B66, 0x0BE6, 0x0C66,
    0x0CE6, 0x0D66, 0x0DE6, 0x0E50, 0x0ED0, 0x0F20, 0x1040, 0x1090, 0x17E0, 0x1810, 0x1946,
    0x19D0, 0x1A80, 0x1A90, 0x1B50, 0x1BB0, 0x1C40, 0x1C50, 0xA620, 0xA8D0, 0xA900, 0xA9D0,
    0xA9F0, 0xAA50, 0xABF0, 0xFF10, 0x104A0, 0x10D30, 0x11066, 0x110F0, 0x11136, 0x111D0,
    0x112F0, 0x11450, 0x114D0, 0x11650, 0x116C0, 0x11730, 0x118E0, 0x11950, 0x11C50, 0x11D50,
    0x11DA0, 0x16A60, 0x16AC0, 0x16B50, 0x1D7CE, 0x1D7D8, 0x1D7E2, 0x1D7EC, 0x1D7F6, 0x1E140,
    0x1E2F0, 0x1E950, 0x1FBF0,
];

/// Sort key for one file name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MergeKey {
    /// ASCII digits of the first number, leading zeros stripped (`"0"` for zero).
    Number(String),
    /// No digit anywhere in the name.
    Unnumbered,
}

impl MergeKey {
    /// Key for a file name.
    ///
    /// ```
    /// use filemorph::merge::order::MergeKey;
    ///
    /// assert_eq!(MergeKey::from_name("report10_v2.pdf"), MergeKey::Number("10".into()));
    /// assert_eq!(MergeKey::from_name("report１２.pdf"), MergeKey::Number("12".into()));
    /// assert_eq!(MergeKey::from_name("cover.pdf"), MergeKey::Unnumbered);
    /// ```
    pub fn from_name(name: &str) -> Self {
        let Some(run) = first_number(name) else {
            return Self::Unnumbered;
        };

        let digits: String = run
            .chars()
            .filter_map(decimal_digit)
            .filter_map(|d| char::from_digit(d, 10))
            .skip_while(|&c| c == '0')
            .collect();

        Self::Number(if digits.is_empty() {
            "0".to_string()
        } else {
            digits
        })
    }

    /// Key for the file name component of a path.
    pub fn from_path(path: &Path) -> Self {
        Self::from_name(&crate::utils::file_name_lossy(path))
    }
}

impl Ord for MergeKey {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            // Without leading zeros, a longer digit string is a larger number.
            (Self::Number(a), Self::Number(b)) => a.len().cmp(&b.len()).then_with(|| a.cmp(b)),
            (Self::Number(_), Self::Unnumbered) => Ordering::Less,
            (Self::Unnumbered, Self::Number(_)) => Ordering::Greater,
            (Self::Unnumbered, Self::Unnumbered) => Ordering::Equal,
        }
    }
}

impl PartialOrd for MergeKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Value of `c` if it is a Unicode decimal digit.
pub fn decimal_digit(c: char) -> Option<u32> {
    let code = c as u32;
    let block = DIGIT_ZEROS.partition_point(|&zero| zero <= code).checked_sub(1)?;
    let value = code - DIGIT_ZEROS[block];
    (value < 10).then_some(value)
}

/// First run of decimal digits in `name`, if any.
pub fn first_number(name: &str) -> Option<&str> {
    let start = name.find(|c| decimal_digit(c).is_some())?;
    let rest = &name[start..];
    let len = rest
        .find(|c| decimal_digit(c).is_none())
        .unwrap_or(rest.len());
    Some(&rest[..len])
}

/// Stable sort of `paths` into merge order.
pub fn sort_for_merge(paths: &mut [PathBuf]) {
    paths.sort_by_cached_key(|path| MergeKey::from_path(path));
}
