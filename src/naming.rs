//! Filename parsing shared by the resolver and the metadata probe.
//!
//! Two conventions matter for a listing:
//!
//! - **Extension**: the text after the last `.`, compared lowercase.
//!   `Dawn.JPG` → stem `Dawn`, extension `jpg`.
//! - **Trailing number**: the run of ASCII digits at the end of a base name,
//!   used by the reverse-numeric sort. `img-10` → `10`, `cover` → none.

use std::cmp::Ordering;

/// Split a filename into `(stem, lowercase extension)`.
///
/// Returns `None` when there is no extension or the stem would be empty:
/// - `"dawn.jpg"` → `Some(("dawn", "jpg"))`
/// - `"archive.tar.GZ"` → `Some(("archive.tar", "gz"))`
/// - `"README"` → `None`
/// - `"trailing."` → `None`
/// - `".jpg"` → `None`
pub fn split_extension(filename: &str) -> Option<(&str, String)> {
    let dot = filename.rfind('.')?;
    let (stem, ext) = (&filename[..dot], &filename[dot + 1..]);
    if stem.is_empty() || ext.is_empty() {
        return None;
    }
    Some((stem, ext.to_ascii_lowercase()))
}

/// The trailing run of ASCII digits of a name, if any.
pub fn trailing_digits(name: &str) -> Option<&str> {
    let start = name
        .char_indices()
        .rev()
        .take_while(|(_, c)| c.is_ascii_digit())
        .last()
        .map(|(i, _)| i)?;
    Some(&name[start..])
}

/// Compare two digit strings by numeric value without parsing.
///
/// Leading zeros are ignored, so arbitrarily long runs never overflow.
pub fn cmp_digit_runs(a: &str, b: &str) -> Ordering {
    let a = a.trim_start_matches('0');
    let b = b.trim_start_matches('0');
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}
