/// Fallback when a filename yields nothing usable.
pub const UNKNOWN_CANDIDATE: &str = "unknown";

/// Derives the candidate name from an uploaded filename.
///
/// Keeps only the final path component (either separator), then strips the
/// last extension. A leading dot is part of the name, not an extension, so
/// `.pdf` stays `.pdf`. No other normalisation: case, spaces, inner dots and
/// non-ASCII characters are preserved.
pub fn derive_candidate_name(filename: &str) -> String {
    let base = filename
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(filename)
        .trim();

    let (stem, _) = split_extension(base);
    if stem.trim().is_empty() {
        UNKNOWN_CANDIDATE.to_string()
    } else {
        stem.to_string()
    }
}

/// Splits `name` into stem and extension at the last dot.
/// Returns no extension for dot-less names and leading-dot names.
pub fn split_extension(name: &str) -> (&str, Option<&str>) {
    match name.rfind('.') {
        Some(idx) if idx > 0 => (&name[..idx], Some(&name[idx + 1..])),
        _ => (name, None),
    }
}
