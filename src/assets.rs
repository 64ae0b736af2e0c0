//! Static assets bundled into the binary.
//!
//! `collectstatic` writes these into the static root; the static handler
//! falls back to them when the static root has no copy.

/// (relative path, contents) of every bundled asset
pub const ASSETS: &[(&str, &str)] = &[("base.css", include_str!("../static/base.css"))];

/// Look up a bundled asset by its path relative to `/static/`
pub fn find(path: &str) -> Option<&'static str> {
    ASSETS
        .iter()
        .find(|(name, _)| *name == path)
        .map(|(_, contents)| *contents)
}
