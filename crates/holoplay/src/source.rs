//! Source path resolution.

use std::path::{Path, PathBuf};

use holoplay_shared::Platform;

/// Resolves what the host passed to `open` into what the engine opens.
///
/// - URLs pass through.
/// - On Android every name passes through; the engine hands bare names to the
///   platform asset manager.
/// - Elsewhere rooted paths pass through and bare names resolve against the
///   bundled assets directory.
#[must_use]
pub fn resolve_source_path(source: &str, platform: Platform, assets_dir: &Path) -> PathBuf {
    if source.contains("://") || platform == Platform::Android {
        return PathBuf::from(source);
    }
    let path = Path::new(source);
    if path.has_root() {
        path.to_path_buf()
    } else {
        assets_dir.join(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_name_joins_assets_dir() {
        let p = resolve_source_path("clip.mp4", Platform::Desktop, Path::new("/game/assets"));
        assert_eq!(p, PathBuf::from("/game/assets/clip.mp4"));
    }

    #[test]
    fn test_rooted_path_is_kept() {
        let p = resolve_source_path("/data/clip.mp4", Platform::Desktop, Path::new("assets"));
        assert_eq!(p, PathBuf::from("/data/clip.mp4"));
    }

    #[test]
    fn test_android_passes_bare_names_through() {
        let p = resolve_source_path("clip.mp4", Platform::Android, Path::new("assets"));
        assert_eq!(p, PathBuf::from("clip.mp4"));
    }

    #[test]
    fn test_urls_pass_through() {
        let url = "https://cdn.example.com/clip.mp4";
        let p = resolve_source_path(url, Platform::Desktop, Path::new("assets"));
        assert_eq!(p, PathBuf::from(url));
    }
}
