use std::io;
use std::path::{Path, PathBuf};

const VOLUMES_DIR: &str = "/Volumes";

/// Turns scanned paths into the full paths stored in the catalog, re-rooting
/// them under `/Volumes/<root volume>` when a root volume name is given so
/// entries from different machines stay comparable.
#[derive(Debug, Clone)]
pub struct VolumePathResolver {
    volume_dir: Option<PathBuf>,
    working_dir: PathBuf,
}

impl VolumePathResolver {
    pub fn new(root_volume: Option<&str>) -> io::Result<Self> {
        Ok(Self::with_working_dir(root_volume, std::env::current_dir()?))
    }

    pub fn with_working_dir(root_volume: Option<&str>, working_dir: impl Into<PathBuf>) -> Self {
        Self {
            volume_dir: root_volume.map(|name| Path::new(VOLUMES_DIR).join(name)),
            working_dir: working_dir.into(),
        }
    }

    pub fn resolve(&self, path: &Path) -> PathBuf {
        let absolute = if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.working_dir.join(path)
        };

        let Some(volume_dir) = &self.volume_dir else {
            return absolute;
        };
        if absolute.starts_with(VOLUMES_DIR) {
            return absolute;
        }
        match absolute.strip_prefix("/") {
            Ok(relative) => volume_dir.join(relative),
            Err(_) => absolute,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_without_volume_paths_are_only_made_absolute() {
        let resolver = VolumePathResolver::with_working_dir(None, "/work");
        assert_eq!(resolver.resolve(Path::new("/a/b.exr")), PathBuf::from("/a/b.exr"));
        assert_eq!(resolver.resolve(Path::new("b.exr")), PathBuf::from("/work/b.exr"));
    }

    #[test]
    fn test_paths_are_rerooted_under_the_volume() {
        let resolver = VolumePathResolver::with_working_dir(Some("Pikachu"), "/work");
        assert_eq!(
            resolver.resolve(Path::new("/Users/me/shot.0001.exr")),
            PathBuf::from("/Volumes/Pikachu/Users/me/shot.0001.exr")
        );
        assert_eq!(
            resolver.resolve(Path::new("shot.0001.exr")),
            PathBuf::from("/Volumes/Pikachu/work/shot.0001.exr")
        );
    }

    #[test]
    fn test_volume_paths_are_left_alone() {
        let resolver = VolumePathResolver::with_working_dir(Some("Pikachu"), "/work");
        assert_eq!(
            resolver.resolve(Path::new("/Volumes/Raid/shot.0001.exr")),
            PathBuf::from("/Volumes/Raid/shot.0001.exr")
        );
    }
}
