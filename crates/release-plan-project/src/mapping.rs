use std::path::{Path, PathBuf};

struct LocatedPackage {
    name: String,
    path: PathBuf,
    depth: usize,
}

/// Attributes files to the most deeply nested package directory containing them.
pub struct PackageLocator {
    packages: Vec<LocatedPackage>,
}

impl PackageLocator {
    pub fn new<'a>(packages: impl IntoIterator<Item = (&'a str, &'a Path)>) -> Self {
        let mut packages: Vec<LocatedPackage> = packages
            .into_iter()
            .map(|(name, path)| LocatedPackage {
                name: name.to_string(),
                path: path.to_path_buf(),
                depth: path.components().count(),
            })
            .collect();

        packages.sort_by(|a, b| b.depth.cmp(&a.depth));

        Self { packages }
    }

    /// `file` must be absolute.
    #[must_use]
    pub fn owner_of(&self, file: &Path) -> Option<&str> {
        self.packages
            .iter()
            .find(|pkg| file.starts_with(&pkg.path))
            .map(|pkg| pkg.name.as_str())
    }
}
