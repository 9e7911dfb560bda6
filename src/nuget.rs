//! NuGet global-packages cache layout.
//!
//! Restored packages live at `<root>/<id>/<version>/lib/<tfm>/<Assembly>.xml`
//! (or `ref/<tfm>` for reference packs), which is enough to recover package
//! provenance for a documentation file without reading any `.nuspec`.

use crate::model::MemberInfo;
use std::ffi::OsString;
use std::path::{Component, Path, PathBuf};

pub const NUGET_PACKAGES_ENV: &str = "NUGET_PACKAGES";

/// The global-packages folder: `$NUGET_PACKAGES`, else `~/.nuget/packages`.
pub fn global_packages_dir() -> Option<PathBuf> {
    resolve_packages_dir(std::env::var_os(NUGET_PACKAGES_ENV), dirs::home_dir())
}

fn resolve_packages_dir(env: Option<OsString>, home: Option<PathBuf>) -> Option<PathBuf> {
    match env {
        Some(dir) if !dir.is_empty() => Some(PathBuf::from(dir)),
        _ => home.map(|home| home.join(".nuget").join("packages")),
    }
}

/// Package identity inferred from where a documentation file sits in the cache.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageLocation {
    pub package_id: String,
    pub version: String,
    pub target_framework: String,
}

impl PackageLocation {
    /// `None` unless the path ends in `<id>/<version>/(lib|ref)/<tfm>/<file>`.
    pub fn from_path(path: &Path) -> Option<Self> {
        let parts: Vec<&str> = path
            .components()
            .filter_map(|c| match c {
                Component::Normal(part) => part.to_str(),
                _ => None,
            })
            .collect();

        let [.., id, version, folder, tfm, _file] = parts.as_slice() else {
            return None;
        };
        if !(folder.eq_ignore_ascii_case("lib") || folder.eq_ignore_ascii_case("ref")) {
            return None;
        }

        Some(Self {
            package_id: (*id).to_string(),
            version: (*version).to_string(),
            target_framework: tfm.to_ascii_lowercase(),
        })
    }

    /// Stamp package provenance onto a member parsed from `path`.
    pub fn annotate(member: &mut MemberInfo, path: &Path) {
        member.source_file_path = Some(path.display().to_string());
        member.is_from_nuget_cache = is_in_nuget_cache(path);
        if let Some(location) = Self::from_path(path) {
            member.package_id = Some(location.package_id);
            member.package_version = Some(location.version);
            member.target_framework = Some(location.target_framework);
        }
    }
}

/// Whether `path` lies inside the global-packages folder.
pub fn is_in_nuget_cache(path: &Path) -> bool {
    is_under_packages_root(path, global_packages_dir().as_deref())
}

fn is_under_packages_root(path: &Path, root: Option<&Path>) -> bool {
    if root.is_some_and(|root| path.starts_with(root)) {
        return true;
    }
    // Caches copied between machines keep the `.nuget/packages` shape.
    let mut components = path.components().map(|c| c.as_os_str());
    while let Some(part) = components.next() {
        if part == ".nuget" {
            return components.next().is_some_and(|next| next == "packages");
        }
    }
    false
}
