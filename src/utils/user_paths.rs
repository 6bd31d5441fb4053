use std::path::{Path, PathBuf};

fn home_dir() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|home| home.trim().to_string())
        .filter(|home| !home.is_empty())
        .map(PathBuf::from)
}

/// Expands a leading `~` or `~/` against `$HOME`. Anything else is returned
/// untouched, including `~user/...` forms.
pub fn expand_home_path(path: impl AsRef<Path>) -> PathBuf {
    let path = path.as_ref();
    if let Some(str_path) = path.to_str() {
        if str_path == "~" {
            if let Some(home) = home_dir() {
                return home;
            }
        }
        if let Some(rest) = str_path.strip_prefix("~/") {
            if let Some(home) = home_dir() {
                return home.join(rest);
            }
        }
    }
    path.to_path_buf()
}

/// Final path component used as the multipart filename.
pub fn upload_file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned())
}
