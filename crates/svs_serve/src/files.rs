use std::path::{Component, Path, PathBuf};

/// Extensions the server is willing to hand out.
pub const ALLOWED_EXTENSIONS: [&str; 6] = ["html", "json", "js", "png", "css", "md"];

/// Tried in order when a directory is requested.
pub const INDEX_FILES: [&str; 2] = ["index.html", "index.htm"];

/// Joins a request path onto `root`, refusing anything that could step out of it.
pub fn safe_join(root: &Path, request_path: &str) -> Option<PathBuf> {
    let mut out = root.to_path_buf();
    for component in Path::new(request_path).components() {
        match component {
            Component::Normal(part) => out.push(part),
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => return None,
        }
    }
    Some(out)
}

pub fn extension_of(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
}

pub fn is_allowed(path: &Path) -> bool {
    extension_of(path).is_some_and(|ext| ALLOWED_EXTENSIONS.contains(&ext.as_str()))
}

pub fn content_type(path: &Path) -> &'static str {
    match extension_of(path).as_deref() {
        Some("html" | "htm") => "text/html; charset=utf-8",
        Some("json") => "application/json",
        Some("js") => "text/javascript; charset=utf-8",
        Some("png") => "image/png",
        Some("css") => "text/css; charset=utf-8",
        Some("md") => "text/markdown; charset=utf-8",
        _ => "application/octet-stream",
    }
}

/// Resolves a request path to the file that should be sent, if any.
///
/// Directories resolve to their index file. Plain paths resolve only when the
/// extension is whitelisted; whether the file exists is left to the reader.
pub async fn resolve(root: &Path, request_path: &str) -> Option<PathBuf> {
    let target = safe_join(root, request_path)?;

    let is_dir = tokio::fs::metadata(&target)
        .await
        .map(|meta| meta.is_dir())
        .unwrap_or(false);
    if is_dir {
        for index in INDEX_FILES {
            let candidate = target.join(index);
            if tokio::fs::metadata(&candidate)
                .await
                .is_ok_and(|meta| meta.is_file())
            {
                return Some(candidate);
            }
        }
        return None;
    }

    is_allowed(&target).then_some(target)
}
