use std::fs;
use std::io;
use std::path::Path;

/// Creates every missing ancestor of `path`'s parent directory.
/// 建立目標檔案所在資料夾的所有缺少祖先目錄。
///
/// Succeeding means the directory is usable for the staging file that will be
/// created next to the target.
pub fn ensure_parent_dir(path: &Path) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}
