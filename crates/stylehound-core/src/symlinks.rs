//! 符号链接剪枝：去掉链接本身以及位于链接之下的所有路径
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// 剪枝
/// - 用 lstat（不跟随链接）判定每个输入路径是否为符号链接
/// - 输出既不是链接、也不位于任何链接路径之下的路径，保持输入相对顺序
/// - 包含关系按路径分量比较（`Path::starts_with`），`/a/lib` 不会误伤 `/a/library`
/// - lstat 前去掉末尾分隔符，`lib/` 与 `lib` 判定一致
/// - lstat 失败的路径直接丢弃（fail closed）
pub fn prune_symlinked(paths: Vec<PathBuf>) -> Vec<PathBuf> {
    let mut links: Vec<PathBuf> = Vec::new();
    let mut keep: Vec<bool> = Vec::with_capacity(paths.len());

    for p in &paths {
        match std::fs::symlink_metadata(lstat_form(p)) {
            Ok(md) if md.file_type().is_symlink() => {
                debug!(path = %p.display(), "symlink pruned");
                links.push(p.clone());
                keep.push(false);
            }
            Ok(_) => keep.push(true),
            Err(e) => {
                warn!(path = %p.display(), error = %e, "lstat failed, skipping");
                keep.push(false);
            }
        }
    }

    paths
        .into_iter()
        .zip(keep)
        .filter(|(p, k)| *k && !under_any(p, &links))
        .map(|(p, _)| p)
        .collect()
}

/// 按路径分量重建，去掉末尾的 `/` 与 `/.`
/// 末尾带分隔符时 lstat 会跟随最后一级链接，必须先规整
pub(crate) fn lstat_form(path: &Path) -> PathBuf {
    path.components().collect()
}

fn under_any(path: &Path, links: &[PathBuf]) -> bool {
    links.iter().any(|l| path.starts_with(l))
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::fs;
    use std::os::unix::fs::symlink;

    #[test]
    fn drops_links_and_their_descendants_only() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        fs::create_dir(root.join("real")).unwrap();
        fs::write(root.join("real/a.js"), "a\n").unwrap();
        fs::write(root.join("test.js"), "t\n").unwrap();
        symlink(root.join("test.js"), root.join("test_symlink.js")).unwrap();
        symlink(root.join("real"), root.join("linked")).unwrap();

        let input = vec![
            root.join("linked"),
            root.join("linked/a.js"),
            root.join("real"),
            root.join("real/a.js"),
            root.join("test.js"),
            root.join("test_symlink.js"),
        ];
        let out = prune_symlinked(input);
        assert_eq!(out, vec![root.join("real"), root.join("real/a.js"), root.join("test.js")]);
    }

    #[test]
    fn prefix_match_respects_component_boundaries() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        fs::create_dir(root.join("library")).unwrap();
        fs::write(root.join("library/x.js"), "x\n").unwrap();
        symlink(root.join("library"), root.join("lib")).unwrap();

        let out = prune_symlinked(vec![root.join("lib"), root.join("library"), root.join("library/x.js")]);
        assert_eq!(out, vec![root.join("library"), root.join("library/x.js")]);
    }

    #[test]
    fn trailing_separator_does_not_hide_a_link() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        fs::create_dir(root.join("real")).unwrap();
        fs::write(root.join("real/a.js"), "a\n").unwrap();
        symlink(root.join("real"), root.join("lib")).unwrap();

        let slashed = PathBuf::from(format!("{}/lib/", root.display()));
        let out = prune_symlinked(vec![slashed.clone(), slashed.join("a.js"), root.join("lib/./")]);
        assert!(out.is_empty());
        assert_eq!(lstat_form(&slashed), root.join("lib"));
    }

    #[test]
    fn missing_paths_are_dropped() {
        let dir = tempfile::tempdir().unwrap();
        let present = dir.path().join("here.js");
        fs::write(&present, "h\n").unwrap();
        let out = prune_symlinked(vec![dir.path().join("gone.js"), present.clone()]);
        assert_eq!(out, vec![present]);
    }
}
