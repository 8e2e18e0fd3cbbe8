//! Executable lookup on the search path.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};

/// Find `cmd` on the `PATH` of the current process.
///
/// On platforms that use `PATHEXT`, every listed extension is tried in turn.
/// Returns `None` when no candidate is an executable regular file.
#[must_use]
pub fn which(cmd: &str) -> Option<PathBuf> {
    let path = std::env::var_os("PATH")?;
    let pathext = std::env::var_os("PATHEXT");
    which_in(cmd, &path, pathext.as_deref())
}

/// Find `cmd` in an explicit search path.
///
/// `path` is split with the platform separator, `pathext` on `;`.
#[must_use]
pub fn which_in(cmd: &str, path: &OsStr, pathext: Option<&OsStr>) -> Option<PathBuf> {
    let extensions: Vec<String> = pathext.map_or_else(
        || vec![String::new()],
        |exts| {
            exts.to_string_lossy()
                .split(';')
                .map(str::to_string)
                .collect()
        },
    );

    std::env::split_paths(path)
        .filter(|dir| !dir.as_os_str().is_empty())
        .flat_map(|dir| {
            extensions
                .iter()
                .map(move |ext| dir.join(format!("{cmd}{ext}")))
        })
        .find(|candidate| is_executable(candidate))
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;

    std::fs::metadata(path)
        .is_ok_and(|meta| !meta.is_dir() && meta.permissions().mode() & 0o111 != 0)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    std::fs::metadata(path).is_ok_and(|meta| meta.is_file())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(unix)]
    fn make_file(dir: &Path, name: &str, mode: u32) -> PathBuf {
        use std::os::unix::fs::PermissionsExt;

        let path = dir.join(name);
        std::fs::write(&path, b"#!/bin/sh\n").expect("write");
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(mode)).expect("chmod");
        path
    }

    #[test]
    fn missing_command_is_none() {
        let dir = tempfile::tempdir().expect("tempdir");
        assert!(which_in("satchel-no-such-tool", dir.path().as_os_str(), None).is_none());
    }

    #[test]
    fn empty_path_is_none() {
        assert!(which_in("sh", OsStr::new(""), None).is_none());
    }

    #[cfg(unix)]
    #[test]
    fn finds_executable_in_second_directory() {
        let first = tempfile::tempdir().expect("tempdir");
        let second = tempfile::tempdir().expect("tempdir");
        let expected = make_file(second.path(), "tool", 0o755);

        let path = std::env::join_paths([first.path(), second.path()]).expect("join");
        assert_eq!(which_in("tool", &path, None), Some(expected));
    }

    #[cfg(unix)]
    #[test]
    fn first_match_wins() {
        let first = tempfile::tempdir().expect("tempdir");
        let second = tempfile::tempdir().expect("tempdir");
        let expected = make_file(first.path(), "tool", 0o755);
        make_file(second.path(), "tool", 0o755);

        let path = std::env::join_paths([first.path(), second.path()]).expect("join");
        assert_eq!(which_in("tool", &path, None), Some(expected));
    }

    #[cfg(unix)]
    #[test]
    fn skips_non_executable_files() {
        let dir = tempfile::tempdir().expect("tempdir");
        make_file(dir.path(), "tool", 0o644);
        assert!(which_in("tool", dir.path().as_os_str(), None).is_none());
    }

    #[test]
    fn skips_directories() {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::create_dir(dir.path().join("tool")).expect("mkdir");
        assert!(which_in("tool", dir.path().as_os_str(), None).is_none());
    }

    #[cfg(unix)]
    #[test]
    fn tries_each_extension() {
        let dir = tempfile::tempdir().expect("tempdir");
        let expected = make_file(dir.path(), "tool.cmd", 0o755);

        let found = which_in(
            "tool",
            dir.path().as_os_str(),
            Some(OsStr::new(".exe;.cmd")),
        );
        assert_eq!(found, Some(expected));
    }
}
