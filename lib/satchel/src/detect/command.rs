//! Detection through the external `file` utility.

use std::ffi::OsString;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use tracing::debug;

use super::TypeDetector;
use crate::which::{which, which_in};

/// Runs `file --mime -b -` with the contents on standard input.
///
/// Any failure (utility missing, spawn error, non-zero exit, empty output)
/// is reported as "unknown" so the chain moves on.
#[derive(Debug, Clone, Default)]
pub struct FileCommand {
    search_path: Option<OsString>,
}

impl FileCommand {
    /// Look the utility up on the process `PATH`.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Look the utility up in the given search path instead of `PATH`.
    #[must_use]
    pub fn with_search_path(search_path: impl Into<OsString>) -> Self {
        Self {
            search_path: Some(search_path.into()),
        }
    }

    fn locate(&self) -> Option<PathBuf> {
        match &self.search_path {
            Some(path) => {
                let pathext = std::env::var_os("PATHEXT");
                which_in("file", path, pathext.as_deref())
            }
            None => which("file"),
        }
    }
}

impl TypeDetector for FileCommand {
    fn name(&self) -> &'static str {
        "file-command"
    }

    fn detect(&self, path: &Path, contents: &[u8]) -> Option<String> {
        let Some(program) = self.locate() else {
            debug!("`file` utility not found, skipping");
            return None;
        };

        let mut child = match Command::new(&program)
            .args(["--mime", "-b", "-"])
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
        {
            Ok(child) => child,
            Err(error) => {
                debug!(program = %program.display(), %error, "failed to spawn `file`");
                return None;
            }
        };

        let Some(stdin) = child.stdin.take() else {
            debug!(program = %program.display(), "`file` has no stdin pipe");
            let _ = child.kill();
            let _ = child.wait();
            return None;
        };
        let output = std::thread::scope(|scope| {
            scope.spawn(move || {
                let mut stdin = stdin;
                // `file` stops reading once it has seen enough
                let _ = stdin.write_all(contents);
            });
            child.wait_with_output()
        });

        let output = match output {
            Ok(output) if output.status.success() => output,
            Ok(output) => {
                debug!(path = %path.display(), status = %output.status, "`file` exited with failure");
                return None;
            }
            Err(error) => {
                debug!(path = %path.display(), %error, "`file` did not complete");
                return None;
            }
        };

        let mime = String::from_utf8_lossy(&output.stdout).trim().to_string();
        (!mime.is_empty()).then_some(mime)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_utility_is_unknown() {
        let dir = tempfile::tempdir().expect("tempdir");
        let detector = FileCommand::with_search_path(dir.path());
        assert_eq!(detector.detect(Path::new("x.txt"), b"hello"), None);
    }

    #[cfg(unix)]
    #[test]
    fn uses_utility_output() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().expect("tempdir");
        let script = dir.path().join("file");
        std::fs::write(&script, "#!/bin/sh\ncat > /dev/null\necho 'text/x-fake; charset=us-ascii'\n")
            .expect("write");
        std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755))
            .expect("chmod");

        let detector = FileCommand::with_search_path(dir.path());
        assert_eq!(
            detector.detect(Path::new("x.txt"), b"hello"),
            Some("text/x-fake; charset=us-ascii".to_string())
        );
    }

    #[cfg(unix)]
    #[test]
    fn failing_utility_is_unknown() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().expect("tempdir");
        let script = dir.path().join("file");
        std::fs::write(&script, "#!/bin/sh\necho 'text/plain'\nexit 1\n").expect("write");
        std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755))
            .expect("chmod");

        let detector = FileCommand::with_search_path(dir.path());
        assert_eq!(detector.detect(Path::new("x.txt"), b"hello"), None);
    }

    #[cfg(unix)]
    #[test]
    fn utility_ignoring_stdin_still_answers() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().expect("tempdir");
        let script = dir.path().join("file");
        std::fs::write(&script, "#!/bin/sh\necho 'application/x-early'\n").expect("write");
        std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755))
            .expect("chmod");

        let detector = FileCommand::with_search_path(dir.path());
        let contents = vec![b'x'; 1 << 20];
        assert_eq!(
            detector.detect(Path::new("big.bin"), &contents),
            Some("application/x-early".to_string())
        );
    }
}
