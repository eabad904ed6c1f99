use crate::Result;
use core::time::Duration;
use ohno::{IntoAppError, bail};
use std::path::Path;
use std::process::{Output, Stdio};
use tokio::process::Command;
use url::Url;

const LOG_TARGET: &str = "       git";

/// Make a fresh shallow clone of `repo_url` at `dest`.
///
/// Whatever already lives at `dest` is deleted first, then the directory is
/// recreated and the default branch is cloned into it with a depth of one.
pub async fn clone_fresh(repo_url: &Url, dest: &Path, timeout: Duration) -> Result<()> {
    let path_str = dest.to_str().into_app_err("invalid UTF-8 in repository path")?;

    if tokio::fs::try_exists(dest).await.unwrap_or(false) {
        log::debug!(target: LOG_TARGET, "Removing existing directory '{path_str}'");
        tokio::fs::remove_dir_all(dest)
            .await
            .into_app_err_with(|| format!("could not remove existing directory '{path_str}'"))?;
    }

    tokio::fs::create_dir_all(dest)
        .await
        .into_app_err_with(|| format!("could not create directory '{path_str}'"))?;

    log::info!(target: LOG_TARGET, "Cloning repository '{repo_url}'");

    let output = run_git_with_timeout(
        &["clone", "--depth", "1", "--single-branch", "--no-tags", repo_url.as_str(), path_str],
        timeout,
    )
    .await?;

    check_git_output(&output, "git clone")
}

fn check_git_output(output: &Output, operation: &str) -> Result<()> {
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        bail!("{operation} failed: {}", stderr.trim());
    }
    Ok(())
}

async fn run_git_with_timeout(args: &[&str], timeout: Duration) -> Result<Output> {
    let child = Command::new("git")
        .args(args)
        .env("GIT_TERMINAL_PROMPT", "0")
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
        .into_app_err("could not spawn git command")?;

    match tokio::time::timeout(timeout, child.wait_with_output()).await {
        Ok(Ok(output)) => Ok(output),
        Ok(Err(e)) => Err(e).into_app_err_with(|| format!("'git {}' failed to run", args.join(" "))),
        Err(_) => {
            bail!("'git {}' timed out after {} seconds", args.join(" "), timeout.as_secs());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::process::ExitStatus;

    #[cfg(unix)]
    fn status(code: i32) -> ExitStatus {
        use std::os::unix::process::ExitStatusExt;
        ExitStatus::from_raw(code << 8)
    }

    #[cfg(windows)]
    fn status(code: i32) -> ExitStatus {
        use std::os::windows::process::ExitStatusExt;
        ExitStatus::from_raw(code.cast_unsigned())
    }

    #[test]
    fn test_check_git_output_success() {
        let output = Output {
            status: status(0),
            stdout: vec![],
            stderr: vec![],
        };

        check_git_output(&output, "git clone").unwrap();
    }

    #[test]
    fn test_check_git_output_failure_carries_stderr() {
        let output = Output {
            status: status(128),
            stdout: vec![],
            stderr: b"fatal: repository 'https://github.com/nobody/nothing/' not found\n".to_vec(),
        };

        let msg = check_git_output(&output, "git clone").unwrap_err().to_string();
        assert!(msg.contains("git clone failed"));
        assert!(msg.contains("not found"));
    }

    #[tokio::test]
    async fn test_clone_fresh_clears_destination_before_failing() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("checkout");
        std::fs::create_dir_all(dest.join("stale")).unwrap();
        std::fs::write(dest.join("stale").join("file.txt"), "old").unwrap();

        // a local URL that does not exist makes git fail without network access
        let bogus = Url::parse("file:///netscore-test/no-such-repo").unwrap();
        let _ = clone_fresh(&bogus, &dest, Duration::from_secs(30)).await.unwrap_err();

        assert!(!dest.join("stale").exists());
    }
}
