//! # Project File I/O
//!
//! `.qto` project files are JSON, written atomically (temp file, fsync,
//! rename) so an interrupted save never corrupts the previous state on disk.
//! Advisory locking with a `.qto.lock` metadata sidecar keeps two surveyors
//! on a shared drive from silently overwriting each other; locks left behind
//! by dead processes are detected and taken over.
//!
//! ## Example
//!
//! ```rust,no_run
//! use takeoff_core::file_io::{save_project, load_project, FileLock};
//! use takeoff_core::project::Project;
//! use std::path::Path;
//!
//! let project = Project::new("Surveyor", "25-001", "Client");
//! let path = Path::new("myproject.qto");
//!
//! let lock = FileLock::acquire(path, "surveyor@company.com").unwrap();
//! save_project(&project, path).unwrap();
//! drop(lock); // releases the lock and removes the sidecar
//! ```

use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Duration, Utc};
use fs2::FileExt;
use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};
use crate::project::{Project, SCHEMA_VERSION};

/// Locks older than this are treated as abandoned regardless of their pid
const LOCK_MAX_AGE_HOURS: i64 = 24;

fn io_err(operation: &str, path: &Path, err: impl std::fmt::Display) -> CalcError {
    CalcError::file_error(operation, path.display().to_string(), err.to_string())
}

fn ser_err(err: impl std::fmt::Display) -> CalcError {
    CalcError::SerializationError {
        reason: err.to_string(),
    }
}

fn hostname() -> String {
    #[cfg(windows)]
    let name = std::env::var("COMPUTERNAME").ok();
    #[cfg(not(windows))]
    let name = std::env::var("HOSTNAME")
        .ok()
        .or_else(|| std::env::var("HOST").ok());
    name.unwrap_or_else(|| "unknown".to_string())
}

fn process_alive(pid: u32) -> bool {
    #[cfg(unix)]
    {
        fs::metadata(format!("/proc/{pid}")).is_ok()
    }
    #[cfg(windows)]
    {
        use std::process::Command;
        match Command::new("tasklist")
            .args(["/FI", &format!("PID eq {pid}"), "/NH"])
            .output()
        {
            Ok(out) => String::from_utf8_lossy(&out.stdout).contains(&pid.to_string()),
            // Cannot tell; assume alive rather than stealing a live lock
            Err(_) => true,
        }
    }
    #[cfg(not(any(unix, windows)))]
    {
        let _ = pid;
        true
    }
}

/// Who holds a project file lock, stored as JSON in the `.qto.lock` sidecar.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LockInfo {
    /// User identifier (email or username)
    pub user_id: String,
    /// Machine name where the lock was acquired
    pub machine: String,
    /// Process that holds the lock
    pub pid: u32,
    pub locked_at: DateTime<Utc>,
}

impl LockInfo {
    fn for_current_process(user_id: impl Into<String>) -> Self {
        LockInfo {
            user_id: user_id.into(),
            machine: hostname(),
            pid: std::process::id(),
            locked_at: Utc::now(),
        }
    }

    /// A lock is stale when its process is gone (checkable only on the same
    /// machine) or when it has outlived the maximum age.
    fn is_stale(&self) -> bool {
        if self.machine == hostname() && !process_alive(self.pid) {
            return true;
        }
        Utc::now() - self.locked_at > Duration::hours(LOCK_MAX_AGE_HOURS)
    }
}

/// Sidecar lock path: `project.qto` → `project.qto.lock`
fn sidecar_path_for(project_path: &Path) -> PathBuf {
    let mut sidecar = project_path.to_path_buf();
    match sidecar.extension() {
        Some(ext) => {
            let ext = format!("{}.lock", ext.to_string_lossy());
            sidecar.set_extension(ext);
        }
        None => {
            sidecar.set_extension("lock");
        }
    }
    sidecar
}

fn read_lock_info(sidecar: &Path) -> Option<LockInfo> {
    let contents = fs::read_to_string(sidecar).ok()?;
    serde_json::from_str(&contents).ok()
}

/// Guard over an exclusive project-file lock; released on drop.
///
/// Two mechanisms back each other: an OS-level advisory lock (via `fs2`)
/// for process safety, and the JSON sidecar so other users can see who
/// holds the file and since when.
pub struct FileLock {
    project_path: PathBuf,
    sidecar_path: PathBuf,
    /// Keeps the OS lock alive for the guard's lifetime
    _lock_file: File,
    pub info: LockInfo,
}

impl FileLock {
    /// Acquire an exclusive lock on a project file.
    ///
    /// Fails with [`CalcError::FileLocked`] when another live process holds
    /// the lock; a stale sidecar (dead pid or past the age limit) is taken
    /// over silently.
    pub fn acquire(path: &Path, user_id: impl Into<String>) -> CalcResult<Self> {
        let sidecar = sidecar_path_for(path);

        if let Some(holder) = read_lock_info(&sidecar) {
            if !holder.is_stale() {
                return Err(CalcError::file_locked(
                    path.display().to_string(),
                    format!("{} ({})", holder.user_id, holder.machine),
                    holder.locked_at.to_rfc3339(),
                ));
            }
        }

        let mut lock_file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(true)
            .open(&sidecar)
            .map_err(|e| io_err("create lock", &sidecar, e))?;

        lock_file.try_lock_exclusive().map_err(|_| {
            CalcError::file_locked(
                path.display().to_string(),
                "another process".to_string(),
                "unknown".to_string(),
            )
        })?;

        let info = LockInfo::for_current_process(user_id);
        let json = serde_json::to_string_pretty(&info).map_err(ser_err)?;
        lock_file
            .write_all(json.as_bytes())
            .and_then(|_| lock_file.sync_all())
            .map_err(|e| io_err("write lock", &sidecar, e))?;

        Ok(FileLock {
            project_path: path.to_path_buf(),
            sidecar_path: sidecar,
            _lock_file: lock_file,
            info,
        })
    }

    /// Report who holds a file's lock without acquiring it; `None` when the
    /// file is available.
    pub fn check(path: &Path) -> Option<LockInfo> {
        read_lock_info(&sidecar_path_for(path)).filter(|info| !info.is_stale())
    }

    pub fn project_path(&self) -> &Path {
        &self.project_path
    }
}

impl Drop for FileLock {
    fn drop(&mut self) {
        // The OS lock releases with the file handle; the sidecar we remove
        let _ = fs::remove_file(&self.sidecar_path);
    }
}

/// Save a project atomically: serialize, write a `.qto.tmp` sibling, fsync,
/// rename over the target. An interrupted save leaves the previous file
/// intact.
pub fn save_project(project: &Project, path: &Path) -> CalcResult<()> {
    let json = serde_json::to_string_pretty(project).map_err(ser_err)?;
    let tmp_path = path.with_extension("qto.tmp");

    let mut tmp = File::create(&tmp_path).map_err(|e| io_err("create temp file", &tmp_path, e))?;
    tmp.write_all(json.as_bytes())
        .and_then(|_| tmp.sync_all())
        .map_err(|e| io_err("write temp file", &tmp_path, e))?;
    drop(tmp);

    fs::rename(&tmp_path, path).map_err(|e| {
        let _ = fs::remove_file(&tmp_path);
        io_err("rename temp file", path, e)
    })
}

/// Load a project file, validating its schema version.
pub fn load_project(path: &Path) -> CalcResult<Project> {
    let contents = fs::read_to_string(path).map_err(|e| io_err("read", path, e))?;
    let project: Project = serde_json::from_str(&contents)
        .map_err(|e| ser_err(format!("invalid JSON in {}: {e}", path.display())))?;
    validate_version(&project.meta.version)?;
    Ok(project)
}

/// Load a project together with its current lock holder, if any, so callers
/// can open locked files read-only instead of refusing them.
pub fn load_project_with_lock_check(path: &Path) -> CalcResult<(Project, Option<LockInfo>)> {
    let project = load_project(path)?;
    Ok((project, FileLock::check(path)))
}

fn parse_version(version: &str) -> Option<(u32, u32)> {
    let mut parts = version.split('.');
    let major = parts.next()?.trim().parse().ok()?;
    let minor = parts.next().and_then(|p| p.trim().parse().ok()).unwrap_or(0);
    Some((major, minor))
}

/// Major versions must match; pre-1.0, a newer minor version is also
/// refused since 0.x minor bumps may be breaking.
fn validate_version(file_version: &str) -> CalcResult<()> {
    let mismatch = || CalcError::VersionMismatch {
        file_version: file_version.to_string(),
        expected_version: SCHEMA_VERSION.to_string(),
    };
    let (file_major, file_minor) = parse_version(file_version).ok_or_else(mismatch)?;
    let (major, minor) = parse_version(SCHEMA_VERSION).ok_or_else(mismatch)?;
    if file_major != major || (major == 0 && file_minor > minor) {
        return Err(mismatch());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env::temp_dir;

    fn scratch_path(name: &str) -> PathBuf {
        temp_dir().join(format!("blocktally_test_{name}.qto"))
    }

    #[test]
    fn test_sidecar_path_naming() {
        assert_eq!(
            sidecar_path_for(Path::new("/jobs/house.qto")),
            Path::new("/jobs/house.qto.lock")
        );
        assert_eq!(
            sidecar_path_for(Path::new("/jobs/house")),
            Path::new("/jobs/house.lock")
        );
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let path = scratch_path("roundtrip");
        let project = Project::new("Test Surveyor", "TEST-001", "Test Client");
        save_project(&project, &path).unwrap();

        let loaded = load_project(&path).unwrap();
        assert_eq!(loaded.meta.engineer, "Test Surveyor");
        assert_eq!(loaded.meta.job_id, "TEST-001");
        assert_eq!(loaded.meta.version, SCHEMA_VERSION);

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_atomic_save_leaves_no_temp_file() {
        let path = scratch_path("atomic");
        save_project(&Project::new("T", "T-1", "C"), &path).unwrap();

        assert!(path.exists());
        assert!(!path.with_extension("qto.tmp").exists());

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_lock_acquire_and_release() {
        let path = scratch_path("lock");
        File::create(&path).unwrap();

        let lock = FileLock::acquire(&path, "one@example.com").unwrap();
        assert_eq!(lock.info.user_id, "one@example.com");
        assert!(lock.info.pid > 0);
        assert!(sidecar_path_for(&path).exists());

        drop(lock);
        assert!(!sidecar_path_for(&path).exists());

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_held_lock_refuses_second_acquire() {
        let path = scratch_path("contended");
        File::create(&path).unwrap();

        let lock = FileLock::acquire(&path, "one@example.com").unwrap();
        match FileLock::acquire(&path, "two@example.com") {
            Err(e) => {
                assert!(matches!(e, CalcError::FileLocked { .. }));
                assert!(e.is_recoverable());
            }
            Ok(_) => panic!("second acquire should have been refused"),
        }

        drop(lock);
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_check_reports_holder() {
        let path = scratch_path("check");
        File::create(&path).unwrap();
        assert!(FileLock::check(&path).is_none());

        let lock = FileLock::acquire(&path, "holder@example.com").unwrap();
        let holder = FileLock::check(&path).unwrap();
        assert_eq!(holder.user_id, "holder@example.com");

        drop(lock);
        assert!(FileLock::check(&path).is_none());
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_load_with_lock_check() {
        let path = scratch_path("lock_check");
        save_project(&Project::new("T", "T-2", "C"), &path).unwrap();

        let (loaded, holder) = load_project_with_lock_check(&path).unwrap();
        assert_eq!(loaded.meta.job_id, "T-2");
        assert!(holder.is_none());

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_version_validation() {
        assert!(validate_version(SCHEMA_VERSION).is_ok());
        assert!(validate_version("0.1.9").is_ok());
        // Newer 0.x minor or different major: refused
        assert!(validate_version("0.2.0").is_err());
        assert!(validate_version("1.0.0").is_err());
        assert!(validate_version("not-a-version").is_err());
    }
}
