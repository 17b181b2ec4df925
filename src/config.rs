//! Runtime paths and kernel release
use std::ffi::CStr;
use std::io;
use std::path::PathBuf;

pub const DEFAULT_PROC_MODULES: &str = "/proc/modules";
pub const DEFAULT_MODULE_ROOT: &str = "/lib/modules";
pub const DEFAULT_LOAD_LIST_DIR: &str = "/etc/modules.d/";

/// Where modules and the live listing are found.
#[derive(Debug, Clone)]
pub struct Config {
    pub proc_modules: PathBuf,
    pub module_root: PathBuf,
    /// Kernel release, e.g. `6.1.0-rpi7`.
    pub release: String,
}

impl Config {
    pub fn new(proc_modules: PathBuf, module_root: PathBuf, release: String) -> Self {
        Config {
            proc_modules,
            module_root,
            release,
        }
    }

    /// `module_root/release`
    pub fn module_dir(&self) -> PathBuf {
        self.module_root.join(&self.release)
    }

    /// Glob matching every module file of this release.
    pub fn scan_pattern(&self) -> String {
        format!("{}/*.ko", self.module_dir().display())
    }
}

/// Release string of the running kernel, from `uname(2)`.
pub fn kernel_release() -> io::Result<String> {
    let mut uts: libc::utsname = unsafe { std::mem::zeroed() };
    if unsafe { libc::uname(&mut uts) } != 0 {
        return Err(io::Error::last_os_error());
    }
    let release = unsafe { CStr::from_ptr(uts.release.as_ptr()) };
    Ok(release.to_string_lossy().into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derived_paths() {
        let config = Config::new(
            PathBuf::from("/proc/modules"),
            PathBuf::from("/lib/modules"),
            "6.1.0".to_string(),
        );
        assert_eq!(config.module_dir(), PathBuf::from("/lib/modules/6.1.0"));
        assert_eq!(config.scan_pattern(), "/lib/modules/6.1.0/*.ko");
    }

    #[test]
    fn test_kernel_release_is_not_empty() {
        assert!(!kernel_release().unwrap().is_empty());
    }
}
