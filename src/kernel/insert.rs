//! Module insertion and removal
use log::{debug, error};
use std::fs::{self, File};
use std::io::Read;
use std::path::Path;

use super::{canonical_name, KernelInterface};
use crate::error::ModuleError;

/// Removal flag: fail instead of waiting while the module is busy.
pub const REMOVE_NONBLOCK: u32 = libc::O_NONBLOCK as u32;
/// Removal flag: force unload even when in use.
pub const REMOVE_FORCE: u32 = libc::O_TRUNC as u32;

/// Read the whole file at `path` and hand it to the kernel with `options`.
///
/// No dependency checking happens here; callers make sure dependencies are
/// already loaded.
pub fn insert_module(
    kernel: &dyn KernelInterface,
    path: &Path,
    options: &str,
) -> Result<(), ModuleError> {
    let expected = fs::metadata(path)
        .map_err(|e| {
            error!("missing module {}", path.display());
            ModuleError::io(path, e)
        })?
        .len();

    let image = {
        let mut file = File::open(path).map_err(|e| {
            error!("cannot open {}", path.display());
            ModuleError::io(path, e)
        })?;
        let mut image = Vec::with_capacity(expected as usize);
        file.read_to_end(&mut image)
            .map_err(|e| ModuleError::io(path, e))?;
        image
    };

    if (image.len() as u64) < expected {
        error!("failed to read full module {}", path.display());
        return Err(ModuleError::ShortRead {
            path: path.to_path_buf(),
            expected,
            actual: image.len() as u64,
        });
    }

    debug!(
        "inserting {} ({} bytes, options {:?})",
        path.display(),
        image.len(),
        options
    );
    kernel.init_module(&image, options).map_err(|source| {
        error!("failed to insert {}: {}", path.display(), source);
        ModuleError::InsertionRejected {
            path: path.to_path_buf(),
            source,
        }
    })
}

/// Ask the kernel to unload `name`.
pub fn remove_module(kernel: &dyn KernelInterface, name: &str, force: bool) -> Result<(), ModuleError> {
    let name = canonical_name(name);
    let mut flags = REMOVE_NONBLOCK;
    if force {
        flags |= REMOVE_FORCE;
    }

    kernel.delete_module(&name, flags).map_err(|source| {
        error!("unloading the module {} failed: {}", name, source);
        ModuleError::RemovalRejected { name, source }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernel::syscall::testing::RecordingKernel;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_insert_passes_whole_image_and_options() -> Result<(), Box<dyn std::error::Error>> {
        let mut temp_file = NamedTempFile::new()?;
        temp_file.write_all(b"module-image-bytes")?;
        temp_file.flush()?;

        let kernel = RecordingKernel::default();
        insert_module(&kernel, temp_file.path(), "debug=1 mode=fast")?;

        let inserted = kernel.inserted.borrow();
        assert_eq!(inserted.len(), 1);
        assert_eq!(inserted[0].0, b"module-image-bytes");
        assert_eq!(inserted[0].1, "debug=1 mode=fast");
        Ok(())
    }

    #[test]
    fn test_insert_missing_file() {
        let kernel = RecordingKernel::default();
        let err = insert_module(&kernel, Path::new("/nonexistent/foo.ko"), "").unwrap_err();
        assert!(matches!(err, ModuleError::Io { .. }));
        assert!(err.to_string().contains("/nonexistent/foo.ko"));
        assert!(kernel.inserted.borrow().is_empty());
    }

    #[test]
    fn test_insert_rejection_keeps_errno() -> Result<(), Box<dyn std::error::Error>> {
        let mut temp_file = NamedTempFile::new()?;
        temp_file.write_all(b"x")?;
        temp_file.flush()?;

        let kernel = RecordingKernel::failing(libc::ENOEXEC);
        let err = insert_module(&kernel, temp_file.path(), "").unwrap_err();
        assert!(matches!(err, ModuleError::InsertionRejected { .. }));
        assert_eq!(err.raw_os_error(), Some(libc::ENOEXEC));
        Ok(())
    }

    #[test]
    fn test_remove_uses_canonical_name() {
        let kernel = RecordingKernel::default();
        remove_module(&kernel, "snd-pcm", false).unwrap();
        remove_module(&kernel, "loop", true).unwrap();

        let removed = kernel.removed.borrow();
        assert_eq!(removed[0], ("snd_pcm".to_string(), REMOVE_NONBLOCK));
        assert_eq!(removed[1], ("loop".to_string(), REMOVE_NONBLOCK | REMOVE_FORCE));
    }

    #[test]
    fn test_remove_rejection() {
        let kernel = RecordingKernel::failing(libc::EBUSY);
        let err = remove_module(&kernel, "loop", false).unwrap_err();
        assert_eq!(err.raw_os_error(), Some(libc::EBUSY));
        assert!(err.to_string().contains("loop"));
    }
}
