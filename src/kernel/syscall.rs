//! Kernel module syscalls
use std::ffi::CString;
use std::io;

/// The two kernel entry points the loader needs.
///
/// Both block until the kernel answers. Implementations report failure as an
/// `io::Error` carrying the errno.
pub trait KernelInterface {
    /// Hand a complete module image and its parameter string to the kernel.
    fn init_module(&self, image: &[u8], params: &str) -> io::Result<()>;

    /// Unload the module with the given canonical name.
    fn delete_module(&self, name: &str, flags: u32) -> io::Result<()>;
}

/// `init_module(2)` / `delete_module(2)` on the running kernel.
pub struct SyscallKernel;

fn c_string(value: &str) -> io::Result<CString> {
    CString::new(value).map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))
}

impl KernelInterface for SyscallKernel {
    fn init_module(&self, image: &[u8], params: &str) -> io::Result<()> {
        let params = c_string(params)?;
        let ret = unsafe {
            libc::syscall(
                libc::SYS_init_module,
                image.as_ptr() as *const libc::c_void,
                image.len() as libc::c_ulong,
                params.as_ptr(),
            )
        };
        if ret == 0 {
            Ok(())
        } else {
            Err(io::Error::last_os_error())
        }
    }

    fn delete_module(&self, name: &str, flags: u32) -> io::Result<()> {
        let name = c_string(name)?;
        let ret = unsafe {
            libc::syscall(
                libc::SYS_delete_module,
                name.as_ptr(),
                flags as libc::c_uint,
            )
        };
        if ret == 0 {
            Ok(())
        } else {
            Err(io::Error::last_os_error())
        }
    }
}

/// Kernel stand-in that records requests instead of issuing syscalls.
#[cfg(test)]
pub(crate) mod testing {
    use super::KernelInterface;
    use std::cell::RefCell;
    use std::io;

    #[derive(Default)]
    pub struct RecordingKernel {
        /// Images and parameter strings, in call order.
        pub inserted: RefCell<Vec<(Vec<u8>, String)>>,
        pub removed: RefCell<Vec<(String, u32)>>,
        /// errno returned for every request when set.
        pub fail_with: Option<i32>,
    }

    impl RecordingKernel {
        /// Inserted images read back as text; fixtures store the module
        /// name as the file contents.
        pub fn inserted_images(&self) -> Vec<String> {
            self.inserted
                .borrow()
                .iter()
                .map(|(image, _)| String::from_utf8_lossy(image).into_owned())
                .collect()
        }

        pub fn failing(errno: i32) -> Self {
            RecordingKernel {
                fail_with: Some(errno),
                ..Default::default()
            }
        }
    }

    impl KernelInterface for RecordingKernel {
        fn init_module(&self, image: &[u8], params: &str) -> io::Result<()> {
            if let Some(errno) = self.fail_with {
                return Err(io::Error::from_raw_os_error(errno));
            }
            self.inserted
                .borrow_mut()
                .push((image.to_vec(), params.to_string()));
            Ok(())
        }

        fn delete_module(&self, name: &str, flags: u32) -> io::Result<()> {
            if let Some(errno) = self.fail_with {
                return Err(io::Error::from_raw_os_error(errno));
            }
            self.removed.borrow_mut().push((name.to_string(), flags));
            Ok(())
        }
    }
}
