//! Shared fixtures for the binary tests
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub const RELEASE: &str = "6.1.0-test";

/// Minimal little-endian ELF64 relocatable object with a `.modinfo` section.
pub fn module_image(modinfo: &[u8]) -> Vec<u8> {
    let shstrtab: &[u8] = b"\0.modinfo\0.shstrtab\0";
    let modinfo_at = 64usize;
    let strtab_at = modinfo_at + modinfo.len();
    let mut shoff = strtab_at + shstrtab.len();
    shoff += (8 - shoff % 8) % 8;

    let mut image = vec![0u8; shoff + 3 * 64];
    image[0..4].copy_from_slice(b"\x7fELF");
    image[4] = 2;
    image[5] = 1;
    image[6] = 1;
    image[16..18].copy_from_slice(&1u16.to_le_bytes());
    image[18..20].copy_from_slice(&62u16.to_le_bytes());
    image[20..24].copy_from_slice(&1u32.to_le_bytes());
    image[40..48].copy_from_slice(&(shoff as u64).to_le_bytes());
    image[52..54].copy_from_slice(&64u16.to_le_bytes());
    image[58..60].copy_from_slice(&64u16.to_le_bytes());
    image[60..62].copy_from_slice(&3u16.to_le_bytes());
    image[62..64].copy_from_slice(&2u16.to_le_bytes());

    image[modinfo_at..strtab_at].copy_from_slice(modinfo);
    image[strtab_at..strtab_at + shstrtab.len()].copy_from_slice(shstrtab);

    let sections = [(1u32, 1u32, modinfo_at, modinfo.len()), (10, 3, strtab_at, shstrtab.len())];
    for (i, (name, kind, offset, size)) in sections.iter().enumerate() {
        let base = shoff + (i + 1) * 64;
        image[base..base + 4].copy_from_slice(&name.to_le_bytes());
        image[base + 4..base + 8].copy_from_slice(&kind.to_le_bytes());
        image[base + 24..base + 32].copy_from_slice(&(*offset as u64).to_le_bytes());
        image[base + 32..base + 40].copy_from_slice(&(*size as u64).to_le_bytes());
    }
    image
}

/// A fake root holding a live module list and a module directory.
pub struct ModuleTree {
    pub root: TempDir,
}

impl ModuleTree {
    pub fn new(proc_modules: &str) -> Self {
        let root = TempDir::new().unwrap();
        fs::create_dir_all(root.path().join("lib/modules").join(RELEASE)).unwrap();
        fs::write(root.path().join("modules"), proc_modules).unwrap();
        ModuleTree { root }
    }

    pub fn add_module(&self, file: &str, modinfo: &[u8]) -> PathBuf {
        let path = self.module_dir().join(file);
        fs::write(&path, module_image(modinfo)).unwrap();
        path
    }

    pub fn module_dir(&self) -> PathBuf {
        self.module_root().join(RELEASE)
    }

    pub fn module_root(&self) -> PathBuf {
        self.root.path().join("lib/modules")
    }

    pub fn proc_modules(&self) -> PathBuf {
        self.root.path().join("modules")
    }

    /// Global flags pointing the binary at this tree.
    pub fn args(&self) -> Vec<String> {
        vec![
            "--proc-modules".to_string(),
            path_arg(&self.proc_modules()),
            "--module-root".to_string(),
            path_arg(&self.module_root()),
            "--release".to_string(),
            RELEASE.to_string(),
        ]
    }
}

fn path_arg(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}
