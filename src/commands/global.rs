use std::env;
use std::io;
use std::path::{Path, PathBuf};

/// Directory holding the running executable.
pub fn get_program_dir() -> io::Result<PathBuf> {
    let exe = env::current_exe()?;
    exe.parent()
        .map(Path::to_path_buf)
        .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "Executable has no parent directory"))
}

/// Root under which every creator gets its own subdirectory.
/// An unset or empty `imagesDir` means `<program dir>/images`.
pub fn resolve_images_dir(configured: Option<&Path>) -> io::Result<PathBuf> {
    match configured.filter(|dir| !dir.as_os_str().is_empty()) {
        Some(dir) => Ok(dir.to_path_buf()),
        None => Ok(get_program_dir()?.join("images")),
    }
}
