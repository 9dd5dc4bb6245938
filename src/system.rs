use crate::error::{Error, Result};
use std::path::Path;

/// Get the size of a block device in bytes
#[cfg(target_os = "linux")]
pub fn get_block_device_size(path: impl AsRef<Path>) -> Result<u64> {
    use std::fs::File;
    use std::os::unix::io::AsRawFd;

    let path = path.as_ref();
    let file = File::open(path).map_err(|_| Error::DeviceNotFound(path.display().to_string()))?;
    let fd = file.as_raw_fd();

    // Use BLKGETSIZE64 ioctl
    let mut size: u64 = 0;

    // BLKGETSIZE64 = 0x80081272
    // Cast to Ioctl type (i32 on musl, u64 on glibc)
    #[allow(overflowing_literals)]
    const BLKGETSIZE64: libc::Ioctl = 0x80081272u32 as libc::Ioctl;

    let result = unsafe { libc::ioctl(fd, BLKGETSIZE64, &mut size) };

    if result == -1 {
        // Fall back to seek method
        use std::io::{Seek, SeekFrom};
        let mut file = file;
        let size = file.seek(SeekFrom::End(0))?;
        Ok(size)
    } else {
        Ok(size)
    }
}

#[cfg(not(target_os = "linux"))]
pub fn get_block_device_size(path: impl AsRef<Path>) -> Result<u64> {
    use std::fs::File;
    use std::io::{Seek, SeekFrom};

    let path = path.as_ref();
    let mut file =
        File::open(path).map_err(|_| Error::DeviceNotFound(path.display().to_string()))?;
    let size = file.seek(SeekFrom::End(0))?;
    Ok(size)
}
