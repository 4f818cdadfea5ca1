use std::{fs::File, os::unix::fs::FileExt};

use floppyfs_ds::{device_error_short_read, BlockDevice, SECTOR_SIZE};
use floppyfs_err::Result;

/// A [`BlockDevice`] backed by a plain file, standing in for a mounted
/// floppy image on hosts that have a filesystem of their own. Used by the
/// workspace's tests and by any host-side tooling that wants to inspect a
/// `.img` file without a real floppy controller.
pub struct FileBlockDevice {
    file: File,
}

impl FileBlockDevice {
    pub fn open(image_path: &str) -> std::io::Result<Self> {
        Ok(Self {
            file: File::open(image_path)?,
        })
    }
}

impl BlockDevice for FileBlockDevice {
    fn read_sector(&self, lba: u32, buffer: &mut [u8; SECTOR_SIZE]) -> Result<()> {
        let offset = lba as u64 * SECTOR_SIZE as u64;
        self.file
            .read_exact_at(buffer, offset)
            .map_err(|_| device_error_short_read(lba))
    }
}
