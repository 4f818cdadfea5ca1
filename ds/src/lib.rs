use floppyfs_err::{DeviceError, Error, Result};

pub const SECTOR_SIZE: usize = 512;

/// A random-access block device addressed by linear sector number.
///
/// Implementations are the sole collaborator between the filesystem core and
/// whatever physically stores the volume (a floppy controller, a disk image
/// file, a RAM disk). The core never assumes anything about the medium
/// beyond this trait.
pub trait BlockDevice {
    /// Reads exactly one 512-byte sector at `lba` into `buffer`.
    fn read_sector(&self, lba: u32, buffer: &mut [u8; SECTOR_SIZE]) -> Result<()>;
}

/// Reads a sector and logs the failure, if any, at the point it occurred.
/// Callers throughout the filesystem core use this instead of calling
/// `BlockDevice::read_sector` directly, so that a `DeviceError` is always
/// diagnosed via `log::error!` before it gets folded into the handle-level
/// INVALID/Eof vocabulary further up the call stack.
pub fn read_sector_checked<BD: BlockDevice>(
    device: &BD,
    lba: u32,
    buffer: &mut [u8; SECTOR_SIZE],
) -> Result<()> {
    device.read_sector(lba, buffer).map_err(|err| {
        log::error!("read_sector({lba}) failed: {err}");
        err
    })
}

/// Turns a short/out-of-range block read into the shared device-error
/// vocabulary. Implementations of [`BlockDevice`] are expected to call this
/// rather than inventing their own error kinds.
pub fn device_error_out_of_range(lba: u32) -> Error {
    Error::Device(DeviceError::OutOfRange { lba })
}

pub fn device_error_short_read(lba: u32) -> Error {
    Error::Device(DeviceError::ShortRead { lba })
}
