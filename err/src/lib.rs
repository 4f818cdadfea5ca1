#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("volume: {0}")]
    Volume(VolumeError),
    #[error("device: {0}")]
    Device(DeviceError),
}

#[derive(thiserror::Error, Debug)]
pub enum VolumeError {
    #[error("unsupported sector size")]
    SectorSize,
    #[error("unsupported cluster size")]
    ClusterSize,
    #[error("FAT too large for the cached buffer")]
    FatTooLarge,
    #[error("root directory size is not sector-aligned")]
    RootDirectoryUnaligned,
}

#[derive(thiserror::Error, Debug)]
pub enum DeviceError {
    #[error("short read at sector {lba}")]
    ShortRead { lba: u32 },
    #[error("sector {lba} out of range")]
    OutOfRange { lba: u32 },
}

pub type Result<T> = core::result::Result<T, Error>;
