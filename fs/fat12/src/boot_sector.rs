use floppyfs_err::{Error, Result, VolumeError};
use zerocopy::{
    little_endian::{U16, U32},
    FromBytes, Immutable, IntoBytes, KnownLayout,
};

use crate::SECTOR_SIZE;

/// The 512-byte BIOS Parameter Block sector at LBA 0.
///
/// Only the FAT12/FAT16-style BPB and extended boot record are modeled;
/// the FAT32-only fields from the wider FAT family are not present on this
/// volume type and are intentionally absent from this layout.
#[repr(C)]
#[derive(Debug, FromBytes, IntoBytes, Immutable, KnownLayout)]
pub struct BootSector {
    bs_jmpboot: [u8; 3],
    bs_oemname: [u8; 8],

    /// Bytes per sector. This driver only supports 512.
    pub bpb_bytspersec: U16,
    /// Sectors per allocation unit. This driver only supports 1.
    pub bpb_secperclus: u8,
    /// Reserved sectors before the first FAT, including the boot sector
    /// itself.
    pub bpb_rsvdseccnt: U16,
    /// Number of FAT copies on the volume (typically 2).
    pub bpb_numfats: u8,
    /// Count of 32-byte root directory entries.
    pub bpb_rootentcnt: U16,
    bpb_totsec16: U16,
    bpb_media: u8,
    /// Sectors occupied by one FAT copy.
    pub bpb_fatsz16: U16,
    bpb_secpertrk: U16,
    bpb_numheads: U16,
    bpb_hiddsec: U32,
    bpb_totsec32: U32,

    bs_drvnum: u8,
    bs_reserved1: u8,
    bs_bootsig: u8,
    bs_volid: U32,
    bs_vollab: [u8; 11],
    bs_filsystype: [u8; 8],

    bs_boot: [u8; 448],
    signature_word: [u8; 2],
}

/// Geometry derived once at mount time from the boot sector. Everything
/// downstream (the FAT index, the directory iterator, the file reader)
/// only ever consults this, never the raw boot sector again.
#[derive(Debug, Clone, Copy)]
pub struct Geometry {
    pub fat_offset: u32,
    pub fat_size_sectors: u32,
    pub num_fats: u32,
    pub root_offset: u32,
    pub root_sectors: u32,
    pub root_entry_count: u32,
    pub data_offset: u32,
}

impl Geometry {
    pub fn from_boot_sector(boot_sector: &BootSector) -> Result<Self> {
        let bytes_per_sector = boot_sector.bpb_bytspersec.get() as u32;
        if bytes_per_sector as usize != SECTOR_SIZE {
            log::error!("unsupported sector size {bytes_per_sector}");
            return Err(Error::Volume(VolumeError::SectorSize));
        }

        let sectors_per_cluster = boot_sector.bpb_secperclus as u32;
        if sectors_per_cluster != 1 {
            log::error!("unsupported cluster size {sectors_per_cluster} sectors");
            return Err(Error::Volume(VolumeError::ClusterSize));
        }

        let fat_offset = boot_sector.bpb_rsvdseccnt.get() as u32;
        let num_fats = boot_sector.bpb_numfats as u32;
        let fat_size_sectors = boot_sector.bpb_fatsz16.get() as u32;

        let root_offset = fat_offset + num_fats * fat_size_sectors;
        let root_entry_count = boot_sector.bpb_rootentcnt.get() as u32;
        let root_directory_bytes = root_entry_count * crate::dir_entry::DIR_ENTRY_SIZE as u32;
        if root_directory_bytes % bytes_per_sector != 0 {
            log::error!("root directory size {root_directory_bytes} is not sector-aligned");
            return Err(Error::Volume(VolumeError::RootDirectoryUnaligned));
        }
        let root_sectors = root_directory_bytes / bytes_per_sector;

        let data_offset = root_offset + root_sectors;

        Ok(Self {
            fat_offset,
            fat_size_sectors,
            num_fats,
            root_offset,
            root_sectors,
            root_entry_count,
            data_offset,
        })
    }

    /// LBA of the sector holding cluster `cluster`. Callers must ensure
    /// `cluster >= 2`.
    pub fn cluster_to_lba(&self, cluster: u16) -> u32 {
        self.data_offset + (cluster as u32 - 2)
    }
}
