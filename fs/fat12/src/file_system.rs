use core::ops::ControlFlow;

use floppyfs_ds::{read_sector_checked, BlockDevice, SECTOR_SIZE};
use floppyfs_err::{Error, Result, VolumeError};
use floppyfs_fs::{DirEntry as ViewEntry, FileSystem, Handle, HandleKind};
use zerocopy::FromBytes;

use crate::boot_sector::{BootSector, Geometry};
use crate::dir_entry::{
    DirEntry, LfnAccumulator, LongNameDirEntry, DIR_ENTRY_SIZE, NAME_FREE_REST, NAME_FREE_SLOT,
};
use crate::fat::Fat;

/// The FAT12 filesystem core, generic over whatever block device backs it.
///
/// Mounting reads and validates the boot sector and caches the first FAT
/// copy; everything after that is derived from `geometry` and `fat`, never
/// from the device's sector 0 again.
pub struct FileSystemServer<BD: BlockDevice> {
    device: BD,
    geometry: Geometry,
    fat: Fat,
}

impl<BD: BlockDevice> FileSystemServer<BD> {
    pub fn mount(device: BD) -> Result<Self> {
        let mut boot_sector_bytes = [0u8; SECTOR_SIZE];
        read_sector_checked(&device, 0, &mut boot_sector_bytes)?;

        let boot_sector = BootSector::read_from_bytes(&boot_sector_bytes)
            .map_err(|_| Error::Volume(VolumeError::SectorSize))?;
        let geometry = Geometry::from_boot_sector(&boot_sector)?;
        let fat = Fat::load(&device, &geometry)?;

        Ok(Self {
            device,
            geometry,
            fat,
        })
    }

    /// Visits every slot of one sector, accumulating long-name runs in
    /// `lfn` and invoking `visit` once per short-name entry. Returns
    /// `Break` when the visitor asked to stop or the terminator slot
    /// (name byte `0x00`) was reached.
    fn scan_sector(
        &self,
        sector: &[u8; SECTOR_SIZE],
        lfn: &mut LfnAccumulator,
        visit: &mut impl FnMut(&ViewEntry, &str) -> ControlFlow<()>,
    ) -> Result<ControlFlow<()>> {
        for slot in sector.chunks_exact(DIR_ENTRY_SIZE) {
            let entry = DirEntry::ref_from_bytes(slot)
                .map_err(|_| Error::Volume(VolumeError::RootDirectoryUnaligned))?;

            match entry.dir_name[0] {
                NAME_FREE_REST => return Ok(ControlFlow::Break(())),
                NAME_FREE_SLOT => {
                    lfn.clear();
                    continue;
                }
                _ => {}
            }

            if entry.is_long_name() {
                lfn.push(LongNameDirEntry::from_dir_entry(entry));
                continue;
            }

            let name = lfn.assemble().unwrap_or_else(|| entry.short_name());
            lfn.clear();

            let view = ViewEntry {
                is_directory: entry.is_directory(),
                hidden: entry.is_hidden(),
                length: entry.file_size(),
                first_cluster: entry.first_cluster(),
            };
            if visit(&view, &name).is_break() {
                return Ok(ControlFlow::Break(()));
            }
        }
        Ok(ControlFlow::Continue(()))
    }

    fn find_in_dir(&self, dir: &Handle, name: &str) -> Option<Handle> {
        let mut found = None;
        if let Err(err) = self.iterate(dir, |entry, entry_name| {
            if entry_name.eq_ignore_ascii_case(name) {
                found = Some(Handle {
                    kind: if entry.is_directory {
                        HandleKind::Directory
                    } else {
                        HandleKind::File
                    },
                    length: entry.length,
                    position: 0,
                    first_cluster: entry.first_cluster,
                    current_cluster: entry.first_cluster,
                    eof: false,
                });
                ControlFlow::Break(())
            } else {
                ControlFlow::Continue(())
            }
        }) {
            log::error!("open: directory walk failed: {err}");
        }
        found
    }
}

impl<BD: BlockDevice> FileSystem for FileSystemServer<BD> {
    fn open(&self, path: &str) -> Handle {
        self.open_from(&Handle::root(), path)
    }

    fn open_from(&self, dir: &Handle, path: &str) -> Handle {
        if path == "\\" {
            return Handle::root();
        }
        if dir.kind != HandleKind::Directory {
            return Handle::invalid();
        }

        let trimmed = path.strip_prefix('\\').unwrap_or(path);
        if trimmed.is_empty() {
            return Handle::invalid();
        }

        let components: Vec<&str> = trimmed.split('\\').collect();
        let mut current = dir.clone();
        for (i, component) in components.iter().enumerate() {
            if component.is_empty() {
                return Handle::invalid();
            }
            let is_last = i == components.len() - 1;
            match self.find_in_dir(&current, component) {
                Some(next) => {
                    if !is_last && next.kind != HandleKind::Directory {
                        return Handle::invalid();
                    }
                    current = next;
                }
                None => return Handle::invalid(),
            }
        }
        current
    }

    fn read(&self, handle: &mut Handle, out: &mut [u8], n: usize) -> usize {
        if handle.eof || handle.kind == HandleKind::Invalid {
            return 0;
        }

        let length_bound = match handle.kind {
            HandleKind::File => handle.length.saturating_sub(handle.position),
            _ => u32::MAX,
        };
        let mut remaining = (n as u32).min(length_bound).min(out.len() as u32) as usize;
        let mut written = 0;

        while remaining > 0 {
            if handle.current_cluster < 2 {
                handle.eof = true;
                break;
            }

            let mut sector = [0u8; SECTOR_SIZE];
            let lba = self.geometry.cluster_to_lba(handle.current_cluster);
            if read_sector_checked(&self.device, lba, &mut sector).is_err() {
                handle.eof = true;
                break;
            }

            let offset_in_sector = handle.position as usize % SECTOR_SIZE;
            let len = remaining.min(SECTOR_SIZE - offset_in_sector);
            out[written..written + len]
                .copy_from_slice(&sector[offset_in_sector..offset_in_sector + len]);

            handle.position += len as u32;
            written += len;
            remaining -= len;

            if handle.position as usize % SECTOR_SIZE == 0 {
                match self.fat.next_cluster(handle.current_cluster) {
                    Some(next) => handle.current_cluster = next,
                    None => {
                        handle.eof = true;
                        break;
                    }
                }
            }
        }

        if handle.kind == HandleKind::File && handle.position >= handle.length {
            handle.eof = true;
        }
        written
    }

    fn close(&self, handle: &mut Handle) {
        handle.eof = true;
    }

    fn iterate(
        &self,
        dir: &Handle,
        mut visit: impl FnMut(&ViewEntry, &str) -> ControlFlow<()>,
    ) -> Result<()> {
        let mut lfn = LfnAccumulator::new();

        if dir.current_cluster < 2 {
            for sector_index in 0..self.geometry.root_sectors {
                let mut sector = [0u8; SECTOR_SIZE];
                let lba = self.geometry.root_offset + sector_index;
                read_sector_checked(&self.device, lba, &mut sector)?;
                if self.scan_sector(&sector, &mut lfn, &mut visit)?.is_break() {
                    return Ok(());
                }
            }
        } else {
            let mut cluster = Some(dir.current_cluster);
            while let Some(c) = cluster {
                let mut sector = [0u8; SECTOR_SIZE];
                let lba = self.geometry.cluster_to_lba(c);
                read_sector_checked(&self.device, lba, &mut sector)?;
                if self.scan_sector(&sector, &mut lfn, &mut visit)?.is_break() {
                    return Ok(());
                }
                cluster = self.fat.next_cluster(c);
            }
        }

        Ok(())
    }
}
