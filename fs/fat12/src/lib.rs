// Copyright 2024 Kevin Ludwig
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! A read-only FAT12 filesystem core: boot-sector decoding, the cached FAT
//! index, directory-entry and long-file-name assembly, a visitor-based
//! directory iterator, a path resolver, and a cluster-chain file reader.

pub use floppyfs_ds::SECTOR_SIZE;
pub use floppyfs_fs::{DirEntry, FileSystem, Handle, HandleKind};

pub mod boot_sector;
pub mod dir_entry;
pub mod fat;
mod file_system;

pub use file_system::FileSystemServer;
