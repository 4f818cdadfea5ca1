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

use core::ops::ControlFlow;

pub use floppyfs_err::*;

/// What a [`Handle`] refers to, and whether it refers to anything at all.
///
/// `Invalid` stands in for the family of open-time failures (not found, not
/// a directory, empty path) that the filesystem core deliberately does not
/// distinguish to its callers; see the error handling notes for why.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandleKind {
    File,
    Directory,
    Invalid,
}

/// A caller-owned reference to an open file or directory.
///
/// The filesystem never retains a `Handle`; every field needed to resume
/// reading or iterating lives here. `close` is the only operation that
/// mutates a handle without also doing I/O, and it only ever sets `eof`.
#[derive(Debug, Clone)]
pub struct Handle {
    pub kind: HandleKind,
    pub length: u32,
    pub position: u32,
    pub first_cluster: u16,
    pub current_cluster: u16,
    pub eof: bool,
}

impl Handle {
    pub fn invalid() -> Self {
        Self {
            kind: HandleKind::Invalid,
            length: 0,
            position: 0,
            first_cluster: 0,
            current_cluster: 0,
            eof: true,
        }
    }

    pub fn root() -> Self {
        Self {
            kind: HandleKind::Directory,
            length: 0,
            position: 0,
            first_cluster: 0,
            current_cluster: 0,
            eof: false,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.kind != HandleKind::Invalid
    }
}

/// A decoded, user-facing view of one directory slot, produced by
/// [`FileSystem::iterate`]. The short/long name distinction is already
/// resolved by the time a caller sees this; `name` is always the fully
/// assembled name.
#[derive(Debug, Clone)]
pub struct DirEntry {
    pub is_directory: bool,
    pub hidden: bool,
    pub length: u32,
    pub first_cluster: u16,
}

/// The operations a read-only filesystem core exposes to its caller (a
/// shell, a test harness, or any other client that only ever sees handles
/// and assembled names).
pub trait FileSystem {
    fn open(&self, path: &str) -> Handle;

    fn open_from(&self, dir: &Handle, path: &str) -> Handle;

    fn read(&self, handle: &mut Handle, out: &mut [u8], n: usize) -> usize;

    fn close(&self, handle: &mut Handle);

    fn iterate(
        &self,
        dir: &Handle,
        visit: impl FnMut(&DirEntry, &str) -> ControlFlow<()>,
    ) -> Result<()>;
}
