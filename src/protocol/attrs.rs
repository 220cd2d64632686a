use serde::{Deserialize, Serialize};

/// File attribute flags used to filter directory listings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SearchAttributes(u32);

bitflags! {
    impl SearchAttributes: u32 {
        const READONLY = 0x0000_0001;
        const HIDDEN = 0x0000_0002;
        const SYSTEM = 0x0000_0004;
        const DIRECTORY = 0x0000_0010;
        const ARCHIVE = 0x0000_0020;
        /// Matches files that carry no attribute at all
        const INCL_NORMAL = 0x0001_0000;

        /// Plain files, as searched by folder listings
        const FILES = Self::READONLY.bits() | Self::ARCHIVE.bits() | Self::INCL_NORMAL.bits();
        /// Everything a lookup by name may hit, folders included
        const ANY = Self::FILES.bits()
            | Self::HIDDEN.bits()
            | Self::SYSTEM.bits()
            | Self::DIRECTORY.bits();
    }
}

impl SearchAttributes {
    /// Search used to list a folder, with or without its sub folders.
    #[must_use]
    pub fn listing(include_folders: bool) -> Self {
        if include_folders {
            Self::FILES | Self::DIRECTORY
        } else {
            Self::FILES
        }
    }

    #[must_use]
    pub const fn includes_folders(self) -> bool {
        self.contains(Self::DIRECTORY)
    }
}

impl Default for SearchAttributes {
    fn default() -> Self {
        Self::ANY
    }
}
