use serde::Serialize;

use super::SearchAttributes;

/// One entry of a remote directory listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SharedFile {
    pub filename: String,
    pub is_directory: bool,
    pub file_size: u64,
    pub attributes: SearchAttributes,
}

impl SharedFile {
    #[must_use]
    pub fn file<T: Into<String>>(filename: T, file_size: u64) -> Self {
        Self {
            filename: filename.into(),
            is_directory: false,
            file_size,
            attributes: SearchAttributes::ARCHIVE,
        }
    }

    #[must_use]
    pub fn directory<T: Into<String>>(filename: T) -> Self {
        Self {
            filename: filename.into(),
            is_directory: true,
            file_size: 0,
            attributes: SearchAttributes::DIRECTORY,
        }
    }

    /// `true` for the `.` and `..` entries every listing carries.
    #[must_use]
    pub fn is_dot_entry(&self) -> bool {
        self.filename == "." || self.filename == ".."
    }
}
