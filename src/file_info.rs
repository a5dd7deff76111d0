use std::time::SystemTime;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileType {
    Unknown,
    Regular,
    Directory,
    SymbolicLink,
}

/// Result of a `stat` on one of the stores.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileInfo {
    name: String,
    size: u64,
    modified: SystemTime,
    file_type: FileType,
}

impl FileInfo {
    pub fn new(
        name: impl Into<String>,
        size: u64,
        modified: SystemTime,
        file_type: FileType,
    ) -> Self {
        Self {
            name: name.into(),
            size,
            modified,
            file_type,
        }
    }

    pub fn from_metadata(name: impl Into<String>, metadata: &std::fs::Metadata) -> Self {
        let file_type = if metadata.is_dir() {
            FileType::Directory
        } else if metadata.is_symlink() {
            FileType::SymbolicLink
        } else if metadata.is_file() {
            FileType::Regular
        } else {
            FileType::Unknown
        };
        Self {
            name: name.into(),
            size: metadata.len(),
            modified: metadata.modified().unwrap_or(SystemTime::UNIX_EPOCH),
            file_type,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn size(&self) -> u64 {
        self.size
    }

    pub fn modified(&self) -> SystemTime {
        self.modified
    }

    pub fn file_type(&self) -> FileType {
        self.file_type
    }

    pub fn is_dir(&self) -> bool {
        self.file_type == FileType::Directory
    }
}
