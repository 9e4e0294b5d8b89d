use std::path::Path;

/// Binary avatar submitted by a client
#[derive(Clone, PartialEq, Eq)]
pub struct AvatarUpload {
    /// Client-supplied file name; only its extension is kept
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl AvatarUpload {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes,
        }
    }

    /// Lower-cased file extension, if any
    pub fn extension(&self) -> Option<String> {
        Path::new(&self.file_name)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
    }

    pub fn size_kb(&self) -> u64 {
        (self.bytes.len() as u64).div_ceil(1024)
    }
}

impl std::fmt::Debug for AvatarUpload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AvatarUpload")
            .field("file_name", &self.file_name)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// Requested change to a group thread's avatar
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AvatarChange {
    /// Switch to one of the protected default avatars
    Default(String),
    /// Replace the avatar with a freshly uploaded image
    Upload(AvatarUpload),
}
