use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Kind of conversation a thread represents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThreadType {
    Private,
    Group,
}

impl ThreadType {
    /// Numeric code used on the wire and in storage
    pub fn code(self) -> u8 {
        match self {
            ThreadType::Private => 1,
            ThreadType::Group => 2,
        }
    }

    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            1 => Some(ThreadType::Private),
            2 => Some(ThreadType::Group),
            _ => None,
        }
    }

    pub fn verbose(self) -> &'static str {
        match self {
            ThreadType::Private => "PRIVATE",
            ThreadType::Group => "GROUP",
        }
    }
}

/// A provider's membership in a thread
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Participant {
    pub provider_id: String,
    pub provider_alias: String,
    pub name: String,
    #[serde(default)]
    pub admin: bool,
}

/// A chat thread: the entity whose avatar the mutation pipeline replaces
///
/// `image` is either one of the protected default avatars or a file
/// name owned by this thread's avatar directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Thread {
    pub id: String,
    pub thread_type: ThreadType,
    pub subject: Option<String>,
    pub image: Option<String>,
    pub add_participants: bool,
    pub invitations: bool,
    pub calling: bool,
    pub messaging: bool,
    pub knocks: bool,
    pub participants: Vec<Participant>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Thread {
    /// New group thread with every setting enabled
    pub fn new_group(id: impl Into<String>, subject: impl Into<String>) -> Self {
        Self::new(id.into(), ThreadType::Group, Some(subject.into()))
    }

    pub fn new_private(id: impl Into<String>) -> Self {
        Self::new(id.into(), ThreadType::Private, None)
    }

    fn new(id: String, thread_type: ThreadType, subject: Option<String>) -> Self {
        let now = Utc::now();
        Self {
            id,
            thread_type,
            subject,
            image: None,
            add_participants: true,
            invitations: true,
            calling: true,
            messaging: true,
            knocks: true,
            participants: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }

    pub fn with_participant(mut self, participant: Participant) -> Self {
        self.participants.push(participant);
        self
    }

    pub fn is_group(&self) -> bool {
        self.thread_type == ThreadType::Group
    }

    pub fn is_private(&self) -> bool {
        self.thread_type == ThreadType::Private
    }

    /// Directory holding every file this thread owns, relative to its disk
    pub fn storage_directory(&self) -> String {
        format!("threads/{}", self.id)
    }

    /// Directory that uploaded avatars live in
    pub fn avatar_directory(&self, disk: &str) -> AssetDirectory {
        AssetDirectory {
            disk: disk.to_string(),
            path: format!("{}/avatar", self.storage_directory()),
        }
    }

    pub fn participant(&self, provider_id: &str) -> Option<&Participant> {
        self.participants
            .iter()
            .find(|p| p.provider_id == provider_id)
    }

    /// For private threads: the participant that is not `viewer_id`
    pub fn recipient_for(&self, viewer_id: &str) -> Option<&Participant> {
        self.participants
            .iter()
            .find(|p| p.provider_id != viewer_id)
    }
}

/// Logical location of an asset directory on a storage disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetDirectory {
    pub disk: String,
    pub path: String,
}

impl AssetDirectory {
    /// Path of a file inside this directory
    pub fn file(&self, name: &str) -> AssetPath {
        AssetPath {
            disk: self.disk.clone(),
            path: format!("{}/{}", self.path, name),
        }
    }
}

/// Logical location of a single asset
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetPath {
    pub disk: String,
    pub path: String,
}

impl std::fmt::Display for AssetPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.disk, self.path)
    }
}
