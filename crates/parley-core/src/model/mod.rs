pub mod avatar;
pub mod call;
pub mod events;
pub mod provider;
pub mod thread;

pub use avatar::{AvatarChange, AvatarUpload};
pub use call::Call;
pub use events::DomainEvent;
pub use provider::Provider;
pub use thread::{AssetDirectory, AssetPath, Participant, Thread, ThreadType};
