//! Decides whether an avatar change is a no-op and what it leaves behind

use crate::config::MessengerConfig;
use crate::model::AvatarChange;

/// Whether applying `change` to a thread whose avatar is `current` changes
/// anything.
///
/// Selecting the default the thread already uses is the only no-op. An
/// upload always counts as a change, even if its bytes match the current
/// file: the fresh upload itself is the signal.
pub fn avatar_changed(current: Option<&str>, change: &AvatarChange) -> bool {
    match change {
        AvatarChange::Upload(_) => true,
        AvatarChange::Default(target) => current != Some(target.as_str()),
    }
}

/// The previous avatar file that must be removed once a change is committed,
/// or `None` if there is nothing to remove or it is a shared default.
pub fn cleanup_target<'a>(original: Option<&'a str>, config: &MessengerConfig) -> Option<&'a str> {
    original.filter(|image| !image.is_empty() && !config.is_protected_default(image))
}
