//! Request-level validation of avatar changes
//!
//! Runs before the pipeline touches storage or persistence, so a rejected
//! request leaves no trace.

use crate::config::MessengerConfig;
use crate::errors::{ParleyError, Result};
use crate::model::AvatarChange;

/// # Errors
///
/// `InvalidAvatar` when a default is not one of the configured defaults, or
/// an upload is empty, too large or not an accepted image type.
pub fn validate_avatar_change(change: &AvatarChange, config: &MessengerConfig) -> Result<()> {
    match change {
        AvatarChange::Default(name) => {
            if !config.is_protected_default(name) {
                return Err(ParleyError::InvalidAvatar {
                    reason: format!("'{}' is not a default avatar", name),
                });
            }
        }
        AvatarChange::Upload(upload) => {
            if upload.bytes.is_empty() {
                return Err(ParleyError::InvalidAvatar {
                    reason: "uploaded image is empty".to_string(),
                });
            }
            let accepted = upload
                .extension()
                .map(|ext| config.files.avatar_extensions.iter().any(|a| *a == ext))
                .unwrap_or(false);
            if !accepted {
                return Err(ParleyError::InvalidAvatar {
                    reason: format!("'{}' is not an accepted image type", upload.file_name),
                });
            }
            if upload.size_kb() > config.files.avatar_max_kb {
                return Err(ParleyError::InvalidAvatar {
                    reason: format!(
                        "image is {} KB, limit is {} KB",
                        upload.size_kb(),
                        config.files.avatar_max_kb
                    ),
                });
            }
        }
    }
    Ok(())
}
