//! API route builders shared by resources and collection metadata

use crate::config::MessengerConfig;
use crate::pagination::CollectionKind;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Routes {
    prefix: String,
}

impl Routes {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn from_config(config: &MessengerConfig) -> Self {
        Self::new(config.api.route_prefix.clone())
    }

    /// `{prefix}/threads/{thread}/avatar/{size}/{image}`
    pub fn thread_avatar(&self, thread_id: &str, size: &str, image: &str) -> String {
        format!(
            "{}/threads/{}/avatar/{}/{}",
            self.prefix, thread_id, size, image
        )
    }

    /// Route serving the page that starts after `page_id`
    pub fn collection_page(&self, kind: &CollectionKind, page_id: &str) -> String {
        match kind {
            CollectionKind::Threads => format!("{}/threads/page/{}", self.prefix, page_id),
            CollectionKind::Privates => format!("{}/privates/page/{}", self.prefix, page_id),
            CollectionKind::Groups => format!("{}/groups/page/{}", self.prefix, page_id),
            CollectionKind::Calls { thread_id } => format!(
                "{}/threads/{}/calls/page/{}",
                self.prefix, thread_id, page_id
            ),
        }
    }
}
