//! Post and comment authors.

use agora_commerce::UserId;
use serde::{Deserialize, Serialize};

/// Public profile of a registered user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    pub id: UserId,
    pub email: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub nickname: Option<String>,
    #[serde(default)]
    pub avatar_url: Option<String>,
}

impl Author {
    pub fn new(id: impl Into<UserId>, email: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            email: email.into(),
            name: None,
            nickname: None,
            avatar_url: None,
        }
    }

    pub fn with_nickname(mut self, nickname: impl Into<String>) -> Self {
        self.nickname = Some(nickname.into());
        self
    }

    /// Name shown next to posts: nickname, then name, then email.
    pub fn display_name(&self) -> &str {
        self.nickname
            .as_deref()
            .or(self.name.as_deref())
            .unwrap_or(&self.email)
    }
}
