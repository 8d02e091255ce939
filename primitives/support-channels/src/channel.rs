//! Channel snapshot types shared by the directory client, selector, and driver.

use serde::Deserialize;
use std::fmt;

/// Opaque Slack channel identifier (e.g. `C024BE91L`).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize)]
#[serde(transparent)]
pub struct ChannelId(String);

impl ChannelId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ChannelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A channel as listed by the directory, fetched once per run.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Channel {
    pub id: ChannelId,
    pub name: String,
    #[serde(default)]
    pub is_member: bool,
    /// Shared with an external organization.
    #[serde(default)]
    pub is_ext_shared: bool,
    #[serde(default)]
    pub is_archived: bool,
}

impl Channel {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: ChannelId::new(id),
            name: name.into(),
            is_member: false,
            is_ext_shared: false,
            is_archived: false,
        }
    }

    pub fn member(mut self, is_member: bool) -> Self {
        self.is_member = is_member;
        self
    }

    pub fn ext_shared(mut self, is_ext_shared: bool) -> Self {
        self.is_ext_shared = is_ext_shared;
        self
    }

    pub fn archived(mut self, is_archived: bool) -> Self {
        self.is_archived = is_archived;
        self
    }
}

/// Whether a run joins or leaves support channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    Join,
    Leave,
}

impl RunMode {
    /// Verb used in progress output ("joining", "leaving").
    pub fn progressive(self) -> &'static str {
        match self {
            Self::Join => "joining",
            Self::Leave => "leaving",
        }
    }

    pub fn infinitive(self) -> &'static str {
        match self {
            Self::Join => "join",
            Self::Leave => "leave",
        }
    }
}

/// Who the credential belongs to, as reported by `authenticate`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Identity {
    pub user: String,
    pub team: String,
    pub user_id: String,
    pub team_id: String,
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_slack_channel_with_missing_flags() {
        let channel: Channel =
            serde_json::from_value(serde_json::json!({ "id": "C1", "name": "_acme" })).unwrap();
        assert_eq!(channel, Channel::new("C1", "_acme"));
    }

    #[test]
    fn deserializes_slack_channel_flags() {
        let channel: Channel = serde_json::from_value(serde_json::json!({
            "id": "C2",
            "name": "_globex",
            "is_member": true,
            "is_ext_shared": true,
            "is_archived": false,
            "num_members": 12
        }))
        .unwrap();
        assert!(channel.is_member);
        assert!(channel.is_ext_shared);
        assert_eq!(channel.id.as_str(), "C2");
    }
}
