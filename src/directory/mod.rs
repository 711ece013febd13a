//! Host directory lookups
//!
//! The host owns user and channel directories; the logger only reads them to
//! enrich records. Both lookups may come back empty, in which case the engine
//! falls back to what the cached snapshot carries.

use std::collections::HashMap;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Channel data resolved from the host
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelInfo {
    #[serde(default)]
    pub name: String,
    #[serde(default, alias = "guildId")]
    pub guild_id: Option<String>,
}

impl ChannelInfo {
    pub fn new(name: &str, guild_id: Option<&str>) -> Self {
        Self {
            name: name.to_string(),
            guild_id: guild_id.map(str::to_string),
        }
    }
}

/// User data resolved from the host
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserInfo {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub discriminator: String,
}

impl UserInfo {
    pub fn new(username: &str, discriminator: &str) -> Self {
        Self {
            username: username.to_string(),
            discriminator: discriminator.to_string(),
        }
    }
}

/// Read-only lookups into the host's directories
pub trait Directory: Send + Sync {
    fn channel(&self, channel_id: &str) -> Option<ChannelInfo>;

    fn user(&self, user_id: &str) -> Option<UserInfo>;
}

/// Directory used when the host exposes none
#[derive(Debug, Clone, Copy, Default)]
pub struct NoDirectory;

impl Directory for NoDirectory {
    fn channel(&self, _channel_id: &str) -> Option<ChannelInfo> {
        None
    }

    fn user(&self, _user_id: &str) -> Option<UserInfo> {
        None
    }
}

/// Shape accepted by [`StaticDirectory::load_value`]
#[derive(Debug, Default, Deserialize)]
struct DirectorySeed {
    #[serde(default)]
    channels: HashMap<String, ChannelInfo>,
    #[serde(default)]
    users: HashMap<String, UserInfo>,
}

/// In-memory directory, fed by the host driver or by tests
#[derive(Debug, Default)]
pub struct StaticDirectory {
    channels: RwLock<HashMap<String, ChannelInfo>>,
    users: RwLock<HashMap<String, UserInfo>>,
}

impl StaticDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_channel(&self, channel_id: &str, info: ChannelInfo) {
        self.channels.write().insert(channel_id.to_string(), info);
    }

    pub fn insert_user(&self, user_id: &str, info: UserInfo) {
        self.users.write().insert(user_id.to_string(), info);
    }

    /// Merge `{"channels": {id: {...}}, "users": {id: {...}}}` into the directory
    ///
    /// Returns the number of entries added or replaced.
    pub fn load_value(&self, value: &Value) -> serde_json::Result<usize> {
        let seed: DirectorySeed = serde_json::from_value(value.clone())?;
        let added = seed.channels.len() + seed.users.len();
        self.channels.write().extend(seed.channels);
        self.users.write().extend(seed.users);
        Ok(added)
    }
}

impl Directory for StaticDirectory {
    fn channel(&self, channel_id: &str) -> Option<ChannelInfo> {
        self.channels.read().get(channel_id).cloned()
    }

    fn user(&self, user_id: &str) -> Option<UserInfo> {
        self.users.read().get(user_id).cloned()
    }
}
