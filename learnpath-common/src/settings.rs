//! Learner settings
//!
//! Profile fields plus two ordered key-value maps: notification toggles and
//! learning preferences. Only known keys may be set; preference values are
//! checked against the catalog in [`PREFERENCE_METADATA`].

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::{Error, Result};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub bio: String,
    #[serde(default = "default_timezone")]
    pub timezone: String,
    #[serde(default = "default_language")]
    pub language: String,
}

fn default_timezone() -> String {
    "UTC".to_string()
}

fn default_language() -> String {
    "en".to_string()
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            name: "Learning Explorer".to_string(),
            email: "explorer@learnpath.com".to_string(),
            bio: "Passionate about continuous learning and skill development.".to_string(),
            timezone: "UTC-5".to_string(),
            language: default_language(),
        }
    }
}

/// Notification toggles, in display order of their keys
const NOTIFICATION_DEFAULTS: [(&str, bool); 5] = [
    ("courseUpdates", true),
    ("newLessons", true),
    ("quizReminders", false),
    ("achievements", true),
    ("weeklyProgress", true),
];

/// Preference metadata definition
pub struct PreferenceMetadata {
    pub key: &'static str,
    pub default_value: &'static str,
    /// Accepted values
    pub allowed: &'static [&'static str],
    pub description: &'static str,
}

pub const PREFERENCE_METADATA: [PreferenceMetadata; 5] = [
    PreferenceMetadata {
        key: "autoplay",
        default_value: "true",
        allowed: &["true", "false"],
        description: "Automatically play the next video in a lesson",
    },
    PreferenceMetadata {
        key: "playbackSpeed",
        default_value: "1x",
        allowed: &["0.5x", "0.75x", "1x", "1.25x", "1.5x"],
        description: "Video playback speed",
    },
    PreferenceMetadata {
        key: "captions",
        default_value: "false",
        allowed: &["true", "false"],
        description: "Show subtitles for video lessons",
    },
    PreferenceMetadata {
        key: "theme",
        default_value: "light",
        allowed: &["light", "dark"],
        description: "Interface colour theme",
    },
    PreferenceMetadata {
        key: "emailDigest",
        default_value: "weekly",
        allowed: &["daily", "weekly", "monthly"],
        description: "How often progress summaries are emailed",
    },
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LearnerSettings {
    pub profile: Profile,
    pub notifications: BTreeMap<String, bool>,
    pub preferences: BTreeMap<String, String>,
}

impl Default for LearnerSettings {
    fn default() -> Self {
        Self {
            profile: Profile::default(),
            notifications: NOTIFICATION_DEFAULTS
                .iter()
                .map(|(key, enabled)| (key.to_string(), *enabled))
                .collect(),
            preferences: PREFERENCE_METADATA
                .iter()
                .map(|meta| (meta.key.to_string(), meta.default_value.to_string()))
                .collect(),
        }
    }
}

impl LearnerSettings {
    /// Replace the profile
    ///
    /// # Errors
    /// `InvalidInput` if name is blank or email lacks an `@`.
    pub fn set_profile(&mut self, profile: Profile) -> Result<()> {
        if profile.name.trim().is_empty() {
            return Err(Error::InvalidInput("Profile name must not be empty".to_string()));
        }
        if !profile.email.contains('@') {
            return Err(Error::InvalidInput(format!("Invalid email: {}", profile.email)));
        }
        self.profile = profile;
        Ok(())
    }

    pub fn set_notification(&mut self, key: &str, enabled: bool) -> Result<()> {
        match self.notifications.get_mut(key) {
            Some(slot) => {
                *slot = enabled;
                Ok(())
            }
            None => Err(Error::InvalidInput(format!("Unknown notification: {}", key))),
        }
    }

    pub fn set_preference(&mut self, key: &str, value: &str) -> Result<()> {
        let meta = PREFERENCE_METADATA
            .iter()
            .find(|m| m.key == key)
            .ok_or_else(|| Error::InvalidInput(format!("Unknown preference: {}", key)))?;

        if !meta.allowed.contains(&value) {
            return Err(Error::InvalidInput(format!(
                "Invalid value '{}' for {} (expected one of: {})",
                value,
                key,
                meta.allowed.join(", ")
            )));
        }

        self.preferences.insert(key.to_string(), value.to_string());
        Ok(())
    }
}
