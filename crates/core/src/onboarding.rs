//! "Have I seen this" onboarding flags.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OnboardingFlag {
    SeenWelcome,
    SeenTutorial,
    SeenFirstEdit,
    HideSuggestions,
}

impl OnboardingFlag {
    pub const ALL: [OnboardingFlag; 4] = [
        OnboardingFlag::SeenWelcome,
        OnboardingFlag::SeenTutorial,
        OnboardingFlag::SeenFirstEdit,
        OnboardingFlag::HideSuggestions,
    ];

    /// Key the flag is persisted under.
    pub fn storage_key(self) -> &'static str {
        match self {
            OnboardingFlag::SeenWelcome => "evolv_seen_welcome",
            OnboardingFlag::SeenTutorial => "evolv_seen_tutorial",
            OnboardingFlag::SeenFirstEdit => "evolv_seen_first_edit",
            OnboardingFlag::HideSuggestions => "evolv_hide_suggestions",
        }
    }

    /// Parse either the storage key or the snake_case name.
    pub fn parse(value: &str) -> Result<Self, CoreError> {
        OnboardingFlag::ALL
            .into_iter()
            .find(|f| {
                f.storage_key() == value
                    || f.storage_key().strip_prefix("evolv_") == Some(value)
            })
            .ok_or_else(|| CoreError::Validation(format!("Unknown onboarding flag '{value}'")))
    }
}

/// Current state of every flag for one store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OnboardingFlags {
    pub seen_welcome: bool,
    pub seen_tutorial: bool,
    pub seen_first_edit: bool,
    pub hide_suggestions: bool,
}

impl OnboardingFlags {
    /// Build from the set of dismissed storage keys.
    pub fn from_keys<'a>(keys: impl IntoIterator<Item = &'a str>) -> Self {
        let mut flags = OnboardingFlags::default();
        for key in keys {
            if let Ok(flag) = OnboardingFlag::parse(key) {
                flags.set(flag);
            }
        }
        flags
    }

    pub fn set(&mut self, flag: OnboardingFlag) {
        match flag {
            OnboardingFlag::SeenWelcome => self.seen_welcome = true,
            OnboardingFlag::SeenTutorial => self.seen_tutorial = true,
            OnboardingFlag::SeenFirstEdit => self.seen_first_edit = true,
            OnboardingFlag::HideSuggestions => self.hide_suggestions = true,
        }
    }

    pub fn is_set(&self, flag: OnboardingFlag) -> bool {
        match flag {
            OnboardingFlag::SeenWelcome => self.seen_welcome,
            OnboardingFlag::SeenTutorial => self.seen_tutorial,
            OnboardingFlag::SeenFirstEdit => self.seen_first_edit,
            OnboardingFlag::HideSuggestions => self.hide_suggestions,
        }
    }
}
