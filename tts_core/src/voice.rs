use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// Voices the synthesis provider is asked to speak with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Voice {
    #[default]
    DefaultMale,
    DefaultFemale,
    AccentUkMale,
}

impl Voice {
    pub const ALL: [Voice; 3] = [Voice::DefaultMale, Voice::DefaultFemale, Voice::AccentUkMale];

    /// Identifier used on the wire (`default-male`, ...)
    pub fn id(self) -> &'static str {
        match self {
            Voice::DefaultMale => "default-male",
            Voice::DefaultFemale => "default-female",
            Voice::AccentUkMale => "accent-uk-male",
        }
    }

    /// Human readable label for voice pickers
    pub fn display_name(self) -> &'static str {
        match self {
            Voice::DefaultMale => "Default Male",
            Voice::DefaultFemale => "Default Female",
            Voice::AccentUkMale => "UK Male",
        }
    }
}

impl fmt::Display for Voice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown voice '{0}'. Available voices: default-male, default-female, accent-uk-male")]
pub struct UnknownVoice(pub String);

impl FromStr for Voice {
    type Err = UnknownVoice;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Voice::ALL
            .into_iter()
            .find(|v| v.id() == s.trim())
            .ok_or_else(|| UnknownVoice(s.to_string()))
    }
}
