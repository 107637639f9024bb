use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

/// Routing hint sent with every analysis request.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    #[default]
    Quick,
    Image,
    DeepSearch,
    Expert,
}

impl Mode {
    pub const ALL: [Mode; 4] = [Mode::Quick, Mode::Image, Mode::DeepSearch, Mode::Expert];

    /// Wire value for the `mode` form field.
    pub fn as_str(self) -> &'static str {
        match self {
            Mode::Quick => "quick",
            Mode::Image => "image",
            Mode::DeepSearch => "deep_search",
            Mode::Expert => "expert",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Mode::Quick => "Quick Consult",
            Mode::Image => "Image Analysis",
            Mode::DeepSearch => "Deep Search",
            Mode::Expert => "Expert Mode",
        }
    }
}

/// Evidence reference attached to an assistant answer.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Source {
    pub title: String,
    pub url: String,
    pub score: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Message {
    pub id: String,
    pub role: Role,
    pub content: String,
    /// Data URL preview, only on user messages sent with an attachment.
    pub image: Option<String>,
    pub timestamp: OffsetDateTime,
    pub confidence: Option<f64>,
    pub sources: Vec<Source>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    #[default]
    Dark,
    Light,
}

impl ThemeMode {
    pub fn toggled(self) -> Self {
        match self {
            ThemeMode::Dark => ThemeMode::Light,
            ThemeMode::Light => ThemeMode::Dark,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mode_wire_values_match_serde() {
        for mode in Mode::ALL {
            let encoded = serde_json::to_string(&mode).unwrap();
            assert_eq!(encoded, format!("\"{}\"", mode.as_str()));
        }
    }

    #[test]
    fn theme_toggle_flips() {
        assert_eq!(ThemeMode::Dark.toggled(), ThemeMode::Light);
        assert_eq!(ThemeMode::Light.toggled(), ThemeMode::Dark);
    }
}
