use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    Dark,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorScheme {
    Default,
    Blue,
    Green,
    Purple,
    Orange,
    Custom,
}

/// Cosmetic preferences shared by every view. Stored independently of the
/// filter persistence flag, so toggling one never disturbs the other.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThemePreferences {
    pub theme: Theme,
    pub color_scheme: ColorScheme,
    pub custom_color: String,
}

/// Partial update; absent fields keep their current value.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ThemeUpdate {
    pub theme: Option<Theme>,
    pub color_scheme: Option<ColorScheme>,
    pub custom_color: Option<String>,
}

impl Default for ThemePreferences {
    fn default() -> Self {
        Self {
            theme: Theme::System,
            color_scheme: ColorScheme::Default,
            custom_color: "#2563eb".to_string(),
        }
    }
}

impl ThemePreferences {
    pub fn apply_update(&mut self, update: ThemeUpdate) {
        if let Some(theme) = update.theme {
            self.theme = theme;
        }
        if let Some(color_scheme) = update.color_scheme {
            self.color_scheme = color_scheme;
        }
        if let Some(custom_color) = update.custom_color {
            self.custom_color = custom_color;
        }
    }
}
