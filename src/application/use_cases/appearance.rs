use std::sync::Arc;

use crate::domain::error::Result;
use crate::domain::theme::{ColorScheme, Theme, ThemePreferences, ThemeUpdate};
use crate::infrastructure::storage::{keys, PreferenceStore};

/// Shared handle for reading and updating theme preferences. Views get this
/// handle injected instead of reaching for a global; the store keeps the three
/// theme keys fully independent of the filter persistence flag.
pub struct AppearanceService {
    store: Arc<PreferenceStore>,
}

impl AppearanceService {
    pub fn new(store: Arc<PreferenceStore>) -> Self {
        Self { store }
    }

    pub fn preferences(&self) -> ThemePreferences {
        let defaults = ThemePreferences::default();
        ThemePreferences {
            theme: self.store.get::<Theme>(keys::THEME).unwrap_or(defaults.theme),
            color_scheme: self
                .store
                .get::<ColorScheme>(keys::COLOR_SCHEME)
                .unwrap_or(defaults.color_scheme),
            custom_color: self
                .store
                .get::<String>(keys::CUSTOM_COLOR)
                .unwrap_or(defaults.custom_color),
        }
    }

    /// Apply a partial update and write all three keys back, the same way the
    /// browser UI re-saved every preference whenever one changed.
    pub fn update(&self, update: ThemeUpdate) -> Result<ThemePreferences> {
        let mut preferences = self.preferences();
        preferences.apply_update(update);

        self.store.set(keys::THEME, &preferences.theme)?;
        self.store.set(keys::COLOR_SCHEME, &preferences.color_scheme)?;
        self.store.set(keys::CUSTOM_COLOR, &preferences.custom_color)?;
        Ok(preferences)
    }
}
