//! Game settings - user-chosen options and environment overrides.

use serde::{Deserialize, Serialize};

use crate::types::{Difficulty, GameMode, PieceShape, VisualTheme, DEFAULT_TIME_LIMIT_SECS};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameSettings {
    pub game_mode: GameMode,
    pub difficulty: Difficulty,
    pub rotation_enabled: bool,
    pub time_limit_secs: u32,
    pub piece_shape: PieceShape,
    pub visual_theme: VisualTheme,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            game_mode: GameMode::Classic,
            difficulty: Difficulty::Easy,
            rotation_enabled: false,
            time_limit_secs: DEFAULT_TIME_LIMIT_SECS,
            piece_shape: PieceShape::Classic,
            visual_theme: VisualTheme::Classic,
        }
    }
}

impl GameSettings {
    /// Whether completion also requires every piece upright
    pub fn rotation_rule(&self) -> bool {
        self.game_mode == GameMode::Challenge || self.rotation_enabled
    }

    /// Whether new puzzles scatter rotations
    pub fn scatter_rotation(&self) -> bool {
        self.rotation_rule()
    }

    /// Limit handed to the session; only timed games have one
    pub fn time_limit(&self) -> Option<u32> {
        match self.game_mode {
            GameMode::Timed => Some(self.time_limit_secs),
            _ => None,
        }
    }

    /// Defaults overridden by `JIGSAW_DIFFICULTY`, `JIGSAW_MODE`,
    /// `JIGSAW_ROTATION` and `JIGSAW_TIME_LIMIT`. Unparsable values are
    /// ignored.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`GameSettings::from_env`] with an injectable source
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut settings = Self::default();

        if let Some(raw) = lookup("JIGSAW_DIFFICULTY") {
            match Difficulty::from_str(&raw) {
                Some(d) => settings.difficulty = d,
                None => tracing::warn!(value = %raw, "ignoring JIGSAW_DIFFICULTY"),
            }
        }
        if let Some(raw) = lookup("JIGSAW_MODE") {
            match GameMode::from_str(&raw) {
                Some(m) => settings.game_mode = m,
                None => tracing::warn!(value = %raw, "ignoring JIGSAW_MODE"),
            }
        }
        if let Some(raw) = lookup("JIGSAW_ROTATION") {
            settings.rotation_enabled = parse_flag(&raw);
        }
        if let Some(raw) = lookup("JIGSAW_TIME_LIMIT") {
            match raw.trim().parse::<u32>() {
                Ok(secs) if secs > 0 => settings.time_limit_secs = secs,
                _ => tracing::warn!(value = %raw, "ignoring JIGSAW_TIME_LIMIT"),
            }
        }

        settings
    }
}

fn parse_flag(raw: &str) -> bool {
    matches!(raw.trim().to_lowercase().as_str(), "1" | "true" | "yes" | "on")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_without_env() {
        let s = GameSettings::from_lookup(|_| None);
        assert_eq!(s, GameSettings::default());
        assert!(!s.rotation_rule());
        assert_eq!(s.time_limit(), None);
    }

    #[test]
    fn env_overrides() {
        let s = GameSettings::from_lookup(lookup(&[
            ("JIGSAW_DIFFICULTY", "hard"),
            ("JIGSAW_MODE", "timed"),
            ("JIGSAW_TIME_LIMIT", "90"),
            ("JIGSAW_ROTATION", "true"),
        ]));
        assert_eq!(s.difficulty, Difficulty::Hard);
        assert_eq!(s.game_mode, GameMode::Timed);
        assert_eq!(s.time_limit(), Some(90));
        assert!(s.rotation_rule());
    }

    #[test]
    fn bad_values_fall_back() {
        let s = GameSettings::from_lookup(lookup(&[
            ("JIGSAW_DIFFICULTY", "9x9"),
            ("JIGSAW_MODE", "zen"),
            ("JIGSAW_TIME_LIMIT", "-4"),
        ]));
        assert_eq!(s, GameSettings::default());
    }

    #[test]
    fn challenge_implies_rotation_rule() {
        let s = GameSettings {
            game_mode: GameMode::Challenge,
            ..GameSettings::default()
        };
        assert!(s.rotation_rule());
    }
}
