use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

use mandel6_core::{CenterTable, EvalParams, SessionParams};
use mandel6_render::{ColorParams, EvalMode};

// ---------------------------------------------------------------------------
// Application preferences
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppPreferences {
    #[serde(default = "default_window_width")]
    pub window_width: f32,
    #[serde(default = "default_window_height")]
    pub window_height: f32,
    #[serde(default = "default_true")]
    pub restore_last_session: bool,
    #[serde(default)]
    pub last_session: Option<SessionParams>,
    /// Center table from the last session. Defaults to the six-copy layout.
    #[serde(default)]
    pub centers: CenterTable,
    #[serde(default)]
    pub eval: EvalParams,
    #[serde(default)]
    pub colors: ColorParams,
    #[serde(default)]
    pub mode: EvalMode,
    /// Screen pixels per evaluated point along each axis.
    #[serde(default = "default_resolution_divisor")]
    pub resolution_divisor: u32,
    /// Scale of centers added with shift-click, relative to the visible
    /// short-axis span.
    #[serde(default = "default_new_center_scale")]
    pub new_center_scale: f64,
}

fn default_window_width() -> f32 {
    1280.0
}
fn default_window_height() -> f32 {
    720.0
}
fn default_true() -> bool {
    true
}
fn default_resolution_divisor() -> u32 {
    1
}
fn default_new_center_scale() -> f64 {
    0.25
}

impl Default for AppPreferences {
    fn default() -> Self {
        Self {
            window_width: default_window_width(),
            window_height: default_window_height(),
            restore_last_session: true,
            last_session: None,
            centers: CenterTable::default(),
            eval: EvalParams::default(),
            colors: ColorParams::default(),
            mode: EvalMode::default(),
            resolution_divisor: default_resolution_divisor(),
            new_center_scale: default_new_center_scale(),
        }
    }
}

impl AppPreferences {
    /// Load preferences from next to the executable, falling back to defaults.
    pub fn load() -> Self {
        Self::load_from(&config_path())
    }

    fn load_from(path: &Path) -> Self {
        if path.exists() {
            match fs::read_to_string(path) {
                Ok(json) => match serde_json::from_str::<AppPreferences>(&json) {
                    Ok(mut prefs) => {
                        info!("Loaded preferences from {}", path.display());
                        prefs.resolution_divisor = prefs.resolution_divisor.max(1);
                        return prefs;
                    }
                    Err(e) => {
                        error!("Failed to parse preferences: {e}");
                    }
                },
                Err(e) => {
                    error!("Failed to read preferences file: {e}");
                }
            }
        } else {
            debug!("No preferences file at {}", path.display());
        }
        Self::default()
    }

    /// Persist preferences to disk.
    pub fn save(&self) {
        self.save_to(&config_path());
    }

    fn save_to(&self, path: &Path) {
        if let Some(parent) = path.parent() {
            if let Err(e) = fs::create_dir_all(parent) {
                error!("Failed to create config directory: {e}");
                return;
            }
        }
        match serde_json::to_string_pretty(self) {
            Ok(json) => {
                if let Err(e) = fs::write(path, &json) {
                    error!("Failed to write preferences: {e}");
                } else {
                    debug!("Saved preferences");
                }
            }
            Err(e) => error!("Failed to serialize preferences: {e}"),
        }
    }
}

// ---------------------------------------------------------------------------
// Locations
// ---------------------------------------------------------------------------

/// Directory containing the running executable, or the working directory
/// when that cannot be determined. Everything the app writes lives here.
pub fn app_directory() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
        .or_else(|| std::env::current_dir().ok())
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Where exported PNG frames go.
pub fn images_directory() -> PathBuf {
    app_directory().join("images")
}

fn config_path() -> PathBuf {
    app_directory().join("preferences.json")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_use_defaults() {
        let prefs: AppPreferences = serde_json::from_str("{}").unwrap();
        assert_eq!(prefs.eval, EvalParams::default());
        assert_eq!(prefs.centers.len(), 6);
        assert_eq!(prefs.mode, EvalMode::Progressive);
        assert_eq!(prefs.resolution_divisor, 1);
        assert!(prefs.last_session.is_none());
    }

    #[test]
    fn save_and_load_round_trip() {
        let dir = std::env::temp_dir().join("mandel6_test_prefs");
        let path = dir.join("preferences.json");
        let mut prefs = AppPreferences::default();
        prefs.last_session = Some(SessionParams {
            x: 1.0,
            y: -2.0,
            z: 30.0,
        });
        prefs.mode = EvalMode::FullRecompute;
        prefs.centers = CenterTable::classic();
        prefs.save_to(&path);

        let loaded = AppPreferences::load_from(&path);
        assert_eq!(loaded.last_session, prefs.last_session);
        assert_eq!(loaded.mode, EvalMode::FullRecompute);
        assert_eq!(loaded.centers.len(), 1);

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn invalid_file_falls_back_to_defaults() {
        let dir = std::env::temp_dir().join("mandel6_test_prefs_invalid");
        let _ = fs::create_dir_all(&dir);
        let path = dir.join("preferences.json");
        fs::write(&path, r#"{"eval": {"max_iterations": 0, "draw_range": 10, "candidate_count": 4, "first_tick_burst": 10}}"#).unwrap();
        let loaded = AppPreferences::load_from(&path);
        assert_eq!(loaded.eval, EvalParams::default());
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn non_positive_session_zoom_is_rejected() {
        let json = r#"{"last_session": {"x": 0.0, "y": 0.0, "z": 0.0}}"#;
        assert!(serde_json::from_str::<AppPreferences>(json).is_err());

        let dir = std::env::temp_dir().join("mandel6_test_prefs_session");
        let _ = fs::create_dir_all(&dir);
        let path = dir.join("preferences.json");
        fs::write(&path, json).unwrap();
        let loaded = AppPreferences::load_from(&path);
        assert!(loaded.last_session.is_none());
        let _ = std::fs::remove_dir_all(&dir);
    }
}
