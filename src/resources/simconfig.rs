//! Simulation configuration file.
//!
//! Manages world, physics and combat settings loaded from an INI file. Defaults
//! are always valid, so a missing or partial file is never fatal.
//!
//! # Configuration File Format
//!
//! ```ini
//! [world]
//! width = 800
//! height = 600
//! gravity_x = 0
//! gravity_y = 980
//!
//! [physics]
//! air_resistance = 0.99
//! max_velocity = 1000
//! restitution = 0.5
//! cell_size = 64
//!
//! [combat]
//! combo_window = 1.5
//! combo_multiplier = 1.1
//! invulnerability_grace = 0.3
//! ```

use configparser::ini::Ini;
use log::info;
use std::path::PathBuf;

use crate::resources::combatconfig::CombatConfig;
use crate::resources::physicsconfig::PhysicsConfig;

const DEFAULT_CONFIG_PATH: &str = "./brawlcore.ini";

/// Physics and combat settings plus the file they came from.
///
/// The two halves are inserted into the world as separate
/// [`PhysicsConfig`] and [`CombatConfig`] resources.
#[derive(Debug, Clone, PartialEq)]
pub struct SimConfig {
    pub physics: PhysicsConfig,
    pub combat: CombatConfig,
    /// Path to the configuration file.
    pub config_path: PathBuf,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl SimConfig {
    /// Create a configuration with default values.
    pub fn new() -> Self {
        Self {
            physics: PhysicsConfig::default(),
            combat: CombatConfig::default(),
            config_path: PathBuf::from(DEFAULT_CONFIG_PATH),
        }
    }

    /// Create a configuration with a custom config file path.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: path.into(),
            ..Self::new()
        }
    }

    /// Load configuration from the INI file.
    ///
    /// Missing values retain their current (default) values.
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_from_file(&mut self) -> Result<(), String> {
        let mut ini = Ini::new();
        ini.load(&self.config_path)
            .map_err(|e| format!("Failed to load config file: {}", e))?;
        self.apply(&ini);

        info!(
            "Loaded config: world {}x{}, gravity ({}, {}), cell size {}",
            self.physics.world_width,
            self.physics.world_height,
            self.physics.gravity.x,
            self.physics.gravity.y,
            self.physics.cell_size
        );

        Ok(())
    }

    /// Parse INI text directly. Used for embedded presets and tests.
    pub fn load_from_str(&mut self, contents: &str) -> Result<(), String> {
        let mut ini = Ini::new();
        ini.read(contents.to_string())
            .map_err(|e| format!("Failed to parse config: {}", e))?;
        self.apply(&ini);
        Ok(())
    }

    fn apply(&mut self, ini: &Ini) {
        self.physics.read_ini(ini);
        self.combat.read_ini(ini);
    }

    /// Save configuration to the INI file.
    ///
    /// Creates the file if it doesn't exist.
    pub fn save_to_file(&self) -> Result<(), String> {
        let mut ini = Ini::new();
        self.physics.write_ini(&mut ini);
        self.combat.write_ini(&mut ini);

        ini.write(&self.config_path)
            .map_err(|e| format!("Failed to save config file: {}", e))?;

        info!("Saved config to {:?}", self.config_path);

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_ini_keeps_defaults_for_missing_keys() {
        let mut config = SimConfig::new();
        config
            .load_from_str("[world]\nheight = 400\n\n[combat]\ncombo_window = 2.5\n")
            .unwrap();
        assert_eq!(config.physics.world_height, 400.0);
        assert_eq!(config.physics.world_width, 800.0);
        assert_eq!(config.combat.combo_window, 2.5);
        assert_eq!(config.combat.combo_multiplier, 1.1);
    }

    #[test]
    fn unusable_cell_size_keeps_the_default() {
        for bad in ["0", "-32", "0.001", "inf", "nan"] {
            let mut config = SimConfig::new();
            config
                .load_from_str(&format!("[physics]\ncell_size = {bad}\nrestitution = 0.25\n"))
                .unwrap();
            assert_eq!(config.physics.cell_size, 64.0, "cell_size = {bad}");
            assert_eq!(config.physics.restitution, 0.25);
        }

        let mut config = SimConfig::new();
        config.load_from_str("[physics]\ncell_size = 16\n").unwrap();
        assert_eq!(config.physics.cell_size, 16.0);
    }

    #[test]
    fn missing_file_is_an_error() {
        let mut config = SimConfig::with_path("./definitely/not/here.ini");
        assert!(config.load_from_file().is_err());
        assert_eq!(config.physics, PhysicsConfig::default());
    }

    #[test]
    fn save_then_load_preserves_values() {
        let path = std::env::temp_dir().join(format!("brawlcore_cfg_{}.ini", std::process::id()));
        let mut config = SimConfig::with_path(&path);
        config.physics.cell_size = 32.0;
        config.physics.gravity.y = 500.0;
        config.combat.critical_multiplier = 3.0;
        config.save_to_file().unwrap();

        let mut loaded = SimConfig::with_path(&path);
        loaded.load_from_file().unwrap();
        let _ = std::fs::remove_file(&path);

        assert_eq!(loaded.physics.cell_size, 32.0);
        assert_eq!(loaded.physics.gravity.y, 500.0);
        assert_eq!(loaded.combat.critical_multiplier, 3.0);
    }
}
