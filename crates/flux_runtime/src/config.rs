//! Engine configuration (flux.toml)
//!
//! Every section is optional. A document is layered over the built-in
//! presets, so a field missing from `[tilt.card]` keeps the card value.
//!
//! ```toml
//! [particles]
//! count = 60
//! seed = 42
//!
//! [particles.repulsion]
//! radius = 120.0
//!
//! [magnetic.button]
//! strength = 0.25
//!
//! [tilt.card]
//! rotate_x = 12.0
//! rotate_y = 12.0
//! ```

use flux_animation::SpringConfig;
use flux_fields::{CardGlowConfig, GlowConfig, LiftConfig, MagneticConfig, ParticleConfig, TiltConfig};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Top-level engine configuration
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub particles: ParticleConfig,
    pub magnetic: MagneticPresets,
    pub glow: GlowConfig,
    pub card_glow: CardGlowConfig,
    pub tilt: TiltPresets,
    pub lift: LiftConfig,
}

/// Magnetic presets by element kind
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MagneticPresets {
    pub button: MagneticConfig,
    pub orb: MagneticConfig,
}

impl Default for MagneticPresets {
    fn default() -> Self {
        Self {
            button: MagneticConfig::button(),
            orb: MagneticConfig::orb(),
        }
    }
}

/// Tilt presets by surface kind
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TiltPresets {
    pub hero: TiltConfig,
    pub section: TiltConfig,
    pub card: TiltConfig,
}

impl Default for TiltPresets {
    fn default() -> Self {
        Self {
            hero: TiltConfig::hero(),
            section: TiltConfig::section(),
            card: TiltConfig::card(),
        }
    }
}

impl EngineConfig {
    /// Parse a TOML document over the defaults and validate the result
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let overlay: toml::Table = source.parse()?;
        let mut merged = toml::Value::try_from(Self::default())?;
        overlay_table(&mut merged, overlay);

        let config: Self = merged.try_into()?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let source = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&source)?;
        tracing::debug!(path = %path.display(), "loaded engine config");
        Ok(config)
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Reject values the integrator or the fields cannot work with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.particles.count == 0 {
            return Err(invalid("particles.count must be at least 1"));
        }
        self.particles
            .validate()
            .map_err(|err| invalid(format!("particles: {err}")))?;

        for (name, magnet) in [
            ("magnetic.button", &self.magnetic.button),
            ("magnetic.orb", &self.magnetic.orb),
        ] {
            if !(magnet.strength > 0.0 && magnet.strength <= 1.0) {
                return Err(invalid(format!("{name}.strength must be in (0, 1]")));
            }
            check_spring(&format!("{name}.spring"), &magnet.spring)?;
        }

        if !(self.glow.reach > 0.0) {
            return Err(invalid("glow.reach must be positive"));
        }
        check_spring("glow.spring", &self.glow.spring)?;

        let card = &self.card_glow;
        if card.input.0 >= card.input.1 {
            return Err(invalid("card_glow.input must be increasing"));
        }
        if !(card.edge >= 0.0 && card.reflection >= 0.0) {
            return Err(invalid("card_glow travel must not be negative"));
        }
        check_spring("card_glow.spring", &card.spring)?;

        for (name, tilt) in [
            ("tilt.hero", &self.tilt.hero),
            ("tilt.section", &self.tilt.section),
            ("tilt.card", &self.tilt.card),
        ] {
            if tilt.input.0 >= tilt.input.1 {
                return Err(invalid(format!("{name}.input must be increasing")));
            }
            check_spring(&format!("{name}.spring"), &tilt.spring)?;
        }

        check_spring("lift.spring", &self.lift.spring)
    }
}

fn overlay_table(base: &mut toml::Value, overlay: toml::Table) {
    let toml::Value::Table(base) = base else {
        *base = toml::Value::Table(overlay);
        return;
    };
    for (key, value) in overlay {
        match (base.get_mut(&key), value) {
            (Some(existing @ toml::Value::Table(_)), toml::Value::Table(nested)) => {
                overlay_table(existing, nested)
            }
            (_, value) => {
                base.insert(key, value);
            }
        }
    }
}

fn invalid(message: impl Into<String>) -> ConfigError {
    ConfigError::Invalid(message.into())
}

fn check_spring(name: &str, spring: &SpringConfig) -> Result<(), ConfigError> {
    if spring.is_valid() {
        Ok(())
    } else {
        Err(invalid(format!(
            "{name}: stiffness must be positive and damping non-negative"
        )))
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use flux_core::Point;

    #[test]
    fn test_empty_document_uses_presets() {
        let config = EngineConfig::from_toml_str("").unwrap();
        assert_eq!(config, EngineConfig::default());
        assert_eq!(config.magnetic.orb, MagneticConfig::orb());
        assert_eq!(config.tilt.hero.depth, Some(20.0));
    }

    #[test]
    fn test_partial_sections_keep_defaults() {
        let config = EngineConfig::from_toml_str(
            r#"
            [particles]
            count = 12
            seed = 9

            [particles.repulsion]
            radius = 150.0

            [magnetic.button]
            strength = 0.5
            "#,
        )
        .unwrap();

        assert_eq!(config.particles.count, 12);
        assert_eq!(config.particles.seed, Some(9));
        assert_eq!(config.particles.repulsion.radius, 150.0);
        assert_eq!(config.particles.repulsion.strength, 80.0);
        assert_eq!(config.magnetic.button.strength, 0.5);
        assert_eq!(config.magnetic.button.spring, SpringConfig::standard());
        assert_eq!(config.card_glow, CardGlowConfig::default());
    }

    #[test]
    fn test_partial_preset_keeps_its_own_values() {
        let config = EngineConfig::from_toml_str(
            r#"
            [tilt.section]
            rotate_x = 6.0

            [magnetic.orb]
            strength = 0.2
            "#,
        )
        .unwrap();

        assert_eq!(config.tilt.section.rotate_x, 6.0);
        assert_eq!(config.tilt.section.rotate_y, 5.0);
        assert_eq!(config.tilt.section.depth, None);
        assert_eq!(config.magnetic.orb.spring, SpringConfig::drift());
    }

    #[test]
    fn test_rejects_bad_values() {
        for source in [
            "[particles]\ncount = 0",
            "[particles]\nsize = [6.0, 3.0]",
            "[particles.repulsion]\nradius = 0.0",
            "[magnetic.orb]\nstrength = 1.5",
            "[lift.spring]\nstiffness = -1.0\ndamping = 10.0",
            "[tilt.card]\ninput = [0.5, -0.5]",
            "[card_glow]\ninput = [0.5, -0.5]",
            "[card_glow]\nedge = -10.0",
        ] {
            let err = EngineConfig::from_toml_str(source).unwrap_err();
            assert!(matches!(err, ConfigError::Invalid(_)), "{source}: {err}");
        }
    }

    #[test]
    fn test_loaded_flat_tilts_have_no_depth() {
        let config = EngineConfig::from_toml_str("[tilt.card]\nrotate_x = 12.0").unwrap();
        assert_eq!(config.tilt.section.depth, None);
        assert_eq!(config.tilt.card.depth, None);

        let bottom_edge = Point::new(0.0, 1.0);
        assert_eq!(config.tilt.card.transform(bottom_edge).translate_z, 0.0);
        assert_eq!(config.tilt.hero.transform(bottom_edge).translate_z, 20.0);
    }

    #[test]
    fn test_parse_error() {
        let err = EngineConfig::from_toml_str("[particles\ncount = 3").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_defaults_survive_toml() {
        let text = EngineConfig::default().to_toml().unwrap();
        assert_eq!(EngineConfig::from_toml_str(&text).unwrap(), EngineConfig::default());
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = EngineConfig::load("/nonexistent/flux.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
