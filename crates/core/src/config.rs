use crate::scene::SceneKind;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use validator::Validate;

/// Configuration that defines the size and shape of a lattice. The lattice
/// is fitted to the given canvas so that cells are as large as possible while
/// still fitting `columns` cells across.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct LatticeConfig {
    /// Width of the target canvas, in pixels
    #[validate(range(min = 16, max = 16384))]
    pub canvas_width: u32,

    /// Height of the target canvas, in pixels
    #[validate(range(min = 16, max = 16384))]
    pub canvas_height: u32,

    /// Desired number of columns. For the hex lattice this is always the
    /// horizontal count. For the square lattice it's the count along the
    /// canvas's *wider* axis. If the resulting lattice would blow the host
    /// surface's index budget, the lattice will use fewer columns than this.
    #[validate(range(min = 1, max = 4096))]
    pub columns: u32,

    /// Selects which pre-baked appearance cells are drawn with. The lattice
    /// never looks at this, it just holds it for whoever draws it.
    pub render_variant: u8,
}

impl Default for LatticeConfig {
    fn default() -> Self {
        Self {
            canvas_width: 1280,
            canvas_height: 960,
            columns: 20,
            render_variant: 1,
        }
    }
}

/// The two supported lattice topologies
#[derive(
    Copy,
    Clone,
    Debug,
    Display,
    Eq,
    PartialEq,
    EnumString,
    Serialize,
    Deserialize,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum LatticeKind {
    Square,
    Hex,
}

/// Top-level configuration for a modus session: what lattice to build, what
/// runs on it, and the seed for everything random. Two sessions with the same
/// config produce the same cells.
#[derive(Copy, Clone, Debug, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct ModusConfig {
    /// RNG seed for all randomized scene behavior.
    ///
    /// When deserializing a config, this field supports a few options:
    /// - If the value is an integer that fits into `u64`, use that value
    /// - If it's a string that can be parsed into a `u64`, use the parsed
    ///   value
    /// - If it's any other string, hash it and use the hash value
    /// - If it's anything else (out of range number, float, array, etc.),
    ///   error
    ///
    /// Regardless of how the seed value is input, it will always be serialized
    /// as a number.
    #[serde(deserialize_with = "serde_seed::deserialize")]
    pub seed: u64,

    pub kind: LatticeKind,

    /// Scene to run on the lattice
    pub scene: SceneKind,

    /// Number of scene ticks to run before taking a snapshot
    #[validate(range(max = 100000))]
    pub ticks: u32,

    // Tables go last so this serializes cleanly to TOML
    #[validate]
    pub lattice: LatticeConfig,
}

impl Default for ModusConfig {
    fn default() -> Self {
        Self {
            // Danger! This means the default will vary between calls!
            seed: rand::random(),
            kind: LatticeKind::Hex,
            scene: SceneKind::None,
            ticks: 0,
            lattice: LatticeConfig::default(),
        }
    }
}

/// The seed field has some fancy deserialization behavior implemented here. See
/// the `seed` field definition for a description.
mod serde_seed {
    use fnv::FnvHasher;
    use serde::{de::Visitor, Deserializer};
    use std::{
        convert::TryInto,
        fmt,
        hash::{Hash, Hasher},
    };

    /// Macro to make it easier to implement visit logic for different types
    macro_rules! impl_visit {
        ($fname:ident, $type:ty) => {
            fn $fname<E>(self, value: $type) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                value.try_into().map_err(|_| {
                    E::custom(format!("u64 out of range: {}", value))
                })
            }
        };
    }

    struct SeedVisitor;

    impl<'de> Visitor<'de> for SeedVisitor {
        type Value = u64;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("an integer or string")
        }

        impl_visit!(visit_u8, u8);
        impl_visit!(visit_u16, u16);
        impl_visit!(visit_u32, u32);
        impl_visit!(visit_u64, u64);
        impl_visit!(visit_u128, u128);
        impl_visit!(visit_i8, i8);
        impl_visit!(visit_i16, i16);
        impl_visit!(visit_i32, i32);
        impl_visit!(visit_i64, i64);
        impl_visit!(visit_i128, i128);

        fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            match value.parse::<u64>() {
                Ok(seed) => Ok(seed),
                Err(_) => {
                    let mut hasher = FnvHasher::default();
                    value.hash(&mut hasher);
                    Ok(hasher.finish())
                }
            }
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<u64, D::Error>
    where
        D: Deserializer<'de>,
    {
        // Several input types are accepted, so no type hint here
        deserializer.deserialize_any(SeedVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_seed_deserialization() {
        let from_int: ModusConfig =
            serde_json::from_str(r#"{"seed": 1234}"#).unwrap();
        assert_eq!(from_int.seed, 1234);

        let from_numeric_str: ModusConfig =
            serde_json::from_str(r#"{"seed": "1234"}"#).unwrap();
        assert_eq!(from_numeric_str.seed, 1234);

        let hashed: ModusConfig =
            serde_json::from_str(r#"{"seed": "knights"}"#).unwrap();
        let hashed_again: ModusConfig =
            serde_json::from_str(r#"{"seed": "knights"}"#).unwrap();
        assert_eq!(hashed.seed, hashed_again.seed);

        assert!(
            serde_json::from_str::<ModusConfig>(r#"{"seed": -1}"#).is_err()
        );
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: ModusConfig = serde_json::from_str(
            r#"{"seed": 1, "kind": "square", "lattice": {"columns": 7}}"#,
        )
        .unwrap();
        assert_eq!(config.kind, LatticeKind::Square);
        assert_eq!(config.lattice.columns, 7);
        assert_eq!(config.lattice.canvas_width, 1280);
        assert_eq!(config.scene, SceneKind::None);
    }

    #[test]
    fn test_lattice_kind_from_str() {
        assert_eq!(LatticeKind::from_str("hex").unwrap(), LatticeKind::Hex);
        assert_eq!(
            LatticeKind::from_str("square").unwrap(),
            LatticeKind::Square
        );
        assert!(LatticeKind::from_str("triangle").is_err());
        assert_eq!(LatticeKind::Hex.to_string(), "hex");
    }
}
