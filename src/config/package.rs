//! Package entries and the system-eligibility rule.
use serde::{Deserialize, Deserializer, Serialize};

use crate::platform::{ALL, SIMPLE_TAGS};

/// Configuration value attached to a package name.
///
/// Either a bare system tag (`vim: all`) or a structured record
/// (`tmux: { systems: [linux, macos], description: ..., home: true }`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PackageEntry {
    /// Plain string: a single system tag.
    Simple(String),
    /// Structured record.
    Detailed(PackageSpec),
}

/// Structured package record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageSpec {
    /// Systems the package is deployed on; empty means every system.
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub systems: Vec<String>,
    /// Free-text description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Link the package directory directly under `$HOME` instead of `~/.config`.
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "std::ops::Not::not"
    )]
    pub home: bool,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

impl PackageEntry {
    /// Build the entry `add` stores for `systems`.
    ///
    /// No systems means `all`.  A single simple tag is stored as a bare
    /// string; anything else becomes a structured record.
    #[must_use]
    pub fn from_systems(systems: &[String]) -> Self {
        match systems {
            [] => Self::Simple(ALL.to_string()),
            [only] if SIMPLE_TAGS.contains(&only.as_str()) => Self::Simple(only.clone()),
            _ => Self::Detailed(PackageSpec {
                systems: systems.to_vec(),
                ..PackageSpec::default()
            }),
        }
    }

    /// Whether the package should be deployed on `system`.
    ///
    /// `all` matches every system.  Family tokens are not expanded: a
    /// package tagged `linux` is not eligible on `arch`.
    #[must_use]
    pub fn is_eligible(&self, system: &str) -> bool {
        match self {
            Self::Simple(tag) => tag == ALL || tag == system,
            Self::Detailed(spec) => {
                spec.systems.is_empty() || spec.systems.iter().any(|s| s == ALL || s == system)
            }
        }
    }

    /// Whether the package links directly under `$HOME`.
    #[must_use]
    pub const fn home(&self) -> bool {
        match self {
            Self::Simple(_) => false,
            Self::Detailed(spec) => spec.home,
        }
    }

    /// Systems as written in the configuration, for display.
    #[must_use]
    pub fn systems(&self) -> Vec<&str> {
        match self {
            Self::Simple(tag) => vec![tag.as_str()],
            Self::Detailed(spec) => spec.systems.iter().map(String::as_str).collect(),
        }
    }

    /// Optional description.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        match self {
            Self::Simple(_) => None,
            Self::Detailed(spec) => spec.description.as_deref(),
        }
    }
}
