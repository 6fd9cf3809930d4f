//! Translator settings.
//!
//! Settings are configured through a mutable [`Builder`] and frozen into an
//! immutable [`Flags`] value handed to the [`Translator`](crate::Translator):
//!
//! ```ignore
//! use a32_translate::settings::{self, Configurable};
//!
//! let mut b = settings::builder();
//! b.set("enable_vfp", "false")?;
//! let flags = settings::Flags::new(b);
//! assert!(!flags.enable_vfp());
//! ```

use core::fmt;
#[cfg(feature = "enable-serde")]
use serde_derive::{Deserialize, Serialize};
use thiserror::Error;

/// A string-based configurator for settings groups.
pub trait Configurable {
    /// Set the string value of any setting by name.
    ///
    /// This can set any type of setting whether it is numeric, boolean, or enumerated.
    fn set(&mut self, name: &str, value: &str) -> SetResult<()>;

    /// Enable a boolean setting.
    fn enable(&mut self, name: &str) -> SetResult<()>;
}

/// An error produced when changing a setting.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum SetError {
    /// No setting by this name exists.
    #[error("No existing setting named '{0}'")]
    BadName(String),

    /// Type mismatch for setting (e.g., setting an enum setting as a bool).
    #[error("Trying to set a setting with the wrong type")]
    BadType,

    /// This is not a valid value for this setting.
    #[error("Unexpected value for a setting, expected {0}")]
    BadValue(String),
}

/// A result returned when changing a setting.
pub type SetResult<T> = Result<T, SetError>;

/// Description of one setting.
#[derive(Clone, Copy, Debug)]
pub struct Setting {
    /// Name of the setting.
    pub name: &'static str,
    /// Description of the setting.
    pub description: &'static str,
    /// Default value.
    pub default: bool,
}

const SETTINGS: [Setting; 3] = [
    Setting {
        name: "enable_neon",
        description: "Emit Advanced SIMD vector instructions.",
        default: true,
    },
    Setting {
        name: "enable_vfp",
        description: "Emit VFP scalar floating-point instructions.",
        default: true,
    },
    Setting {
        name: "enable_verifier",
        description: "Run the Cranelift verifier on every translated function.",
        default: true,
    },
];

/// Collect settings values before freezing them into [`Flags`].
#[derive(Clone, Debug)]
pub struct Builder {
    values: [bool; SETTINGS.len()],
}

/// Create a settings builder with every setting at its default.
pub fn builder() -> Builder {
    Builder {
        values: SETTINGS.map(|s| s.default),
    }
}

impl Builder {
    /// Iterates the available settings.
    pub fn iter(&self) -> impl Iterator<Item = Setting> {
        SETTINGS.into_iter()
    }

    fn lookup(&self, name: &str) -> SetResult<usize> {
        SETTINGS
            .iter()
            .position(|s| s.name == name)
            .ok_or_else(|| SetError::BadName(name.to_string()))
    }
}

fn parse_bool_value(value: &str) -> SetResult<bool> {
    match value {
        "true" | "on" | "yes" | "1" => Ok(true),
        "false" | "off" | "no" | "0" => Ok(false),
        _ => Err(SetError::BadValue("bool".to_string())),
    }
}

impl Configurable for Builder {
    fn set(&mut self, name: &str, value: &str) -> SetResult<()> {
        let index = self.lookup(name)?;
        self.values[index] = parse_bool_value(value)?;
        Ok(())
    }

    fn enable(&mut self, name: &str) -> SetResult<()> {
        let index = self.lookup(name)?;
        self.values[index] = true;
        Ok(())
    }
}

/// Frozen translator settings.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "enable-serde", derive(Serialize, Deserialize))]
pub struct Flags {
    enable_neon: bool,
    enable_vfp: bool,
    enable_verifier: bool,
}

impl Flags {
    /// Create flags from a finished builder.
    pub fn new(builder: Builder) -> Self {
        let [enable_neon, enable_vfp, enable_verifier] = builder.values;
        Self {
            enable_neon,
            enable_vfp,
            enable_verifier,
        }
    }

    /// Emit Advanced SIMD vector instructions.
    pub fn enable_neon(&self) -> bool {
        self.enable_neon
    }

    /// Emit VFP scalar floating-point instructions.
    pub fn enable_vfp(&self) -> bool {
        self.enable_vfp
    }

    /// Run the Cranelift verifier on every translated function.
    pub fn enable_verifier(&self) -> bool {
        self.enable_verifier
    }
}

impl Default for Flags {
    fn default() -> Self {
        Self::new(builder())
    }
}

impl fmt::Display for Flags {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "[a32]")?;
        writeln!(f, "enable_neon = {}", self.enable_neon)?;
        writeln!(f, "enable_vfp = {}", self.enable_vfp)?;
        writeln!(f, "enable_verifier = {}", self.enable_verifier)
    }
}
