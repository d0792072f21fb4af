//! Parsing specifications
//!
//! An argument signature is written as a short string with one character per
//! slot:
//!
//! - `{` a mandatory brace group
//! - `[` an optional bracket group
//! - `*` an optional star
//!
//! so `\putinquotes[open][close]{text}` is registered with `"[[{"`.

use std::fmt;
use std::str::FromStr;

use crate::core::context::{ContextEntry, SpecKind};
use crate::utils::error::ConfigError;

/// One slot of an argument signature
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum ArgKind {
    /// `{...}`, must be present
    Mandatory,
    /// `[...]`, may be absent
    Optional,
    /// `*`, may be absent
    OptionalStar,
}

impl ArgKind {
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            '{' => Some(ArgKind::Mandatory),
            '[' => Some(ArgKind::Optional),
            '*' => Some(ArgKind::OptionalStar),
            _ => None,
        }
    }

    pub fn as_char(self) -> char {
        match self {
            ArgKind::Mandatory => '{',
            ArgKind::Optional => '[',
            ArgKind::OptionalStar => '*',
        }
    }

    pub fn is_optional(self) -> bool {
        !matches!(self, ArgKind::Mandatory)
    }
}

/// Ordered argument slots consumed after a macro, environment or specials
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ArgSignature(Vec<ArgKind>);

impl ArgSignature {
    /// A signature with no arguments
    pub fn none() -> Self {
        Self::default()
    }

    /// Parse the compact form, e.g. `"[[{"`. Whitespace is ignored.
    pub fn parse(signature: &str) -> Result<Self, ConfigError> {
        let mut slots = Vec::with_capacity(signature.len());
        for (position, c) in signature.char_indices() {
            if c.is_whitespace() {
                continue;
            }
            match ArgKind::from_char(c) {
                Some(kind) => slots.push(kind),
                None => {
                    return Err(ConfigError::MalformedSignature {
                        signature: signature.to_string(),
                        position,
                        found: c,
                    })
                }
            }
        }
        Ok(Self(slots))
    }

    pub fn iter(&self) -> impl Iterator<Item = ArgKind> + '_ {
        self.0.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<ArgKind> {
        self.0.get(index).copied()
    }
}

impl FromStr for ArgSignature {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for ArgSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for kind in &self.0 {
            write!(f, "{}", kind.as_char())?;
        }
        Ok(())
    }
}

/// What the walker needs to know about one macro, environment or specials
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Specification {
    kind: SpecKind,
    name: String,
    signature: ArgSignature,
}

impl Specification {
    pub fn new(
        kind: SpecKind,
        name: impl Into<String>,
        signature: ArgSignature,
    ) -> Result<Self, ConfigError> {
        let name = name.into();
        if name.is_empty() {
            return Err(ConfigError::EmptyName(kind));
        }
        Ok(Self {
            kind,
            name,
            signature,
        })
    }

    /// `\name` followed by `signature`
    pub fn macro_spec(name: impl Into<String>, signature: &str) -> Result<Self, ConfigError> {
        Self::new(SpecKind::Macro, name, ArgSignature::parse(signature)?)
    }

    /// `\begin{name}` followed by `signature`
    pub fn environment_spec(
        name: impl Into<String>,
        signature: &str,
    ) -> Result<Self, ConfigError> {
        Self::new(SpecKind::Environment, name, ArgSignature::parse(signature)?)
    }

    /// A literal token with no arguments
    pub fn specials_spec(token: impl Into<String>) -> Result<Self, ConfigError> {
        Self::new(SpecKind::Specials, token, ArgSignature::none())
    }

    /// A literal token followed by `signature`
    pub fn specials_spec_with_args(
        token: impl Into<String>,
        signature: &str,
    ) -> Result<Self, ConfigError> {
        Self::new(SpecKind::Specials, token, ArgSignature::parse(signature)?)
    }

    pub fn kind(&self) -> SpecKind {
        self.kind
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn signature(&self) -> &ArgSignature {
        &self.signature
    }
}

impl ContextEntry for Specification {
    fn kind(&self) -> SpecKind {
        self.kind
    }

    fn key(&self) -> &str {
        &self.name
    }
}
