//! Effect specification models.
//!
//! The textual syntax (`speed:1.5,fadein:0.5`) is parsed by the media crate;
//! these are the typed results it produces.

use std::fmt;
use std::str::FromStr;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Supported effect operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum EffectKind {
    /// Multiplicative playback speed factor
    Speed,
    /// Fade in from black, parameter is a duration in seconds
    FadeIn,
    /// Fade out to black, parameter is a duration in seconds
    FadeOut,
}

impl EffectKind {
    /// Name used in the effect specification syntax.
    pub fn as_str(&self) -> &'static str {
        match self {
            EffectKind::Speed => "speed",
            EffectKind::FadeIn => "fadein",
            EffectKind::FadeOut => "fadeout",
        }
    }
}

impl fmt::Display for EffectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EffectKind {
    type Err = String;

    /// Case-insensitive, surrounding whitespace ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "speed" => Ok(EffectKind::Speed),
            "fadein" => Ok(EffectKind::FadeIn),
            "fadeout" => Ok(EffectKind::FadeOut),
            other => Err(format!("unknown effect: {}", other)),
        }
    }
}

/// One parsed effect operation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct EffectSpec {
    pub kind: EffectKind,
    pub parameter: f64,
}

impl EffectSpec {
    pub fn new(kind: EffectKind, parameter: f64) -> Self {
        Self { kind, parameter }
    }

    pub fn speed(factor: f64) -> Self {
        Self::new(EffectKind::Speed, factor)
    }

    pub fn fade_in(secs: f64) -> Self {
        Self::new(EffectKind::FadeIn, secs)
    }

    pub fn fade_out(secs: f64) -> Self {
        Self::new(EffectKind::FadeOut, secs)
    }
}

impl fmt::Display for EffectSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.kind, self.parameter)
    }
}

/// Ordered effects, applied left to right.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct EffectChain(Vec<EffectSpec>);

impl EffectChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, spec: EffectSpec) {
        self.0.push(spec);
    }

    pub fn iter(&self) -> std::slice::Iter<'_, EffectSpec> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[EffectSpec] {
        &self.0
    }
}

impl From<Vec<EffectSpec>> for EffectChain {
    fn from(specs: Vec<EffectSpec>) -> Self {
        Self(specs)
    }
}

impl FromIterator<EffectSpec> for EffectChain {
    fn from_iter<I: IntoIterator<Item = EffectSpec>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl IntoIterator for EffectChain {
    type Item = EffectSpec;
    type IntoIter = std::vec::IntoIter<EffectSpec>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a EffectChain {
    type Item = &'a EffectSpec;
    type IntoIter = std::slice::Iter<'a, EffectSpec>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl fmt::Display for EffectChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tokens: Vec<String> = self.0.iter().map(ToString::to_string).collect();
        f.write_str(&tokens.join(","))
    }
}
