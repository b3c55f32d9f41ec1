//! Player domain entity.
//!
//! A [`Player`] is one roster member.  Its shape never changes after
//! construction: skill is always inside `0..=100` and the position is always
//! one of the two [`Position`] variants.  Raw, untrusted input (form fields,
//! decoded text records) goes through [`PlayerDraft`] or the normalising
//! constructors on [`Skill`] and [`Position`], never straight into the struct.

use std::fmt;

use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize};

/// Skill assigned when the input is absent or not an integer.
pub const DEFAULT_SKILL: u8 = 50;

/// Upper bound of the skill scale (inclusive).
pub const MAX_SKILL: u8 = 100;

/// Opaque unique identifier of a player, assigned by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(String);

impl PlayerId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PlayerId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for PlayerId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Skill rating clamped to `0..=100`.
///
/// Every constructor clamps, so a `Skill` can never hold an out-of-range
/// value.  Deserialization accepts a number or a string and normalises it with
/// [`Skill::from_number`] or [`Skill::from_text`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(into = "u8")]
pub struct Skill(u8);

impl Skill {
    /// Clamps an integer into the skill range.
    pub fn clamped(value: i64) -> Self {
        Self(value.clamp(0, MAX_SKILL as i64) as u8)
    }

    /// Normalises a numeric input: integers are clamped, anything with a
    /// fractional part (or NaN/infinity) becomes [`DEFAULT_SKILL`].
    pub fn from_number(value: f64) -> Self {
        if value.is_finite() && value.fract() == 0.0 {
            Self::clamped(value.clamp(i64::MIN as f64, i64::MAX as f64) as i64)
        } else {
            Self::default()
        }
    }

    /// Normalises a textual input.  Surrounding whitespace is ignored; text
    /// that is not an integer becomes [`DEFAULT_SKILL`].
    pub fn from_text(text: &str) -> Self {
        match text.trim().parse::<i64>() {
            Ok(value) => Self::clamped(value),
            Err(_) => Self::default(),
        }
    }

    pub fn value(self) -> u8 {
        self.0
    }
}

impl Default for Skill {
    fn default() -> Self {
        Self(DEFAULT_SKILL)
    }
}

impl From<i64> for Skill {
    fn from(value: i64) -> Self {
        Self::clamped(value)
    }
}

impl From<Skill> for u8 {
    fn from(skill: Skill) -> Self {
        skill.0
    }
}

impl<'de> Deserialize<'de> for Skill {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(SkillVisitor)
    }
}

struct SkillVisitor;

impl<'de> Visitor<'de> for SkillVisitor {
    type Value = Skill;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a skill number or string")
    }

    fn visit_i64<E: de::Error>(self, value: i64) -> Result<Skill, E> {
        Ok(Skill::clamped(value))
    }

    fn visit_u64<E: de::Error>(self, value: u64) -> Result<Skill, E> {
        Ok(Skill::clamped(i64::try_from(value).unwrap_or(i64::MAX)))
    }

    fn visit_f64<E: de::Error>(self, value: f64) -> Result<Skill, E> {
        Ok(Skill::from_number(value))
    }

    fn visit_str<E: de::Error>(self, value: &str) -> Result<Skill, E> {
        Ok(Skill::from_text(value))
    }
}

impl fmt::Display for Skill {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Where a player plays.  Deserializes from any string through
/// [`Position::parse`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum Position {
    #[serde(rename = "G")]
    Goalie,
    #[default]
    #[serde(rename = "F")]
    Fielder,
}

impl Position {
    /// Parses a position code case-insensitively.  `"G"` is a goalie; every
    /// other input, including empty text, normalises to [`Position::Fielder`].
    pub fn parse(input: &str) -> Self {
        if input.trim().eq_ignore_ascii_case("g") {
            Position::Goalie
        } else {
            Position::Fielder
        }
    }

    /// Single-letter code used by the textual encoding.
    pub fn code(self) -> &'static str {
        match self {
            Position::Goalie => "G",
            Position::Fielder => "F",
        }
    }
}

impl<'de> Deserialize<'de> for Position {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let code = String::deserialize(deserializer)?;
        Ok(Position::parse(&code))
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// A roster member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub number: String,
    #[serde(default)]
    pub skill: Skill,
    #[serde(default)]
    pub active: bool,
    #[serde(default)]
    pub position: Position,
}

impl Player {
    /// Creates an inactive fielder with default skill and empty display fields.
    pub fn new(id: impl Into<PlayerId>) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            number: String::new(),
            skill: Skill::default(),
            active: false,
            position: Position::Fielder,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_number(mut self, number: impl Into<String>) -> Self {
        self.number = number.into();
        self
    }

    pub fn with_skill(mut self, skill: i64) -> Self {
        self.skill = Skill::clamped(skill);
        self
    }

    pub fn with_position(mut self, position: Position) -> Self {
        self.position = position;
        self
    }

    pub fn with_active(mut self, active: bool) -> Self {
        self.active = active;
        self
    }

    pub fn is_goalie(&self) -> bool {
        self.position == Position::Goalie
    }
}

/// Unvalidated player input as collected from a form or command line.
///
/// Every field except `id` is optional; [`PlayerDraft::into_player`] applies
/// the defaults and normalisation rules.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlayerDraft {
    pub id: String,
    pub name: Option<String>,
    pub number: Option<String>,
    pub skill: Option<String>,
    pub position: Option<String>,
    pub active: bool,
}

impl PlayerDraft {
    pub fn into_player(self) -> Player {
        Player {
            id: PlayerId::new(self.id),
            name: self.name.unwrap_or_default(),
            number: self.number.unwrap_or_default(),
            skill: self.skill.as_deref().map(Skill::from_text).unwrap_or_default(),
            active: self.active,
            position: self.position.as_deref().map(Position::parse).unwrap_or_default(),
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
