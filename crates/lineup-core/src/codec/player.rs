//! Delimited text encoding of a single [`Player`].
//!
//! Record format (fields in this order, joined by the delimiter):
//! ```text
//! id ~ name ~ number ~ skill ~ position(G|F) ~ active(1|0)
//! ```
//! Text fields are percent-escaped so that any character, including the
//! delimiter itself, survives a round trip.  Decoding applies the same
//! normalisation as every other player constructor: an unparsable skill
//! becomes 50, an unknown position becomes a fielder, and anything other than
//! `1` means inactive.

use thiserror::Error;

use crate::domain::player::{Player, PlayerId, Position, Skill};

/// Default field delimiter.
pub const FIELD_DELIMITER: char = '~';

/// Number of fields in a player record.
pub const FIELD_COUNT: usize = 6;

/// Characters that are always escaped, whatever the delimiter.
const RESERVED: [char; 5] = ['%', '&', '=', '+', '#'];

/// Errors that can occur while decoding player or roster text.
#[derive(Debug, Error, PartialEq)]
pub enum CodecError {
    /// The record did not split into [`FIELD_COUNT`] fields.
    #[error("expected {expected} fields, found {found}")]
    FieldCount { expected: usize, found: usize },

    /// A `%` escape was truncated, not hexadecimal, or produced invalid UTF-8.
    #[error("invalid escape sequence in {0:?}")]
    InvalidEscape(String),

    /// A roster parameter could not be decoded.
    #[error("roster record {index}: {source}")]
    Record {
        index: usize,
        #[source]
        source: Box<CodecError>,
    },
}

/// Encodes `player` with the default [`FIELD_DELIMITER`].
pub fn encode_player(player: &Player) -> String {
    encode_player_with(player, FIELD_DELIMITER)
}

/// Decodes a record produced by [`encode_player`].
///
/// # Errors
///
/// See [`decode_player_with`].
pub fn decode_player(record: &str) -> Result<Player, CodecError> {
    decode_player_with(record, FIELD_DELIMITER)
}

/// Encodes `player` using `delimiter` between fields.
///
/// The delimiter must not be `%`.
pub fn encode_player_with(player: &Player, delimiter: char) -> String {
    debug_assert_ne!(delimiter, '%', "'%' is the escape character");
    let mut out = String::with_capacity(32 + player.name.len());
    push_escaped(&mut out, player.id.as_str(), delimiter);
    out.push(delimiter);
    push_escaped(&mut out, &player.name, delimiter);
    out.push(delimiter);
    push_escaped(&mut out, &player.number, delimiter);
    out.push(delimiter);
    out.push_str(&player.skill.to_string());
    out.push(delimiter);
    out.push_str(player.position.code());
    out.push(delimiter);
    out.push(if player.active { '1' } else { '0' });
    out
}

/// Decodes a record whose fields are separated by `delimiter`.
///
/// # Errors
///
/// Returns [`CodecError::FieldCount`] when the record does not have exactly
/// six fields and [`CodecError::InvalidEscape`] for malformed `%` sequences.
/// An empty id is accepted, so every encoded player decodes again.
pub fn decode_player_with(record: &str, delimiter: char) -> Result<Player, CodecError> {
    let fields: Vec<&str> = record.split(delimiter).collect();
    let [id, name, number, skill, position, active] = fields.as_slice() else {
        return Err(CodecError::FieldCount {
            expected: FIELD_COUNT,
            found: fields.len(),
        });
    };

    Ok(Player {
        id: PlayerId::new(unescape(id)?),
        name: unescape(name)?,
        number: unescape(number)?,
        skill: Skill::from_text(skill),
        position: Position::parse(position),
        active: *active == "1",
    })
}

// ── Escaping ──────────────────────────────────────────────────────────────────

fn needs_escape(c: char, delimiter: char) -> bool {
    c == delimiter || RESERVED.contains(&c) || c.is_control()
}

fn push_escaped(out: &mut String, field: &str, delimiter: char) {
    let mut buf = [0u8; 4];
    for c in field.chars() {
        if needs_escape(c, delimiter) {
            for byte in c.encode_utf8(&mut buf).bytes() {
                out.push_str(&format!("%{byte:02X}"));
            }
        } else {
            out.push(c);
        }
    }
}

/// Reverses [`push_escaped`].
fn unescape(field: &str) -> Result<String, CodecError> {
    if !field.contains('%') {
        return Ok(field.to_string());
    }

    let invalid = || CodecError::InvalidEscape(field.to_string());
    let bytes = field.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let hex = field
                .get(i + 1..i + 3)
                .filter(|h| h.bytes().all(|b| b.is_ascii_hexdigit()))
                .ok_or_else(invalid)?;
            let byte = u8::from_str_radix(hex, 16).map_err(|_| invalid())?;
            out.push(byte);
            i += 3;
        } else {
            out.push(bytes[i]);
            i += 1;
        }
    }
    String::from_utf8(out).map_err(|_| invalid())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
