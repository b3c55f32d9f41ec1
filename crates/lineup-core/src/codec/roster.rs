//! Roster snapshot encoding.
//!
//! A whole roster is stored as a query-string-like list of player records:
//! ```text
//! p=1~Ryan~15~86~F~1&p=2~John~36~75~G~1
//! ```
//! Parameters other than `p` are ignored so that a snapshot can share a
//! fragment with unrelated state.  A leading `#` or `?` is tolerated.

use tracing::debug;

use super::player::{decode_player, encode_player, CodecError};
use crate::domain::player::Player;

/// Parameter name carrying one player record.
pub const PLAYER_PARAM: &str = "p";

/// Encodes `players` in iteration order.  An empty roster encodes to `""`.
pub fn encode_roster<'a, I>(players: I) -> String
where
    I: IntoIterator<Item = &'a Player>,
{
    players
        .into_iter()
        .map(|p| format!("{PLAYER_PARAM}={}", encode_player(p)))
        .collect::<Vec<_>>()
        .join("&")
}

/// Decodes a snapshot produced by [`encode_roster`].
///
/// Decoding is all-or-nothing: the first bad record fails the whole
/// snapshot.
///
/// # Errors
///
/// Returns [`CodecError::Record`] naming the zero-based index of the first
/// `p` parameter that failed, wrapping the underlying player error.
pub fn decode_roster(snapshot: &str) -> Result<Vec<Player>, CodecError> {
    let body = snapshot
        .trim()
        .trim_start_matches(|c: char| c == '#' || c == '?');

    let records = body
        .split('&')
        .filter_map(|param| param.split_once('='))
        .filter(|(key, _)| *key == PLAYER_PARAM)
        .map(|(_, value)| value);

    let mut players = Vec::new();
    for (index, record) in records.enumerate() {
        let player = decode_player(record).map_err(|source| CodecError::Record {
            index,
            source: Box::new(source),
        })?;
        players.push(player);
    }
    debug!(count = players.len(), "decoded roster snapshot");
    Ok(players)
}
