//! Text encodings for players and rosters.
//!
//! The core never stores anything itself.  These functions define the text
//! contract that a persistence adapter (a file, a URL fragment, a clipboard)
//! reads and writes; `decode(encode(x)) == x` holds for every player.

pub mod player;
pub mod roster;

pub use player::{
    decode_player, decode_player_with, encode_player, encode_player_with, CodecError,
    FIELD_DELIMITER,
};
pub use roster::{decode_roster, encode_roster};
