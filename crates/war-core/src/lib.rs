#![deny(warnings)]
pub mod game;
pub mod model;

pub use game::event::{Discard, EventSink, GameEvent};
pub use game::match_state::{DEFAULT_MAX_ROUNDS, GameOutcome, MatchState, play_game};
pub use game::round::{RoundOutcome, play_round};
pub use model::card::{Card, InvalidCardError, display_name, rank_value};
pub use model::hand::{NormalizedHand, ValidationError, display_hand, validate_hand};
pub use model::player::{Player, Seat, Standing};
pub use model::shuffle::Shuffler;
