use crate::game::match_state::GameOutcome;
use crate::model::card::Card;
use crate::model::player::{Seat, Standing};
use crate::model::rank::Rank;
use serde::Serialize;

/// Everything a frontend can observe while a game is played, in order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum GameEvent {
    RoundStarted {
        round: u32,
        standings: [Standing; 2],
    },
    /// A collection became the new hand, in the order shown.
    Reshuffled {
        seat: Seat,
        hand: Vec<Card>,
    },
    CardPlayed {
        seat: Seat,
        card: Card,
    },
    BattleWon {
        seat: Seat,
        pot: Vec<Card>,
    },
    WarDeclared { rank: Rank },
    /// Counts are indexed by seat.
    WarStakes {
        available: [usize; 2],
        face_down: [usize; 2],
    },
    FaceDown {
        seat: Seat,
        cards: Vec<Card>,
    },
    PotGrew { size: usize },
    /// One or both seats could not continue; the pot is abandoned.
    Exhausted {
        seats: Vec<Seat>,
        during_war: bool,
    },
    GameOver {
        outcome: GameOutcome,
        rounds: u32,
        standings: [Standing; 2],
    },
}

pub trait EventSink {
    fn emit(&mut self, event: GameEvent);
}

impl EventSink for Vec<GameEvent> {
    fn emit(&mut self, event: GameEvent) {
        self.push(event);
    }
}

impl<T: EventSink + ?Sized> EventSink for &mut T {
    fn emit(&mut self, event: GameEvent) {
        (**self).emit(event);
    }
}

/// Drops every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct Discard;

impl EventSink for Discard {
    fn emit(&mut self, _event: GameEvent) {}
}
