use crate::game::event::{EventSink, GameEvent};
use crate::model::card::Card;
use crate::model::hand::NormalizedHand;
use crate::model::shuffle::Shuffler;
use core::fmt;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use tracing::{Level, event};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum Seat {
    One = 0,
    Two = 1,
}

impl Seat {
    pub const BOTH: [Seat; 2] = [Seat::One, Seat::Two];

    pub const fn index(self) -> usize {
        self as usize
    }

    pub const fn number(self) -> usize {
        self.index() + 1
    }

    pub const fn opponent(self) -> Seat {
        match self {
            Seat::One => Seat::Two,
            Seat::Two => Seat::One,
        }
    }

    pub fn default_name(self) -> String {
        format!("Player {}", self.number())
    }
}

impl fmt::Display for Seat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Player {}", self.number())
    }
}

/// Card counts for one seat at a point in time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Standing {
    pub seat: Seat,
    pub hand: usize,
    pub collection: usize,
}

impl Standing {
    pub const fn total(&self) -> usize {
        self.hand + self.collection
    }

    /// "Name: N in hand, M in collection (T total)".
    pub fn status_line(&self, name: &str) -> String {
        format!(
            "{name}: {} in hand, {} in collection ({} total)",
            self.hand,
            self.collection,
            self.total()
        )
    }
}

#[derive(Debug, Clone)]
pub struct Player {
    seat: Seat,
    name: String,
    hand: VecDeque<Card>,
    collection: Vec<Card>,
}

impl Player {
    /// A blank name falls back to "Player N".
    pub fn new(seat: Seat, name: impl Into<String>, hand: &NormalizedHand) -> Self {
        let name = name.into();
        let name = if name.trim().is_empty() {
            seat.default_name()
        } else {
            name
        };
        Self {
            seat,
            name,
            hand: hand.cards().iter().copied().collect(),
            collection: Vec::new(),
        }
    }

    pub fn seat(&self) -> Seat {
        self.seat
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn hand(&self) -> impl Iterator<Item = Card> + '_ {
        self.hand.iter().copied()
    }

    pub fn hand_len(&self) -> usize {
        self.hand.len()
    }

    pub fn collection(&self) -> &[Card] {
        &self.collection
    }

    pub fn total_cards(&self) -> usize {
        self.hand.len() + self.collection.len()
    }

    pub fn has_cards(&self) -> bool {
        self.total_cards() > 0
    }

    pub fn standing(&self) -> Standing {
        Standing {
            seat: self.seat,
            hand: self.hand.len(),
            collection: self.collection.len(),
        }
    }

    /// Turns a shuffled collection into the hand once the hand runs dry.
    /// Returns whether a reshuffle happened.
    pub fn refill_if_empty<S, E>(&mut self, shuffler: &mut S, sink: &mut E) -> bool
    where
        S: Shuffler + ?Sized,
        E: EventSink + ?Sized,
    {
        if !self.hand.is_empty() || self.collection.is_empty() {
            return false;
        }

        let mut cards = std::mem::take(&mut self.collection);
        shuffler.shuffle_cards(&mut cards);
        event!(
            target: "war_core::player",
            Level::DEBUG,
            seat = self.seat.number(),
            cards = cards.len(),
            "collection reshuffled into hand"
        );
        sink.emit(GameEvent::Reshuffled {
            seat: self.seat,
            hand: cards.clone(),
        });
        self.hand = cards.into();
        true
    }

    pub fn draw_card<S, E>(&mut self, shuffler: &mut S, sink: &mut E) -> Option<Card>
    where
        S: Shuffler + ?Sized,
        E: EventSink + ?Sized,
    {
        self.refill_if_empty(shuffler, sink);
        self.hand.pop_front()
    }

    pub fn collect(&mut self, cards: &[Card]) {
        self.collection.extend_from_slice(cards);
    }
}
