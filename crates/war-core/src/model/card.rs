use crate::model::rank::Rank;
use core::fmt;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A suitless War card. Only built from symbols that passed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(into = "char", try_from = "char")]
pub struct Card {
    pub rank: Rank,
}

impl Card {
    pub const fn new(rank: Rank) -> Self {
        Self { rank }
    }

    pub fn from_symbol(symbol: char) -> Result<Self, InvalidCardError> {
        Rank::from_symbol(symbol)
            .map(Self::new)
            .ok_or(InvalidCardError { symbol })
    }

    pub const fn value(self) -> u8 {
        self.rank.value()
    }

    pub const fn symbol(self) -> char {
        self.rank.symbol()
    }

    pub const fn name(self) -> &'static str {
        self.rank.name()
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl From<Card> for char {
    fn from(card: Card) -> Self {
        card.symbol()
    }
}

impl TryFrom<char> for Card {
    type Error = InvalidCardError;

    fn try_from(symbol: char) -> Result<Self, Self::Error> {
        Card::from_symbol(symbol)
    }
}

/// A raw symbol reached rank or name lookup without being validated first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("invalid card symbol {symbol:?}")]
pub struct InvalidCardError {
    pub symbol: char,
}

/// Comparison value (2-14) of a raw card symbol.
pub fn rank_value(symbol: char) -> Result<u8, InvalidCardError> {
    Card::from_symbol(symbol).map(Card::value)
}

/// Display name ("Ace", "10", "Jack", ...) of a raw card symbol.
pub fn display_name(symbol: char) -> Result<&'static str, InvalidCardError> {
    Card::from_symbol(symbol).map(Card::name)
}
