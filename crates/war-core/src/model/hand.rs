use crate::model::card::Card;
use core::fmt;
use thiserror::Error;

/// A hand that passed [`validate_hand`]: uppercase text plus parsed cards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedHand {
    text: String,
    cards: Vec<Card>,
}

impl NormalizedHand {
    pub fn from_cards(cards: Vec<Card>) -> Self {
        let text = cards.iter().map(|card| card.symbol()).collect();
        Self { text, cards }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

}

impl fmt::Display for NormalizedHand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Hand cannot be empty.")]
    Empty,
    #[error("Invalid card character(s): {}", quote_all(.0))]
    InvalidCharacters(Vec<char>),
}

fn quote_all(chars: &[char]) -> String {
    chars
        .iter()
        .map(|c| format!("'{c}'"))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Validates and uppercases a raw hand string.
///
/// Every offending character is reported, in input order, not just the first.
pub fn validate_hand(raw: &str) -> Result<NormalizedHand, ValidationError> {
    if raw.is_empty() {
        return Err(ValidationError::Empty);
    }

    let text = raw.to_uppercase();
    let mut cards = Vec::with_capacity(text.len());
    let mut invalid = Vec::new();
    for symbol in text.chars() {
        match Card::from_symbol(symbol) {
            Ok(card) => cards.push(card),
            Err(_) => invalid.push(symbol),
        }
    }

    if !invalid.is_empty() {
        return Err(ValidationError::InvalidCharacters(invalid));
    }

    Ok(NormalizedHand { text, cards })
}

/// Renders cards as "King, 2, 10".
pub fn display_hand(cards: &[Card]) -> String {
    cards
        .iter()
        .map(|card| card.name())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::{NormalizedHand, ValidationError, display_hand, validate_hand};
    use crate::model::card::Card;
    use crate::model::rank::Rank;

    #[test]
    fn empty_hand_is_rejected() {
        assert_eq!(validate_hand(""), Err(ValidationError::Empty));
        assert_eq!(ValidationError::Empty.to_string(), "Hand cannot be empty.");
    }

    #[test]
    fn every_invalid_character_is_reported() {
        let err = validate_hand("XYZ").expect_err("all three are invalid");
        let expected = ValidationError::InvalidCharacters(vec!['X', 'Y', 'Z']);
        assert_eq!(err, expected);
        assert_eq!(err.to_string(), "Invalid card character(s): 'X', 'Y', 'Z'");
    }

    #[test]
    fn invalid_characters_are_reported_uppercased_in_order() {
        let err = validate_hand("k0x5x").expect_err("mixed input");
        let expected = ValidationError::InvalidCharacters(vec!['0', 'X', 'X']);
        assert_eq!(err, expected);
    }

    #[test]
    fn lowercase_hand_normalizes() {
        let hand = validate_hand("a2dk").expect("valid hand");
        assert_eq!(hand.as_str(), "A2DK");
        let ranks = [Rank::Ace, Rank::Two, Rank::Two, Rank::King];
        assert_eq!(hand.cards(), &ranks.map(Card::new));
    }

    #[test]
    fn whitespace_is_not_a_card() {
        let err = validate_hand("K 2").expect_err("space is invalid");
        assert_eq!(err, ValidationError::InvalidCharacters(vec![' ']));
    }

    #[test]
    fn from_cards_uses_canonical_symbols() {
        let cards = vec![Card::new(Rank::Ace), Card::new(Rank::Ten)];
        let hand = NormalizedHand::from_cards(cards);
        assert_eq!(hand.as_str(), "AT");
        assert_eq!(hand.cards().len(), 2);
    }

    #[test]
    fn display_hand_joins_names() {
        let hand = validate_hand("K2T").unwrap();
        assert_eq!(display_hand(hand.cards()), "King, 2, 10");
        assert_eq!(display_hand(&[]), "");
    }
}
