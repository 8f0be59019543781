use crate::model::card::Card;
use crate::model::hand::NormalizedHand;
use crate::model::rank::Rank;
use rand::seq::SliceRandom;

const COPIES_PER_RANK: usize = 4;

#[derive(Debug, Clone)]
pub struct Deck {
    cards: Vec<Card>,
}

impl Deck {
    /// Four copies of each rank; suits play no part in War.
    pub fn standard() -> Self {
        let mut cards = Vec::with_capacity(Rank::ORDERED.len() * COPIES_PER_RANK);
        for _ in 0..COPIES_PER_RANK {
            for rank in Rank::ORDERED.iter().copied() {
                cards.push(Card::new(rank));
            }
        }
        Self { cards }
    }

    pub fn shuffled<R: rand::Rng + ?Sized>(rng: &mut R) -> Self {
        let mut deck = Self::standard();
        deck.cards.shuffle(rng);
        deck
    }

    /// Splits the deck in half: first half to the first seat.
    pub fn deal(self) -> (NormalizedHand, NormalizedHand) {
        let mut first = self.cards;
        let second = first.split_off(first.len() / 2);
        (
            NormalizedHand::from_cards(first),
            NormalizedHand::from_cards(second),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::Deck;
    use crate::model::card::Card;
    use crate::model::rank::Rank;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn dealt(deck: Deck) -> Vec<Card> {
        let (first, second) = deck.deal();
        [first.cards(), second.cards()].concat()
    }

    fn seeded(seed: u64) -> Vec<Card> {
        dealt(Deck::shuffled(&mut StdRng::seed_from_u64(seed)))
    }

    #[test]
    fn standard_deck_has_four_of_each_rank() {
        let cards = dealt(Deck::standard());
        assert_eq!(cards.len(), 52);
        for rank in Rank::ORDERED {
            let count = cards.iter().filter(|c| c.rank == rank).count();
            assert_eq!(count, 4, "{rank} should appear four times");
        }
    }

    #[test]
    fn shuffle_with_seed_is_deterministic() {
        assert_eq!(seeded(42), seeded(42));
    }

    #[test]
    fn shuffle_with_different_seeds_differs() {
        assert_ne!(seeded(1), seeded(2));
    }

    #[test]
    fn deal_gives_twenty_six_each() {
        let (first, second) = Deck::standard().deal();
        assert_eq!(first.cards().len(), 26);
        assert_eq!(second.cards().len(), 26);
        assert_eq!(first.as_str(), "23456789TJQKA23456789TJQKA");
        assert_eq!(second.as_str(), "23456789TJQKA23456789TJQKA");
    }
}
