use crate::model::card::Card;
use rand::seq::SliceRandom;

/// Source of random permutations for turning a collection into a hand.
///
/// Every `rand::Rng` is a shuffler, so a seeded `StdRng` gives reproducible
/// games. Tests may supply their own fixed permutation.
pub trait Shuffler {
    fn shuffle_cards(&mut self, cards: &mut [Card]);
}

impl<R: rand::Rng + ?Sized> Shuffler for R {
    fn shuffle_cards(&mut self, cards: &mut [Card]) {
        cards.shuffle(self);
    }
}
