use crate::game::event::{EventSink, GameEvent};
use crate::model::card::Card;
use crate::model::hand::display_hand;
use crate::model::player::{Player, Seat};
use crate::model::rank::Rank;
use crate::model::shuffle::Shuffler;
use tracing::{Level, event};

/// Face-down stake ceiling per player in a war.
pub const MAX_FACE_DOWN: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundOutcome {
    /// The seat won the pot; the game continues unless the loser is now empty.
    BattleWon(Seat),
    /// Both players ran dry at the same moment.
    Draw,
    /// The other seat could not continue, which ends the game.
    GameWon(Seat),
}

#[derive(Debug, Clone, Copy)]
enum Phase {
    Comparing,
    WarPending(Rank),
    Resolved(RoundOutcome),
}

/// Face-down cards a player may stake while keeping one for the next comparison.
pub fn face_down_capacity(available: usize) -> usize {
    available.saturating_sub(1).min(MAX_FACE_DOWN)
}

/// Resolves one round, including any chain of wars.
pub fn play_round<S, E>(
    players: &mut [Player; 2],
    shuffler: &mut S,
    sink: &mut E,
) -> RoundOutcome
where
    S: Shuffler + ?Sized,
    E: EventSink + ?Sized,
{
    RoundEngine {
        players,
        shuffler,
        sink,
        pot: Vec::new(),
        wars: 0,
    }
    .run()
}

struct RoundEngine<'a, S: ?Sized, E: ?Sized> {
    players: &'a mut [Player; 2],
    shuffler: &'a mut S,
    sink: &'a mut E,
    pot: Vec<Card>,
    wars: u32,
}

impl<S, E> RoundEngine<'_, S, E>
where
    S: Shuffler + ?Sized,
    E: EventSink + ?Sized,
{
    fn run(mut self) -> RoundOutcome {
        let mut phase = Phase::Comparing;
        loop {
            phase = match phase {
                Phase::Comparing => self.compare(),
                Phase::WarPending(rank) => self.war(rank),
                Phase::Resolved(outcome) => return outcome,
            };
        }
    }

    fn draw(&mut self, seat: Seat) -> Option<Card> {
        let player = &mut self.players[seat.index()];
        player.draw_card(&mut *self.shuffler, &mut *self.sink)
    }

    fn compare(&mut self) -> Phase {
        let first = self.draw(Seat::One);
        let second = self.draw(Seat::Two);

        let (first, second) = match (first, second) {
            (Some(first), Some(second)) => (first, second),
            (None, None) => return self.exhausted(vec![Seat::One, Seat::Two], false),
            (None, Some(_)) => return self.exhausted(vec![Seat::One], false),
            (Some(_), None) => return self.exhausted(vec![Seat::Two], false),
        };

        self.pot.push(first);
        self.pot.push(second);
        self.sink.emit(GameEvent::CardPlayed {
            seat: Seat::One,
            card: first,
        });
        self.sink.emit(GameEvent::CardPlayed {
            seat: Seat::Two,
            card: second,
        });

        let winner = match first.value().cmp(&second.value()) {
            std::cmp::Ordering::Greater => Seat::One,
            std::cmp::Ordering::Less => Seat::Two,
            std::cmp::Ordering::Equal => {
                self.sink.emit(GameEvent::WarDeclared { rank: first.rank });
                return Phase::WarPending(first.rank);
            }
        };

        let pot = std::mem::take(&mut self.pot);
        if tracing::enabled!(Level::DEBUG) {
            event!(
                target: "war_core::round",
                Level::DEBUG,
                seat = winner.number(),
                wars = self.wars,
                pot = %display_hand(&pot),
                "battle won"
            );
        }
        self.players[winner.index()].collect(&pot);
        self.sink.emit(GameEvent::BattleWon { seat: winner, pot });
        Phase::Resolved(RoundOutcome::BattleWon(winner))
    }

    fn war(&mut self, rank: Rank) -> Phase {
        self.wars += 1;
        let available = [
            self.players[Seat::One.index()].total_cards(),
            self.players[Seat::Two.index()].total_cards(),
        ];
        event!(
            target: "war_core::round",
            Level::DEBUG,
            rank = rank.name(),
            depth = self.wars,
            available_one = available[0],
            available_two = available[1],
            "war declared"
        );

        let empty: Vec<Seat> = Seat::BOTH
            .into_iter()
            .filter(|seat| available[seat.index()] == 0)
            .collect();
        if !empty.is_empty() {
            return self.exhausted(empty, true);
        }

        // Caps are per player; a short stack does not shrink the other side's stake.
        let face_down = available.map(face_down_capacity);
        self.sink.emit(GameEvent::WarStakes {
            available,
            face_down,
        });

        let mut staked: [Vec<Card>; 2] = [Vec::new(), Vec::new()];
        for i in 0..face_down[0].max(face_down[1]) {
            for seat in Seat::BOTH {
                if i < face_down[seat.index()] {
                    let card = self.draw(seat);
                    staked[seat.index()].extend(card);
                }
            }
        }

        for (seat, cards) in Seat::BOTH.into_iter().zip(staked) {
            if cards.is_empty() {
                continue;
            }
            self.pot.extend_from_slice(&cards);
            self.sink.emit(GameEvent::FaceDown { seat, cards });
        }
        self.sink.emit(GameEvent::PotGrew {
            size: self.pot.len(),
        });

        Phase::Comparing
    }

    fn exhausted(&mut self, seats: Vec<Seat>, during_war: bool) -> Phase {
        let outcome = match seats.as_slice() {
            [seat] => RoundOutcome::GameWon(seat.opponent()),
            _ => RoundOutcome::Draw,
        };
        event!(
            target: "war_core::round",
            Level::DEBUG,
            exhausted = seats.len(),
            during_war,
            abandoned = self.pot.len(),
            "player exhausted mid-round"
        );
        self.sink.emit(GameEvent::Exhausted { seats, during_war });
        Phase::Resolved(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::{RoundOutcome, face_down_capacity, play_round};
    use crate::game::event::{Discard, GameEvent};
    use crate::model::card::Card;
    use crate::model::hand::validate_hand;
    use crate::model::player::{Player, Seat};
    use crate::model::rank::Rank;
    use crate::model::shuffle::Shuffler;

    struct KeepOrder;

    impl Shuffler for KeepOrder {
        fn shuffle_cards(&mut self, _cards: &mut [Card]) {}
    }

    fn table(first: &str, second: &str) -> [Player; 2] {
        [
            Player::new(Seat::One, "", &validate_hand(first).unwrap()),
            Player::new(Seat::Two, "", &validate_hand(second).unwrap()),
        ]
    }

    fn cards(text: &str) -> Vec<Card> {
        validate_hand(text).unwrap().cards().to_vec()
    }

    fn combined(players: &[Player; 2]) -> usize {
        players.iter().map(Player::total_cards).sum()
    }

    #[test]
    fn capacity_keeps_one_card_back() {
        assert_eq!(face_down_capacity(0), 0);
        assert_eq!(face_down_capacity(1), 0);
        assert_eq!(face_down_capacity(2), 1);
        assert_eq!(face_down_capacity(4), 3);
        assert_eq!(face_down_capacity(40), 3);
    }

    #[test]
    fn higher_card_wins_the_battle() {
        let mut players = table("K3", "2Q");
        let outcome = play_round(&mut players, &mut KeepOrder, &mut Discard);

        assert_eq!(outcome, RoundOutcome::BattleWon(Seat::One));
        assert_eq!(players[0].collection(), cards("K2").as_slice());
        assert_eq!(players[0].hand_len(), 1);
        assert_eq!(players[1].hand_len(), 1);
        assert_eq!(combined(&players), 4);
    }

    #[test]
    fn second_seat_can_win() {
        let mut players = table("3", "A");
        let outcome = play_round(&mut players, &mut KeepOrder, &mut Discard);
        assert_eq!(outcome, RoundOutcome::BattleWon(Seat::Two));
        assert!(!players[0].has_cards());
        assert_eq!(players[1].total_cards(), 2);
    }

    #[test]
    fn war_stakes_three_face_down_cards_each() {
        let mut players = table("5234K", "5678Q");
        let mut events = Vec::new();
        let outcome = play_round(&mut players, &mut KeepOrder, &mut events);

        assert_eq!(outcome, RoundOutcome::BattleWon(Seat::One));
        assert_eq!(players[0].collection(), cards("55234678KQ").as_slice());
        assert_eq!(players[1].total_cards(), 0);
        assert_eq!(
            events,
            vec![
                GameEvent::CardPlayed {
                    seat: Seat::One,
                    card: Card::new(Rank::Five),
                },
                GameEvent::CardPlayed {
                    seat: Seat::Two,
                    card: Card::new(Rank::Five),
                },
                GameEvent::WarDeclared { rank: Rank::Five },
                GameEvent::WarStakes {
                    available: [4, 4],
                    face_down: [3, 3],
                },
                GameEvent::FaceDown {
                    seat: Seat::One,
                    cards: cards("234"),
                },
                GameEvent::FaceDown {
                    seat: Seat::Two,
                    cards: cards("678"),
                },
                GameEvent::PotGrew { size: 8 },
                GameEvent::CardPlayed {
                    seat: Seat::One,
                    card: Card::new(Rank::King),
                },
                GameEvent::CardPlayed {
                    seat: Seat::Two,
                    card: Card::new(Rank::Queen),
                },
                GameEvent::BattleWon {
                    seat: Seat::One,
                    pot: cards("55234678KQ"),
                },
            ]
        );
    }

    #[test]
    fn face_down_counts_are_independent() {
        let mut players = table("52K", "5999Q");
        let mut events = Vec::new();
        let outcome = play_round(&mut players, &mut KeepOrder, &mut events);

        assert_eq!(outcome, RoundOutcome::BattleWon(Seat::One));
        assert!(events.contains(&GameEvent::WarStakes {
            available: [2, 4],
            face_down: [1, 3],
        }));
        assert!(events.contains(&GameEvent::FaceDown {
            seat: Seat::One,
            cards: cards("2"),
        }));
        assert!(events.contains(&GameEvent::FaceDown {
            seat: Seat::Two,
            cards: cards("999"),
        }));
        assert_eq!(players[0].total_cards(), 8);
        assert!(!players[1].has_cards());
    }

    #[test]
    fn last_card_tie_loses_the_game() {
        let mut players = table("5", "5K");
        let mut events = Vec::new();
        let outcome = play_round(&mut players, &mut KeepOrder, &mut events);

        assert_eq!(outcome, RoundOutcome::GameWon(Seat::Two));
        assert_eq!(
            events.last(),
            Some(&GameEvent::Exhausted {
                seats: vec![Seat::One],
                during_war: true,
            })
        );
    }

    #[test]
    fn simultaneous_exhaustion_in_war_is_a_draw() {
        let mut players = table("5", "5");
        let outcome = play_round(&mut players, &mut KeepOrder, &mut Discard);
        assert_eq!(outcome, RoundOutcome::Draw);
    }

    #[test]
    fn zero_stake_war_compares_next_cards() {
        let mut players = table("5K", "5Q");
        let mut events = Vec::new();
        let outcome = play_round(&mut players, &mut KeepOrder, &mut events);

        assert_eq!(outcome, RoundOutcome::BattleWon(Seat::One));
        assert!(events.contains(&GameEvent::WarStakes {
            available: [1, 1],
            face_down: [0, 0],
        }));
        let stakes = events
            .iter()
            .filter(|e| matches!(e, GameEvent::FaceDown { .. }))
            .count();
        assert_eq!(stakes, 0);
        assert_eq!(players[0].total_cards(), 4);
    }

    #[test]
    fn repeated_ties_run_out_into_a_draw() {
        let mut players = table("55", "55");
        let mut events = Vec::new();
        let outcome = play_round(&mut players, &mut KeepOrder, &mut events);

        assert_eq!(outcome, RoundOutcome::Draw);
        let wars = events
            .iter()
            .filter(|e| matches!(e, GameEvent::WarDeclared { .. }))
            .count();
        assert_eq!(wars, 2);
    }

    #[test]
    fn empty_player_loses_before_drawing() {
        let mut players = table("K", "2");
        let mut events = Vec::new();
        play_round(&mut players, &mut KeepOrder, &mut events);
        // second seat is now empty
        let outcome = play_round(&mut players, &mut KeepOrder, &mut events);
        assert_eq!(outcome, RoundOutcome::GameWon(Seat::One));
        assert_eq!(
            events.last(),
            Some(&GameEvent::Exhausted {
                seats: vec![Seat::Two],
                during_war: false,
            })
        );
    }

    #[test]
    fn war_draws_refill_from_collection() {
        let mut players = table("5", "5678Q");
        players[0].collect(&cards("34K"));
        let mut events = Vec::new();
        let outcome = play_round(&mut players, &mut KeepOrder, &mut events);

        assert_eq!(outcome, RoundOutcome::BattleWon(Seat::One));
        assert!(events.contains(&GameEvent::WarStakes {
            available: [3, 4],
            face_down: [2, 3],
        }));
        assert!(events.contains(&GameEvent::Reshuffled {
            seat: Seat::One,
            hand: cards("34K"),
        }));
        assert!(events.contains(&GameEvent::FaceDown {
            seat: Seat::One,
            cards: cards("34"),
        }));
        assert_eq!(combined(&players), 9);
    }
}
