use crate::game::event::{EventSink, GameEvent};
use crate::game::round::{RoundOutcome, play_round};
use crate::model::deck::Deck;
use crate::model::hand::NormalizedHand;
use crate::model::player::{Player, Seat, Standing};
use crate::model::shuffle::Shuffler;
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::Serialize;
use tracing::{Level, event};

pub const DEFAULT_MAX_ROUNDS: u32 = 10_000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum GameOutcome {
    Winner {
        seat: Seat,
        name: String,
        cards: usize,
    },
    Draw,
    /// The round cap was reached with both players still holding cards.
    Unresolved { rounds: u32 },
}

impl GameOutcome {
    fn winner(players: &[Player; 2], seat: Seat) -> Self {
        let player = &players[seat.index()];
        GameOutcome::Winner {
            seat,
            name: player.name().to_string(),
            cards: player.total_cards(),
        }
    }
}

fn standings(players: &[Player; 2]) -> [Standing; 2] {
    [players[0].standing(), players[1].standing()]
}

fn settle(players: &[Player; 2], outcome: RoundOutcome) -> Option<GameOutcome> {
    match outcome {
        RoundOutcome::Draw => Some(GameOutcome::Draw),
        RoundOutcome::GameWon(seat) => Some(GameOutcome::winner(players, seat)),
        RoundOutcome::BattleWon(_) => {
            match (players[0].has_cards(), players[1].has_cards()) {
                (true, true) => None,
                (false, false) => Some(GameOutcome::Draw),
                (false, true) => Some(GameOutcome::winner(players, Seat::Two)),
                (true, false) => Some(GameOutcome::winner(players, Seat::One)),
            }
        }
    }
}

fn run_rounds<S, E>(
    players: &mut [Player; 2],
    max_rounds: u32,
    shuffler: &mut S,
    sink: &mut E,
) -> (GameOutcome, u32)
where
    S: Shuffler + ?Sized,
    E: EventSink + ?Sized,
{
    let mut result = None;
    let mut rounds = 0;
    for round in 1..=max_rounds {
        rounds = round;
        sink.emit(GameEvent::RoundStarted {
            round,
            standings: standings(players),
        });
        let outcome = play_round(players, &mut *shuffler, &mut *sink);
        if let Some(settled) = settle(players, outcome) {
            result = Some(settled);
            break;
        }
    }

    let outcome = result.unwrap_or(GameOutcome::Unresolved { rounds: max_rounds });
    event!(
        target: "war_core::game",
        Level::INFO,
        rounds,
        outcome = ?outcome,
        "game finished"
    );
    sink.emit(GameEvent::GameOver {
        outcome: outcome.clone(),
        rounds,
        standings: standings(players),
    });
    (outcome, rounds)
}

/// Plays rounds until someone runs out of cards or `max_rounds` is reached.
pub fn play_game<S, E>(
    players: &mut [Player; 2],
    max_rounds: u32,
    shuffler: &mut S,
    sink: &mut E,
) -> GameOutcome
where
    S: Shuffler + ?Sized,
    E: EventSink + ?Sized,
{
    run_rounds(players, max_rounds, shuffler, sink).0
}

/// A seeded two-player game: owns the players and the reshuffle generator.
#[derive(Debug, Clone)]
pub struct MatchState {
    players: [Player; 2],
    rng: StdRng,
    max_rounds: u32,
    rounds_played: u32,
    outcome: Option<GameOutcome>,
}

impl MatchState {
    pub fn new(hands: [&NormalizedHand; 2], names: [&str; 2], seed: u64) -> Self {
        let rng = StdRng::seed_from_u64(seed);
        Self::from_parts(hands, names, rng)
    }

    /// Deals a shuffled 52-card deck, 26 cards each, from the same seed
    /// that drives later reshuffles.
    pub fn random_deal(names: [&str; 2], seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let (first, second) = Deck::shuffled(&mut rng).deal();
        Self::from_parts([&first, &second], names, rng)
    }

    pub fn random_seed() -> u64 {
        rand::random()
    }

    fn from_parts(hands: [&NormalizedHand; 2], names: [&str; 2], rng: StdRng) -> Self {
        let players = [
            Player::new(Seat::One, names[0], hands[0]),
            Player::new(Seat::Two, names[1], hands[1]),
        ];
        Self {
            players,
            rng,
            max_rounds: DEFAULT_MAX_ROUNDS,
            rounds_played: 0,
            outcome: None,
        }
    }

    #[must_use]
    pub fn with_max_rounds(mut self, max_rounds: u32) -> Self {
        self.max_rounds = max_rounds;
        self
    }

    pub fn players(&self) -> &[Player; 2] {
        &self.players
    }

    pub fn rounds_played(&self) -> u32 {
        self.rounds_played
    }

    /// Plays the game to completion. A finished match returns its stored outcome.
    pub fn play<E: EventSink + ?Sized>(&mut self, sink: &mut E) -> GameOutcome {
        if let Some(outcome) = &self.outcome {
            return outcome.clone();
        }
        let (outcome, rounds) =
            run_rounds(&mut self.players, self.max_rounds, &mut self.rng, sink);
        self.rounds_played = rounds;
        self.outcome = Some(outcome.clone());
        outcome
    }
}
