use std::io::{self, Write};
use std::thread;

use war_core::game::round::MAX_FACE_DOWN;
use war_core::{EventSink, GameEvent, GameOutcome, Player, Seat, display_hand};

use crate::config::{Beat, PacingConfig, PlayMode};

const HEAVY_RULE: &str = "==================================================";
const LIGHT_RULE: &str = "--------------------------------------------------";
const STAR_RULE: &str = "**************************************************";

/// Sleeps between beats in game mode; quick mode never waits.
#[derive(Debug, Clone)]
pub struct Pacing {
    delays: PacingConfig,
    enabled: bool,
}

impl Pacing {
    pub fn new(mode: PlayMode, delays: PacingConfig) -> Self {
        Self {
            delays,
            enabled: mode == PlayMode::Game,
        }
    }

    pub fn pause(&self, beat: Beat) {
        if self.enabled {
            thread::sleep(self.delays.delay(beat));
        }
    }
}

pub fn write_intro<W: Write>(out: &mut W) -> io::Result<()> {
    writeln!(out, "{HEAVY_RULE}")?;
    writeln!(out, "           WAR CARD GAME SIMULATOR")?;
    writeln!(out, "{HEAVY_RULE}")?;
    writeln!(out, "\nCard notation:")?;
    writeln!(out, "  1 or A: Ace    |  2 or D: Deuce  |  3-9: Number")?;
    writeln!(
        out,
        "  T: 10          |  J: Jack        |  Q: Queen    |  K: King"
    )?;
    writeln!(out, "\nExample: K2T4J59 = King, 2, 10, 4, Jack, 5, 9")?;
    writeln!(out, "{LIGHT_RULE}\n")
}

/// Announces a generated seed so the game can be replayed.
pub fn write_seed<W: Write>(out: &mut W, seed: u64) -> io::Result<()> {
    writeln!(out, "  >> Random seed {seed} (replay with --seed {seed})")
}

pub fn write_random_deal<W: Write>(out: &mut W, players: &[Player; 2]) -> io::Result<()> {
    writeln!(out, "\n  >> Shuffling a fresh 52-card deck...")?;
    writeln!(out, "  >> Dealing 26 cards to each player...\n")?;
    for player in players {
        writeln!(out, "{}'s hand: {}\n", player.name(), hand_names(player))?;
    }
    Ok(())
}

/// The "Both hands ready!" summary followed by the opening banner.
pub fn write_opening<W: Write>(out: &mut W, players: &[Player; 2]) -> io::Result<()> {
    writeln!(out, "{LIGHT_RULE}")?;
    writeln!(out, "Both hands ready!")?;
    for player in players {
        writeln!(
            out,
            "  {}: {} ({} cards)",
            player.name(),
            hand_names(player),
            player.hand_len()
        )?;
    }
    writeln!(out, "{LIGHT_RULE}")?;

    writeln!(out, "\n{HEAVY_RULE}")?;
    writeln!(out, "         LET THE WAR BEGIN!")?;
    writeln!(out, "{HEAVY_RULE}")?;
    writeln!(out)?;
    for player in players {
        writeln!(out, "{} starts with: {}", player.name(), hand_names(player))?;
    }
    Ok(())
}

fn hand_names(player: &Player) -> String {
    let cards: Vec<_> = player.hand().collect();
    display_hand(&cards)
}

/// Console transcript of a game. Write failures stop output and are kept
/// for [`TextRenderer::finish`].
pub struct TextRenderer<W: Write> {
    out: W,
    names: [String; 2],
    pacing: Pacing,
    error: Option<io::Error>,
}

impl<W: Write> TextRenderer<W> {
    pub fn new(out: W, players: &[Player; 2], pacing: Pacing) -> Self {
        Self {
            out,
            names: players.each_ref().map(|p| p.name().to_string()),
            pacing,
            error: None,
        }
    }

    pub fn finish(mut self) -> io::Result<W> {
        if let Some(err) = self.error.take() {
            return Err(err);
        }
        self.out.flush()?;
        Ok(self.out)
    }

    fn render(&mut self, event: &GameEvent) -> io::Result<()> {
        let names = &self.names;
        let name = |seat: Seat| names[seat.index()].as_str();

        match event {
            GameEvent::RoundStarted { round, standings } => {
                writeln!(self.out, "\n{HEAVY_RULE}")?;
                writeln!(self.out, "ROUND {round}")?;
                writeln!(self.out, "{HEAVY_RULE}")?;
                for standing in standings {
                    writeln!(self.out, "  {}", standing.status_line(name(standing.seat)))?;
                }
                pause(&mut self.out, &self.pacing, Beat::RoundStart)
            }
            GameEvent::Reshuffled { seat, hand } => writeln!(
                self.out,
                "  >> {} shuffles their collection into a new hand: {}",
                name(*seat),
                display_hand(hand)
            ),
            GameEvent::CardPlayed { seat, card } => {
                let lead = if *seat == Seat::One { "\n" } else { "" };
                writeln!(self.out, "{lead}  {} plays: {card}", name(*seat))?;
                pause(&mut self.out, &self.pacing, Beat::CardPlay)
            }
            GameEvent::BattleWon { seat, pot } => {
                let winner = name(*seat);
                writeln!(self.out, "\n  >> {winner} wins this battle!")?;
                writeln!(self.out, "  >> {winner} collects: {}", display_hand(pot))?;
                pause(&mut self.out, &self.pacing, Beat::BattleResult)
            }
            GameEvent::WarDeclared { rank } => {
                writeln!(self.out, "\n  ** TIE! Both played {rank}! **")?;
                writeln!(self.out, "  ** I DECLARE WAR! **")?;
                pause(&mut self.out, &self.pacing, Beat::WarDeclare)
            }
            GameEvent::WarStakes {
                available,
                face_down,
            } => {
                let short: Vec<Seat> = Seat::BOTH
                    .into_iter()
                    .filter(|seat| face_down[seat.index()] < MAX_FACE_DOWN)
                    .collect();
                if short.is_empty() {
                    return writeln!(self.out, "  ** Each player puts 3 cards face down... **");
                }
                for seat in short {
                    writeln!(
                        self.out,
                        "  ** {} only has {} card(s) left - playing final card! **",
                        name(seat),
                        available[seat.index()]
                    )?;
                }
                Ok(())
            }
            GameEvent::FaceDown { seat, cards } => writeln!(
                self.out,
                "  {}'s face-down cards: {}",
                name(*seat),
                display_hand(cards)
            ),
            GameEvent::PotGrew { size } => {
                pause(&mut self.out, &self.pacing, Beat::WarCards)?;
                writeln!(self.out, "\n  Total cards in pot: {size}")?;
                writeln!(self.out, "  ** Now comparing the next cards... **")?;
                pause(&mut self.out, &self.pacing, Beat::CardPlay)
            }
            GameEvent::Exhausted { seats, during_war } => match (seats.as_slice(), *during_war) {
                ([seat], false) => writeln!(
                    self.out,
                    "\n  {} ran out of cards! {} wins the game!",
                    name(*seat),
                    name(seat.opponent())
                ),
                ([seat], true) => writeln!(
                    self.out,
                    "\n  {} has no cards for war! {} wins!",
                    name(*seat),
                    name(seat.opponent())
                ),
                (_, false) => writeln!(
                    self.out,
                    "\n  Both players ran out of cards simultaneously! It's a draw!"
                ),
                (_, true) => writeln!(
                    self.out,
                    "\n  Both players have no cards left! It's a draw!"
                ),
            },
            GameEvent::GameOver {
                outcome,
                rounds,
                standings,
            } => {
                pause(&mut self.out, &self.pacing, Beat::GameEnd)?;
                match outcome {
                    GameOutcome::Winner { name, cards, .. } => {
                        writeln!(self.out, "\n{STAR_RULE}")?;
                        writeln!(self.out, "  {name} WINS THE GAME!")?;
                        writeln!(self.out, "  Final: {name} has {cards} cards")?;
                        writeln!(self.out, "{STAR_RULE}")
                    }
                    GameOutcome::Draw => Ok(()),
                    GameOutcome::Unresolved { .. } => {
                        writeln!(
                            self.out,
                            "\n  Game ended after {rounds} rounds (safety limit)."
                        )?;
                        for standing in standings {
                            let line = standing.status_line(name(standing.seat));
                            writeln!(self.out, "  {line}")?;
                        }
                        Ok(())
                    }
                }
            }
        }
    }
}

fn pause<W: Write>(out: &mut W, pacing: &Pacing, beat: Beat) -> io::Result<()> {
    if pacing.enabled {
        out.flush()?;
    }
    pacing.pause(beat);
    Ok(())
}

impl<W: Write> EventSink for TextRenderer<W> {
    fn emit(&mut self, event: GameEvent) {
        if self.error.is_some() {
            return;
        }
        if let Err(err) = self.render(&event) {
            self.error = Some(err);
        }
    }
}

/// One JSON object per event, newline separated.
pub struct JsonlRenderer<W: Write> {
    out: W,
    error: Option<io::Error>,
}

impl<W: Write> JsonlRenderer<W> {
    pub fn new(out: W) -> Self {
        Self { out, error: None }
    }

    pub fn finish(mut self) -> io::Result<W> {
        if let Some(err) = self.error.take() {
            return Err(err);
        }
        self.out.flush()?;
        Ok(self.out)
    }

    fn write_line(&mut self, event: &GameEvent) -> io::Result<()> {
        serde_json::to_writer(&mut self.out, event)?;
        self.out.write_all(b"\n")
    }
}

impl<W: Write> EventSink for JsonlRenderer<W> {
    fn emit(&mut self, event: GameEvent) {
        if self.error.is_some() {
            return;
        }
        if let Err(err) = self.write_line(&event) {
            self.error = Some(err);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{JsonlRenderer, Pacing, TextRenderer, write_opening, write_seed};
    use crate::config::{PacingConfig, PlayMode};
    use std::io::{self, Write};
    use war_core::{EventSink, GameEvent, MatchState, Seat, validate_hand};

    fn play_text(first: &str, second: &str, max_rounds: u32) -> String {
        let a = validate_hand(first).unwrap();
        let b = validate_hand(second).unwrap();
        let state = MatchState::new([&a, &b], ["Alice", "Bob"], 3);
        let mut state = state.with_max_rounds(max_rounds);
        let pacing = Pacing::new(PlayMode::Quick, PacingConfig::default());
        let mut renderer = TextRenderer::new(Vec::new(), state.players(), pacing);
        state.play(&mut renderer);
        String::from_utf8(renderer.finish().unwrap()).unwrap()
    }

    #[test]
    fn battle_transcript_reads_like_the_console() {
        let out = play_text("K", "2", 10);
        assert!(out.contains("ROUND 1\n"));
        let status = "  Alice: 1 in hand, 0 in collection (1 total)\n";
        assert!(out.contains(status));
        assert!(out.contains("\n  Alice plays: King\n  Bob plays: 2\n"));
        let battle = "  >> Alice wins this battle!\n  >> Alice collects: King, 2\n";
        assert!(out.contains(battle));
        let banner = "  Alice WINS THE GAME!\n  Final: Alice has 2 cards\n";
        assert!(out.contains(banner));
    }

    #[test]
    fn war_transcript_lists_stakes_and_pot() {
        let out = play_text("5234K", "5678Q", 10);
        assert!(out.contains("** TIE! Both played 5! **"));
        assert!(out.contains("** I DECLARE WAR! **"));
        assert!(out.contains("** Each player puts 3 cards face down... **"));
        assert!(out.contains("  Alice's face-down cards: 2, 3, 4"));
        assert!(out.contains("  Bob's face-down cards: 6, 7, 8"));
        assert!(out.contains("Total cards in pot: 8"));
        assert!(out.contains("** Now comparing the next cards... **"));
    }

    #[test]
    fn short_stack_is_announced() {
        let out = play_text("52K", "5999Q", 10);
        let notice = "** Alice only has 2 card(s) left - playing final card! **";
        assert!(out.contains(notice));
        assert!(!out.contains("Bob only has"));
    }

    #[test]
    fn exhaustion_in_war_names_both_players() {
        let out = play_text("5", "5KQ", 10);
        assert!(out.contains("Alice has no cards for war! Bob wins!"));
    }

    #[test]
    fn safety_limit_is_reported() {
        let out = play_text("K2", "3Q", 1);
        assert!(out.contains("Game ended after 1 rounds (safety limit)."));
        assert!(out.contains("  Bob: 1 in hand, 0 in collection (1 total)"));
    }

    #[test]
    fn opening_lists_both_hands() {
        let a = validate_hand("k2t").unwrap();
        let b = validate_hand("a").unwrap();
        let state = MatchState::new([&a, &b], ["Alice", "Bob"], 1);
        let mut out = Vec::new();
        write_opening(&mut out, state.players()).unwrap();
        let out = String::from_utf8(out).unwrap();
        assert!(out.contains("  Alice: King, 2, 10 (3 cards)"));
        assert!(out.contains("LET THE WAR BEGIN!"));
        let starts = "\nAlice starts with: King, 2, 10\nBob starts with: Ace\n";
        assert!(out.contains(starts));
    }

    #[test]
    fn seed_line_names_the_replay_flag() {
        let mut out = Vec::new();
        write_seed(&mut out, 4242).unwrap();
        let out = String::from_utf8(out).unwrap();
        assert_eq!(out, "  >> Random seed 4242 (replay with --seed 4242)\n");
    }

    #[test]
    fn jsonl_writes_one_event_per_line() {
        let mut renderer = JsonlRenderer::new(Vec::new());
        renderer.emit(GameEvent::PotGrew { size: 8 });
        renderer.emit(GameEvent::Exhausted {
            seats: vec![Seat::Two],
            during_war: true,
        });
        let out = String::from_utf8(renderer.finish().unwrap()).unwrap();
        assert_eq!(
            out,
            "{\"event\":\"pot_grew\",\"size\":8}\n\
             {\"event\":\"exhausted\",\"seats\":[\"two\"],\"during_war\":true}\n"
        );
    }

    struct Broken;

    impl Write for Broken {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn write_errors_surface_on_finish() {
        let mut renderer = JsonlRenderer::new(Broken);
        renderer.emit(GameEvent::PotGrew { size: 2 });
        renderer.emit(GameEvent::PotGrew { size: 4 });
        let err = renderer.finish().err().expect("broken pipe");
        assert_eq!(err.kind(), io::ErrorKind::BrokenPipe);
    }
}
