use std::io::{self, BufRead, Write};

use war_core::{NormalizedHand, Seat, display_hand, validate_hand};

use crate::config::PlayMode;

/// What the player typed at the first hand prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HandChoice {
    RandomDeal,
    Hand(NormalizedHand),
}

/// Line-oriented console prompts. Closed input is reported as `UnexpectedEof`.
pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn output(&mut self) -> &mut W {
        &mut self.output
    }

    fn ask(&mut self, question: &str) -> io::Result<String> {
        write!(self.output, "{question}")?;
        self.output.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "input closed while waiting for an answer",
            ));
        }
        Ok(line.trim().to_string())
    }

    /// A blank answer keeps "Player N".
    pub fn player_name(&mut self, seat: Seat) -> io::Result<String> {
        let default_name = seat.default_name();
        let name = self.ask(&format!(
            "Enter name for {default_name} (or press Enter for default): "
        ))?;
        Ok(if name.is_empty() { default_name } else { name })
    }

    pub fn play_mode(&mut self) -> io::Result<PlayMode> {
        loop {
            let answer = self
                .ask("Select mode - [G]ame (with pauses) or [Q]uick (instant): ")?
                .to_uppercase();
            match answer.as_str() {
                "G" | "GAME" => {
                    writeln!(
                        self.output,
                        "  >> Game mode selected - enjoy watching the battle!\n"
                    )?;
                    return Ok(PlayMode::Game);
                }
                "Q" | "QUICK" => {
                    writeln!(
                        self.output,
                        "  >> Quick mode selected - instant simulation!\n"
                    )?;
                    return Ok(PlayMode::Quick);
                }
                _ => writeln!(
                    self.output,
                    "Invalid selection. Please enter 'G' for Game mode or 'Q' for Quick mode.\n"
                )?,
            }
        }
    }

    /// The first hand prompt also accepts `R` for a random deal.
    pub fn first_hand(&mut self, name: &str) -> io::Result<HandChoice> {
        let answer = self.ask(&format!("Enter {name}'s hand (or 'R' for random deal): "))?;
        if answer.eq_ignore_ascii_case("r") {
            return Ok(HandChoice::RandomDeal);
        }
        let hand = self.retry_hand(name, answer)?;
        Ok(HandChoice::Hand(hand))
    }

    pub fn hand(&mut self, name: &str) -> io::Result<NormalizedHand> {
        let answer = self.ask(&format!("Enter {name}'s hand: "))?;
        self.retry_hand(name, answer)
    }

    fn retry_hand(&mut self, name: &str, mut answer: String) -> io::Result<NormalizedHand> {
        loop {
            match validate_hand(&answer) {
                Ok(hand) => {
                    writeln!(
                        self.output,
                        "{name}'s hand: {}\n",
                        display_hand(hand.cards())
                    )?;
                    return Ok(hand);
                }
                Err(err) => {
                    writeln!(self.output, "Invalid hand: {err}")?;
                    writeln!(self.output, "Please try again.\n")?;
                    answer = self.ask(&format!("Enter {name}'s hand: "))?;
                }
            }
        }
    }
}
