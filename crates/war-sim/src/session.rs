use std::io::{self, BufRead, Write};

use anyhow::{Context, Result, bail};
use tracing::{Level, event};
use war_core::{GameOutcome, MatchState, NormalizedHand, Seat};

use crate::config::{Beat, DealMode, OutputFormat, PlayMode, SimConfig};
use crate::prompt::{HandChoice, Prompter};
use crate::render::{self, JsonlRenderer, Pacing, TextRenderer};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionReport {
    pub outcome: GameOutcome,
    pub rounds: u32,
    pub seed: u64,
}

/// Names, hands and mode after config and prompts were combined.
#[derive(Debug, Clone)]
struct Setup {
    names: [String; 2],
    hands: [Option<NormalizedHand>; 2],
    deal: DealMode,
    mode: PlayMode,
}

/// Resolves missing setup interactively (when allowed) and plays one game.
///
/// Prompts go to `prompt_out`; the transcript or event stream goes to `out`.
pub fn run_session<R, P, W>(
    config: &SimConfig,
    allow_prompt: bool,
    input: R,
    prompt_out: P,
    mut out: W,
) -> Result<SessionReport>
where
    R: BufRead,
    P: Write,
    W: Write,
{
    let setup = resolve_setup(config, allow_prompt, input, prompt_out)?;
    let generated_seed = config.seed.is_none();
    let seed = config.seed.unwrap_or_else(MatchState::random_seed);
    let names = [setup.names[0].as_str(), setup.names[1].as_str()];

    let state = match (setup.deal, &setup.hands) {
        (DealMode::Random, _) => MatchState::random_deal(names, seed),
        (DealMode::Manual, [Some(first), Some(second)]) => {
            MatchState::new([first, second], names, seed)
        }
        (DealMode::Manual, _) => bail!("both hands must be provided for a manual deal"),
    };
    let mut state = state.with_max_rounds(config.max_rounds);

    event!(
        target: "war_sim::session",
        Level::INFO,
        seed,
        deal = ?setup.deal,
        mode = ?setup.mode,
        max_rounds = config.max_rounds,
        "starting game"
    );

    let pacing = Pacing::new(setup.mode, config.pacing.clone());
    let outcome = match config.output.format {
        OutputFormat::Text => {
            if generated_seed {
                render::write_seed(&mut out, seed)?;
            }
            if setup.deal == DealMode::Random {
                render::write_random_deal(&mut out, state.players())?;
            }
            render::write_opening(&mut out, state.players())
                .context("writing opening banner")?;
            out.flush()?;
            pacing.pause(Beat::BattleResult);

            let mut renderer = TextRenderer::new(out, state.players(), pacing);
            let outcome = state.play(&mut renderer);
            renderer.finish().context("writing game transcript")?;
            outcome
        }
        OutputFormat::Jsonl => {
            let mut renderer = JsonlRenderer::new(out);
            let outcome = state.play(&mut renderer);
            renderer.finish().context("writing event stream")?;
            outcome
        }
    };

    Ok(SessionReport {
        outcome,
        rounds: state.rounds_played(),
        seed,
    })
}

fn resolve_setup<R, P>(
    config: &SimConfig,
    allow_prompt: bool,
    input: R,
    prompt_out: P,
) -> Result<Setup>
where
    R: BufRead,
    P: Write,
{
    let hands = config.hands()?;
    let names = Seat::BOTH.map(|seat| {
        config
            .name(seat)
            .map_or_else(|| seat.default_name(), str::to_string)
    });

    if !config.needs_hands() {
        return Ok(Setup {
            names,
            hands,
            deal: config.deal,
            mode: config.mode.unwrap_or_default(),
        });
    }

    if !allow_prompt {
        bail!(
            "both hands are required: pass --hand1 and --hand2, --random, \
             or a config with players[].hand"
        );
    }

    let mut prompter = Prompter::new(input, prompt_out);
    prompt_missing(&mut prompter, config, names, hands)
        .context("reading game setup from input")
}

fn prompt_missing<R, P>(
    prompter: &mut Prompter<R, P>,
    config: &SimConfig,
    mut names: [String; 2],
    mut hands: [Option<NormalizedHand>; 2],
) -> io::Result<Setup>
where
    R: BufRead,
    P: Write,
{
    render::write_intro(prompter.output())?;
    for seat in Seat::BOTH {
        if config.name(seat).is_none() {
            names[seat.index()] = prompter.player_name(seat)?;
        }
    }
    writeln!(prompter.output())?;

    let mode = match config.mode {
        Some(mode) => mode,
        None => prompter.play_mode()?,
    };

    let mut deal = DealMode::Manual;
    if hands[0].is_none() {
        match prompter.first_hand(&names[0])? {
            HandChoice::RandomDeal => deal = DealMode::Random,
            HandChoice::Hand(hand) => hands[0] = Some(hand),
        }
    }
    if deal == DealMode::Manual && hands[1].is_none() {
        hands[1] = Some(prompter.hand(&names[1])?);
    }

    Ok(Setup {
        names,
        hands,
        deal,
        mode,
    })
}
