use std::io::{self, BufRead, Write};

use anyhow::{bail, Context, Result};
use clap::Parser;
use log::{info, warn};
use netwalk::{Difficulty, GameOptions, Location, PuzzleSession, RotateOutcome, RotationDirection};

/// Play Net-style pipe puzzles in the terminal
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Side length of a square grid
    #[arg(short, long, default_value = "7")]
    size: usize,

    /// Grid width; overrides --size
    #[arg(short = 'W', long)]
    width: Option<usize>,

    /// Grid height; overrides --size
    #[arg(short = 'H', long)]
    height: Option<usize>,

    /// easy, medium or hard
    #[arg(short, long, default_value = "medium")]
    difficulty: Difficulty,

    /// Join opposite borders
    #[arg(long)]
    wrap: bool,

    /// Number of drains; every leaf of the layout is a drain if unset
    #[arg(long)]
    drains: Option<usize>,

    /// Seed for a reproducible puzzle
    #[arg(long)]
    seed: Option<u64>,

    /// Print the puzzle and its solution, then exit
    #[arg(long)]
    solve: bool,
}

impl Args {
    fn options(&self) -> GameOptions {
        GameOptions {
            width: self.width.unwrap_or(self.size),
            height: self.height.unwrap_or(self.size),
            wrap: self.wrap,
            difficulty: self.difficulty,
            drain_count: self.drains,
            seed: self.seed,
        }
    }
}

const HELP: &str = "commands: r X Y [ccw] | l X Y | hint | reset | new | solve | q";

fn parse_location(x: Option<&str>, y: Option<&str>) -> Result<Location> {
    match (x, y) {
        (Some(x), Some(y)) => Ok(Location(
            x.parse().with_context(|| format!("bad column {x:?}"))?,
            y.parse().with_context(|| format!("bad row {y:?}"))?,
        )),
        _ => bail!("expected a column and a row"),
    }
}

fn print_board(session: &PuzzleSession) {
    print!("{}", session.grid());
    println!(
        "moves {}/{}, {:.0}s, {}",
        session.move_count(), session.expected_moves(), session.elapsed().as_secs_f64(), session.state(),
    );
}

/// Apply one command line; returns whether to keep going.
fn handle(session: &mut PuzzleSession, line: &str) -> Result<bool> {
    let mut words = line.split_whitespace();
    match words.next() {
        None => {}
        Some("q" | "quit") => return Ok(false),
        Some("r" | "rotate") => {
            let location = parse_location(words.next(), words.next())?;
            let direction = match words.next() {
                Some("ccw") => RotationDirection::CounterClockwise,
                _ => RotationDirection::Clockwise,
            };
            if let RotateOutcome::Solved(result) = session.rotate(location, direction)? {
                println!(
                    "solved in {} moves ({} expected), {:.1}s, score {:.2}",
                    result.moves, result.expected_moves, result.elapsed.as_secs_f64(), result.score,
                );
            }
        }
        Some("l" | "lock") => {
            let location = parse_location(words.next(), words.next())?;
            let locked = session.toggle_lock(location)?;
            println!("{location} {}", if locked { "locked" } else { "unlocked" });
        }
        Some("hint") => match session.hint() {
            Some(hint) => println!("turn {} {:?}", hint.location, hint.direction),
            None => println!("nothing left to turn"),
        },
        Some("reset") => session.reset(),
        Some("new") => session.new_game(None)?,
        Some("solve") => {
            let solved = session.grid().clone().solve()?;
            print!("{solved}");
            return Ok(true);
        }
        Some(other) => bail!("unknown command {other:?}; {HELP}"),
    }

    print_board(session);
    Ok(true)
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let args = Args::parse();
    info!("starting with {args:?}");

    let mut session = PuzzleSession::start(args.options()).context("could not start a game")?;

    if args.solve {
        print!("{}", session.grid());
        println!();
        let solved = session.grid().clone().solve().context("no solution found")?;
        print!("{solved}");
        return Ok(());
    }

    println!("{HELP}");
    print_board(&session);

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    for line in stdin.lock().lines() {
        let line = line.context("failed to read stdin")?;
        match handle(&mut session, &line) {
            Ok(true) => {}
            Ok(false) => break,
            Err(e) => {
                warn!("rejected {line:?}: {e}");
                println!("{e}");
            }
        }
        stdout.flush()?;
    }

    Ok(())
}
