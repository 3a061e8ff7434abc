use std::io::{BufRead, Write};

use anyhow::{Context, Result};
use log::debug;
use twenty48_core::{GameSession, Move};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Slide(Move),
    Restart,
    Quit,
}

fn parse_command(line: &str) -> Option<Command> {
    match line.trim().to_ascii_lowercase().as_str() {
        "q" | "quit" | "exit" => Some(Command::Quit),
        "r" | "restart" | "new" => Some(Command::Restart),
        other => other.parse::<Move>().ok().map(Command::Slide),
    }
}

fn render<W: Write>(out: &mut W, session: &GameSession) -> Result<()> {
    writeln!(out, "Score: {}", session.score())?;
    write!(out, "{}", session.board())?;
    Ok(())
}

/// Read commands line by line until `quit` or end of input.
///
/// Moves are `w/a/s/d` or `up/left/down/right`; `r` starts a new game.
pub fn run<R: BufRead, W: Write>(session: &mut GameSession, input: R, out: &mut W) -> Result<()> {
    writeln!(out, "2048 Game")?;
    render(out, session)?;

    for line in input.lines() {
        let line = line.context("reading command from input")?;
        if line.trim().is_empty() {
            continue;
        }
        match parse_command(&line) {
            Some(Command::Quit) => break,
            Some(Command::Restart) => {
                session.restart();
                writeln!(out, "New Game")?;
                render(out, session)?;
            }
            Some(Command::Slide(_)) if session.is_terminal() => {
                writeln!(out, "Game over. Type r to restart or q to quit.")?;
            }
            Some(Command::Slide(dir)) => {
                let turn = session.play(dir);
                if !turn.moved {
                    debug!("{dir} does not change the board");
                    continue;
                }
                render(out, session)?;
                if turn.terminal {
                    writeln!(out, "GAME OVER! Score: {}", session.score())?;
                }
            }
            None => {
                writeln!(out, "Unknown command {:?}; use w/a/s/d, r or q.", line.trim())?;
            }
        }
    }
    out.flush()?;
    Ok(())
}
