//! UCI protocol front-end and command loop.
//!
//! A reader thread owns stdin so that `stop` and `quit` can raise the engine's
//! stop handle while a search is running on the command thread. Every other
//! command is forwarded in order and handled by `UciState`.

use std::io::{self, BufRead, Write};
use std::sync::atomic::Ordering;
use std::sync::mpsc;
use std::thread;

use tracing::{debug, error, warn};

use crate::chess_errors::{ChessErrors, ChessResult};
use crate::engines::engine_iterative::IterativeEngine;
use crate::engines::engine_trait::{Engine, GoParams};
use crate::utils::render_game_state::render_game_state;

pub fn run_stdio_loop() -> io::Result<()> {
    let mut uci = UciState::new();
    let stop = uci.engine.stop_handle();
    let (command_tx, command_rx) = mpsc::channel::<String>();

    thread::spawn(move || {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            match line.split_whitespace().next() {
                Some("go") => stop.store(false, Ordering::Relaxed),
                Some("stop") | Some("quit") => stop.store(true, Ordering::Relaxed),
                _ => {}
            }
            if command_tx.send(line).is_err() {
                break;
            }
        }
        // Closed input must not leave `go infinite` waiting.
        stop.store(true, Ordering::Relaxed);
    });

    let mut stdout = io::stdout();
    for line in command_rx {
        let should_quit = uci.handle_command(&line, &mut stdout)?;
        stdout.flush()?;
        if should_quit {
            break;
        }
    }

    Ok(())
}

pub struct UciState {
    engine: Box<dyn Engine>,
}

impl Default for UciState {
    fn default() -> Self {
        Self::new()
    }
}

impl UciState {
    pub fn new() -> Self {
        Self::with_engine(Box::new(IterativeEngine::default()))
    }

    pub fn with_engine(engine: Box<dyn Engine>) -> Self {
        Self { engine }
    }

    pub fn engine(&self) -> &dyn Engine {
        self.engine.as_ref()
    }

    /// Handle one line of input. Returns `true` on `quit`.
    pub fn handle_command(&mut self, line: &str, out: &mut impl Write) -> io::Result<bool> {
        let trimmed = line.trim();
        let Some(cmd) = trimmed.split_whitespace().next() else {
            return Ok(false);
        };

        match cmd {
            "uci" => {
                writeln!(out, "id name {}", self.engine.name())?;
                writeln!(out, "id author {}", self.engine.author())?;
                writeln!(out, "option name Hash type spin default 16 min 1 max 4096")?;
                writeln!(out, "option name OwnBook type check default true")?;
                writeln!(
                    out,
                    "option name BookPolicy type combo default play var off var play var bias"
                )?;
                writeln!(out, "option name FixedDepth type spin default 0 min 0 max 64")?;
                writeln!(
                    out,
                    "option name TimeStrategy type combo default adaptive var adaptive var fraction20"
                )?;
                writeln!(out, "uciok")?;
            }
            "isready" => {
                writeln!(out, "readyok")?;
            }
            "setoption" => {
                if let Err(err) = self.handle_setoption(trimmed) {
                    writeln!(out, "info string setoption error: {err}")?;
                }
            }
            "ucinewgame" => {
                self.engine.new_game();
            }
            "position" => {
                if let Err(err) = self.handle_position(trimmed) {
                    writeln!(out, "info string position error: {err}")?;
                }
            }
            "go" => {
                self.handle_go(trimmed, out)?;
            }
            "stop" => {
                // The reader thread already raised the stop handle.
            }
            "d" => {
                let game_state = self.engine.game_state();
                writeln!(out, "{}", render_game_state(game_state))?;
                writeln!(out, "Fen: {}", game_state.get_fen())?;
            }
            "quit" => {
                return Ok(true);
            }
            _ => {
                debug!(command = cmd, "ignoring unknown command");
            }
        }

        Ok(false)
    }

    fn handle_setoption(&mut self, line: &str) -> ChessResult<()> {
        let mut name_tokens = Vec::<&str>::new();
        let mut value_tokens = Vec::<&str>::new();
        let mut mode = "";

        for tok in line.split_whitespace().skip(1) {
            match tok {
                "name" => mode = "name",
                "value" => mode = "value",
                _ if mode == "name" => name_tokens.push(tok),
                _ if mode == "value" => value_tokens.push(tok),
                _ => {}
            }
        }

        if name_tokens.is_empty() {
            return Err(ChessErrors::MalformedCommand(
                "setoption without a name".to_owned(),
            ));
        }
        self.engine
            .set_option(&name_tokens.join(" "), &value_tokens.join(" "))
    }

    fn handle_position(&mut self, line: &str) -> ChessResult<()> {
        let mut tokens = line.split_whitespace().skip(1);

        let fen = match tokens.next() {
            Some("startpos") => {
                match tokens.next() {
                    None | Some("moves") => {}
                    Some(other) => {
                        return Err(ChessErrors::MalformedCommand(format!(
                            "unexpected token '{other}' after startpos"
                        )))
                    }
                }
                None
            }
            Some("fen") => {
                let fen_parts: Vec<&str> = tokens.by_ref().take_while(|t| *t != "moves").collect();
                if fen_parts.is_empty() {
                    return Err(ChessErrors::MalformedCommand(
                        "missing FEN after 'position fen'".to_owned(),
                    ));
                }
                Some(fen_parts.join(" "))
            }
            Some(other) => {
                return Err(ChessErrors::MalformedCommand(format!(
                    "unsupported position token '{other}'"
                )))
            }
            None => {
                return Err(ChessErrors::MalformedCommand(
                    "incomplete position command".to_owned(),
                ))
            }
        };

        let moves: Vec<&str> = tokens.collect();
        self.engine.set_position(fen.as_deref(), &moves)
    }

    fn handle_go(&mut self, line: &str, out: &mut impl Write) -> io::Result<()> {
        let params = parse_go_params(line);
        match self.engine.go(&params) {
            Ok(result) => {
                for info in &result.info_lines {
                    writeln!(out, "{info}")?;
                }
                match result.best_move {
                    Some(best_move) => writeln!(out, "bestmove {best_move}")?,
                    None => writeln!(out, "bestmove 0000")?,
                }
            }
            Err(err) => {
                if err.is_internal() {
                    error!(%err, "search hit a broken position invariant");
                } else {
                    warn!(%err, "search failed");
                }
                writeln!(out, "info string go error: {err}")?;
                writeln!(out, "bestmove 0000")?;
            }
        }
        Ok(())
    }
}

/// Unknown tokens and unparsable numbers are skipped.
fn parse_go_params(line: &str) -> GoParams {
    let mut params = GoParams::default();
    let mut tokens = line.split_whitespace().skip(1);

    while let Some(token) = tokens.next() {
        match token {
            "depth" => params.depth = tokens.next().and_then(|x| x.parse().ok()),
            "movetime" => params.movetime_ms = tokens.next().and_then(|x| x.parse().ok()),
            "wtime" => params.wtime_ms = tokens.next().and_then(|x| x.parse().ok()),
            "btime" => params.btime_ms = tokens.next().and_then(|x| x.parse().ok()),
            "winc" => params.winc_ms = tokens.next().and_then(|x| x.parse().ok()),
            "binc" => params.binc_ms = tokens.next().and_then(|x| x.parse().ok()),
            "movestogo" => params.movestogo = tokens.next().and_then(|x| x.parse().ok()),
            "infinite" => params.infinite = true,
            _ => {}
        }
    }
    params
}
