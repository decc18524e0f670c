use std::io::{self, BufRead, Write};
use std::thread;
use std::time::Instant;

use anyhow::{bail, Context, Result};

use wordmatch_lib::favorites::lookup_definition;
use wordmatch_lib::round::{ClickOutcome, GameSession};
use wordmatch_lib::words::WordEntry;

use crate::app::App;
use crate::render::terminal::{paint, position_label, render_board, Color};

/// One line of player input
#[derive(Debug, PartialEq)]
enum Command {
    /// Pair word slot (0-based) with definition position (0-based)
    Match { slot: usize, position: usize },
    Favorite(usize),
    Pause,
    Quit,
    Help,
    Invalid(String),
}

fn parse_command(input: &str) -> Command {
    let input = input.trim().to_lowercase();
    match input.as_str() {
        "q" | "quit" => return Command::Quit,
        "p" | "pause" => return Command::Pause,
        "h" | "?" | "help" => return Command::Help,
        _ => {}
    }

    if let Some(rest) = input.strip_prefix('f') {
        let rest = rest.trim();
        return match rest.parse::<usize>() {
            Ok(n) if n > 0 => Command::Favorite(n - 1),
            _ => Command::Invalid(format!("Expected a word number after 'f', got '{}'", rest)),
        };
    }

    let compact: String = input.chars().filter(|c| !c.is_whitespace()).collect();
    let digits: String = compact.chars().take_while(|c| c.is_ascii_digit()).collect();
    let rest = &compact[digits.len()..];

    let slot = match digits.parse::<usize>() {
        Ok(n) if n > 0 => n - 1,
        _ => return Command::Invalid(format!("Unrecognized input '{}'", input)),
    };

    let mut letters = rest.chars();
    match (letters.next(), letters.next()) {
        (Some(c), None) if c.is_ascii_lowercase() => Command::Match {
            slot,
            position: (c as u8 - b'a') as usize,
        },
        _ => Command::Invalid(format!("Expected a definition letter after {}", slot + 1)),
    }
}

fn print_help() {
    println!("  <n><letter>  match word n with definition letter (e.g. 2c)");
    println!("  f <n>        toggle word n as a favorite");
    println!("  p            pause or resume");
    println!("  q            leave the game");
}

pub fn run(app: &mut App, list: Option<&str>, use_color: bool) -> Result<()> {
    let words = app.words(list)?;
    if words.is_empty() {
        bail!("No words to play with. Add some with `words add` or `import`.");
    }
    let all_words = app.all_words()?;

    let mut session = GameSession::new(&app.config);
    session.start(&words).context("Failed to start round")?;
    log::info!(
        "Started round with {} words, {} cards shown",
        words.len(),
        app.config.display_count
    );

    println!("Match each word with its definition. Type 'h' for help.\n");

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        println!("{}", render_board(&session, &app.favorites, use_color));
        print!("> ");
        io::stdout().flush()?;

        let Some(line) = lines.next() else {
            session.leave();
            println!();
            break;
        };
        let line = line.context("Failed to read input")?;
        if line.trim().is_empty() {
            continue;
        }

        match parse_command(&line) {
            Command::Quit => {
                session.leave();
                println!("Left the game with {} points.", session.score());
                break;
            }
            Command::Help => print_help(),
            Command::Pause => {
                if session.toggle_pause() {
                    println!("Paused. Type 'p' to resume.");
                } else {
                    println!("Resumed.");
                }
            }
            Command::Favorite(slot) => {
                let Some(entry) = session.round().slot(slot).cloned() else {
                    println!("No word in slot {}.", slot + 1);
                    continue;
                };
                match app.favorites.toggle(&entry.word, |w| {
                    lookup_definition(w, Some(session.round()), &all_words)
                }) {
                    Ok(true) => println!("Added \"{}\" to favorites.", entry.word),
                    Ok(false) => println!("Removed \"{}\" from favorites.", entry.word),
                    Err(e) => eprintln!("Failed to save favorites: {}", e),
                }
            }
            Command::Match { slot, position } => {
                if play_match(app, &mut session, &all_words, slot, position, use_color)? {
                    break;
                }
            }
            Command::Invalid(message) => println!("{}", message),
        }
    }

    Ok(())
}

/// Returns true once the round is complete
fn play_match(
    app: &mut App,
    session: &mut GameSession,
    all_words: &[WordEntry],
    slot: usize,
    position: usize,
    use_color: bool,
) -> Result<bool> {
    match session.select_word(slot) {
        Ok(_) => {}
        Err(e) => {
            println!("{}", e);
            return Ok(false);
        }
    }

    let outcome = match session.select_definition(position) {
        Ok(outcome) => outcome,
        Err(e) => {
            println!("{}", e);
            return Ok(false);
        }
    };

    match outcome {
        ClickOutcome::Ignored => {
            if session.is_paused() {
                println!("The game is paused.");
            }
        }
        ClickOutcome::Selected | ClickOutcome::Discarded => {}
        ClickOutcome::Correct { word, resolve_at } => {
            let message = format!("Correct: {} (+{})", word, app.config.correct_points);
            println!("{}", paint(&message, Color::GREEN, use_color));
            thread::sleep(resolve_at.saturating_duration_since(Instant::now()));

            if let Some(resolution) = session.resolve_pending(Instant::now())? {
                if resolution.record.complete {
                    println!(
                        "{}",
                        paint(
                            &format!("Round complete! Final score: {}", resolution.score),
                            Color::BOLD,
                            use_color
                        )
                    );
                    return Ok(true);
                }
            }
        }
        ClickOutcome::Incorrect { word, definition_of } => {
            println!(
                "{}",
                paint(
                    &format!(
                        "Wrong: ({}) is not the definition of \"{}\" (-{})",
                        position_label(position),
                        word,
                        app.config.miss_penalty
                    ),
                    Color::RED,
                    use_color
                )
            );
            log::debug!("Mismatched \"{}\" with definition of \"{}\"", word, definition_of);

            let added = app.favorites.ensure(&word, |w| {
                lookup_definition(w, Some(session.round()), all_words)
            });
            match added {
                Ok(true) => println!("Added \"{}\" to favorites for review.", word),
                Ok(false) => {}
                Err(e) => eprintln!("Failed to save favorites: {}", e),
            }
        }
    }

    Ok(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_match_compact_and_spaced() {
        assert_eq!(parse_command("2c"), Command::Match { slot: 1, position: 2 });
        assert_eq!(parse_command(" 2 C "), Command::Match { slot: 1, position: 2 });
        assert_eq!(parse_command("10a"), Command::Match { slot: 9, position: 0 });
    }

    #[test]
    fn test_parse_control_commands() {
        assert_eq!(parse_command("q"), Command::Quit);
        assert_eq!(parse_command("P"), Command::Pause);
        assert_eq!(parse_command("?"), Command::Help);
        assert_eq!(parse_command("f 3"), Command::Favorite(2));
        assert_eq!(parse_command("f3"), Command::Favorite(2));
    }

    #[test]
    fn test_parse_rejects_malformed_input() {
        assert!(matches!(parse_command("0a"), Command::Invalid(_)));
        assert!(matches!(parse_command("3"), Command::Invalid(_)));
        assert!(matches!(parse_command("3ab"), Command::Invalid(_)));
        assert!(matches!(parse_command("f"), Command::Invalid(_)));
        assert!(matches!(parse_command("hello"), Command::Invalid(_)));
    }
}
