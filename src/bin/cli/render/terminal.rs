use wordmatch_lib::round::{GameSession, RoundStatus};
use wordmatch_lib::Favorites;

/// ANSI color codes
#[allow(dead_code)]
pub struct Color;

#[allow(dead_code)]
impl Color {
    pub const RESET: &str = "\x1b[0m";
    pub const BOLD: &str = "\x1b[1m";
    pub const DIM: &str = "\x1b[2m";
    pub const RED: &str = "\x1b[31m";
    pub const GREEN: &str = "\x1b[32m";
    pub const YELLOW: &str = "\x1b[33m";
    pub const CYAN: &str = "\x1b[36m";
}

/// Wrap text in a color when colors are enabled
pub fn paint(text: &str, color: &str, use_color: bool) -> String {
    if use_color {
        format!("{}{}{}", color, text, Color::RESET)
    } else {
        text.to_string()
    }
}

/// Shorten text to `width` characters, ending in "..." when cut
pub fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let kept: String = text.chars().take(width.saturating_sub(3)).collect();
    format!("{}...", kept)
}

/// Label shown on a definition card
pub fn position_label(position: usize) -> char {
    (b'a' + (position % 26) as u8) as char
}

/// Render the game board: word cards on the left, definitions on the right
pub fn render_board<R: rand::Rng>(
    session: &GameSession<R>,
    favorites: &Favorites,
    use_color: bool,
) -> String {
    let mut lines = Vec::new();
    let round = session.round();
    let progress = round.progress();

    let mut header = format!(
        "Score: {}   Mastered: {}/{}   Matches: {}",
        session.score(),
        progress.mastered_words,
        progress.total_words,
        progress.matches
    );
    if session.is_paused() {
        header.push_str("   [paused]");
    }
    lines.push(paint(&header, Color::BOLD, use_color));
    lines.push(String::new());

    let words = session.word_cards();
    let definitions = session.definition_cards();
    let word_width = words
        .iter()
        .map(|(_, e)| e.word.chars().count())
        .max()
        .unwrap_or(4)
        .min(30)
        + 4;

    let rows = round.display_count().max(definitions.len());
    for row in 0..rows {
        let left = match round.slot(row) {
            Some(entry) => {
                let star = if favorites.contains(&entry.word) { "*" } else { " " };
                let label = format!("{}{} {}", star, row + 1, truncate(&entry.word, 30));
                let padded = format!("{:<width$}", label, width = word_width);
                if session.selected_word() == Some(row) {
                    paint(&padded, Color::CYAN, use_color)
                } else if session.pending().map_or(false, |p| p.word_slot == row) {
                    paint(&padded, Color::DIM, use_color)
                } else {
                    padded
                }
            }
            None => format!("{:<width$}", "", width = word_width),
        };

        let right = definitions
            .iter()
            .find(|(pos, _)| *pos == row)
            .map(|(pos, text)| {
                let label = format!("{}) {}", position_label(*pos), truncate(text, 60));
                if session.selected_definition() == Some(*pos) {
                    paint(&label, Color::CYAN, use_color)
                } else {
                    label
                }
            })
            .unwrap_or_default();

        lines.push(format!("  {}  {}", left, right).trim_end().to_string());
    }

    if session.status() == RoundStatus::Complete {
        lines.push(String::new());
        lines.push(paint("All words mastered!", Color::GREEN, use_color));
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("a rather long definition", 10), "a rathe...");
    }

    #[test]
    fn test_position_label() {
        assert_eq!(position_label(0), 'a');
        assert_eq!(position_label(4), 'e');
    }

    #[test]
    fn test_paint_without_color() {
        assert_eq!(paint("x", Color::RED, false), "x");
        assert_eq!(paint("x", Color::RED, true), "\x1b[31mx\x1b[0m");
    }
}
