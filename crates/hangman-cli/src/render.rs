//! Text rendering of the board, statistics and engine events.

use std::fmt::Write as _;

use hangman_core::event::{DomainEvent, EventSink};
use hangman_engine::application::queries::GameView;
use hangman_engine::domain::achievements::Achievements;
use hangman_engine::domain::multiplayer::{MultiplayerResult, Player};
use hangman_engine::domain::statistics::Statistics;
use hangman_engine::{GameEvent, GameEventKind, GameStatus};
use tracing::info;

/// Publishes engine events as terminal lines and log records.
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalSink;

impl EventSink<GameEvent> for TerminalSink {
    fn publish(&self, event: &GameEvent) {
        info!(
            event_type = event.event_type(),
            sequence = event.metadata().sequence_number,
            payload = %event.to_payload(),
            "game event"
        );
        if let Some(line) = describe_event(&event.kind) {
            println!("{line}");
        }
    }
}

/// Player-facing line for `kind`, if it warrants one.
///
/// Guesses are left out; the redrawn board already shows them.
#[must_use]
pub fn describe_event(kind: &GameEventKind) -> Option<String> {
    let line = match kind {
        GameEventKind::GuessMade { .. } => return None,
        GameEventKind::HintRevealed { letter } => format!("hint: the word contains '{letter}'"),
        GameEventKind::RoundWon {
            word,
            score,
            elapsed_ms,
        } => format!(
            "solved \"{word}\" in {:.1}s for {score} points",
            millis_as_secs(*elapsed_ms)
        ),
        GameEventKind::RoundLost { word } => format!("out of guesses; the word was \"{word}\""),
        GameEventKind::TimeUp => "time is up".to_owned(),
        GameEventKind::AchievementUnlocked { key } => format!("achievement unlocked: {key}"),
        GameEventKind::DifficultyChanged { from, to } => {
            format!("three in a row: difficulty {from} -> {to}")
        }
        GameEventKind::PlayerAdvanced { player } => format!("{player}, you're up"),
        GameEventKind::MultiplayerEnded { winners } => match winners.as_slice() {
            [] => "game over".to_owned(),
            [winner] => format!("game over; {winner} wins"),
            many => format!("game over; tie between {}", many.join(", ")),
        },
    };
    Some(line)
}

/// The board for one round.
#[must_use]
pub fn render_view(view: &GameView) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "  {}", view.masked_word);
    let _ = write!(out, "  {} / {}", view.difficulty, view.category);
    if view.practice {
        let _ = write!(out, " / practice x{:.2}", view.penalty_multiplier);
    }
    if let Some(player) = &view.current_player {
        let _ = write!(out, " / {player}'s turn");
    }
    out.push('\n');

    let misses: Vec<String> = view.incorrect_guesses.iter().map(char::to_string).collect();
    let _ = write!(
        out,
        "  misses: {}  left: {}  score: {}",
        if misses.is_empty() {
            "-".to_owned()
        } else {
            misses.join(" ")
        },
        view.remaining_guesses,
        view.score
    );
    if let Some(ms) = view.time_remaining_ms {
        let _ = write!(out, "  time: {:.0}s", millis_as_secs(ms));
    }
    match view.status {
        GameStatus::Playing => {}
        GameStatus::Paused => out.push_str("\n  (paused; `resume` to continue)"),
        GameStatus::Won | GameStatus::Lost => out.push_str("\n  (`new` for another round)"),
    }
    out
}

/// Lifetime statistics summary.
#[must_use]
pub fn render_statistics(stats: &Statistics) -> String {
    let mut out = format!(
        "played {}  won {}  lost {}  win rate {:.0}%\nstreak {}  best streak {}",
        stats.games_played(),
        stats.games_won(),
        stats.games_lost(),
        stats.win_percentage(),
        stats.current_streak(),
        stats.best_streak(),
    );
    for (category, tally) in stats.by_category() {
        let _ = write!(out, "\n  {category}: {}/{}", tally.won, tally.played);
    }
    out
}

/// One line per achievement.
#[must_use]
pub fn render_achievements(achievements: &Achievements) -> String {
    achievements
        .iter()
        .map(|(key, achievement)| {
            let mark = if achievement.unlocked { "x" } else { " " };
            format!("[{mark}] {key}")
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Multiplayer scoreboard in turn order.
#[must_use]
pub fn render_scores(players: &[Player]) -> String {
    players
        .iter()
        .map(|p| format!("  {}: {} points, {} wins", p.name, p.score, p.wins))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Final multiplayer standings.
#[must_use]
pub fn render_result(result: &MultiplayerResult) -> String {
    let mut out = String::from("final standings:\n");
    out.push_str(&render_scores(&result.standings));
    out
}

#[allow(clippy::cast_precision_loss)]
fn millis_as_secs(ms: u64) -> f64 {
    ms as f64 / 1000.0
}
