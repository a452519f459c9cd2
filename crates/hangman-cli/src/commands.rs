//! Parsing of terminal input lines into commands.

use std::str::FromStr;

use hangman_engine::domain::practice::PracticeSettings;
use hangman_words::domain::catalog::Difficulty;
use hangman_words::domain::filters::LengthFilter;
use thiserror::Error;

/// One line of player input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Guess a letter. Validation is left to the engine.
    Guess(String),
    /// Reveal a random hidden letter.
    Hint,
    /// Pause the round.
    Pause,
    /// Resume a paused round.
    Resume,
    /// Start a fresh round.
    NewRound,
    /// Switch difficulty.
    Difficulty(Difficulty),
    /// Switch category.
    Category(String),
    /// List the catalog's categories.
    Categories,
    /// Turn practice mode on with these settings.
    PracticeOn(PracticeSettings),
    /// Turn practice mode off.
    PracticeOff,
    /// Put rounds on a countdown, in milliseconds.
    TimedOn(u64),
    /// Remove the countdown.
    TimedOff,
    /// Start a multiplayer game.
    Multiplayer {
        /// Participants in turn order.
        players: Vec<String>,
        /// Full rotations before the game ends on its own.
        rounds: Option<u32>,
    },
    /// Pass play to the next player, ending the game after the last rotation.
    NextTurn,
    /// Stop multiplayer and show standings.
    EndMultiplayer,
    /// Show lifetime statistics.
    Stats,
    /// Show achievements.
    Achievements,
    /// Redraw the board.
    Status,
    /// Show the command list.
    Help,
    /// Leave the game.
    Quit,
}

/// Why a line could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    /// The line held only whitespace.
    #[error("type a letter or a command; `help` lists them")]
    Empty,

    /// The first word is not a command.
    #[error("unknown command `{0}`; `help` lists them")]
    Unknown(String),

    /// A command was given a bad or missing argument.
    #[error("`{command}` expects {expected}")]
    Usage {
        /// The command as typed.
        command: &'static str,
        /// What it wanted.
        expected: &'static str,
    },
}

/// Command reference shown by `help`.
pub const HELP: &str = "\
commands:
  <letter> | guess <letter>      guess a letter
  hint                           reveal a letter
  pause | resume                 pause or resume the round
  new                            start a new round
  difficulty easy|medium|hard    switch difficulty
  category <name> | categories   switch or list categories
  practice [options] | practice off
      options: single, repeats, lock=<difficulty>, mistakes=<n>, length=<min>-<max>
  timed <seconds> | timed off    countdown per round
  players <name> <name>... [rounds=<n>]
  next | end                     pass the turn or finish multiplayer
  stats | achievements | status
  quit";

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut words = line.split_whitespace();
        let Some(head) = words.next() else {
            return Err(CommandError::Empty);
        };
        let args: Vec<&str> = words.collect();
        let head_lower = head.to_lowercase();

        let command = match head_lower.as_str() {
            "guess" | "g" => match args.as_slice() {
                [letter] => Self::Guess((*letter).to_owned()),
                _ => return Err(usage("guess", "one letter")),
            },
            "hint" => Self::Hint,
            "pause" => Self::Pause,
            "resume" => Self::Resume,
            "new" | "reset" => Self::NewRound,
            "difficulty" => match args.as_slice() {
                [value] => Self::Difficulty(
                    value
                        .parse()
                        .map_err(|_| usage("difficulty", "easy, medium or hard"))?,
                ),
                _ => return Err(usage("difficulty", "easy, medium or hard")),
            },
            "category" => match args.as_slice() {
                [] => return Err(usage("category", "a category name")),
                name => Self::Category(name.join(" ")),
            },
            "categories" => Self::Categories,
            "practice" => parse_practice(&args)?,
            "timed" => match args.as_slice() {
                ["off"] => Self::TimedOff,
                [secs] => secs
                    .parse::<u64>()
                    .ok()
                    .filter(|secs| *secs > 0)
                    .and_then(|secs| secs.checked_mul(1000))
                    .map(Self::TimedOn)
                    .ok_or_else(|| usage("timed", "a positive number of seconds or `off`"))?,
                _ => return Err(usage("timed", "a positive number of seconds or `off`")),
            },
            "players" => parse_players(&args)?,
            "next" => Self::NextTurn,
            "end" => Self::EndMultiplayer,
            "stats" => Self::Stats,
            "achievements" => Self::Achievements,
            "status" => Self::Status,
            "help" | "?" => Self::Help,
            "quit" | "exit" => Self::Quit,
            _ if args.is_empty() && head.chars().count() == 1 => Self::Guess(head.to_owned()),
            _ => return Err(CommandError::Unknown(head.to_owned())),
        };
        Ok(command)
    }
}

fn usage(command: &'static str, expected: &'static str) -> CommandError {
    CommandError::Usage { command, expected }
}

fn parse_practice(args: &[&str]) -> Result<Command, CommandError> {
    const EXPECTED: &str =
        "`off` or options single, repeats, lock=<difficulty>, mistakes=<n>, length=<min>-<max>";
    if args == ["off"] {
        return Ok(Command::PracticeOff);
    }

    let mut settings = PracticeSettings::default();
    for arg in args {
        match arg.split_once('=') {
            None if *arg == "single" => settings.endless = false,
            None if *arg == "endless" => settings.endless = true,
            None if *arg == "repeats" => settings.allow_repeats = true,
            Some(("lock", value)) => {
                settings.locked_difficulty =
                    Some(value.parse().map_err(|_| usage("practice", EXPECTED))?);
            }
            Some(("mistakes", value)) => {
                settings.max_mistakes_override =
                    Some(value.parse().map_err(|_| usage("practice", EXPECTED))?);
            }
            Some(("length", value)) => {
                settings.word_length_filter =
                    parse_length(value).ok_or_else(|| usage("practice", EXPECTED))?;
            }
            _ => return Err(usage("practice", EXPECTED)),
        }
    }
    Ok(Command::PracticeOn(settings))
}

/// Parses `min-max`, `min-` or `-max`.
fn parse_length(value: &str) -> Option<LengthFilter> {
    let (min, max) = value.split_once('-')?;
    let bound = |s: &str| -> Option<Option<usize>> {
        if s.is_empty() {
            Some(None)
        } else {
            s.parse().ok().map(Some)
        }
    };
    Some(LengthFilter {
        min: bound(min)?,
        max: bound(max)?,
    })
}

fn parse_players(args: &[&str]) -> Result<Command, CommandError> {
    const EXPECTED: &str = "player names, optionally followed by rounds=<n>";
    let mut players = Vec::new();
    let mut rounds = None;
    for arg in args {
        if let Some(value) = arg.strip_prefix("rounds=") {
            rounds = Some(value.parse().map_err(|_| usage("players", EXPECTED))?);
        } else {
            players.push((*arg).to_owned());
        }
    }
    if players.is_empty() {
        return Err(usage("players", EXPECTED));
    }
    Ok(Command::Multiplayer { players, rounds })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(line: &str) -> Command {
        line.parse().unwrap()
    }

    #[test]
    fn test_bare_letter_is_a_guess() {
        assert_eq!(parse("e"), Command::Guess("e".to_owned()));
        assert_eq!(parse("  G  "), Command::Guess("G".to_owned()));
        assert_eq!(parse("guess 7"), Command::Guess("7".to_owned()));
    }

    #[test]
    fn test_simple_commands() {
        assert_eq!(parse("hint"), Command::Hint);
        assert_eq!(parse("PAUSE"), Command::Pause);
        assert_eq!(parse("reset"), Command::NewRound);
        assert_eq!(parse("next"), Command::NextTurn);
        assert_eq!(parse("exit"), Command::Quit);
    }

    #[test]
    fn test_difficulty_and_category() {
        assert_eq!(parse("difficulty Medium"), Command::Difficulty(Difficulty::Medium));
        assert_eq!(
            parse("category space"),
            Command::Category("space".to_owned())
        );
        assert_eq!(
            "difficulty brutal".parse::<Command>(),
            Err(usage("difficulty", "easy, medium or hard"))
        );
    }

    #[test]
    fn test_timed_converts_seconds() {
        assert_eq!(parse("timed 90"), Command::TimedOn(90_000));
        assert_eq!(parse("timed off"), Command::TimedOff);
        assert!(matches!(
            "timed 0".parse::<Command>(),
            Err(CommandError::Usage { command: "timed", .. })
        ));
    }

    #[test]
    fn test_timed_rejects_seconds_that_overflow_millis() {
        assert!(matches!(
            "timed 18446744073709552".parse::<Command>(),
            Err(CommandError::Usage { command: "timed", .. })
        ));
        assert_eq!(
            parse(&format!("timed {}", u64::MAX / 1000)),
            Command::TimedOn(u64::MAX / 1000 * 1000)
        );
    }

    #[test]
    fn test_practice_options() {
        let Command::PracticeOn(settings) =
            parse("practice single repeats lock=hard mistakes=3 length=4-8")
        else {
            panic!("expected PracticeOn");
        };
        assert!(!settings.endless);
        assert!(settings.allow_repeats);
        assert_eq!(settings.locked_difficulty, Some(Difficulty::Hard));
        assert_eq!(settings.max_mistakes_override, Some(3));
        assert_eq!(
            settings.word_length_filter,
            LengthFilter {
                min: Some(4),
                max: Some(8)
            }
        );

        assert_eq!(parse("practice"), Command::PracticeOn(PracticeSettings::default()));
        assert_eq!(parse("practice off"), Command::PracticeOff);
    }

    #[test]
    fn test_practice_open_ended_length() {
        let Command::PracticeOn(settings) = parse("practice length=-5") else {
            panic!("expected PracticeOn");
        };
        assert_eq!(settings.word_length_filter.min, None);
        assert_eq!(settings.word_length_filter.max, Some(5));
        assert!("practice length=five".parse::<Command>().is_err());
    }

    #[test]
    fn test_players_with_rounds() {
        assert_eq!(
            parse("players Ada Grace rounds=2"),
            Command::Multiplayer {
                players: vec!["Ada".to_owned(), "Grace".to_owned()],
                rounds: Some(2)
            }
        );
        assert!("players rounds=2".parse::<Command>().is_err());
    }

    #[test]
    fn test_errors() {
        assert_eq!("   ".parse::<Command>(), Err(CommandError::Empty));
        assert_eq!(
            "dance".parse::<Command>(),
            Err(CommandError::Unknown("dance".to_owned()))
        );
        assert!("guess".parse::<Command>().is_err());
    }
}
