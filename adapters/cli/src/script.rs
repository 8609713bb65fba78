//! Line-oriented command scripts driving a headless session.
//!
//! ```text
//! # build a small defence, then let it run
//! place 3 6
//! select 3 6
//! upgrade
//! tick 600
//! ```

use thiserror::Error;
use tower_defense_core::{CellCoord, Command};

const COMMENT: char = '#';

/// Command read from a script together with how often to apply it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Step {
    /// Command forwarded to the world.
    pub(crate) command: Command,
    /// Number of consecutive applications; only `tick` repeats.
    pub(crate) repeat: u32,
}

impl Step {
    const fn once(command: Command) -> Self {
        Self { command, repeat: 1 }
    }
}

/// Errors raised while parsing a command script. Lines are one-based.
#[derive(Debug, Error, PartialEq, Eq)]
pub(crate) enum ScriptError {
    /// The first word of the line names no known command.
    #[error("line {line}: unknown command `{word}`")]
    UnknownCommand {
        /// Offending line.
        line: usize,
        /// Word that failed to parse.
        word: String,
    },
    /// A required argument was absent.
    #[error("line {line}: `{command}` expects {expected}")]
    MissingArgument {
        /// Offending line.
        line: usize,
        /// Command missing its argument.
        command: &'static str,
        /// Description of the expected arguments.
        expected: &'static str,
    },
    /// More arguments were supplied than the command accepts.
    #[error("line {line}: unexpected argument `{argument}` after `{command}`")]
    UnexpectedArgument {
        /// Offending line.
        line: usize,
        /// Command that received the surplus argument.
        command: &'static str,
        /// First surplus argument.
        argument: String,
    },
    /// An argument was not a non-negative integer.
    #[error("line {line}: `{value}` is not a valid number")]
    InvalidNumber {
        /// Offending line.
        line: usize,
        /// Text that failed to parse.
        value: String,
    },
}

/// Parses a whole script into the steps it describes.
pub(crate) fn parse(source: &str) -> Result<Vec<Step>, ScriptError> {
    let mut steps = Vec::new();
    for (index, raw) in source.lines().enumerate() {
        let content = raw.split(COMMENT).next().unwrap_or_default().trim();
        if content.is_empty() {
            continue;
        }
        steps.push(parse_line(index + 1, content)?);
    }
    Ok(steps)
}

fn parse_line(line: usize, content: &str) -> Result<Step, ScriptError> {
    let mut words = content.split_whitespace();
    let Some(word) = words.next() else {
        return Err(ScriptError::UnknownCommand {
            line,
            word: String::new(),
        });
    };

    let mut args = Arguments { line, words };
    let step = match word {
        "place" => Step::once(Command::PlaceTower {
            cell: args.cell("place")?,
        }),
        "select" => Step::once(Command::SelectTowerAt {
            cell: args.cell("select")?,
        }),
        "deselect" => Step::once(Command::ClearSelection),
        "upgrade" => Step::once(Command::UpgradeSelected),
        "sell" => Step::once(Command::SellSelected),
        "pause" => Step::once(Command::TogglePause),
        "restart" => Step::once(Command::Restart),
        "quit" => Step::once(Command::Quit),
        "tick" => Step {
            command: Command::Tick,
            repeat: args.optional_number()?.unwrap_or(1),
        },
        other => {
            return Err(ScriptError::UnknownCommand {
                line,
                word: other.to_owned(),
            })
        }
    };

    args.finish(command_name(step.command))?;
    Ok(step)
}

fn command_name(command: Command) -> &'static str {
    match command {
        Command::PlaceTower { .. } => "place",
        Command::SelectTowerAt { .. } => "select",
        Command::ClearSelection => "deselect",
        Command::UpgradeSelected => "upgrade",
        Command::SellSelected => "sell",
        Command::TogglePause => "pause",
        Command::Restart => "restart",
        Command::Quit => "quit",
        Command::Tick => "tick",
    }
}

struct Arguments<'a> {
    line: usize,
    words: std::str::SplitWhitespace<'a>,
}

impl Arguments<'_> {
    fn cell(&mut self, command: &'static str) -> Result<CellCoord, ScriptError> {
        let line = self.line;
        let missing = || ScriptError::MissingArgument {
            line,
            command,
            expected: "a column and a row",
        };
        let column = self.words.next().ok_or_else(missing)?;
        let row = self.words.next().ok_or_else(missing)?;
        Ok(CellCoord::new(self.number(column)?, self.number(row)?))
    }

    fn optional_number(&mut self) -> Result<Option<u32>, ScriptError> {
        self.words.next().map(|word| self.number(word)).transpose()
    }

    fn number(&self, word: &str) -> Result<u32, ScriptError> {
        word.parse().map_err(|_| ScriptError::InvalidNumber {
            line: self.line,
            value: word.to_owned(),
        })
    }

    fn finish(mut self, command: &'static str) -> Result<(), ScriptError> {
        match self.words.next() {
            Some(argument) => Err(ScriptError::UnexpectedArgument {
                line: self.line,
                command,
                argument: argument.to_owned(),
            }),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_every_command() {
        let script = "\
place 3 6
select 3 6
deselect
upgrade
sell
pause
restart
quit
tick
tick 600
";
        let steps = parse(script).expect("script parses");
        let commands: Vec<Command> = steps.iter().map(|step| step.command).collect();

        assert_eq!(
            commands,
            vec![
                Command::PlaceTower {
                    cell: CellCoord::new(3, 6),
                },
                Command::SelectTowerAt {
                    cell: CellCoord::new(3, 6),
                },
                Command::ClearSelection,
                Command::UpgradeSelected,
                Command::SellSelected,
                Command::TogglePause,
                Command::Restart,
                Command::Quit,
                Command::Tick,
                Command::Tick,
            ]
        );
        assert_eq!(steps[8].repeat, 1);
        assert_eq!(steps[9].repeat, 600);
    }

    #[test]
    fn skips_comments_and_blank_lines() {
        let script = "# opening\n\n  place 1 1   # corner\n\t\n";
        let steps = parse(script).expect("script parses");
        assert_eq!(
            steps,
            vec![Step::once(Command::PlaceTower {
                cell: CellCoord::new(1, 1),
            })]
        );
    }

    #[test]
    fn reports_unknown_commands_with_line_numbers() {
        let error = parse("tick\n\nlaunch 1 2\n").unwrap_err();
        assert_eq!(
            error,
            ScriptError::UnknownCommand {
                line: 3,
                word: "launch".to_owned(),
            }
        );
        assert_eq!(error.to_string(), "line 3: unknown command `launch`");
    }

    #[test]
    fn reports_missing_and_surplus_arguments() {
        assert_eq!(
            parse("place 4").unwrap_err(),
            ScriptError::MissingArgument {
                line: 1,
                command: "place",
                expected: "a column and a row",
            }
        );
        assert_eq!(
            parse("sell now").unwrap_err(),
            ScriptError::UnexpectedArgument {
                line: 1,
                command: "sell",
                argument: "now".to_owned(),
            }
        );
    }

    #[test]
    fn rejects_malformed_numbers() {
        assert_eq!(
            parse("tick -5").unwrap_err(),
            ScriptError::InvalidNumber {
                line: 1,
                value: "-5".to_owned(),
            }
        );
        assert_eq!(
            parse("select x 2").unwrap_err(),
            ScriptError::InvalidNumber {
                line: 1,
                value: "x".to_owned(),
            }
        );
    }
}
