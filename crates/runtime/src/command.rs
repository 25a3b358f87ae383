//! `/encore` command-line parsing.

use encore_core::SpawnId;

/// A parsed `/encore` invocation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// `/encore` or `/encore start`: resume the loaded rotation.
    Start { silent: bool },
    /// `/encore stop|end|off`: stop casting, keep the rotation loaded.
    Stop { silent: bool },
    /// `/encore reload`: re-read the settings file.
    Reload,
    /// `/encore delay [tenths]`; with no argument just reports the value.
    Delay(Option<u32>),
    ToggleQuiet,
    ToggleDebug,
    /// `/encore clear`: stop and forget the rotation.
    Clear,
    Help,
    /// `/encore queue "name" [-targetid|N] [-interrupt]`.
    Queue {
        name: String,
        target: Option<SpawnId>,
        interrupt: bool,
    },
    /// Any other word names a profile to load and start.
    Load(String),
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum CommandError {
    #[error("queue requires a spell/item/ability name")]
    QueueMissingName,

    #[error("delay cannot be negative")]
    NegativeDelay,

    #[error("\"{0}\" is not a number")]
    BadNumber(String),
}

impl Command {
    pub fn parse(line: &str) -> Result<Self, CommandError> {
        let tokens = tokenize(line);
        let Some(head) = tokens.first() else {
            return Ok(Command::Start { silent: false });
        };

        let silent_second = || {
            tokens
                .get(1)
                .is_some_and(|t| t.eq_ignore_ascii_case("silent"))
        };

        match head.to_ascii_lowercase().as_str() {
            "start" | "resume" => Ok(Command::Start {
                silent: silent_second(),
            }),
            "stop" | "end" | "off" => Ok(Command::Stop {
                silent: silent_second(),
            }),
            "reload" | "load" => Ok(Command::Reload),
            "quiet" => Ok(Command::ToggleQuiet),
            "debug" => Ok(Command::ToggleDebug),
            "clear" => Ok(Command::Clear),
            "help" => Ok(Command::Help),
            "delay" => match tokens.get(1) {
                None => Ok(Command::Delay(None)),
                Some(raw) => {
                    if raw.parse::<i64>().is_ok_and(|v| v < 0) {
                        return Err(CommandError::NegativeDelay);
                    }
                    let tenths: u32 = raw
                        .parse()
                        .map_err(|_| CommandError::BadNumber(raw.clone()))?;
                    Ok(Command::Delay(Some(tenths)))
                }
            },
            "queue" | "once" => {
                let name = tokens
                    .get(1)
                    .ok_or(CommandError::QueueMissingName)?
                    .clone();
                let mut target = None;
                let mut interrupt = false;
                for token in &tokens[2..] {
                    if let Some(raw) = token.strip_prefix("-targetid|") {
                        let id: u32 = raw
                            .parse()
                            .map_err(|_| CommandError::BadNumber(raw.to_owned()))?;
                        target = Some(SpawnId(id));
                    } else if token.eq_ignore_ascii_case("-interrupt") {
                        interrupt = true;
                    }
                }
                Ok(Command::Queue {
                    name,
                    target,
                    interrupt,
                })
            }
            _ => Ok(Command::Load(tokens[0].clone())),
        }
    }
}

/// Whitespace split honoring double quotes, so multi-word effect names stay
/// one token.
fn tokenize(line: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    for ch in line.chars() {
        match ch {
            '"' => in_quotes = !in_quotes,
            c if c.is_whitespace() && !in_quotes => {
                if !current.is_empty() {
                    tokens.push(std::mem::take(&mut current));
                }
            }
            c => current.push(c),
        }
    }
    if !current.is_empty() {
        tokens.push(current);
    }
    tokens
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_line_resumes() {
        assert_eq!(Command::parse("").unwrap(), Command::Start { silent: false });
        assert_eq!(
            Command::parse("  ").unwrap(),
            Command::Start { silent: false }
        );
    }

    #[test]
    fn stop_aliases_and_silent() {
        for alias in ["stop", "end", "off", "STOP"] {
            assert_eq!(
                Command::parse(alias).unwrap(),
                Command::Stop { silent: false }
            );
        }
        assert_eq!(
            Command::parse("stop silent").unwrap(),
            Command::Stop { silent: true }
        );
    }

    #[test]
    fn delay_parses_and_rejects_negatives() {
        assert_eq!(Command::parse("delay").unwrap(), Command::Delay(None));
        assert_eq!(Command::parse("delay 5").unwrap(), Command::Delay(Some(5)));
        assert_eq!(
            Command::parse("delay -1"),
            Err(CommandError::NegativeDelay)
        );
        assert_eq!(
            Command::parse("delay x"),
            Err(CommandError::BadNumber("x".to_owned()))
        );
        // Out of range errors rather than wrapping.
        assert_eq!(
            Command::parse("delay 4294967296"),
            Err(CommandError::BadNumber("4294967296".to_owned()))
        );
    }

    #[test]
    fn queue_takes_quoted_names_and_flags() {
        assert_eq!(
            Command::parse("queue \"Dirge of the Sleepwalker\" -interrupt").unwrap(),
            Command::Queue {
                name: "Dirge of the Sleepwalker".to_owned(),
                target: None,
                interrupt: true,
            }
        );
        assert_eq!(
            Command::parse("queue \"Slumber of Silisia\" -targetid|1412").unwrap(),
            Command::Queue {
                name: "Slumber of Silisia".to_owned(),
                target: Some(SpawnId(1412)),
                interrupt: false,
            }
        );
        assert_eq!(
            Command::parse("once Epic").unwrap(),
            Command::Queue {
                name: "Epic".to_owned(),
                target: None,
                interrupt: false,
            }
        );
        assert_eq!(Command::parse("queue"), Err(CommandError::QueueMissingName));
        assert_eq!(
            Command::parse("queue Mez -targetid|huh"),
            Err(CommandError::BadNumber("huh".to_owned()))
        );
    }

    #[test]
    fn unknown_word_loads_a_profile() {
        assert_eq!(
            Command::parse("melee").unwrap(),
            Command::Load("melee".to_owned())
        );
    }

    #[test]
    fn load_reloads_rather_than_naming_a_profile() {
        assert_eq!(Command::parse("load").unwrap(), Command::Reload);
        assert_eq!(Command::parse("reload").unwrap(), Command::Reload);
    }
}
