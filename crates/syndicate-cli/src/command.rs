//! Parsing of the line-oriented command language.

use syndicate_game::Action;

use crate::error::CliError;

/// One parsed input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `login <user> <password>`
    Login {
        /// User name.
        user: String,
        /// Password.
        password: String,
    },
    /// `logout`
    Logout,
    /// `play`: enter the game view.
    Play,
    /// `home`: leave the game view.
    Home,
    /// `create <name...> <password>`
    Create {
        /// Company display name (may contain spaces).
        name: String,
        /// Company password.
        password: String,
    },
    /// A game action.
    Act(Action),
    /// `stats`
    Stats,
    /// `board`
    Board,
    /// `log`
    Log,
    /// `targets`
    Targets,
    /// `help`
    Help,
    /// `quit`
    Quit,
}

/// Help text listing every command.
pub const HELP: &str = "\
Commands:
  login <user> <password>    log in (registers on first use)
  logout                     log out
  play | home                enter or leave the game
  create <name> <password>   create or rename your company
  daily                      claim the 12-hour bonus
  income                     collect income
  guard                      hire a guard ($50)
  train                      train an operative ($80)
  mission                    send operatives on a mission
  security                   upgrade security ($120)
  laylow                     pay $30 to shed heat
  heist <owner>              rob a rival
  spy <owner>                spend 1 intel to scout a rival
  sabotage <owner> <guess>   guess a rival's password to steal up to $40
  stats | board | log        show your company, the leaderboard, your log
  targets                    list rivals you can act against
  quit                       exit";

/// Parse one input line. Blank lines parse to `None`.
pub fn parse(line: &str) -> Result<Option<Command>, CliError> {
    let mut words = line.split_whitespace();
    let Some(head) = words.next() else {
        return Ok(None);
    };
    let rest: Vec<&str> = words.collect();

    let command = match head.to_ascii_lowercase().as_str() {
        "login" => match rest.as_slice() {
            [user, password] => Command::Login {
                user: (*user).to_owned(),
                password: (*password).to_owned(),
            },
            _ => {
                return Err(CliError::Usage {
                    usage: "login <user> <password>",
                });
            }
        },
        "create" => match rest.split_last() {
            Some((password, name)) if !name.is_empty() => Command::Create {
                name: name.join(" "),
                password: (*password).to_owned(),
            },
            _ => {
                return Err(CliError::Usage {
                    usage: "create <name> <password>",
                });
            }
        },
        "heist" => Command::Act(Action::Heist {
            target: single_target(&rest, "heist <owner>")?,
        }),
        "spy" => Command::Act(Action::Spy {
            target: single_target(&rest, "spy <owner>")?,
        }),
        "sabotage" => match rest.as_slice() {
            [target, guess] => Command::Act(Action::Sabotage {
                target: (*target).to_owned(),
                guess: (*guess).to_owned(),
            }),
            _ => {
                return Err(CliError::Usage {
                    usage: "sabotage <owner> <password>",
                });
            }
        },
        "logout" => Command::Logout,
        "play" => Command::Play,
        "home" => Command::Home,
        "daily" => Command::Act(Action::ClaimDaily),
        "income" => Command::Act(Action::CollectIncome),
        "guard" => Command::Act(Action::HireGuard),
        "train" => Command::Act(Action::TrainOperative),
        "mission" => Command::Act(Action::RunMission),
        "security" => Command::Act(Action::UpgradeSecurity),
        "laylow" => Command::Act(Action::LayLow),
        "stats" => Command::Stats,
        "board" => Command::Board,
        "log" => Command::Log,
        "targets" => Command::Targets,
        "help" | "?" => Command::Help,
        "quit" | "exit" => Command::Quit,
        other => return Err(CliError::UnknownCommand(other.to_owned())),
    };
    Ok(Some(command))
}

fn single_target(rest: &[&str], usage: &'static str) -> Result<String, CliError> {
    match rest {
        [target] => Ok((*target).to_owned()),
        _ => Err(CliError::Usage { usage }),
    }
}
