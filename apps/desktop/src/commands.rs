//! Parsing of lines typed at the chat prompt.

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptCommand {
    Send(String),
    Rate { index: usize, positive: bool },
    Export,
    History,
    Show,
    Help,
    Quit,
    Empty,
    Invalid(String),
}

pub const HELP: &str = "\
commands:
  <text>      send a message
  /up N       rate reply N as helpful
  /down N     rate reply N as unhelpful
  /export     save the service history to chat_history.txt
  /history    print the service history
  /show       print the conversation
  /quit       leave";

pub fn parse_command(line: &str) -> PromptCommand {
    let line = line.trim();
    if line.is_empty() {
        return PromptCommand::Empty;
    }
    let Some(rest) = line.strip_prefix('/') else {
        return PromptCommand::Send(line.to_string());
    };

    let mut parts = rest.split_whitespace();
    let name = parts.next().unwrap_or_default();
    let argument = parts.next();
    if parts.next().is_some() {
        return PromptCommand::Invalid(format!("too many arguments for /{name}"));
    }

    match (name, argument) {
        ("up", Some(index)) => parse_rating(index, true),
        ("down", Some(index)) => parse_rating(index, false),
        ("up" | "down", None) => PromptCommand::Invalid(format!("usage: /{name} N")),
        ("export", None) => PromptCommand::Export,
        ("history", None) => PromptCommand::History,
        ("show", None) => PromptCommand::Show,
        ("help", None) => PromptCommand::Help,
        ("quit" | "exit", None) => PromptCommand::Quit,
        _ => PromptCommand::Invalid(format!("unknown command '/{rest}', try /help")),
    }
}

fn parse_rating(raw: &str, positive: bool) -> PromptCommand {
    match raw.parse::<usize>() {
        Ok(index) => PromptCommand::Rate { index, positive },
        Err(_) => PromptCommand::Invalid(format!("'{raw}' is not a message number")),
    }
}

#[cfg(test)]
#[path = "tests/commands_tests.rs"]
mod tests;
