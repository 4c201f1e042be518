/// A line typed at the prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Employees,
    Select(String),
    All,
    More,
    Dismiss,
    Help,
    Quit,
    Unknown(String),
}

pub const HELP: &str =
    "commands: employees | select <employee-id> | all | more | dismiss | help | quit";

pub fn parse_command(line: &str) -> Option<Command> {
    let mut words = line.split_whitespace();
    let head = words.next()?;
    let command = match (head.to_ascii_lowercase().as_str(), words.next()) {
        ("employees", None) => Command::Employees,
        ("select", Some(id)) => Command::Select(id.to_string()),
        ("all", None) => Command::All,
        ("more", None) => Command::More,
        ("dismiss", None) => Command::Dismiss,
        ("help", None) => Command::Help,
        ("quit" | "exit", None) => Command::Quit,
        _ => Command::Unknown(line.trim().to_string()),
    };
    Some(command)
}
