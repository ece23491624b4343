//! Slash command parsing for the chat application.
//!
//! Commands control the session locally and are never sent to the API.
//! Any other input is a chat message.

/// A parsed chat command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatCommand {
    /// Clear the conversation history.
    Clear,

    /// Display session statistics (tokens used, estimated cost).
    Stats,

    /// Display help information.
    Help,

    /// Exit the chat application.
    Quit,

    /// Report a parsing error back to the caller.
    Invalid(String),
}

/// Parses user input for slash commands.
///
/// Returns `Some(ChatCommand)` if the input is a command, or `None` if it
/// should be sent as a regular message.
///
/// # Examples
///
/// ```
/// # use converse::chat::parse_command;
/// assert!(parse_command("/quit").is_some());
/// assert!(parse_command("/q").is_some());
/// assert!(parse_command("Hello!").is_none());
/// ```
pub fn parse_command(input: &str) -> Option<ChatCommand> {
    let input = input.trim();

    if !input.starts_with('/') {
        return None;
    }

    let command = input[1..].to_lowercase();
    let result = match command.as_str() {
        "clear" => ChatCommand::Clear,
        "stats" | "status" => ChatCommand::Stats,
        "help" | "?" => ChatCommand::Help,
        "quit" | "exit" | "q" => ChatCommand::Quit,
        _ => ChatCommand::Invalid(format!("Unknown command: /{}", command)),
    };

    Some(result)
}

/// What the session loop should do with one line of input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputAction {
    /// Blank input; re-prompt without dispatching anything.
    Nothing,

    /// A slash command to execute locally.
    Command(ChatCommand),

    /// A chat message to send to the API.
    Send(String),
}

/// Triages one line of input for the session loop.
///
/// Blank lines are a no-op: no request is dispatched and no state
/// changes. Slash commands are executed locally. Everything else is a
/// chat message.
pub fn triage_input(input: &str) -> InputAction {
    let input = input.trim();
    if input.is_empty() {
        return InputAction::Nothing;
    }
    match parse_command(input) {
        Some(command) => InputAction::Command(command),
        None => InputAction::Send(input.to_string()),
    }
}

/// Returns help text describing available commands.
pub fn help_text() -> &'static str {
    r#"Available commands:
  /clear    Clear conversation history
  /stats    Show tokens used and estimated cost
  /help     Show this help message
  /quit     Exit the chat (also /exit, /q)"#
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_quit_commands() {
        assert_eq!(parse_command("/quit"), Some(ChatCommand::Quit));
        assert_eq!(parse_command("/exit"), Some(ChatCommand::Quit));
        assert_eq!(parse_command("/q"), Some(ChatCommand::Quit));
        assert_eq!(parse_command("/Q"), Some(ChatCommand::Quit));
        assert_eq!(parse_command("  /quit  "), Some(ChatCommand::Quit));
    }

    #[test]
    fn parse_clear_and_stats() {
        assert_eq!(parse_command("/clear"), Some(ChatCommand::Clear));
        assert_eq!(parse_command("/stats"), Some(ChatCommand::Stats));
        assert_eq!(parse_command("/status"), Some(ChatCommand::Stats));
    }

    #[test]
    fn parse_help() {
        assert_eq!(parse_command("/help"), Some(ChatCommand::Help));
        assert_eq!(parse_command("/?"), Some(ChatCommand::Help));
    }

    #[test]
    fn unknown_command_is_invalid() {
        assert!(matches!(
            parse_command("/frobnicate"),
            Some(ChatCommand::Invalid(msg)) if msg.contains("frobnicate")
        ));
    }

    #[test]
    fn non_commands() {
        assert_eq!(parse_command("Hello!"), None);
        assert_eq!(parse_command(""), None);
        assert_eq!(parse_command("  "), None);
        assert_eq!(parse_command("1/2 cup sugar"), None);
    }

    #[test]
    fn blank_input_is_a_no_op() {
        assert_eq!(triage_input(""), InputAction::Nothing);
        assert_eq!(triage_input("   "), InputAction::Nothing);
        assert_eq!(triage_input("\t\n"), InputAction::Nothing);
    }

    #[test]
    fn commands_and_messages_triage() {
        assert_eq!(
            triage_input("/quit"),
            InputAction::Command(ChatCommand::Quit)
        );
        assert_eq!(
            triage_input("  hello there  "),
            InputAction::Send("hello there".to_string())
        );
    }

    #[test]
    fn help_text_not_empty() {
        let help = help_text();
        assert!(help.contains("/quit"));
        assert!(help.contains("/clear"));
        assert!(help.contains("/stats"));
    }
}
