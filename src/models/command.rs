/// A chat command, identified by its inbound token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandKind {
    /// Fresh status report with chart (`!plr`).
    Report,

    /// Log the number of samples on record (`!db`).
    HistoryLen,

    /// Owner-only graceful restart (`!restart`).
    Restart,
}

impl CommandKind {
    /// Parses a raw command token, with or without its `!` prefix.
    pub fn parse(token: &str) -> Option<Self> {
        match token.trim().trim_start_matches('!') {
            "plr" => Some(Self::Report),
            "db" => Some(Self::HistoryLen),
            "restart" => Some(Self::Restart),
            _ => None,
        }
    }
}

/// A command invocation delivered by the chat platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandEvent {
    /// What was asked for.
    pub kind: CommandKind,

    /// Channel the reply should go to.
    pub channel_id: u64,

    /// User who issued the command.
    pub requester_id: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_known_tokens() {
        assert_eq!(CommandKind::parse("!plr"), Some(CommandKind::Report));
        assert_eq!(CommandKind::parse("!db"), Some(CommandKind::HistoryLen));
        assert_eq!(CommandKind::parse("!restart"), Some(CommandKind::Restart));
    }

    #[test]
    fn test_accepts_bare_tokens_and_whitespace() {
        assert_eq!(CommandKind::parse(" plr "), Some(CommandKind::Report));
        assert_eq!(CommandKind::parse("restart"), Some(CommandKind::Restart));
    }

    #[test]
    fn test_rejects_unknown_tokens() {
        assert_eq!(CommandKind::parse("!help"), None);
        assert_eq!(CommandKind::parse(""), None);
    }
}
