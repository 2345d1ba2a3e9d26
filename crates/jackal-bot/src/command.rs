//! Parsing of inbound chat text into bot commands.

/// A recognised bot command. Arguments are the first word after the command,
/// if any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
  Start,
  Help,
  /// `/search SYN_NO`
  Search(Option<String>),
  /// `/pes PES_CODE`
  Pes(Option<String>),
  All,
  Update,
}

impl Command {
  /// Parse a message addressed to the bot called `username`.
  ///
  /// Yields `None` for plain text, for commands this bot does not know, and
  /// for commands whose `@suffix` names some other bot. Group chats share
  /// commands between bots, so none of these get a reply.
  pub fn parse(text: &str, username: &str) -> Option<Self> {
    let mut words = text.split_whitespace();
    let head = words.next()?.strip_prefix('/')?;
    let name = match head.split_once('@') {
      Some((name, bot)) if bot.eq_ignore_ascii_case(username) => name,
      Some(_) => return None,
      None => head,
    };
    let argument = words.next().map(str::to_owned);

    Some(match name.to_lowercase().as_str() {
      "start" => Self::Start,
      "help" => Self::Help,
      "search" => Self::Search(argument),
      "pes" => Self::Pes(argument),
      "all" => Self::All,
      "update" => Self::Update,
      _ => return None,
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  const BOT: &str = "JackalBot";

  #[test]
  fn plain_text_is_not_a_command() {
    assert_eq!(Command::parse("hello there", BOT), None);
    assert_eq!(Command::parse("   ", BOT), None);
    assert_eq!(Command::parse("", BOT), None);
  }

  #[test]
  fn search_takes_first_argument() {
    assert_eq!(
      Command::parse("/search a123 extra", BOT),
      Some(Command::Search(Some("a123".into())))
    );
    assert_eq!(Command::parse("/search", BOT), Some(Command::Search(None)));
    assert_eq!(Command::parse("/search   ", BOT), Some(Command::Search(None)));
  }

  #[test]
  fn own_suffix_and_case_are_accepted() {
    assert_eq!(
      Command::parse("/PES@JackalBot b2", BOT),
      Some(Command::Pes(Some("b2".into())))
    );
    assert_eq!(Command::parse("/all@JackalBot", BOT), Some(Command::All));
    assert_eq!(Command::parse("/all@jackalbot", BOT), Some(Command::All));
  }

  #[test]
  fn commands_for_other_bots_are_ignored() {
    assert_eq!(Command::parse("/all@OtherBot", BOT), None);
    assert_eq!(Command::parse("/search@OtherBot A123", BOT), None);
    assert_eq!(Command::parse("/ban@ModBot spammer", BOT), None);
    // An empty suffix names no bot at all.
    assert_eq!(Command::parse("/all@", BOT), None);
  }

  #[test]
  fn unknown_commands_are_ignored() {
    assert_eq!(Command::parse("/delete A123", BOT), None);
    assert_eq!(Command::parse("/ban spammer", BOT), None);
  }
}
