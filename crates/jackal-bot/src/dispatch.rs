//! Command handling: maps each [`Command`] to reply text.

use std::sync::Arc;

use chrono::NaiveDate;
use jackal_core::{PersonnelSource, QueryEngine, Reply};
use tracing::info;

use crate::{Calendar, command::Command};

pub const WELCOME_TEXT: &str =
  "Welcome to Jackal Medical Bot! Use /help for commands.";

pub const HELP_TEXT: &str = "Commands:\n\
  /search SYN_NO - Get user details\n\
  /pes PES_CODE - List users by PES\n\
  /all - Show all personnel\n\
  /update - Update Medical Status";

pub const UNAVAILABLE_TEXT: &str =
  "Personnel data is unavailable right now. Please try again later.";

/// Answers commands against one personnel source.
pub struct Dispatcher<S> {
  source:          Arc<S>,
  engine:          QueryEngine,
  calendar:        Calendar,
  update_form_url: Option<String>,
}

impl<S: PersonnelSource> Dispatcher<S> {
  pub fn new(
    source: Arc<S>,
    engine: QueryEngine,
    calendar: Calendar,
    update_form_url: Option<String>,
  ) -> Self {
    Self {
      source,
      engine,
      calendar,
      update_form_url,
    }
  }

  /// Reply blocks for `command`, resolved against the calendar's today.
  pub async fn handle(&self, command: &Command) -> Vec<String> {
    self.handle_on(command, self.calendar.today()).await
  }

  /// Reply blocks for `command` as of `today`. Each block is one person or
  /// one message; the transport decides how they are packed.
  pub async fn handle_on(&self, command: &Command, today: NaiveDate) -> Vec<String> {
    let source = self.source.as_ref();
    let result = match command {
      Command::Start => return vec![WELCOME_TEXT.to_owned()],
      Command::Help => return vec![HELP_TEXT.to_owned()],
      Command::Update => return vec![self.update_text()],
      Command::Search(None) => return vec!["Usage: /search SYN_NO".to_owned()],
      Command::Pes(None) => return vec!["Usage: /pes PES_CODE".to_owned()],

      Command::Search(Some(identifier)) => {
        self.engine.lookup(source, identifier, today).await
      }
      Command::Pes(Some(category)) => {
        self.engine.by_category(source, category, today).await
      }
      Command::All => self.engine.list_all(source, today).await,
    };

    match result {
      Ok(reply) => {
        info!(?command, outcome = outcome(&reply), "answered query");
        reply.blocks()
      }
      // The engine has already logged the cause.
      Err(_) => vec![UNAVAILABLE_TEXT.to_owned()],
    }
  }

  fn update_text(&self) -> String {
    match &self.update_form_url {
      Some(url) => {
        format!("To update Medical Status, please use this form:\n{url}")
      }
      None => "The status update form is not configured.".to_owned(),
    }
  }
}

fn outcome(reply: &Reply) -> &'static str {
  match reply {
    Reply::Person { .. } => "person",
    Reply::NotFound => "not_found",
    Reply::Group { .. } => "group",
    Reply::NoPersonnel { .. } => "no_personnel",
  }
}
