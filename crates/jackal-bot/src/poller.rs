//! Long-polling loop that feeds Telegram updates to the dispatcher.

use std::{sync::Arc, time::Duration};

use jackal_core::PersonnelSource;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::{
  command::Command,
  dispatch::Dispatcher,
  error::Result,
  telegram::{MESSAGE_LIMIT, TelegramClient, Update, pack_messages},
};

/// Pause after a failed `getUpdates` before polling again.
const RETRY_DELAY: Duration = Duration::from_secs(5);

pub struct Poller<S> {
  client:     TelegramClient,
  dispatcher: Arc<Dispatcher<S>>,
  /// Commands suffixed with any other `@name` are left alone.
  username:   String,
  offset:     Option<i64>,
}

impl<S> Poller<S>
where
  S: PersonnelSource + 'static,
{
  pub fn new(
    client: TelegramClient,
    dispatcher: Arc<Dispatcher<S>>,
    username: String,
  ) -> Self {
    Self {
      client,
      dispatcher,
      username,
      offset: None,
    }
  }

  /// Poll forever. Failures are logged and retried; they never end the loop.
  pub async fn run(mut self) {
    loop {
      if let Err(error) = self.poll_once().await {
        warn!(%error, "polling telegram failed; retrying");
        tokio::time::sleep(RETRY_DELAY).await;
      }
    }
  }

  /// Fetch one batch of updates and start a task per command. The returned
  /// handles may be awaited or dropped; dropping detaches the task.
  pub async fn poll_once(&mut self) -> Result<Vec<JoinHandle<()>>> {
    let updates = self.client.get_updates(self.offset).await?;
    let mut tasks = Vec::new();
    for update in updates {
      self.offset = Some(update.update_id + 1);
      if let Some(task) = self.spawn_reply(&update) {
        tasks.push(task);
      }
    }
    Ok(tasks)
  }

  fn spawn_reply(&self, update: &Update) -> Option<JoinHandle<()>> {
    let (chat_id, text) = update.text_message()?;
    let command = Command::parse(text, &self.username)?;
    debug!(chat_id, ?command, "received command");

    let client = self.client.clone();
    let dispatcher = Arc::clone(&self.dispatcher);
    Some(tokio::spawn(async move {
      let blocks = dispatcher.handle(&command).await;
      for message in pack_messages(&blocks, MESSAGE_LIMIT) {
        if let Err(error) = client.send_message(chat_id, &message).await {
          warn!(chat_id, %error, "failed to send reply");
          break;
        }
      }
    }))
  }
}
