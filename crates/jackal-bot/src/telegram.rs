//! Minimal Telegram Bot API client: long polling and plain-text replies.

use std::{mem, time::Duration};

use reqwest::Client;
use serde::{Deserialize, de::DeserializeOwned};
use serde_json::{Value, json};

use crate::{
  TelegramConfig,
  error::{Error, Result},
};

/// Longest text Telegram accepts in one message.
pub const MESSAGE_LIMIT: usize = 4096;

// ─── Wire types ───────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct Envelope<T> {
  ok:          bool,
  result:      Option<T>,
  description: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Update {
  pub update_id: i64,
  #[serde(default)]
  pub message:   Option<Message>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Message {
  pub message_id: i64,
  pub chat:       Chat,
  #[serde(default)]
  pub text:       Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Chat {
  pub id: i64,
}

/// The bot's own account, as returned by `getMe`.
#[derive(Debug, Clone, Deserialize)]
pub struct User {
  pub id:       i64,
  #[serde(default)]
  pub username: Option<String>,
}

impl Update {
  /// The chat and text of a text message, if this update carries one.
  pub fn text_message(&self) -> Option<(i64, &str)> {
    let message = self.message.as_ref()?;
    Some((message.chat.id, message.text.as_deref()?))
  }
}

// ─── Client ───────────────────────────────────────────────────────────────────

/// Async client for the Bot API methods the bot uses.
///
/// Cheap to clone — the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct TelegramClient {
  client:       Client,
  base:         String,
  poll_timeout: u64,
}

impl TelegramClient {
  pub fn new(config: &TelegramConfig) -> Result<Self> {
    // Long polls hold the request open for `poll_timeout_secs`.
    let client = Client::builder()
      .timeout(Duration::from_secs(config.poll_timeout_secs + 10))
      .build()?;
    Ok(Self {
      client,
      base: format!(
        "{}/bot{}",
        config.api_url.trim_end_matches('/'),
        config.token
      ),
      poll_timeout: config.poll_timeout_secs,
    })
  }

  async fn call<T: DeserializeOwned>(
    &self,
    method: &'static str,
    body: &Value,
  ) -> Result<T> {
    let envelope: Envelope<T> = self
      .client
      .post(format!("{}/{method}", self.base))
      .json(body)
      .send()
      .await?
      .json()
      .await?;

    match envelope {
      Envelope {
        ok: true,
        result: Some(result),
        ..
      } => Ok(result),
      Envelope { description, .. } => Err(Error::Api {
        method,
        description: description.unwrap_or_else(|| "no description".into()),
      }),
    }
  }

  /// `getMe` — the account behind the token.
  pub async fn get_me(&self) -> Result<User> {
    self.call("getMe", &json!({})).await
  }

  /// `getUpdates` — waits up to the poll timeout for new message updates.
  pub async fn get_updates(&self, offset: Option<i64>) -> Result<Vec<Update>> {
    let mut body = json!({
      "timeout": self.poll_timeout,
      "allowed_updates": ["message"],
    });
    if let Some(offset) = offset {
      body["offset"] = json!(offset);
    }
    self.call("getUpdates", &body).await
  }

  /// `sendMessage` — plain text, no parse mode.
  pub async fn send_message(&self, chat_id: i64, text: &str) -> Result<()> {
    let _: Value = self
      .call("sendMessage", &json!({ "chat_id": chat_id, "text": text }))
      .await?;
    Ok(())
  }
}

// ─── Message packing ──────────────────────────────────────────────────────────

/// Pack reply blocks into as few messages as fit under `limit` characters,
/// separating blocks with a blank line. A block that is too long on its own
/// is split between lines, and a line that is too long between characters.
pub fn pack_messages(blocks: &[String], limit: usize) -> Vec<String> {
  pack(blocks.iter().flat_map(|b| fit(b, limit)), "\n\n", limit)
}

fn fit(block: &str, limit: usize) -> Vec<String> {
  if block.chars().count() <= limit {
    return vec![block.to_owned()];
  }
  pack(block.lines().flat_map(|l| chunk_chars(l, limit)), "\n", limit)
}

fn chunk_chars(line: &str, limit: usize) -> Vec<String> {
  let chars: Vec<char> = line.chars().collect();
  if chars.is_empty() {
    return vec![String::new()];
  }
  chars.chunks(limit).map(|c| c.iter().collect()).collect()
}

fn pack(
  pieces: impl IntoIterator<Item = String>,
  separator: &str,
  limit: usize,
) -> Vec<String> {
  let separator_len = separator.chars().count();
  let mut messages = Vec::new();
  let mut current = String::new();
  let mut current_len = 0;
  let mut started = false;

  for piece in pieces {
    let piece_len = piece.chars().count();
    if started && current_len + separator_len + piece_len > limit {
      messages.push(mem::take(&mut current));
      current_len = 0;
      started = false;
    }
    if started {
      current.push_str(separator);
      current_len += separator_len;
    }
    current.push_str(&piece);
    current_len += piece_len;
    started = true;
  }
  if started && !current.trim().is_empty() {
    messages.push(current);
  }
  messages
}

#[cfg(test)]
mod tests {
  use std::sync::{Arc, Mutex};

  use axum::{Json, Router, extract::State, routing::post};
  use tokio::net::TcpListener;

  use super::*;

  fn blocks(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
  }

  #[test]
  fn small_blocks_share_one_message() {
    let packed = pack_messages(&blocks(&["a\nb", "c"]), MESSAGE_LIMIT);
    assert_eq!(packed, ["a\nb\n\nc"]);
  }

  #[test]
  fn blocks_are_never_split_when_they_fit() {
    // 4 + 2 + 4 = 10 > 9, so the second block starts a new message.
    let packed = pack_messages(&blocks(&["aaaa", "bbbb", "c"]), 9);
    assert_eq!(packed, ["aaaa", "bbbb\n\nc"]);
  }

  #[test]
  fn oversized_block_splits_on_lines_then_chars() {
    let packed = pack_messages(&blocks(&["12345\n67\n89"]), 5);
    assert_eq!(packed, ["12345", "67\n89"]);

    let packed = pack_messages(&blocks(&["abcdefgh"]), 3);
    assert_eq!(packed, ["abc", "def", "gh"]);
  }

  #[test]
  fn limit_counts_characters_not_bytes() {
    let packed = pack_messages(&blocks(&["ééé", "ü"]), 6);
    assert_eq!(packed, ["ééé\n\nü"]);
  }

  #[test]
  fn every_message_respects_the_limit() {
    let roster: Vec<String> = (0..500)
      .map(|i| format!("CPL Person {i}\nPES: B2\nSTATUS: MC (01/01/2024 - 10/01/2024)"))
      .collect();
    let packed = pack_messages(&roster, MESSAGE_LIMIT);
    assert!(packed.len() > 1);
    assert!(packed.iter().all(|m| m.chars().count() <= MESSAGE_LIMIT));
    assert_eq!(packed.join("\n\n"), roster.join("\n\n"));
  }

  #[test]
  fn updates_without_text_are_ignored() {
    let updates: Vec<Update> = serde_json::from_value(json!([
      { "update_id": 1, "message": { "message_id": 10, "chat": { "id": 7 }, "text": "/all" } },
      { "update_id": 2, "message": { "message_id": 11, "chat": { "id": 7 }, "sticker": {} } },
      { "update_id": 3, "edited_message": {} },
    ]))
    .unwrap();
    assert_eq!(updates[0].text_message(), Some((7, "/all")));
    assert_eq!(updates[1].text_message(), None);
    assert_eq!(updates[2].text_message(), None);
  }

  async fn fake_api(sent: Arc<Mutex<Vec<Value>>>) -> String {
    async fn send(
      State(sent): State<Arc<Mutex<Vec<Value>>>>,
      Json(body): Json<Value>,
    ) -> Json<Value> {
      if body["text"].as_str() == Some("") {
        return Json(json!({ "ok": false, "description": "Bad Request: message text is empty" }));
      }
      sent.lock().unwrap().push(body);
      Json(json!({ "ok": true, "result": { "message_id": 1 } }))
    }

    async fn me() -> Json<Value> {
      Json(json!({
        "ok": true,
        "result": { "id": 7, "is_bot": true, "first_name": "Jackal", "username": "JackalBot" }
      }))
    }

    let router = Router::new()
      .route("/{bot}/getMe", post(me))
      .route("/{bot}/sendMessage", post(send))
      .with_state(sent);
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = listener.local_addr().unwrap();
    tokio::spawn(async move { axum::serve(listener, router).await.unwrap() });
    format!("http://{address}")
  }

  #[tokio::test]
  async fn send_message_posts_chat_and_text() {
    let sent = Arc::new(Mutex::new(Vec::new()));
    let client = TelegramClient::new(&TelegramConfig {
      token:             "123:abc".into(),
      api_url:           fake_api(sent.clone()).await,
      poll_timeout_secs: 1,
      username:          None,
    })
    .unwrap();

    client.send_message(42, "hello").await.unwrap();
    let err = client.send_message(42, "").await.unwrap_err();
    assert!(
      matches!(&err, Error::Api { method: "sendMessage", description } if description.contains("empty")),
      "{err:?}"
    );

    let sent = sent.lock().unwrap();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0], json!({ "chat_id": 42, "text": "hello" }));
  }

  #[tokio::test]
  async fn get_me_reports_the_username() {
    let client = TelegramClient::new(&TelegramConfig {
      token:             "123:abc".into(),
      api_url:           fake_api(Arc::default()).await,
      poll_timeout_secs: 1,
      username:          None,
    })
    .unwrap();

    let me = client.get_me().await.unwrap();
    assert_eq!(me.id, 7);
    assert_eq!(me.username.as_deref(), Some("JackalBot"));
  }
}
