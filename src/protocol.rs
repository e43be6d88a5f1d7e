use crate::game::session::{GameSession, SessionSnapshot};
use crate::game::types::Direction;
use rand::Rng;
use serde::{Deserialize, Serialize};

pub const GAME_OVER_PROMPT: &str = "You were caught! Play again?";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ClientMessage {
  Input { direction: Direction },
  /// The "yes" answer to the game-over prompt.
  Restart,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ServerMessage {
  Frame(SessionSnapshot),
  GameOver {
    score: f64,
    level: u32,
    prompt: &'static str,
  },
}

impl ServerMessage {
  pub fn game_over<R: Rng>(session: &GameSession<R>, now: f64) -> Self {
    ServerMessage::GameOver {
      score: session.score(now),
      level: session.level(),
      prompt: GAME_OVER_PROMPT,
    }
  }
}

pub fn decode_client_message(text: &str) -> Option<ClientMessage> {
  match serde_json::from_str(text) {
    Ok(message) => Some(message),
    Err(err) => {
      tracing::debug!(%err, "ignoring malformed client message");
      None
    }
  }
}

pub fn encode_server_message(message: &ServerMessage) -> Option<String> {
  match serde_json::to_string(message) {
    Ok(payload) => Some(payload),
    Err(err) => {
      tracing::error!(%err, "failed to encode server message");
      None
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::config::GameConfig;
  use rand::rngs::StdRng;
  use rand::SeedableRng;

  #[test]
  fn decodes_input_and_restart() {
    assert_eq!(
      decode_client_message(r#"{"type":"input","direction":"left"}"#),
      Some(ClientMessage::Input {
        direction: Direction::Left
      })
    );
    assert_eq!(
      decode_client_message(r#"{"type":"restart"}"#),
      Some(ClientMessage::Restart)
    );
  }

  #[test]
  fn rejects_unknown_messages() {
    assert_eq!(decode_client_message(r#"{"type":"input","direction":"north"}"#), None);
    assert_eq!(decode_client_message(r#"{"type":"join"}"#), None);
    assert_eq!(decode_client_message("not json"), None);
  }

  #[test]
  fn frames_and_game_over_are_tagged() {
    let session = GameSession::new(GameConfig::default(), StdRng::seed_from_u64(1), 0.0);

    let frame = encode_server_message(&ServerMessage::Frame(session.snapshot(1_500.0)))
      .expect("frame encodes");
    let value: serde_json::Value = serde_json::from_str(&frame).expect("valid json");
    assert_eq!(value["type"], "frame");
    assert_eq!(value["level"], 0);
    assert!(value["snakes"].is_array());

    let over = encode_server_message(&ServerMessage::game_over(&session, 1_500.0))
      .expect("game over encodes");
    let value: serde_json::Value = serde_json::from_str(&over).expect("valid json");
    assert_eq!(value["type"], "gameOver");
    assert_eq!(value["score"], 1.5);
    assert_eq!(value["prompt"], GAME_OVER_PROMPT);
  }
}
