//! WebSocket upgrade + message loop. One connection is one mounted dashboard:
//! it owns its `WizardSession` and drops it on disconnect.
//!
//! Each client message is parsed as JSON and answered with a single JSON message.

use std::sync::Arc;
use axum::{
  extract::{
    ws::{Message, WebSocket},
    State, WebSocketUpgrade,
  },
  response::IntoResponse,
};
use tracing::{info, error, instrument, debug};
use uuid::Uuid;

use crate::config::ReportCopy;
use crate::identity::Identity;
use crate::logic::{current_identity, logout};
use crate::protocol::{to_snapshot, ClientWsMessage, ServerWsMessage};
use crate::state::AppState;
use crate::wizard::{Intent, Outcome, WizardController, WizardSession};

/// What the loop should do after replying.
#[derive(Debug, PartialEq, Eq)]
pub enum Flow {
  Continue,
  Close,
}

/// Per-connection context: who is logged in and the controller for their role.
pub struct Conn {
  pub id: Uuid,
  pub identity: Identity,
  pub ctl: WizardController,
  pub copy: ReportCopy,
}

impl Conn {
  fn state_message(&self, session: &WizardSession, accepted: bool) -> ServerWsMessage {
    ServerWsMessage::State {
      accepted,
      snapshot: Box::new(to_snapshot(&self.ctl, &self.identity, session, &self.copy)),
    }
  }
}

#[instrument(level = "info", skip(ws, state))]
pub async fn ws_upgrade(ws: WebSocketUpgrade, State(state): State<Arc<AppState>>) -> impl IntoResponse {
  info!(target: "edumentor", "WebSocket upgrade requested");
  ws.on_upgrade(move |socket| handle_ws(socket, state))
}

async fn send(socket: &mut WebSocket, msg: &ServerWsMessage) -> Result<(), axum::Error> {
  let out = serde_json::to_string(msg).unwrap_or_else(|e| {
    serde_json::json!({ "type": "error", "message": format!("Serialization error: {}", e) }).to_string()
  });
  socket.send(Message::Text(out)).await
}

#[instrument(level = "info", skip(socket, state), fields(conn = tracing::field::Empty))]
async fn handle_ws(mut socket: WebSocket, state: Arc<AppState>) {
  let Some(identity) = current_identity(&state) else {
    info!(target: "edumentor", "WebSocket refused: no session on this device");
    let _ = send(&mut socket, &ServerWsMessage::Error { message: "Please log in first".into() }).await;
    let _ = socket.send(Message::Close(None)).await;
    return;
  };

  let conn = Conn {
    id: Uuid::new_v4(),
    ctl: state.controller_for(identity.role()),
    identity,
    copy: state.report.clone(),
  };
  tracing::Span::current().record("conn", tracing::field::display(conn.id));
  info!(target: "edumentor", role = %conn.identity.role(), mode = ?conn.ctl.mode(), "WebSocket connected");

  let mut session = WizardSession::new();
  if send(&mut socket, &conn.state_message(&session, true)).await.is_err() {
    return;
  }

  while let Some(Ok(msg)) = socket.recv().await {
    match msg {
      Message::Text(txt) => {
        let (next, reply, flow) = match serde_json::from_str::<ClientWsMessage>(&txt) {
          Ok(incoming) => {
            log_incoming(&incoming);
            handle_client_ws(incoming, &conn, &state, session)
          }
          Err(e) => (session, ServerWsMessage::Error { message: format!("Invalid JSON: {}", e) }, Flow::Continue),
        };
        session = next;

        if let Err(e) = send(&mut socket, &reply).await {
          error!(target: "edumentor", error = %e, "WS send error");
          break;
        }
        if flow == Flow::Close {
          let _ = socket.send(Message::Close(None)).await;
          break;
        }
      }
      Message::Ping(payload) => { let _ = socket.send(Message::Pong(payload)).await; }
      Message::Close(_) => break,
      _ => {}
    }
  }
  info!(target: "edumentor", points = session.points(), completed = session.completed_challenge_ids().len(), "WebSocket disconnected; wizard state dropped");
}

/// Message type and text length only; plan text never reaches the log.
fn log_incoming(msg: &ClientWsMessage) {
  debug!(target: "edumentor", kind = msg.kind(), text_len = msg.text_len(), "WS received");
}

/// Dispatch one client message. Takes the session by value and hands back the next one.
pub fn handle_client_ws(
  msg: ClientWsMessage,
  conn: &Conn,
  state: &AppState,
  session: WizardSession,
) -> (WizardSession, ServerWsMessage, Flow) {
  let intent = match msg {
    ClientWsMessage::Ping => return (session, ServerWsMessage::Pong, Flow::Continue),
    _ if current_identity(state).as_ref() != Some(&conn.identity) => {
      info!(target: "identity", conn = %conn.id, "Session ended elsewhere; closing WebSocket");
      return (WizardSession::new(), ServerWsMessage::LoggedOut, Flow::Close);
    }
    ClientWsMessage::State => {
      let reply = conn.state_message(&session, true);
      return (session, reply, Flow::Continue);
    }
    ClientWsMessage::Logout => {
      return match logout(state) {
        Ok(()) => (WizardSession::new(), ServerWsMessage::LoggedOut, Flow::Close),
        Err(_) => (
          session,
          ServerWsMessage::Error { message: "Could not clear your session on this device".into() },
          Flow::Continue,
        ),
      };
    }
    ClientWsMessage::SelectChallenge { challenge_id } => Intent::SelectChallenge(challenge_id),
    ClientWsMessage::ToggleChallenge { challenge_id } => Intent::ToggleChallenge(challenge_id),
    ClientWsMessage::ConfirmSelection => Intent::ConfirmSelection,
    ClientWsMessage::SubmitAnswer { index } => Intent::SubmitAnswer(index),
    ClientWsMessage::SubmitPlan { text } => Intent::SubmitPlan(text),
    ClientWsMessage::CompleteChallenge => Intent::CompleteChallenge,
  };

  let name = intent.name();
  let (next, outcome) = conn.ctl.apply(session, intent);
  let accepted = outcome.is_applied();
  match &outcome {
    Outcome::Applied { awarded } => {
      info!(target: "wizard", conn = %conn.id, intent = name, awarded, points = next.points(), step = ?next.step(), "WS intent applied");
    }
    Outcome::Ignored(reason) => {
      debug!(target: "wizard", conn = %conn.id, intent = name, %reason, "WS intent ignored");
    }
  }
  let reply = conn.state_message(&next, accepted);
  (next, reply, Flow::Continue)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::catalog::Catalog;
  use crate::config::FlowCfg;
  use crate::domain::{Role, Step};
  use crate::identity::validate;
  use crate::session_store::MemorySessionStore;

  fn setup(role: Role) -> (AppState, Conn) {
    let state = AppState::with_store(Catalog::builtin(), Arc::new(MemorySessionStore::new()), FlowCfg::default(), ReportCopy::default());
    let identity = validate("Bob", Some(role)).expect("valid");
    state.store.save(&identity).expect("save");
    let conn = Conn { id: Uuid::new_v4(), ctl: state.controller_for(role), identity, copy: ReportCopy::default() };
    (state, conn)
  }

  fn parse(json: &str) -> ClientWsMessage {
    serde_json::from_str(json).expect("client message")
  }

  fn snapshot_json(reply: &ServerWsMessage) -> serde_json::Value {
    serde_json::to_value(reply).expect("json")
  }

  #[test]
  fn full_pass_over_messages() {
    let (state, conn) = setup(Role::Student);
    let mut s = WizardSession::new();
    for (json, step) in [
      (r#"{"type":"select_challenge","challengeId":"student.lack-of-qualified-teachers"}"#, "quiz"),
      (r#"{"type":"submit_answer","index":1}"#, "action_plan"),
      (r#"{"type":"submit_plan","text":"Mentor one peer"}"#, "report"),
    ] {
      let (next, reply, flow) = handle_client_ws(parse(json), &conn, &state, s);
      s = next;
      assert_eq!(flow, Flow::Continue);
      let v = snapshot_json(&reply);
      assert_eq!(v["type"], "state");
      assert_eq!(v["accepted"], true);
      assert_eq!(v["snapshot"]["step"], step);
    }

    let v = snapshot_json(&conn.state_message(&s, true));
    assert_eq!(v["snapshot"]["report"]["actionPlan"], "Mentor one peer");
    assert_eq!(v["snapshot"]["quizResult"]["isCorrect"], true);
    assert_eq!(v["snapshot"]["dashboard"]["points"], 15);

    let (s, _, _) = handle_client_ws(parse(r#"{"type":"complete_challenge"}"#), &conn, &state, s);
    assert_eq!(s.step(), Step::SelectChallenge);
    assert_eq!(s.points(), 15);
  }

  #[test]
  fn quiz_answer_is_hidden_until_resolved() {
    let (state, conn) = setup(Role::Student);
    let (_, reply, _) = handle_client_ws(
      parse(r#"{"type":"select_challenge","challengeId":"student.boring-teaching-methods"}"#),
      &conn, &state, WizardSession::new(),
    );
    let v = snapshot_json(&reply);
    assert_eq!(v["snapshot"]["quiz"]["options"].as_array().map(|a| a.len()), Some(4));
    assert!(v["snapshot"]["quiz"].get("correctOptionIndex").is_none());
    assert!(v["snapshot"]["quizResult"].is_null());
  }

  #[test]
  fn ignored_intent_reports_not_accepted() {
    let (state, conn) = setup(Role::Student);
    let (s, reply, flow) = handle_client_ws(parse(r#"{"type":"complete_challenge"}"#), &conn, &state, WizardSession::new());
    assert_eq!(flow, Flow::Continue);
    assert_eq!(s, WizardSession::new());
    assert_eq!(snapshot_json(&reply)["accepted"], false);
  }

  #[test]
  fn logout_clears_store_and_closes() {
    let (state, conn) = setup(Role::Parent);
    let (_, reply, flow) = handle_client_ws(parse(r#"{"type":"logout"}"#), &conn, &state, WizardSession::new());
    assert_eq!(flow, Flow::Close);
    assert!(matches!(reply, ServerWsMessage::LoggedOut));
    assert!(state.store.load().is_none());
  }

  #[test]
  fn logout_elsewhere_closes_open_socket() {
    let (state, conn) = setup(Role::Student);
    let (s, _, _) = handle_client_ws(
      parse(r#"{"type":"select_challenge","challengeId":"student.lack-of-qualified-teachers"}"#),
      &conn, &state, WizardSession::new(),
    );
    assert_eq!(s.step(), Step::Quiz);

    logout(&state).expect("logout");
    let (s, reply, flow) = handle_client_ws(parse(r#"{"type":"submit_answer","index":1}"#), &conn, &state, s);
    assert_eq!(flow, Flow::Close);
    assert!(matches!(reply, ServerWsMessage::LoggedOut));
    assert_eq!(s, WizardSession::new());
  }

  #[test]
  fn other_identity_on_device_closes_open_socket() {
    let (state, conn) = setup(Role::Student);
    state.store.save(&validate("Carol", Some(Role::Parent)).expect("valid")).expect("save");
    let (_, reply, flow) = handle_client_ws(parse(r#"{"type":"state"}"#), &conn, &state, WizardSession::new());
    assert_eq!(flow, Flow::Close);
    assert!(matches!(reply, ServerWsMessage::LoggedOut));
  }

  #[derive(Clone, Default)]
  struct Captured(Arc<std::sync::Mutex<Vec<u8>>>);

  impl std::io::Write for Captured {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
      self.0.lock().unwrap_or_else(|p| p.into_inner()).extend_from_slice(buf);
      Ok(buf.len())
    }
    fn flush(&mut self) -> std::io::Result<()> { Ok(()) }
  }

  #[test]
  fn plan_text_stays_out_of_default_log() {
    let captured = Captured::default();
    let sink = captured.clone();
    let subscriber = tracing_subscriber::fmt()
      .with_env_filter(tracing_subscriber::EnvFilter::new(crate::telemetry::DEFAULT_FILTER))
      .with_writer(move || sink.clone())
      .with_ansi(false)
      .finish();

    let (state, conn) = setup(Role::Parent);
    tracing::subscriber::with_default(subscriber, || {
      let msg = parse(r#"{"type":"submit_plan","text":"Private plan for my child"}"#);
      log_incoming(&msg);
      let s = [
        r#"{"type":"toggle_challenge","challengeId":"parent.school-safety"}"#,
        r#"{"type":"confirm_selection"}"#,
      ]
      .into_iter()
      .fold(WizardSession::new(), |s, json| handle_client_ws(parse(json), &conn, &state, s).0);
      let s = handle_client_ws(msg, &conn, &state, s).0;
      assert_eq!(s.step(), Step::Report);
    });

    let out = String::from_utf8(captured.0.lock().expect("lock").clone()).expect("utf8");
    assert!(out.contains("submit_plan"));
    assert!(out.contains("text_len=25"));
    assert!(!out.contains("Private plan"));
  }

  #[test]
  fn ping_and_negative_index() {
    let (state, conn) = setup(Role::Student);
    let (_, reply, _) = handle_client_ws(parse(r#"{"type":"ping"}"#), &conn, &state, WizardSession::new());
    assert!(matches!(reply, ServerWsMessage::Pong));
    assert!(serde_json::from_str::<ClientWsMessage>(r#"{"type":"submit_answer","index":-1}"#).is_err());
  }
}
