//! Public protocol structs for WebSocket and HTTP endpoints (serde ready).
//! Keep this small and stable to evolve backend and frontend independently.

use serde::{Deserialize, Serialize};

use crate::config::ReportCopy;
use crate::dashboard::{summarize, DashboardSummary};
use crate::domain::{ChallengeDescriptor, Role, Step};
use crate::identity::Identity;
use crate::rank::Rank;
use crate::report::{build as build_report, ContributionReport};
use crate::wizard::{QuizResult, SelectionMode, WizardController, WizardSession};

/// Messages the client can send over WebSocket.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientWsMessage {
    Ping,
    /// Ask for the current snapshot without changing anything.
    State,
    SelectChallenge {
        #[serde(rename = "challengeId")]
        challenge_id: String,
    },
    ToggleChallenge {
        #[serde(rename = "challengeId")]
        challenge_id: String,
    },
    ConfirmSelection,
    SubmitAnswer {
        index: usize,
    },
    SubmitPlan {
        text: String,
    },
    CompleteChallenge,
    Logout,
}

impl ClientWsMessage {
    /// Wire tag, safe to log.
    pub fn kind(&self) -> &'static str {
        match self {
            ClientWsMessage::Ping => "ping",
            ClientWsMessage::State => "state",
            ClientWsMessage::SelectChallenge { .. } => "select_challenge",
            ClientWsMessage::ToggleChallenge { .. } => "toggle_challenge",
            ClientWsMessage::ConfirmSelection => "confirm_selection",
            ClientWsMessage::SubmitAnswer { .. } => "submit_answer",
            ClientWsMessage::SubmitPlan { .. } => "submit_plan",
            ClientWsMessage::CompleteChallenge => "complete_challenge",
            ClientWsMessage::Logout => "logout",
        }
    }

    /// Length of free text carried by the message, if any.
    pub fn text_len(&self) -> Option<usize> {
        match self {
            ClientWsMessage::SubmitPlan { text } => Some(text.chars().count()),
            _ => None,
        }
    }
}

/// Messages the server sends back over WebSocket.
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerWsMessage {
    Pong,
    State {
        /// False when the intent was ignored (the snapshot is unchanged).
        accepted: bool,
        snapshot: Box<WizardSnapshot>,
    },
    LoggedOut,
    Error {
        message: String,
    },
}

/// Challenge as the presentation sees it: never includes the quiz answer.
#[derive(Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ChallengeOut {
    pub id: String,
    pub label: String,
    pub subtitle: String,
    pub has_quiz: bool,
}

pub fn to_out(c: &ChallengeDescriptor) -> ChallengeOut {
    ChallengeOut {
        id: c.id.clone(),
        label: c.label.clone(),
        subtitle: c.subtitle.clone(),
        has_quiz: c.quiz.is_some(),
    }
}

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct QuizOut {
    pub question: String,
    pub options: Vec<String>,
}

/// Everything the presentation needs to render the current wizard step.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WizardSnapshot {
    pub role: Role,
    pub mode: SelectionMode,
    pub step: Step,
    pub challenges: Vec<ChallengeOut>,
    pub selected_challenge: Option<ChallengeOut>,
    pub selected_ids: Vec<String>,
    /// Present on the Quiz step only.
    pub quiz: Option<QuizOut>,
    pub quiz_resolved: bool,
    /// Present once the answer is locked, until the pass is completed.
    pub quiz_result: Option<QuizResult>,
    pub action_plan: String,
    pub report: Option<ContributionReport>,
    pub completed_ids: Vec<String>,
    pub dashboard: DashboardSummary,
}

pub fn to_snapshot(
    ctl: &WizardController,
    identity: &Identity,
    session: &WizardSession,
    copy: &ReportCopy,
) -> WizardSnapshot {
    let quiz = if session.step() == Step::Quiz {
        ctl.quiz_for_session(session).map(|q| QuizOut {
            question: q.question.clone(),
            options: q.options.clone(),
        })
    } else {
        None
    };
    WizardSnapshot {
        role: ctl.role(),
        mode: ctl.mode(),
        step: session.step(),
        challenges: ctl.challenges().iter().map(to_out).collect(),
        selected_challenge: session.selected_challenge().map(to_out),
        selected_ids: session.selected_set().iter().map(|c| c.id.clone()).collect(),
        quiz,
        quiz_resolved: session.quiz_resolved(),
        quiz_result: ctl.quiz_result(session),
        action_plan: session.action_plan_text().to_string(),
        report: build_report(ctl.role(), session, copy),
        completed_ids: session.completed_challenge_ids().iter().cloned().collect(),
        dashboard: summarize(identity, session, ctl.challenges().len()),
    }
}

//
// HTTP request/response DTOs
//

#[derive(Debug, Deserialize)]
pub struct LoginIn {
    #[serde(default)]
    pub name: String,
    /// Free-form so that an unknown or empty value reports "select your role".
    #[serde(default)]
    pub role: Option<String>,
}

#[derive(Serialize)]
pub struct SessionOut {
    pub identity: Option<Identity>,
}

#[derive(Debug, Deserialize)]
pub struct CatalogQuery {
    pub role: Option<String>,
}
#[derive(Serialize)]
pub struct CatalogOut {
    pub role: Role,
    pub mode: SelectionMode,
    pub challenges: Vec<ChallengeOut>,
}

#[derive(Debug, Deserialize)]
pub struct RankQuery {
    #[serde(default)]
    pub points: u32,
}
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RankOut {
    pub points: u32,
    pub rank: Rank,
    pub label: &'static str,
    pub points_to_next_rank: Option<u32>,
    pub badges: Vec<Rank>,
}

#[derive(Serialize)]
pub struct ErrorOut {
    pub message: String,
}

#[derive(Serialize)]
pub struct HealthOut {
    pub ok: bool,
}
