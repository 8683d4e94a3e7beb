//! TurnProcessor -- drives one user turn through the advisor.
//!
//! Order within a turn is fixed:
//! 1. append the user turn (visible to readers before any network activity)
//! 2. detect a meta-request and build the windowed request
//! 3. one advisor call (the only suspension point besides the session lock)
//! 4. append the assistant turn and the new summary
//!
//! The processor holds no storage state; persistence is the caller's job.

use divinegpt_types::advisory::Tone;
use divinegpt_types::chat::Turn;
use divinegpt_types::error::AdvisorError;
use tracing::info;

use crate::advisor::client::{AdvisorClient, AdvisoryOutcome};
use crate::advisor::port::RemoteAdvisorPort;

use super::epoch::EpochTicket;
use super::gate::{TurnPermit, TurnPhase};
use super::meta::is_meta_request;
use super::session::{apply_summary, apply_turn, SharedSession};
use super::window::ContextWindower;

/// The user/assistant pair produced by a turn, ready for persistence.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletedTurn {
    pub user_turn: Turn,
    pub assistant_turn: Turn,
    pub emotion: String,
    pub updated_summary: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TurnOutcome {
    /// Empty input; nothing happened.
    Ignored,
    Resolved(CompletedTurn),
    /// The advisor failed and the fallback advisory was used.
    Degraded {
        turn: CompletedTurn,
        reason: AdvisorError,
    },
    /// The active session changed while the advisor was answering; the
    /// answer was dropped and only the user turn remains.
    Superseded { user_turn: Turn },
}

impl TurnOutcome {
    pub fn completed(&self) -> Option<&CompletedTurn> {
        match self {
            TurnOutcome::Resolved(turn) => Some(turn),
            TurnOutcome::Degraded { turn, .. } => Some(turn),
            TurnOutcome::Ignored | TurnOutcome::Superseded { .. } => None,
        }
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, TurnOutcome::Degraded { .. })
    }
}

pub struct TurnProcessor<A> {
    advisor: AdvisorClient<A>,
    windower: ContextWindower,
}

impl<A: RemoteAdvisorPort> TurnProcessor<A> {
    pub fn new(advisor: AdvisorClient<A>, windower: ContextWindower) -> Self {
        Self { advisor, windower }
    }

    pub fn advisor(&self) -> &AdvisorClient<A> {
        &self.advisor
    }

    pub fn windower(&self) -> &ContextWindower {
        &self.windower
    }

    /// Process one user turn against `session`.
    ///
    /// `permit` must be held for `session` and `ticket` taken before the call.
    #[tracing::instrument(
        name = "process_turn",
        skip_all,
        fields(handle = %session.handle(), tone = %tone)
    )]
    pub async fn process(
        &self,
        content: &str,
        tone: Tone,
        session: &SharedSession,
        permit: &TurnPermit,
        ticket: &EpochTicket,
    ) -> TurnOutcome {
        debug_assert_eq!(permit.handle(), session.handle());

        let content = content.trim();
        if content.is_empty() {
            permit.advance(TurnPhase::Idle);
            return TurnOutcome::Ignored;
        }

        permit.advance(TurnPhase::Sending);
        let is_meta = is_meta_request(content);
        let user_turn = Turn::user(content);

        let request = session
            .transition(|current| {
                let request = self.windower.build(
                    content,
                    tone,
                    &current.turns,
                    &current.summary,
                    is_meta,
                );
                (apply_turn(current, user_turn.clone()), request)
            })
            .await;

        permit.advance(TurnPhase::AwaitingAdvisor);
        let outcome = self.advisor.ask(&request).await;

        if !ticket.is_current() {
            permit.advance(TurnPhase::Idle);
            info!("Active session changed during advisor call, dropping answer");
            return TurnOutcome::Superseded { user_turn };
        }

        let result = outcome.result();
        let assistant_turn = Turn::assistant(
            result.reply_text.clone(),
            result.scripture_ref.clone(),
            is_meta,
        );
        let completed = CompletedTurn {
            user_turn,
            assistant_turn: assistant_turn.clone(),
            emotion: result.emotion.clone(),
            updated_summary: result.updated_summary.clone(),
        };

        let summary = completed.updated_summary.clone();
        session
            .transition(|current| (apply_summary(apply_turn(current, assistant_turn), summary), ()))
            .await;

        match outcome {
            AdvisoryOutcome::Resolved(_) => {
                permit.advance(TurnPhase::Resolved);
                TurnOutcome::Resolved(completed)
            }
            AdvisoryOutcome::Degraded { reason, .. } => {
                permit.advance(TurnPhase::Degraded);
                TurnOutcome::Degraded {
                    turn: completed,
                    reason,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use divinegpt_types::chat::{Session, TurnRole};
    use tokio::sync::Notify;

    use super::*;
    use crate::advisor::client::DEFAULT_ADVISOR_TIMEOUT;
    use crate::advisor::fallback::FALLBACK_REPLY;
    use crate::chat::epoch::Epoch;
    use crate::chat::gate::TurnGate;
    use crate::test_support::{advisory, FakeAdvisor};

    fn processor(advisor: FakeAdvisor) -> TurnProcessor<FakeAdvisor> {
        TurnProcessor::new(
            AdvisorClient::new(advisor, DEFAULT_ADVISOR_TIMEOUT),
            ContextWindower::default(),
        )
    }

    async fn run(
        processor: &TurnProcessor<FakeAdvisor>,
        content: &str,
        session: &SharedSession,
    ) -> TurnOutcome {
        let gate = TurnGate::new();
        let epoch = Epoch::new();
        let permit = gate.try_acquire(session.handle()).unwrap();
        processor
            .process(content, Tone::Neutral, session, &permit, &epoch.ticket())
            .await
    }

    #[tokio::test]
    async fn test_empty_content_is_noop() {
        let processor = processor(FakeAdvisor::replying(vec![]));
        let session = SharedSession::new(Session::new());

        assert_eq!(run(&processor, "   ", &session).await, TurnOutcome::Ignored);
        assert_eq!(session.turn_count().await, 0);
        assert!(processor.advisor().port().requests().is_empty());
    }

    #[tokio::test]
    async fn test_resolved_turn_appends_pair_and_summary() {
        let processor = processor(FakeAdvisor::replying(vec![Ok(advisory(
            "Peace is found within.",
            "calm",
            "S1",
        ))]));
        let session = SharedSession::new(Session::new());

        let outcome = run(&processor, "How can I find inner peace?", &session).await;
        let completed = outcome.completed().unwrap().clone();
        assert!(!outcome.is_degraded());
        assert_eq!(completed.emotion, "calm");

        let snapshot = session.snapshot().await;
        assert_eq!(snapshot.turns.len(), 2);
        assert_eq!(snapshot.turns[0].role, TurnRole::User);
        assert_eq!(snapshot.turns[0].content, "How can I find inner peace?");
        assert_eq!(snapshot.turns[1].role, TurnRole::Assistant);
        assert_eq!(snapshot.turns[1].content, "Peace is found within.");
        assert!(snapshot.turns[1].scripture_ref.is_some());
        assert_eq!(snapshot.summary, "S1");
    }

    #[tokio::test]
    async fn test_request_excludes_current_turn_from_history() {
        let processor = processor(FakeAdvisor::replying(vec![Ok(advisory("a", "calm", "S1"))]));
        let session = SharedSession::new(Session::new());

        run(&processor, "can you rephrase that", &session).await;

        let requests = processor.advisor().port().requests();
        assert_eq!(requests.len(), 1);
        assert!(requests[0].history_window.is_empty());
        assert_eq!(requests[0].query, "can you rephrase that");
        assert_eq!(requests[0].prior_summary, "");
    }

    #[tokio::test]
    async fn test_meta_request_flags_assistant_turn() {
        let processor = processor(FakeAdvisor::replying(vec![Ok(advisory("a", "calm", "S1"))]));
        let session = SharedSession::new(Session::new());

        let outcome = run(&processor, "Sorry, WHAT DO YOU MEAN?", &session).await;
        assert!(outcome.completed().unwrap().assistant_turn.is_reframing);
    }

    #[tokio::test]
    async fn test_twelve_turn_session_sends_ten() {
        let processor = processor(FakeAdvisor::replying(vec![Ok(advisory("a", "calm", "S7"))]));
        let mut seeded = Session::new();
        for i in 0..12 {
            seeded.turns.push(Turn::user(format!("turn {i}")));
        }
        let session = SharedSession::new(seeded);

        run(&processor, "what do you mean?", &session).await;

        let request = &processor.advisor().port().requests()[0];
        assert_eq!(request.history_window.len(), 10);
        assert_eq!(request.history_window[0].content, "turn 2");
    }

    #[tokio::test]
    async fn test_degraded_turn_shows_fallback_and_keeps_summary() {
        let processor = processor(FakeAdvisor::replying(vec![Err(AdvisorError::Transport {
            message: "connection reset".to_string(),
        })]));
        let mut seeded = Session::new();
        seeded.summary = "S0".to_string();
        let session = SharedSession::new(seeded);

        let outcome = run(&processor, "Why do I suffer?", &session).await;
        assert!(outcome.is_degraded());

        let snapshot = session.snapshot().await;
        assert_eq!(snapshot.turns[1].content, FALLBACK_REPLY);
        assert_eq!(snapshot.summary, "S0");
    }

    #[tokio::test]
    async fn test_user_turn_visible_before_advisor_answers() {
        let started = Arc::new(Notify::new());
        let release = Arc::new(Notify::new());
        let advisor = FakeAdvisor::replying(vec![Ok(advisory("a", "calm", "S1"))])
            .with_hold(Arc::clone(&started), Arc::clone(&release));
        let processor = processor(advisor);
        let session = SharedSession::new(Session::new());
        let gate = TurnGate::new();
        let epoch = Epoch::new();
        let permit = gate.try_acquire(session.handle()).unwrap();
        let ticket = epoch.ticket();

        let observe = async {
            started.notified().await;
            let snapshot = session.snapshot().await;
            assert_eq!(snapshot.turns.len(), 1);
            assert_eq!(snapshot.turns[0].role, TurnRole::User);
            assert_eq!(gate.phase(session.handle()), TurnPhase::AwaitingAdvisor);
            assert!(gate.is_busy(session.handle()));
            release.notify_one();
        };

        let (outcome, ()) = tokio::join!(
            processor.process("Am I on the right path?", Tone::Mature, &session, &permit, &ticket),
            observe
        );
        assert!(matches!(outcome, TurnOutcome::Resolved(_)));
        assert_eq!(gate.phase(session.handle()), TurnPhase::Resolved);
    }

    #[tokio::test]
    async fn test_superseded_ticket_drops_answer() {
        let processor = processor(
            FakeAdvisor::replying(vec![Ok(advisory("late answer", "calm", "S1"))])
                .with_delay(Duration::from_millis(10)),
        );
        let session = SharedSession::new(Session::new());
        let gate = TurnGate::new();
        let epoch = Epoch::new();
        let permit = gate.try_acquire(session.handle()).unwrap();
        let ticket = epoch.ticket();

        let switch = async {
            tokio::time::sleep(Duration::from_millis(1)).await;
            epoch.advance();
        };
        let (outcome, ()) = tokio::join!(
            processor.process("hello", Tone::Neutral, &session, &permit, &ticket),
            switch
        );

        assert!(matches!(outcome, TurnOutcome::Superseded { .. }));
        let snapshot = session.snapshot().await;
        assert_eq!(snapshot.turns.len(), 1);
        assert!(snapshot.summary.is_empty());
        assert_eq!(gate.phase(session.handle()), TurnPhase::Idle);
    }

    #[tokio::test]
    async fn test_turns_only_grow() {
        let processor = processor(FakeAdvisor::replying(vec![
            Ok(advisory("one", "calm", "S1")),
            Err(AdvisorError::Timeout { after_ms: 1 }),
            Ok(advisory("three", "hopeful", "S3")),
        ]));
        let session = SharedSession::new(Session::new());

        let mut previous: Vec<Turn> = Vec::new();
        for content in ["first", "second", "third"] {
            run(&processor, content, &session).await;
            let current = session.snapshot().await.turns;
            assert!(current.len() > previous.len());
            assert_eq!(&current[..previous.len()], previous.as_slice());
            previous = current;
        }
        assert_eq!(previous.len(), 6);
    }
}
