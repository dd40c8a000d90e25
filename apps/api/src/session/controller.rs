use std::sync::Arc;

use tokio::sync::watch;
use tracing::{debug, error, info};
use uuid::Uuid;

use crate::analysis::Analyzer;
use crate::models::analysis::ResumeData;
use crate::session::machine::{transition, Event, SessionSnapshot, Transition, TransitionError};

/// Owns one session. The current snapshot lives in a watch channel and is
/// replaced whole on every transition; readers never see a half-applied state.
pub struct SessionController {
    id: Uuid,
    state: watch::Sender<Arc<SessionSnapshot>>,
    analyzer: Arc<Analyzer>,
}

impl SessionController {
    pub fn new(id: Uuid, analyzer: Arc<Analyzer>) -> Arc<Self> {
        let (state, _) = watch::channel(Arc::new(SessionSnapshot::default()));
        Arc::new(Self {
            id,
            state,
            analyzer,
        })
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn snapshot(&self) -> Arc<SessionSnapshot> {
        self.state.borrow().clone()
    }

    /// Receives every snapshot published after this call.
    pub fn subscribe(&self) -> watch::Receiver<Arc<SessionSnapshot>> {
        self.state.subscribe()
    }

    /// Applies `event` atomically and returns the snapshot now current.
    /// On error the snapshot is left untouched.
    pub fn dispatch(&self, event: Event) -> Result<Arc<SessionSnapshot>, TransitionError> {
        let event_name = event.name();
        let mut outcome: Result<Option<Arc<SessionSnapshot>>, TransitionError> = Ok(None);

        self.state
            .send_if_modified(|current| match transition(&**current, event) {
                Ok(Transition::Moved(next)) => {
                    debug!(
                        "session {}: {} -> {} on {}",
                        self.id, current.phase, next.phase, event_name
                    );
                    let next = Arc::new(next);
                    *current = Arc::clone(&next);
                    outcome = Ok(Some(next));
                    true
                }
                Ok(Transition::Stale) => {
                    debug!("session {}: discarding stale {}", self.id, event_name);
                    false
                }
                Err(e) => {
                    outcome = Err(e);
                    false
                }
            });

        outcome.map(|moved| moved.unwrap_or_else(|| self.snapshot()))
    }

    pub fn start(&self) -> Result<Arc<SessionSnapshot>, TransitionError> {
        self.dispatch(Event::Start)
    }

    pub fn reset(&self) -> Result<Arc<SessionSnapshot>, TransitionError> {
        self.dispatch(Event::Reset)
    }

    pub fn retry(&self) -> Result<Arc<SessionSnapshot>, TransitionError> {
        self.dispatch(Event::Retry)
    }

    /// Moves to Analyzing and starts the analysis in the background. The
    /// returned snapshot is the Analyzing one; watch `subscribe()` for the outcome.
    pub fn submit(
        self: &Arc<Self>,
        data: ResumeData,
    ) -> Result<Arc<SessionSnapshot>, TransitionError> {
        let snapshot = self.dispatch(Event::Submit(data.clone()))?;
        let ticket = snapshot.generation;
        info!(
            "session {}: analysis #{} started for role {:?}",
            self.id, ticket, data.target_role
        );

        let controller = Arc::clone(self);
        tokio::spawn(async move { controller.run_analysis(ticket, data).await });

        Ok(snapshot)
    }

    async fn run_analysis(&self, ticket: u64, data: ResumeData) {
        let analyzer = Arc::clone(&self.analyzer);
        // Separate task so a panic inside the analysis still produces a rejection
        let task =
            tokio::spawn(async move { analyzer.analyze(&data.text, &data.target_role).await });

        let event = match task.await {
            Ok(Ok(result)) => Event::AnalysisResolved {
                ticket,
                result: Arc::new(result),
            },
            Ok(Err(e)) => {
                error!("session {}: analysis #{} failed: {e}", self.id, ticket);
                Event::AnalysisRejected { ticket }
            }
            Err(e) => {
                error!("session {}: analysis #{} aborted: {e}", self.id, ticket);
                Event::AnalysisRejected { ticket }
            }
        };

        if let Err(e) = self.dispatch(event) {
            error!("session {}: could not apply analysis #{}: {e}", self.id, ticket);
        }
    }
}
