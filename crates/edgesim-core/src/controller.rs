//! Run controller: collect parameters, call the service, keep the outcome.
//!
//! `begin` and `complete` are split so an event-driven UI can release the
//! controller while the request is outstanding. Each `begin` hands out a ticket;
//! `complete` ignores tickets that are no longer current, so a late response
//! from a superseded run never overwrites newer state.

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use crate::api::{ApiClient, Transport};
use crate::error::{EdgesimError, Result};
use crate::models::{ComparisonResult, RunOutcome};
use crate::params::ParamSet;

/// What the user asked to run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    Single(String),
    Comparison(Vec<String>),
}

impl Selection {
    pub fn is_empty(&self) -> bool {
        match self {
            Selection::Single(name) => name.is_empty(),
            Selection::Comparison(names) => names.is_empty(),
        }
    }

    pub fn label(&self) -> String {
        match self {
            Selection::Single(name) => name.clone(),
            Selection::Comparison(names) => names.join(","),
        }
    }
}

#[derive(Debug, Default)]
pub enum RunState {
    #[default]
    Idle,
    Running {
        started_at: DateTime<Utc>,
    },
    Succeeded {
        outcome: RunOutcome,
        duration_secs: f64,
    },
    Failed(EdgesimError),
}

impl RunState {
    pub fn outcome(&self) -> Option<&RunOutcome> {
        match self {
            RunState::Succeeded { outcome, .. } => Some(outcome),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&EdgesimError> {
        match self {
            RunState::Failed(e) => Some(e),
            _ => None,
        }
    }
}

/// Proof that a run was started; pass it back to `complete`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunTicket {
    generation: u64,
    selection: Selection,
    params: ParamSet,
}

impl RunTicket {
    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn params(&self) -> &ParamSet {
        &self.params
    }
}

#[derive(Debug)]
pub struct RunController {
    selection: Selection,
    params: ParamSet,
    state: RunState,
    generation: u64,
}

impl RunController {
    pub fn new(selection: Selection) -> Self {
        Self {
            selection,
            params: ParamSet::new(),
            state: RunState::Idle,
            generation: 0,
        }
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn params(&self) -> &ParamSet {
        &self.params
    }

    pub fn state(&self) -> &RunState {
        &self.state
    }

    /// True while a request is outstanding; the trigger should be disabled.
    pub fn is_busy(&self) -> bool {
        matches!(self.state, RunState::Running { .. })
    }

    pub fn set_params(&mut self, params: ParamSet) {
        self.params = params;
    }

    /// Switch algorithm(s). Any in-flight run is abandoned and the result cleared.
    pub fn select(&mut self, selection: Selection) {
        if selection != self.selection {
            self.selection = selection;
            self.reset();
        }
    }

    /// Drop the current result and invalidate outstanding tickets.
    pub fn reset(&mut self) {
        self.generation += 1;
        self.state = RunState::Idle;
    }

    /// Mark a run as in flight and snapshot what it will send.
    pub fn begin(&mut self) -> Result<RunTicket> {
        if self.is_busy() {
            return Err(EdgesimError::RunInFlight);
        }
        if self.selection.is_empty() {
            return Err(EdgesimError::Config("no algorithm selected".into()));
        }
        self.generation += 1;
        self.state = RunState::Running {
            started_at: Utc::now(),
        };
        info!(
            algorithms = %self.selection.label(),
            params = self.params.len(),
            "run started"
        );
        Ok(RunTicket {
            generation: self.generation,
            selection: self.selection.clone(),
            params: self.params.clone(),
        })
    }

    /// Record the result of the run `ticket` started. Returns false when the
    /// ticket was stale and the result was dropped.
    pub fn complete(&mut self, ticket: &RunTicket, result: Result<RunOutcome>) -> bool {
        if ticket.generation != self.generation {
            warn!(
                algorithms = %ticket.selection.label(),
                "discarding response from a superseded run"
            );
            return false;
        }
        let started_at = match self.state {
            RunState::Running { started_at } => started_at,
            _ => Utc::now(),
        };
        let duration_secs = (Utc::now() - started_at).num_milliseconds() as f64 / 1000.0;
        self.state = match result {
            Ok(outcome) => {
                info!(algorithms = %ticket.selection.label(), duration_secs, "run finished");
                RunState::Succeeded {
                    outcome,
                    duration_secs,
                }
            }
            Err(e) => {
                warn!(algorithms = %ticket.selection.label(), error = %e, "run failed");
                RunState::Failed(e)
            }
        };
        true
    }

    /// Begin, issue exactly one request, complete. Failures end up in `state()`.
    pub async fn run<T: Transport>(&mut self, client: &ApiClient<T>) -> &RunState {
        let ticket = match self.begin() {
            Ok(ticket) => ticket,
            Err(e) => {
                warn!(error = %e, "run not started");
                return &self.state;
            }
        };
        let result = execute(client, &ticket).await;
        self.complete(&ticket, result);
        &self.state
    }
}

/// Perform the network call for `ticket` and build the tagged outcome.
pub async fn execute<T: Transport>(client: &ApiClient<T>, ticket: &RunTicket) -> Result<RunOutcome> {
    match &ticket.selection {
        Selection::Single(name) => {
            let costs = client.run_algorithm(name, &ticket.params).await?;
            Ok(RunOutcome::Single {
                algorithm: name.clone(),
                costs,
            })
        }
        Selection::Comparison(names) => {
            let response = client.get_overview_info(names, &ticket.params).await?;
            Ok(RunOutcome::Comparison(ComparisonResult::reshape(
                names, &response,
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::testing::FakeTransport;
    use crate::config::ClientConfig;
    use crate::models::CostMetric;

    fn client(fake: &FakeTransport) -> ApiClient<&FakeTransport> {
        ApiClient::new(&ClientConfig::default(), fake)
    }

    #[tokio::test]
    async fn test_single_run_success() {
        let fake = FakeTransport::replying(200, r#"{"avg_delay": [3.0, 2.0]}"#);
        let mut controller = RunController::new(Selection::Single("PPO".into()));
        controller.set_params(ParamSet::new().with("time_slots", "2").unwrap());

        let state = controller.run(&client(&fake)).await;
        match state.outcome() {
            Some(RunOutcome::Single { algorithm, costs }) => {
                assert_eq!(algorithm, "PPO");
                assert_eq!(costs.avg_delay, vec![3.0, 2.0]);
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
        assert!(!controller.is_busy());
        assert_eq!(fake.requests.borrow()[0].0, "/run_algorithm/PPO");
    }

    #[tokio::test]
    async fn test_failed_run_clears_busy_and_keeps_error() {
        let fake = FakeTransport::default();
        fake.push_network_error();
        let mut controller = RunController::new(Selection::Single("DQN".into()));

        let state = controller.run(&client(&fake)).await;
        assert!(state.outcome().is_none());
        assert!(state.error().unwrap().is_network());
        assert!(!controller.is_busy());
    }

    #[tokio::test]
    async fn test_comparison_run_reshapes() {
        let fake = FakeTransport::replying(
            200,
            r#"{"X": {"avg_total": [1, 2]}, "Y": {"avg_total": [3, 4]}}"#,
        );
        let mut controller =
            RunController::new(Selection::Comparison(vec!["X".into(), "Y".into()]));
        let state = controller.run(&client(&fake)).await;
        let Some(RunOutcome::Comparison(result)) = state.outcome() else {
            panic!("expected comparison outcome");
        };
        assert_eq!(result.series(CostMetric::Total, "Y"), Some(&[3.0, 4.0][..]));
        let query = &fake.requests.borrow()[0].1;
        assert_eq!(query[0], ("algo_names".to_string(), "X,Y".to_string()));
    }

    #[test]
    fn test_begin_refuses_while_in_flight() {
        let mut controller = RunController::new(Selection::Single("SAC".into()));
        controller.begin().unwrap();
        assert!(controller.is_busy());
        assert!(matches!(controller.begin(), Err(EdgesimError::RunInFlight)));
    }

    #[test]
    fn test_begin_clears_previous_result() {
        let mut controller = RunController::new(Selection::Single("SAC".into()));
        let ticket = controller.begin().unwrap();
        controller.complete(&ticket, Err(EdgesimError::Network("down".into())));
        assert!(controller.state().error().is_some());
        controller.begin().unwrap();
        assert!(controller.state().error().is_none());
        assert!(controller.state().outcome().is_none());
    }

    #[test]
    fn test_stale_ticket_is_discarded_after_selection_change() {
        let mut controller = RunController::new(Selection::Single("PPO".into()));
        let stale = controller.begin().unwrap();
        controller.select(Selection::Single("TRPO".into()));
        assert!(!controller.is_busy());

        let applied = controller.complete(
            &stale,
            Ok(RunOutcome::Single {
                algorithm: "PPO".into(),
                costs: Default::default(),
            }),
        );
        assert!(!applied);
        assert!(controller.state().outcome().is_none());
    }

    #[test]
    fn test_empty_selection_does_not_start() {
        let mut controller = RunController::new(Selection::Comparison(vec![]));
        assert!(controller.begin().is_err());
        assert!(!controller.is_busy());
    }

    #[test]
    fn test_ticket_snapshots_params() {
        let mut controller = RunController::new(Selection::Single("A2C".into()));
        controller.set_params(ParamSet::new().with("random_seed", "7").unwrap());
        let ticket = controller.begin().unwrap();
        controller.set_params(ParamSet::new().with("random_seed", "8").unwrap());
        assert_eq!(ticket.params().get("random_seed"), Some("7"));
        assert_eq!(ticket.selection(), &Selection::Single("A2C".into()));
    }
}
