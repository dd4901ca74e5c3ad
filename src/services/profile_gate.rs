//! Profile-gate coordinator
//!
//! Once per browsing session, checks whether the signed-in student has an
//! extended profile and routes them to profile completion if not. The check is
//! single-flight per student number: concurrent page mounts wait for the first
//! check and then observe its marker instead of calling the backend again.

use std::collections::HashMap;
use std::sync::{Arc, Mutex as StdMutex};
use tokio::sync::Mutex;
use tracing::{debug, warn};
use crate::services::navigation::Navigator;
use crate::services::profile::ProfileService;
use crate::state::SessionManager;
use crate::utils::logging::log_gate_decision;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileStatus {
    Complete,
    Incomplete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateState {
    NotChecked,
    Checking,
    Resolved(ProfileStatus),
}

/// What a single mount-time invocation did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateOutcome {
    /// Not a student session, or the gate is disabled; no network call
    NotApplicable,
    /// The marker was already set for this student; no network call
    AlreadyChecked,
    /// This invocation performed the check
    Resolved(ProfileStatus),
    /// The session changed while the lookup was in flight; result dropped
    Discarded,
}

impl GateOutcome {
    pub fn redirected(&self) -> bool {
        matches!(self, GateOutcome::Resolved(ProfileStatus::Incomplete))
    }
}

pub struct ProfileGate {
    session: Arc<SessionManager>,
    profiles: ProfileService,
    navigator: Option<Arc<dyn Navigator>>,
    completion_path: String,
    enabled: bool,
    /// Per-student state, valid for the session epoch it was recorded under
    states: StdMutex<(u64, HashMap<String, GateState>)>,
    inflight: Mutex<(u64, HashMap<String, Arc<Mutex<()>>>)>,
}

impl ProfileGate {
    pub fn new(
        session: Arc<SessionManager>,
        profiles: ProfileService,
        navigator: Option<Arc<dyn Navigator>>,
        completion_path: impl Into<String>,
        enabled: bool,
    ) -> Self {
        Self {
            session,
            profiles,
            navigator,
            completion_path: completion_path.into(),
            enabled,
            states: StdMutex::new((0, HashMap::new())),
            inflight: Mutex::new((0, HashMap::new())),
        }
    }

    /// Current state for `student_number`
    /// Current state for `student_number` in the current session
    pub fn state(&self, student_number: &str) -> GateState {
        let epoch = self.session.epoch();
        let states = self.states.lock().unwrap_or_else(|e| e.into_inner());
        if states.0 != epoch {
            return GateState::NotChecked;
        }
        states.1.get(student_number).copied().unwrap_or(GateState::NotChecked)
    }

    /// Record `state` for the session at `epoch`
    ///
    /// A newer epoch drops everything recorded for earlier sessions; writes for
    /// an older epoch are ignored.
    fn set_state(&self, epoch: u64, student_number: &str, state: GateState) {
        let mut states = self.states.lock().unwrap_or_else(|e| e.into_inner());
        if epoch < states.0 {
            return;
        }
        if epoch > states.0 {
            *states = (epoch, HashMap::new());
        }
        states.1.insert(student_number.to_string(), state);
    }

    /// Record that the student's profile is now known to exist
    pub fn mark_complete(&self, student_number: &str) {
        self.set_state(
            self.session.epoch(),
            student_number,
            GateState::Resolved(ProfileStatus::Complete),
        );
    }

    async fn flight_lock(&self, epoch: u64, student_number: &str) -> Arc<Mutex<()>> {
        let mut table = self.inflight.lock().await;
        if epoch > table.0 {
            *table = (epoch, HashMap::new());
        }
        table
            .1
            .entry(student_number.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    /// Run the gate for a protected-page mount
    pub async fn on_protected_mount(&self) -> GateOutcome {
        if !self.enabled {
            return GateOutcome::NotApplicable;
        }

        let snapshot = self.session.snapshot();
        let Some(student_number) = snapshot
            .session
            .as_ref()
            .and_then(|s| s.user.student_number())
            .map(str::to_string)
        else {
            return GateOutcome::NotApplicable;
        };

        let lock = self.flight_lock(snapshot.epoch, &student_number).await;
        let _flight = lock.lock().await;

        match self.session.store().profile_checked_for().await {
            Ok(Some(checked)) if checked == student_number => {
                debug!(student_number = %student_number, "Profile already checked this session");
                return GateOutcome::AlreadyChecked;
            }
            Ok(_) => {}
            Err(e) => warn!(error = %e, "Could not read profile-check marker"),
        }

        if !self.session.is_current(snapshot.epoch) {
            return GateOutcome::Discarded;
        }

        self.set_state(snapshot.epoch, &student_number, GateState::Checking);

        let status = match self.profiles.exists(&student_number).await {
            Ok(true) => ProfileStatus::Complete,
            Ok(false) => ProfileStatus::Incomplete,
            Err(e) => {
                warn!(student_number = %student_number, error = %e, "Profile lookup failed, letting the user through");
                ProfileStatus::Complete
            }
        };

        if !self.session.is_current(snapshot.epoch) {
            debug!(student_number = %student_number, "Session changed during profile lookup, dropping result");
            self.set_state(snapshot.epoch, &student_number, GateState::NotChecked);
            return GateOutcome::Discarded;
        }

        if let Err(e) = self.session.store().mark_profile_checked(&student_number).await {
            warn!(error = %e, "Could not persist profile-check marker");
        }
        self.set_state(snapshot.epoch, &student_number, GateState::Resolved(status));

        match status {
            ProfileStatus::Incomplete => {
                log_gate_decision(&student_number, "incomplete");
                if let Some(navigator) = &self.navigator {
                    navigator.navigate(&self.completion_path);
                }
            }
            ProfileStatus::Complete => log_gate_decision(&student_number, "complete"),
        }

        GateOutcome::Resolved(status)
    }
}
