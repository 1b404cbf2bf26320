//! OnboardingFlow — owns the wizard form and state, applies user edits,
//! gates navigation on validation, and writes the finished record.

use std::sync::{Arc, Mutex};

use serde::Serialize;
use tokio::sync::{RwLock, broadcast};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::config::OnboardingConfig;
use crate::error::FieldError;
use crate::identity::IdentityProvider;
use crate::store::{DocumentStore, LibSqlDocumentStore};

use super::model::{EducationField, EducationItem, FormField, OnboardingForm, Role};
use super::state::{FlowState, OnboardingStep, SubmissionState};
use super::validation::{ValidationErrors, first_invalid_step, validate_step};

/// Submission error when no user is signed in.
pub const NOT_LOGGED_IN: &str = "User is not logged in";

/// Submission error when the store fails without a message.
pub const UNKNOWN_ERROR: &str = "An unknown error occurred.";

/// What a call to [`OnboardingFlow::submit`] did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Required fields are blank; nothing was sent. The errors are also
    /// recorded in `validation_errors`.
    Blocked(ValidationErrors),
    /// Another submission is still loading; this call did nothing.
    InProgress,
    /// A write was attempted and ended in `Success` or `Error`.
    Finished(SubmissionState),
}

impl SubmitOutcome {
    /// Terminal submission state, if a write was attempted.
    pub fn state(&self) -> Option<&SubmissionState> {
        match self {
            Self::Finished(state) => Some(state),
            _ => None,
        }
    }
}

/// Immutable view of the flow, published after every mutation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlowSnapshot {
    pub form: OnboardingForm,
    pub state: FlowState,
}

#[derive(Debug, Default)]
struct Session {
    form: OnboardingForm,
    state: FlowState,
}

impl Session {
    fn snapshot(&self) -> FlowSnapshot {
        FlowSnapshot {
            form: self.form.clone(),
            state: self.state.clone(),
        }
    }
}

struct FlowInner {
    identity: Arc<dyn IdentityProvider>,
    store: Arc<dyn DocumentStore>,
    config: OnboardingConfig,
    session: RwLock<Session>,
    tx: broadcast::Sender<FlowSnapshot>,
}

impl FlowInner {
    /// Broadcast the current session. Called with the write lock held so
    /// subscribers observe mutations in order.
    fn publish(&self, session: &Session) {
        // No receivers is fine.
        let _ = self.tx.send(session.snapshot());
    }

    async fn submit(&self) -> SubmitOutcome {
        let document = {
            let mut session = self.session.write().await;

            if session.state.submission.is_loading() {
                warn!("Submit ignored: a submission is already in flight");
                return SubmitOutcome::InProgress;
            }

            let errors = self.submit_errors(&mut session);
            if !errors.is_empty() {
                warn!(
                    step = session.state.current_step.number(),
                    errors = ?errors,
                    "Submit blocked by validation"
                );
                session.state.validation_errors = errors.clone();
                self.publish(&session);
                return SubmitOutcome::Blocked(errors);
            }

            session.state.validation_errors.clear();
            session.state.submission = SubmissionState::Loading;
            self.publish(&session);
            session.form.clone()
        };

        let outcome = self.write_record(&document).await;

        let mut session = self.session.write().await;
        session.state.submission = outcome.clone();
        self.publish(&session);
        SubmitOutcome::Finished(outcome)
    }

    /// Errors that block submission. With `validate_all_steps_on_submit`
    /// the wizard also jumps to the first failing step.
    fn submit_errors(&self, session: &mut Session) -> ValidationErrors {
        if !self.config.validate_all_steps_on_submit {
            return validate_step(session.state.current_step, &session.form);
        }
        match first_invalid_step(&session.form) {
            Some((step, errors)) => {
                session.state.current_step = step;
                errors
            }
            None => ValidationErrors::new(),
        }
    }

    async fn write_record(&self, form: &OnboardingForm) -> SubmissionState {
        let Some(user_id) = self.identity.current_user_id().await else {
            warn!("Submit failed: no authenticated user");
            return SubmissionState::Error(NOT_LOGGED_IN.to_string());
        };

        let document = match serde_json::to_value(form) {
            Ok(v) => v,
            Err(e) => {
                warn!(user_id = %user_id, "Failed to serialize onboarding form: {}", e);
                return SubmissionState::Error(e.to_string());
            }
        };

        match self
            .store
            .set(&self.config.collection, &user_id, document)
            .await
        {
            Ok(()) => {
                info!(
                    user_id = %user_id,
                    collection = %self.config.collection,
                    "Onboarding record written"
                );
                SubmissionState::Success
            }
            Err(e) => {
                let message = e.to_string();
                warn!(user_id = %user_id, "Onboarding record write failed: {}", message);
                if message.trim().is_empty() {
                    SubmissionState::Error(UNKNOWN_ERROR.to_string())
                } else {
                    SubmissionState::Error(message)
                }
            }
        }
    }
}

/// Controller for one run of the onboarding wizard.
///
/// All edits are serialized through an internal lock. Every mutation
/// publishes a [`FlowSnapshot`] to subscribers. Dropping the flow aborts a
/// submission started with [`spawn_submit`](Self::spawn_submit).
pub struct OnboardingFlow {
    inner: Arc<FlowInner>,
    submit_task: Mutex<Option<JoinHandle<SubmitOutcome>>>,
}

impl OnboardingFlow {
    pub fn new(
        identity: Arc<dyn IdentityProvider>,
        store: Arc<dyn DocumentStore>,
        config: OnboardingConfig,
    ) -> Self {
        let (tx, _rx) = broadcast::channel(config.snapshot_capacity.max(1));
        Self {
            inner: Arc::new(FlowInner {
                identity,
                store,
                config,
                session: RwLock::new(Session::default()),
                tx,
            }),
            submit_task: Mutex::new(None),
        }
    }

    /// Build a flow on the libSQL database at `config.db_path`, creating the
    /// file and its directory if needed.
    pub async fn open_local(
        identity: Arc<dyn IdentityProvider>,
        config: OnboardingConfig,
    ) -> crate::error::Result<Self> {
        let store = LibSqlDocumentStore::new_local(&config.db_path).await?;
        Ok(Self::new(identity, Arc::new(store), config))
    }

    /// Subscribe to snapshots published after each mutation.
    pub fn subscribe(&self) -> broadcast::Receiver<FlowSnapshot> {
        self.inner.tx.subscribe()
    }

    pub async fn snapshot(&self) -> FlowSnapshot {
        self.inner.session.read().await.snapshot()
    }

    pub async fn form(&self) -> OnboardingForm {
        self.inner.session.read().await.form.clone()
    }

    pub async fn state(&self) -> FlowState {
        self.inner.session.read().await.state.clone()
    }

    pub async fn current_step(&self) -> OnboardingStep {
        self.inner.session.read().await.state.current_step
    }

    pub async fn submission(&self) -> SubmissionState {
        self.inner.session.read().await.state.submission.clone()
    }

    // ── Field edits ─────────────────────────────────────────────────

    /// Overwrite a scalar field and drop its validation error, if any.
    ///
    /// While the permanent address is marked same-as-current, edits to the
    /// current address are mirrored into it and direct edits to the
    /// permanent address are ignored.
    pub async fn update_field(&self, field: FormField, value: impl Into<String>) {
        let value = value.into();
        let mut session = self.inner.session.write().await;

        if session.form.is_permanent_address_same_as_current {
            match field {
                FormField::CurrentAddress => session.form.permanent_address = value.clone(),
                FormField::PermanentAddress => {
                    debug!("Permanent address follows current address; edit ignored");
                    return;
                }
                _ => {}
            }
        }
        *session.form.field_mut(field) = value;
        session.state.clear_error(field.key());

        debug!(field = %field, "Form field updated");
        self.inner.publish(&session);
    }

    /// [`update_field`](Self::update_field) addressed by camelCase identifier.
    pub async fn update_field_by_name(
        &self,
        name: &str,
        value: impl Into<String>,
    ) -> Result<(), FieldError> {
        let field: FormField = name.parse()?;
        self.update_field(field, value).await;
        Ok(())
    }

    pub async fn set_role(&self, role: Role) {
        let mut session = self.inner.session.write().await;
        session.form.role = role;
        self.inner.publish(&session);
    }

    /// Mark the permanent address as same-as-current (copying it) or not
    /// (clearing it). Overwrites whatever was typed before.
    pub async fn toggle_same_as_current(&self, is_same: bool) {
        let mut session = self.inner.session.write().await;
        session.form.is_permanent_address_same_as_current = is_same;
        session.form.permanent_address = if is_same {
            session.form.current_address.clone()
        } else {
            String::new()
        };
        session.state.clear_error(FormField::PermanentAddress.key());
        self.inner.publish(&session);
    }

    // ── Educational history ─────────────────────────────────────────

    /// Append a blank education item and return it.
    pub async fn add_education_item(&self) -> EducationItem {
        let item = EducationItem::new();
        let mut session = self.inner.session.write().await;
        session.form.educational_history.push(item.clone());
        debug!(item_id = %item.id, "Education item added");
        self.inner.publish(&session);
        item
    }

    /// Replace the item with the same id. Returns false if none matched.
    pub async fn update_education_item(&self, item: EducationItem) -> bool {
        let mut guard = self.inner.session.write().await;
        let session = &mut *guard;
        let Some(slot) = session
            .form
            .educational_history
            .iter_mut()
            .find(|existing| existing.id == item.id)
        else {
            debug!(item_id = %item.id, "Education item not found; update ignored");
            return false;
        };

        for field in EducationField::REQUIRED {
            if item.field(field) != slot.field(field) {
                session
                    .state
                    .validation_errors
                    .remove(&field.error_key(&item.id));
            }
        }
        *slot = item;
        self.inner.publish(session);
        true
    }

    /// Set one field of an education item by id.
    pub async fn update_education_field(
        &self,
        item_id: &str,
        field: EducationField,
        value: impl Into<String>,
    ) -> Result<(), FieldError> {
        let current = self
            .inner
            .session
            .read()
            .await
            .form
            .education_item(item_id)
            .cloned()
            .ok_or_else(|| FieldError::EducationItemNotFound(item_id.to_string()))?;
        if !self.update_education_item(current.with(field, value)).await {
            // Removed between the read and the write.
            return Err(FieldError::EducationItemNotFound(item_id.to_string()));
        }
        Ok(())
    }

    /// Remove the item with the same id, unless it is the only one left.
    /// Returns whether an item was removed.
    pub async fn remove_education_item(&self, item: &EducationItem) -> bool {
        let mut session = self.inner.session.write().await;
        let history = &mut session.form.educational_history;
        if history.len() <= 1 {
            debug!("Refusing to remove the last education item");
            return false;
        }

        let before = history.len();
        history.retain(|existing| existing.id != item.id);
        if history.len() == before {
            return false;
        }

        let id = item.id.clone();
        session
            .state
            .validation_errors
            .retain(|key| !EducationField::REQUIRED.iter().any(|f| *key == f.error_key(&id)));
        self.inner.publish(&session);
        true
    }

    // ── Navigation ──────────────────────────────────────────────────

    /// Move forward one step without validating; stops at the last step.
    pub async fn next_step(&self) -> OnboardingStep {
        let mut session = self.inner.session.write().await;
        if session.state.next_step() {
            self.inner.publish(&session);
        }
        session.state.current_step
    }

    /// Move back one step; stops at the first step.
    pub async fn previous_step(&self) -> OnboardingStep {
        let mut session = self.inner.session.write().await;
        if session.state.previous_step() {
            self.inner.publish(&session);
        }
        session.state.current_step
    }

    /// Failing field identifiers for `step` against the current form.
    pub async fn validate_step(&self, step: OnboardingStep) -> ValidationErrors {
        validate_step(step, &self.inner.session.read().await.form)
    }

    /// Validate the current step and move on if it passes. On failure the
    /// errors are recorded and the step is unchanged. Returns whether the
    /// step passed.
    pub async fn advance(&self) -> bool {
        let mut session = self.inner.session.write().await;
        let step = session.state.current_step;
        let errors = validate_step(step, &session.form);

        if !errors.is_empty() {
            debug!(step = step.number(), errors = ?errors, "Step validation failed");
            session.state.validation_errors = errors;
            self.inner.publish(&session);
            return false;
        }

        session.state.next_step();
        session.state.validation_errors.clear();
        info!(
            from = step.number(),
            to = session.state.current_step.number(),
            "Onboarding step completed"
        );
        self.inner.publish(&session);
        true
    }

    // ── Submission ──────────────────────────────────────────────────

    /// Validate and write the record.
    ///
    /// Passes through Loading to Success or Error. If validation fails the
    /// errors are recorded, the submission state is left as it was, and
    /// [`SubmitOutcome::Blocked`] is returned. A call made while another
    /// submission is loading does nothing.
    pub async fn submit(&self) -> SubmitOutcome {
        self.inner.submit().await
    }

    /// Run [`submit`](Self::submit) as a background task owned by the flow.
    ///
    /// Returns false if a previously spawned submission is still running.
    /// Must be called from within a tokio runtime.
    pub fn spawn_submit(&self) -> bool {
        let mut slot = match self.submit_task.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        if slot.as_ref().is_some_and(|handle| !handle.is_finished()) {
            return false;
        }

        let inner = Arc::clone(&self.inner);
        *slot = Some(tokio::spawn(async move { inner.submit().await }));
        true
    }

    /// Wait for the task started by [`spawn_submit`](Self::spawn_submit).
    /// Returns `None` if there is none or it was aborted.
    pub async fn wait_for_submission(&self) -> Option<SubmitOutcome> {
        let handle = match self.submit_task.lock() {
            Ok(mut guard) => guard.take(),
            Err(poisoned) => poisoned.into_inner().take(),
        }?;
        handle.await.ok()
    }

    /// Return to Idle after Success or Error. No effect while Loading.
    pub async fn reset_submission(&self) {
        let mut session = self.inner.session.write().await;
        if session.state.submission.is_terminal() {
            session.state.submission = SubmissionState::Idle;
            self.inner.publish(&session);
        } else if session.state.submission.is_loading() {
            debug!("Reset ignored while submission is loading");
        }
    }
}

impl Drop for OnboardingFlow {
    fn drop(&mut self) {
        let handle = match self.submit_task.get_mut() {
            Ok(slot) => slot.take(),
            Err(poisoned) => poisoned.into_inner().take(),
        };
        if let Some(handle) = handle {
            handle.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::StaticIdentity;
    use crate::store::MemoryDocumentStore;

    fn flow_with(config: OnboardingConfig) -> (OnboardingFlow, Arc<MemoryDocumentStore>) {
        let store = Arc::new(MemoryDocumentStore::new());
        let flow = OnboardingFlow::new(
            Arc::new(StaticIdentity::signed_in("uid-1")),
            store.clone(),
            config,
        );
        (flow, store)
    }

    fn flow() -> OnboardingFlow {
        flow_with(OnboardingConfig::default()).0
    }

    #[tokio::test]
    async fn update_field_clears_only_that_error() {
        let flow = flow();
        assert!(!flow.advance().await);
        assert_eq!(flow.state().await.validation_errors.len(), 3);

        flow.update_field(FormField::FullName, "Asha").await;
        let state = flow.state().await;
        assert!(!state.validation_errors.contains("fullName"));
        assert!(state.validation_errors.contains("gender"));
        assert_eq!(flow.form().await.full_name, "Asha");
    }

    #[tokio::test]
    async fn update_field_by_name_rejects_unknown() {
        let flow = flow();
        flow.update_field_by_name("designation", "Engineer").await.unwrap();
        assert_eq!(flow.form().await.designation, "Engineer");
        assert!(matches!(
            flow.update_field_by_name("salary", "1").await,
            Err(FieldError::Unknown(name)) if name == "salary"
        ));
    }

    #[tokio::test]
    async fn toggle_overwrites_permanent_address() {
        let flow = flow();
        flow.update_field(FormField::CurrentAddress, "12 MG Road").await;
        flow.update_field(FormField::PermanentAddress, "4 Lake View").await;

        flow.toggle_same_as_current(true).await;
        let form = flow.form().await;
        assert!(form.is_permanent_address_same_as_current);
        assert_eq!(form.permanent_address, "12 MG Road");

        flow.toggle_same_as_current(true).await;
        assert_eq!(flow.form().await.permanent_address, "12 MG Road");

        flow.toggle_same_as_current(false).await;
        let form = flow.form().await;
        assert!(!form.is_permanent_address_same_as_current);
        assert_eq!(form.permanent_address, "");

        flow.toggle_same_as_current(false).await;
        assert_eq!(flow.form().await.permanent_address, "");
    }

    #[tokio::test]
    async fn current_address_edits_mirror_while_same() {
        let flow = flow();
        flow.toggle_same_as_current(true).await;
        flow.update_field(FormField::CurrentAddress, "7 Park St").await;
        assert_eq!(flow.form().await.permanent_address, "7 Park St");
    }

    #[tokio::test]
    async fn education_items_add_update_remove() {
        let flow = flow();
        let first = flow.form().await.educational_history[0].clone();

        assert!(!flow.remove_education_item(&first).await);
        assert_eq!(flow.form().await.educational_history.len(), 1);

        let second = flow.add_education_item().await;
        assert_ne!(second.id, first.id);
        assert_eq!(flow.form().await.educational_history.len(), 2);

        let edited = second.clone().with(EducationField::Degree, "MBA");
        assert!(flow.update_education_item(edited).await);
        assert_eq!(flow.form().await.educational_history[1].degree, "MBA");

        assert!(!flow.update_education_item(EducationItem::new()).await);

        assert!(flow.remove_education_item(&first).await);
        let history = flow.form().await.educational_history;
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].id, second.id);
        assert!(!flow.remove_education_item(&history[0]).await);
    }

    #[tokio::test]
    async fn removing_unknown_item_is_noop() {
        let flow = flow();
        flow.add_education_item().await;
        assert!(!flow.remove_education_item(&EducationItem::new()).await);
        assert_eq!(flow.form().await.educational_history.len(), 2);
    }

    #[tokio::test]
    async fn education_edits_clear_item_errors() {
        let flow = flow();
        let item_id = flow.form().await.educational_history[0].id.clone();
        for _ in 0..3 {
            flow.next_step().await;
        }
        assert!(!flow.advance().await);
        assert!(flow.state().await.validation_errors.contains(&format!("degree_{item_id}")));

        flow.update_education_field(&item_id, EducationField::Degree, "BSc")
            .await
            .unwrap();
        let errors = flow.state().await.validation_errors;
        assert!(!errors.contains(&format!("degree_{item_id}")));
        assert!(errors.contains(&format!("year_{item_id}")));

        assert!(matches!(
            flow.update_education_field("missing", EducationField::Year, "2001").await,
            Err(FieldError::EducationItemNotFound(_))
        ));
    }

    #[tokio::test]
    async fn navigation_is_clamped() {
        let flow = flow();
        assert_eq!(flow.previous_step().await.number(), 1);
        for _ in 0..10 {
            flow.next_step().await;
        }
        assert_eq!(flow.current_step().await.number(), 5);
        assert_eq!(flow.previous_step().await.number(), 4);
    }

    #[tokio::test]
    async fn advance_moves_when_step_is_valid() {
        let flow = flow();
        flow.update_field(FormField::FullName, "Asha Rao").await;
        flow.update_field(FormField::DateOfBirth, "01/01/1990").await;
        flow.update_field(FormField::Gender, "Female").await;

        assert!(flow.advance().await);
        let state = flow.state().await;
        assert_eq!(state.current_step, OnboardingStep::Contact);
        assert!(state.validation_errors.is_empty());

        // Contact step is empty, so it blocks.
        assert!(!flow.advance().await);
        assert_eq!(flow.current_step().await, OnboardingStep::Contact);
    }

    #[tokio::test]
    async fn reset_from_idle_publishes_nothing() {
        let flow = flow();
        let mut rx = flow.subscribe();
        flow.reset_submission().await;
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn every_mutation_publishes_a_snapshot() {
        let flow = flow();
        let mut rx = flow.subscribe();

        flow.update_field(FormField::Gender, "Other").await;
        flow.next_step().await;

        let first = rx.recv().await.unwrap();
        assert_eq!(first.form.gender, "Other");
        assert_eq!(first.state.current_step, OnboardingStep::Personal);

        let second = rx.recv().await.unwrap();
        assert_eq!(second.state.current_step, OnboardingStep::Contact);
        assert_eq!(second, flow.snapshot().await);
    }

    #[tokio::test]
    async fn submit_writes_record_under_user_id() {
        let (flow, store) = flow_with(OnboardingConfig::default());
        for _ in 0..4 {
            flow.next_step().await;
        }
        flow.update_field(FormField::EmergencyContactName, "Ravi").await;
        flow.update_field(FormField::EmergencyContactNumber, "9123456780").await;

        assert_eq!(
            flow.submit().await,
            SubmitOutcome::Finished(SubmissionState::Success)
        );
        let doc = store.get("employees", "uid-1").await.unwrap().unwrap();
        assert_eq!(doc["emergencyContactName"], "Ravi");
        assert_eq!(doc["role"], "EMPLOYEE");
    }

    #[tokio::test]
    async fn validate_all_on_submit_jumps_to_first_failing_step() {
        let config = OnboardingConfig {
            validate_all_steps_on_submit: true,
            ..Default::default()
        };
        let (flow, store) = flow_with(config);
        for _ in 0..4 {
            flow.next_step().await;
        }
        flow.update_field(FormField::EmergencyContactName, "Ravi").await;
        flow.update_field(FormField::EmergencyContactNumber, "9123456780").await;

        let SubmitOutcome::Blocked(errors) = flow.submit().await else {
            panic!("submit should be blocked by validation");
        };
        assert!(errors.contains("fullName"));
        let state = flow.state().await;
        assert_eq!(state.submission, SubmissionState::Idle);
        assert_eq!(state.current_step, OnboardingStep::Personal);
        assert!(state.validation_errors.contains("fullName"));
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn spawned_submission_can_be_awaited() {
        let (flow, store) = flow_with(OnboardingConfig::default());
        flow.next_step().await;
        flow.next_step().await;

        assert!(flow.spawn_submit());
        assert_eq!(
            flow.wait_for_submission().await,
            Some(SubmitOutcome::Finished(SubmissionState::Success))
        );
        assert_eq!(store.len().await, 1);
        assert_eq!(flow.wait_for_submission().await, None);
    }

    #[tokio::test]
    async fn permanent_address_edits_ignored_while_same() {
        let flow = flow();
        flow.update_field(FormField::CurrentAddress, "12 MG Road").await;
        flow.toggle_same_as_current(true).await;
        let mut rx = flow.subscribe();

        flow.update_field(FormField::PermanentAddress, "4 Lake View").await;
        let form = flow.form().await;
        assert_eq!(form.permanent_address, "12 MG Road");
        assert!(rx.try_recv().is_err());

        flow.toggle_same_as_current(false).await;
        flow.update_field(FormField::PermanentAddress, "4 Lake View").await;
        assert_eq!(flow.form().await.permanent_address, "4 Lake View");
    }

    #[tokio::test]
    async fn blocked_submit_after_failed_write_is_reported_as_blocked() {
        let flow = OnboardingFlow::new(
            Arc::new(StaticIdentity::signed_out()),
            Arc::new(MemoryDocumentStore::new()),
            OnboardingConfig::default(),
        );
        flow.next_step().await;
        flow.next_step().await;
        assert_eq!(
            flow.submit().await,
            SubmitOutcome::Finished(SubmissionState::Error(NOT_LOGGED_IN.to_string()))
        );

        flow.next_step().await;
        let item_id = flow.form().await.educational_history[0].id.clone();
        let outcome = flow.submit().await;
        let SubmitOutcome::Blocked(errors) = &outcome else {
            panic!("expected a validation block, got {outcome:?}");
        };
        assert!(errors.contains(&format!("degree_{item_id}")));
        assert!(outcome.state().is_none());
        // The earlier failure is still what the submission state shows.
        assert_eq!(
            flow.submission().await,
            SubmissionState::Error(NOT_LOGGED_IN.to_string())
        );
    }

    #[tokio::test]
    async fn open_local_writes_to_the_configured_database() {
        let dir = tempfile::tempdir().unwrap();
        let config = OnboardingConfig {
            db_path: dir.path().join("data").join("hrms.db"),
            ..OnboardingConfig::default()
        };
        let flow = OnboardingFlow::open_local(
            Arc::new(StaticIdentity::signed_in("uid-7")),
            config.clone(),
        )
        .await
        .unwrap();
        for _ in 0..2 {
            flow.next_step().await;
        }
        assert_eq!(
            flow.submit().await,
            SubmitOutcome::Finished(SubmissionState::Success)
        );
        drop(flow);

        let store = LibSqlDocumentStore::new_local(&config.db_path).await.unwrap();
        let doc = store.get("employees", "uid-7").await.unwrap().unwrap();
        assert_eq!(doc["role"], "EMPLOYEE");
    }

    #[tokio::test]
    async fn open_local_reports_unusable_path_as_store_error() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("not-a-dir");
        std::fs::write(&blocker, b"").unwrap();
        let config = OnboardingConfig {
            db_path: blocker.join("hrms.db"),
            ..OnboardingConfig::default()
        };

        let result =
            OnboardingFlow::open_local(Arc::new(StaticIdentity::signed_out()), config).await;
        assert!(matches!(result, Err(crate::error::Error::Store(_))));
    }
}
