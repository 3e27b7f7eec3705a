use super::actor::{CalendarActor, CalendarCommand, Reply};
use crate::components::calendar::CalendarDescriptor;
use crate::components::events::{EventDescriptor, EventTarget, FieldMapper};
use crate::components::permission::{
    Grant, PermissionAuthority, PermissionGate, PermissionState, RequestHistory, RequestToken,
    Scope,
};
use crate::components::store::CalendarStore;
use crate::config::Config;
use crate::error::{dispatcher_error, GateResult};
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::info;

/// Handle for interacting with the calendar actor
///
/// Cloning is cheap; all clones talk to the same actor.
#[derive(Clone)]
pub struct CalendarHandle {
    command_tx: mpsc::Sender<CalendarCommand>,
    gate: Arc<PermissionGate>,
    store: Arc<dyn CalendarStore>,
    cancel: CancellationToken,
    _actor_task: Arc<JoinHandle<()>>,
}

impl CalendarHandle {
    /// Create a new CalendarHandle and spawn the actor
    ///
    /// Must be called from within a tokio runtime.
    pub fn new(
        config: &Config,
        store: Arc<dyn CalendarStore>,
        authority: Arc<dyn PermissionAuthority>,
        history: Arc<dyn RequestHistory>,
    ) -> Self {
        let gate = PermissionGate::new(authority, history)
            .with_timeout(config.permission_timeout());
        Self::with_gate(config, store, Arc::new(gate))
    }

    /// Spawn the actor behind an existing permission gate
    pub fn with_gate(config: &Config, store: Arc<dyn CalendarStore>, gate: Arc<PermissionGate>) -> Self {
        Self::with_mapper(config, store, gate, FieldMapper::from_config(config))
    }

    /// Spawn the actor with a custom field mapper
    pub fn with_mapper(
        config: &Config,
        store: Arc<dyn CalendarStore>,
        gate: Arc<PermissionGate>,
        mapper: FieldMapper,
    ) -> Self {
        let (command_tx, command_rx) = mpsc::channel(config.mailbox_capacity.max(1));
        let cancel = CancellationToken::new();

        let actor = CalendarActor::new(Arc::clone(&store), mapper, command_rx, cancel.clone());
        let actor_task = tokio::spawn(actor.run());

        Self {
            command_tx,
            gate,
            store,
            cancel,
            _actor_task: Arc::new(actor_task),
        }
    }

    pub fn gate(&self) -> &Arc<PermissionGate> {
        &self.gate
    }

    /// Current permission state, without prompting
    pub fn check_permission(&self, read_only: bool) -> PermissionState {
        self.gate.check(Scope::from_read_only(read_only))
    }

    /// Prompt for calendar access
    pub async fn request_permission(&self, read_only: bool) -> GateResult<PermissionState> {
        self.gate.request(Scope::from_read_only(read_only)).await
    }

    /// Deliver the host's answer to an outstanding permission request
    pub fn on_request_result(&self, token: RequestToken, grants: &[Grant]) -> bool {
        self.gate.on_request_result(token, grants)
    }

    /// Create a calendar and return its id
    pub async fn save_calendar(&self, descriptor: CalendarDescriptor) -> GateResult<i64> {
        self.call(Scope::ReadWrite, |reply| CalendarCommand::SaveCalendar { descriptor, reply })
            .await
    }

    /// Id of the local calendar owned by `name`
    pub async fn find_calendar_id(&self, name: &str) -> GateResult<Option<i64>> {
        let name = name.to_string();
        self.call(Scope::ReadWrite, |reply| CalendarCommand::FindCalendarId { name, reply })
            .await
    }

    /// Delete a calendar, true when a row was removed
    pub async fn remove_calendar(&self, id: i64) -> GateResult<bool> {
        self.call(Scope::ReadWrite, |reply| CalendarCommand::RemoveCalendar { id, reply })
            .await
    }

    /// Delete every local calendar owned by `name`
    pub async fn remove_calendar_by_name(&self, name: &str) -> GateResult<u64> {
        let name = name.to_string();
        self.call(Scope::ReadWrite, |reply| CalendarCommand::RemoveCalendarByName { name, reply })
            .await
    }

    /// Create an event and return its id
    pub async fn save_event(&self, descriptor: EventDescriptor) -> GateResult<i64> {
        self.call(Scope::ReadWrite, |reply| CalendarCommand::SaveEvent { descriptor, reply })
            .await
    }

    /// Insert all events in a single store call
    pub async fn save_events(&self, descriptors: Vec<EventDescriptor>) -> GateResult<u64> {
        self.call(Scope::ReadWrite, |reply| CalendarCommand::SaveEvents { descriptors, reply })
            .await
    }

    pub async fn update_event(
        &self,
        target: EventTarget,
        descriptor: EventDescriptor,
    ) -> GateResult<u64> {
        self.call(Scope::ReadWrite, |reply| CalendarCommand::UpdateEvent {
            target,
            descriptor,
            reply,
        })
        .await
    }

    pub async fn remove_events(&self, target: EventTarget) -> GateResult<u64> {
        self.call(Scope::ReadWrite, |reply| CalendarCommand::RemoveEvents { target, reply })
            .await
    }

    /// Content location of the store's events table
    pub fn events_uri(&self) -> String {
        self.store.events_uri()
    }

    /// Shutdown the actor; operations still running are abandoned
    pub async fn shutdown(&self) -> GateResult<()> {
        info!("Shutting down calendar dispatcher");
        let _ = self.command_tx.send(CalendarCommand::Shutdown).await;
        self.cancel.cancel();
        Ok(())
    }

    async fn call<T>(
        &self,
        scope: Scope,
        command: impl FnOnce(Reply<T>) -> CalendarCommand,
    ) -> GateResult<T> {
        // Permission is checked before anything is queued
        self.gate.ensure(scope)?;

        let (reply, response) = oneshot::channel();
        self.command_tx
            .send(command(reply))
            .await
            .map_err(|e| dispatcher_error(&format!("Actor mailbox error: {}", e)))?;

        response
            .await
            .map_err(|_| dispatcher_error("Operation was abandoned before it completed"))?
    }
}
