use crate::components::calendar::{calendar_attributes, CalendarDescriptor};
use crate::components::events::{EventDescriptor, EventTarget, FieldMapper};
use crate::components::store::CalendarStore;
use crate::error::GateResult;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

/// Single-use reply channel for one operation
pub type Reply<T> = oneshot::Sender<GateResult<T>>;

/// Commands that can be sent to the calendar actor
pub enum CalendarCommand {
    SaveCalendar {
        descriptor: CalendarDescriptor,
        reply: Reply<i64>,
    },
    FindCalendarId {
        name: String,
        reply: Reply<Option<i64>>,
    },
    RemoveCalendar {
        id: i64,
        reply: Reply<bool>,
    },
    RemoveCalendarByName {
        name: String,
        reply: Reply<u64>,
    },
    SaveEvent {
        descriptor: EventDescriptor,
        reply: Reply<i64>,
    },
    SaveEvents {
        descriptors: Vec<EventDescriptor>,
        reply: Reply<u64>,
    },
    UpdateEvent {
        target: EventTarget,
        descriptor: EventDescriptor,
        reply: Reply<u64>,
    },
    RemoveEvents {
        target: EventTarget,
        reply: Reply<u64>,
    },
    Shutdown,
}

impl CalendarCommand {
    fn name(&self) -> &'static str {
        match self {
            CalendarCommand::SaveCalendar { .. } => "save_calendar",
            CalendarCommand::FindCalendarId { .. } => "find_calendar_id",
            CalendarCommand::RemoveCalendar { .. } => "remove_calendar",
            CalendarCommand::RemoveCalendarByName { .. } => "remove_calendar_by_name",
            CalendarCommand::SaveEvent { .. } => "save_event",
            CalendarCommand::SaveEvents { .. } => "save_events",
            CalendarCommand::UpdateEvent { .. } => "update_event",
            CalendarCommand::RemoveEvents { .. } => "remove_events",
            CalendarCommand::Shutdown => "shutdown",
        }
    }
}

/// The calendar actor that runs operations against the store
///
/// Each command runs on its own task; nothing orders two operations
/// relative to each other.
pub struct CalendarActor {
    store: Arc<dyn CalendarStore>,
    mapper: FieldMapper,
    command_rx: mpsc::Receiver<CalendarCommand>,
    tasks: JoinSet<()>,
    cancel: CancellationToken,
}

impl CalendarActor {
    pub fn new(
        store: Arc<dyn CalendarStore>,
        mapper: FieldMapper,
        command_rx: mpsc::Receiver<CalendarCommand>,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            store,
            mapper,
            command_rx,
            tasks: JoinSet::new(),
            cancel,
        }
    }

    /// Start the actor's processing loop
    pub async fn run(mut self) {
        info!("Calendar actor started");

        loop {
            tokio::select! {
                _ = self.cancel.cancelled() => break,
                cmd = self.command_rx.recv() => match cmd {
                    Some(CalendarCommand::Shutdown) | None => break,
                    Some(cmd) => self.dispatch(cmd),
                },
                Some(joined) = self.tasks.join_next(), if !self.tasks.is_empty() => {
                    if let Err(e) = joined {
                        if e.is_panic() {
                            error!("Calendar operation panicked: {}", e);
                        }
                    }
                }
            }
        }

        info!("Calendar actor shutting down ({} operations in flight)", self.tasks.len());
        self.cancel.cancel();
        // Aborted operations drop their reply, which rejects the caller
        self.tasks.abort_all();
        while self.tasks.join_next().await.is_some() {}

        info!("Calendar actor shut down");
    }

    fn dispatch(&mut self, cmd: CalendarCommand) {
        debug!("Dispatching {}", cmd.name());
        let store = Arc::clone(&self.store);
        let mapper = self.mapper.clone();

        match cmd {
            CalendarCommand::SaveCalendar { descriptor, reply } => {
                self.spawn_reply(reply, async move {
                    let attrs = calendar_attributes(&descriptor)?;
                    store.insert_calendar(attrs).await
                });
            }
            CalendarCommand::FindCalendarId { name, reply } => {
                self.spawn_reply(reply, async move {
                    if name.is_empty() {
                        return Ok(None);
                    }
                    store.find_calendar_id_by_account_name(&name).await
                });
            }
            CalendarCommand::RemoveCalendar { id, reply } => {
                self.spawn_reply(reply, async move {
                    store.delete_calendar(id).await.map(|rows| rows > 0)
                });
            }
            CalendarCommand::RemoveCalendarByName { name, reply } => {
                self.spawn_reply(reply, async move {
                    store.delete_calendars_matching(&name).await
                });
            }
            CalendarCommand::SaveEvent { descriptor, reply } => {
                self.spawn_reply(reply, async move {
                    let attrs = mapper.map_event(&descriptor)?;
                    store.insert_event(attrs).await
                });
            }
            CalendarCommand::SaveEvents { descriptors, reply } => {
                self.spawn_reply(reply, async move {
                    if descriptors.is_empty() {
                        return Ok(0);
                    }
                    let attrs = mapper.map_events(&descriptors)?;
                    store.bulk_insert_events(attrs).await
                });
            }
            CalendarCommand::UpdateEvent {
                target,
                descriptor,
                reply,
            } => {
                self.spawn_reply(reply, async move {
                    let Some(selector) = target.selector()? else {
                        debug!("Update target selects no events");
                        return Ok(0);
                    };
                    let attrs = mapper.map_event(&descriptor)?;
                    store.update_events(&selector, attrs).await
                });
            }
            CalendarCommand::RemoveEvents { target, reply } => {
                self.spawn_reply(reply, async move {
                    let Some(selector) = target.selector()? else {
                        debug!("Removal target selects no events");
                        return Ok(0);
                    };
                    store.delete_events(&selector).await
                });
            }
            CalendarCommand::Shutdown => {}
        }
    }

    fn spawn_reply<T, F>(&mut self, reply: Reply<T>, operation: F)
    where
        T: Send + 'static,
        F: Future<Output = GateResult<T>> + Send + 'static,
    {
        self.tasks.spawn(async move {
            let result = operation.await;
            if let Err(e) = &result {
                debug!("Calendar operation failed: {}", e);
            }
            // The caller may have gone away; nothing to do then
            let _ = reply.send(result);
        });
    }
}
