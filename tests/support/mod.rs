//! Mocks shared by the integration tests.
#![allow(dead_code)]

use async_trait::async_trait;
use calendar_gate::components::store::{
    CalendarAttributes, CalendarStore, EventAttributes, EventSelector,
};
use calendar_gate::error::{store_error, GateResult};
use calendar_gate::{Grant, PermissionAuthority, RequestToken, Scope};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

/// In-memory calendar store that records every call
#[derive(Debug, Default)]
pub struct MockCalendarStore {
    calendars: Mutex<HashMap<i64, CalendarAttributes>>,
    events: Mutex<HashMap<i64, EventAttributes>>,
    next_id: AtomicUsize,
    calls: AtomicUsize,
    bulk_batches: Mutex<Vec<usize>>,
    failure: Mutex<Option<String>>,
    delay: Mutex<Option<Duration>>,
}

impl MockCalendarStore {
    pub fn new() -> Self {
        Self {
            next_id: AtomicUsize::new(1),
            ..Default::default()
        }
    }

    /// Make every following call fail with `message`
    pub fn fail_with(&self, message: &str) {
        *self.failure.lock().unwrap() = Some(message.to_string());
    }

    /// Make every following call wait before answering
    pub fn delay_by(&self, delay: Duration) {
        *self.delay.lock().unwrap() = Some(delay);
    }

    /// Number of store calls made so far
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn bulk_batches(&self) -> Vec<usize> {
        self.bulk_batches.lock().unwrap().clone()
    }

    pub fn calendar(&self, id: i64) -> Option<CalendarAttributes> {
        self.calendars.lock().unwrap().get(&id).cloned()
    }

    pub fn event(&self, id: i64) -> Option<EventAttributes> {
        self.events.lock().unwrap().get(&id).cloned()
    }

    pub fn event_count(&self) -> usize {
        self.events.lock().unwrap().len()
    }

    async fn enter(&self) -> GateResult<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let delay = *self.delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        match self.failure.lock().unwrap().as_deref() {
            Some(message) => Err(store_error(message)),
            None => Ok(()),
        }
    }

    fn next_id(&self) -> i64 {
        self.next_id.fetch_add(1, Ordering::SeqCst) as i64
    }

    fn selected(&self, selector: &EventSelector) -> Vec<i64> {
        let events = self.events.lock().unwrap();
        events
            .iter()
            .filter(|(id, attrs)| match selector {
                EventSelector::Id(wanted) => *id == wanted,
                EventSelector::Filter(filter) => filter.matches(attrs),
            })
            .map(|(id, _)| *id)
            .collect()
    }
}

#[async_trait]
impl CalendarStore for MockCalendarStore {
    async fn insert_calendar(&self, attrs: CalendarAttributes) -> GateResult<i64> {
        self.enter().await?;
        let id = self.next_id();
        self.calendars.lock().unwrap().insert(id, attrs);
        Ok(id)
    }

    async fn delete_calendar(&self, id: i64) -> GateResult<u64> {
        self.enter().await?;
        Ok(self.calendars.lock().unwrap().remove(&id).map_or(0, |_| 1))
    }

    async fn delete_calendars_matching(&self, account_name: &str) -> GateResult<u64> {
        self.enter().await?;
        let mut calendars = self.calendars.lock().unwrap();
        let before = calendars.len();
        calendars.retain(|_, attrs| attrs.account_name != account_name);
        Ok((before - calendars.len()) as u64)
    }

    async fn find_calendar_id_by_account_name(
        &self,
        account_name: &str,
    ) -> GateResult<Option<i64>> {
        self.enter().await?;
        let calendars = self.calendars.lock().unwrap();
        Ok(calendars
            .iter()
            .find(|(_, attrs)| attrs.account_name == account_name)
            .map(|(id, _)| *id))
    }

    async fn insert_event(&self, attrs: EventAttributes) -> GateResult<i64> {
        self.enter().await?;
        let id = self.next_id();
        self.events.lock().unwrap().insert(id, attrs);
        Ok(id)
    }

    async fn bulk_insert_events(&self, attrs: Vec<EventAttributes>) -> GateResult<u64> {
        self.enter().await?;
        self.bulk_batches.lock().unwrap().push(attrs.len());
        let count = attrs.len() as u64;
        for event in attrs {
            let id = self.next_id();
            self.events.lock().unwrap().insert(id, event);
        }
        Ok(count)
    }

    async fn update_events(
        &self,
        selector: &EventSelector,
        attrs: EventAttributes,
    ) -> GateResult<u64> {
        self.enter().await?;
        let ids = self.selected(selector);
        let mut events = self.events.lock().unwrap();
        for id in &ids {
            events.insert(*id, attrs.clone());
        }
        Ok(ids.len() as u64)
    }

    async fn delete_events(&self, selector: &EventSelector) -> GateResult<u64> {
        self.enter().await?;
        let ids = self.selected(selector);
        let mut events = self.events.lock().unwrap();
        for id in &ids {
            events.remove(id);
        }
        Ok(ids.len() as u64)
    }
}

/// Permission authority with scripted answers
#[derive(Debug, Default)]
pub struct MockAuthority {
    read_granted: AtomicBool,
    write_granted: AtomicBool,
    rationale: AtomicBool,
    unavailable: AtomicBool,
    requests: Mutex<Vec<(Scope, RequestToken)>>,
}

impl MockAuthority {
    pub fn new() -> Self {
        Self::default()
    }

    /// Authority with read and write access already granted
    pub fn granted() -> Self {
        let authority = Self::new();
        authority.grant(Scope::ReadWrite);
        authority
    }

    pub fn grant(&self, scope: Scope) {
        self.read_granted.store(true, Ordering::SeqCst);
        if scope == Scope::ReadWrite {
            self.write_granted.store(true, Ordering::SeqCst);
        }
    }

    pub fn set_rationale(&self, show: bool) {
        self.rationale.store(show, Ordering::SeqCst);
    }

    /// Simulate a host that cannot show permission prompts
    pub fn set_unavailable(&self) {
        self.unavailable.store(true, Ordering::SeqCst);
    }

    pub fn requests(&self) -> Vec<(Scope, RequestToken)> {
        self.requests.lock().unwrap().clone()
    }
}

impl PermissionAuthority for MockAuthority {
    fn current_grant(&self, scope: Scope) -> Grant {
        let granted = match scope {
            Scope::ReadOnly => self.read_granted.load(Ordering::SeqCst),
            Scope::ReadWrite => {
                self.read_granted.load(Ordering::SeqCst)
                    && self.write_granted.load(Ordering::SeqCst)
            }
        };
        if granted {
            Grant::Granted
        } else {
            Grant::Denied
        }
    }

    fn should_show_rationale(&self, _scope: Scope) -> bool {
        self.rationale.load(Ordering::SeqCst)
    }

    fn request_grant(&self, scope: Scope, token: RequestToken) -> GateResult<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(calendar_gate::Error::AuthorityUnavailable(
                "no foreground host".to_string(),
            ));
        }
        self.requests.lock().unwrap().push((scope, token));
        Ok(())
    }
}

/// Poll until the authority has seen `count` requests
pub async fn wait_for_requests(authority: &MockAuthority, count: usize) -> Vec<(Scope, RequestToken)> {
    for _ in 0..200 {
        let requests = authority.requests();
        if requests.len() >= count {
            return requests;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    panic!("authority never saw {} requests", count);
}
