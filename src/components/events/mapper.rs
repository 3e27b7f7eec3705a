use super::models::{parse_calendar_id, EventDescriptor};
use crate::components::availability::Availability;
use crate::components::recurrence::{build_rule, BuiltRule, RuleOptions, DEFAULT_DURATION};
use crate::components::store::EventAttributes;
use crate::config::{Config, DEFAULT_CALENDAR_ID};
use crate::error::GateResult;
use crate::utils::time::LocalZone;

/// Turns event descriptions into store attribute sets
///
/// Mapping is a pure function of the descriptor plus the zone the mapper
/// resolves at call time.
#[derive(Debug, Clone)]
pub struct FieldMapper {
    zone: LocalZone,
    default_calendar_id: i64,
}

impl Default for FieldMapper {
    fn default() -> Self {
        Self::new(LocalZone::System, DEFAULT_CALENDAR_ID)
    }
}

impl FieldMapper {
    pub fn new(zone: LocalZone, default_calendar_id: i64) -> Self {
        Self {
            zone,
            default_calendar_id,
        }
    }

    /// Mapper using the system zone and the configured default calendar
    pub fn from_config(config: &Config) -> Self {
        Self::new(LocalZone::System, config.default_calendar_id)
    }

    pub fn zone(&self) -> &LocalZone {
        &self.zone
    }

    /// Map one event description
    pub fn map_event(&self, details: &EventDescriptor) -> GateResult<EventAttributes> {
        let local = details.skip_timezone.then_some(&self.zone);

        let dtstart = details
            .start_date
            .as_ref()
            .map(|date| date.to_millis(local))
            .transpose()?;
        let dtend = details
            .end_date
            .as_ref()
            .map(|date| date.to_millis(local))
            .transpose()?;

        let calendar_id = match &details.calendar_id {
            Some(value) => parse_calendar_id(value)?,
            None => self.default_calendar_id,
        };

        let rule = self.recurrence(details, local)?;

        let availability = details
            .availability
            .as_deref()
            .map(Availability::from_label)
            .unwrap_or_default();

        // Zone ids are looked up per call so a changed host zone is honoured
        let event_timezone = details
            .time_zone
            .clone()
            .unwrap_or_else(|| self.zone.id());
        let event_end_timezone = details
            .end_time_zone
            .clone()
            .unwrap_or_else(|| self.zone.id());

        let (rrule, duration) = match rule {
            Some(BuiltRule { rrule, duration }) => (Some(rrule), Some(duration)),
            None => (None, None),
        };

        Ok(EventAttributes {
            title: details.title.clone(),
            description: details.description.clone(),
            event_location: details.location.clone(),
            dtstart,
            dtend,
            all_day: details.all_day.map(u8::from),
            event_timezone,
            event_end_timezone,
            has_alarm: details.alarms.as_ref().map(|_| true),
            availability: availability.code(),
            calendar_id,
            rrule,
            duration,
        })
    }

    /// Map a batch; the first invalid description fails the whole batch
    pub fn map_events(&self, details: &[EventDescriptor]) -> GateResult<Vec<EventAttributes>> {
        details.iter().map(|d| self.map_event(d)).collect()
    }

    fn recurrence(
        &self,
        details: &EventDescriptor,
        local: Option<&LocalZone>,
    ) -> GateResult<Option<BuiltRule>> {
        if let Some(rule) = &details.recurrence_rule {
            if let Some(built) = rule.build(local)? {
                return Ok(Some(built));
            }
        }

        let Some(frequency) = details.recurrence.as_deref() else {
            return Ok(None);
        };

        Ok(build_rule(frequency, &RuleOptions::default())?.map(|rrule| BuiltRule {
            rrule,
            duration: DEFAULT_DURATION.to_string(),
        }))
    }
}
