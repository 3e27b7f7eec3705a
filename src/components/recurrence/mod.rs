//! RRULE generation from application recurrence descriptions.
//!
//! Clauses are emitted in a fixed order so equal inputs always produce the
//! same string: `FREQ`, then `BYDAY` (weekly) or `BYSETPOS`+`BYDAY` /
//! `BYMONTHDAY` (monthly), `WKST`, `INTERVAL`, and finally `UNTIL` or `COUNT`.

pub mod models;

pub use models::{BuiltRule, Frequency, RecurrenceRule, RuleOptions, DEFAULT_DURATION};

use crate::error::{Error, GateResult};
use crate::utils::time::{format_until, LocalZone};
use std::fmt::Display;

/// Build a rule string, `None` when the frequency is not recognized
pub fn build_rule(frequency: &str, options: &RuleOptions) -> GateResult<Option<String>> {
    let Some(freq) = Frequency::from_token(frequency) else {
        return Ok(None);
    };

    let mut clauses = vec![format!("FREQ={}", freq.rule_token())];

    match freq {
        Frequency::Weekly => {
            if let Some(days) = &options.days_of_week {
                clauses.push(format!("BYDAY={}", join_sequence(days, "daysOfWeek")?));
            }
        }
        Frequency::Monthly => {
            // Set position with weekdays wins over days of month
            match (&options.days_of_week, options.week_position_in_month) {
                (Some(days), Some(position)) => {
                    clauses.push(format!("BYSETPOS={}", position));
                    clauses.push(format!("BYDAY={}", join_sequence(days, "daysOfWeek")?));
                }
                _ => {
                    if let Some(days) = &options.days_of_month {
                        clauses.push(format!(
                            "BYMONTHDAY={}",
                            join_sequence(days, "daysOfMonth")?
                        ));
                    }
                }
            }
        }
        Frequency::Daily | Frequency::Yearly => {}
    }

    if let Some(week_start) = &options.week_start {
        clauses.push(format!("WKST={}", week_start));
    }

    if let Some(interval) = options.interval {
        clauses.push(format!("INTERVAL={}", interval));
    }

    if let Some(until) = options.until {
        clauses.push(format!("UNTIL={}", format_until(until)?));
    } else if let Some(count) = options.occurrence {
        clauses.push(format!("COUNT={}", count));
    }

    Ok(Some(clauses.join(";")))
}

fn join_sequence<T: Display>(values: &[T], field: &str) -> GateResult<String> {
    if values.is_empty() {
        return Err(Error::EmptySequence(field.to_string()));
    }
    Ok(values
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(","))
}

impl RecurrenceRule {
    /// Build the rule and its duration
    ///
    /// `local` selects the zone used to read a string `endDate`, `None`
    /// meaning UTC. Returns `None` when no frequency is given or it is not
    /// recognized, in which case no duration is attached either.
    pub fn build(&self, local: Option<&LocalZone>) -> GateResult<Option<BuiltRule>> {
        let Some(frequency) = self.frequency.as_deref() else {
            return Ok(None);
        };

        let until = self
            .end_date
            .as_ref()
            .map(|date| date.to_millis(local))
            .transpose()?;

        let options = RuleOptions {
            interval: self.interval,
            until,
            occurrence: self.occurrence,
            days_of_week: self.days_of_week.clone(),
            week_start: self.week_start.clone(),
            week_position_in_month: self.week_position_in_month,
            days_of_month: self.days_of_month.clone(),
        };

        Ok(build_rule(frequency, &options)?.map(|rrule| BuiltRule {
            rrule,
            duration: self
                .duration
                .clone()
                .unwrap_or_else(|| DEFAULT_DURATION.to_string()),
        }))
    }
}
