//! The active-pregnancy store.
//!
//! Holds at most one [`PregnancyRecord`]. Adding a pregnancy replaces whatever was there;
//! history across pregnancies is not kept. All timestamps and "today" come from the injected
//! [`Clock`].

use crate::clock::Clock;
use crate::dating::PregnancyDates;
use crate::pregnancy::{CompletePregnancy, PregnancyField, PregnancyRecord};
use crate::summary::DatingSummary;
use crate::{CoreError, CoreResult};
use antenatal_types::NonEmptyText;
use std::sync::Arc;

pub struct PregnancyStore {
    clock: Arc<dyn Clock>,
    active: Option<PregnancyRecord>,
}

impl PregnancyStore {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            clock,
            active: None,
        }
    }

    pub fn clock(&self) -> &dyn Clock {
        self.clock.as_ref()
    }

    pub fn current(&self) -> Option<&PregnancyRecord> {
        self.active.as_ref()
    }

    /// Creates a new ongoing record, discarding any existing one.
    pub fn add(&mut self, dates: PregnancyDates, author: NonEmptyText) -> &PregnancyRecord {
        let record = PregnancyRecord::new(dates, author, self.clock.now());

        if let Some(previous) = self.active.as_ref() {
            tracing::warn!(
                previous = %previous.id,
                outcome = previous.outcome.as_str(),
                "replacing existing pregnancy record"
            );
        }
        tracing::info!(id = %record.id, lmp = %record.dates.lmp, "pregnancy added");

        self.active.insert(record)
    }

    /// Applies one field change to the ongoing record.
    ///
    /// # Errors
    ///
    /// - [`CoreError::NoActivePregnancy`] if the store is empty.
    /// - [`CoreError::PregnancyCompleted`] if the record already has a terminal outcome.
    pub fn update(
        &mut self,
        field: PregnancyField,
        author: NonEmptyText,
    ) -> CoreResult<&PregnancyRecord> {
        let now = self.clock.now();
        let record = self.ongoing_mut()?;

        record.apply(field);
        record.audit.touch(author, now);
        tracing::debug!(id = %record.id, ?field, "pregnancy updated");

        Ok(record)
    }

    /// Moves the ongoing record to a terminal outcome and stamps its details.
    ///
    /// # Errors
    ///
    /// - [`CoreError::NoActivePregnancy`] / [`CoreError::PregnancyCompleted`] as for
    ///   [`PregnancyStore::update`].
    /// - Any validation error from [`CompletePregnancy::validate`].
    pub fn complete(
        &mut self,
        request: CompletePregnancy,
        author: NonEmptyText,
    ) -> CoreResult<&PregnancyRecord> {
        let now = self.clock.now();
        let record = self.ongoing_mut()?;
        request.validate(&record.dates)?;

        record.outcome = request.outcome;
        record.details = Some(request.details);
        record.audit.touch(author, now);
        tracing::info!(id = %record.id, outcome = record.outcome.as_str(), "pregnancy completed");

        Ok(record)
    }

    /// Discards the record regardless of its state.
    pub fn remove(&mut self) -> Option<PregnancyRecord> {
        let removed = self.active.take();
        if let Some(record) = removed.as_ref() {
            tracing::info!(id = %record.id, "pregnancy removed");
        }
        removed
    }

    /// Dating summary for today, if there is an ongoing record.
    pub fn summary(&self) -> Option<DatingSummary> {
        self.active
            .as_ref()
            .and_then(|record| record.summary(self.clock.today()))
    }

    fn ongoing_mut(&mut self) -> CoreResult<&mut PregnancyRecord> {
        let record = self.active.as_mut().ok_or(CoreError::NoActivePregnancy)?;
        if !record.is_active() {
            return Err(CoreError::PregnancyCompleted(record.id.to_string()));
        }
        Ok(record)
    }
}
