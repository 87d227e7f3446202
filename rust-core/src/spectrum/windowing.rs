//! Analysis window scheduling
//!
//! FK spectra are emitted at `output_sample_rate_hz`. Each spectrum's nominal
//! time sits `window_lead` after its window start:
//!
//! ```text
//! spectrum times:      |             |             |
//!               0.5    1     1.5     2     2.5     3     3.5
//!               |______|      |______|      |______|
//! windows:      [-------------]
//!                             [-------------]
//!                                           [-------------]
//! ```
//!
//! Windows are generated until one would end after the reference end time.

use crate::definition::SpectrumDefinition;
use crate::waveform::{sample_period, ReferenceTimes};
use time::{Duration, OffsetDateTime};

/// Produces window start instants spanning the reference interval
#[derive(Debug, Clone, Copy)]
pub struct WindowScheduler {
    reference: ReferenceTimes,
    window_length: Duration,
    window_lead: Duration,
    fk_sample_period: Duration,
}

impl WindowScheduler {
    pub fn new(reference: ReferenceTimes, definition: &SpectrumDefinition) -> Self {
        Self {
            reference,
            window_length: definition.window_length,
            window_lead: definition.window_lead,
            fk_sample_period: sample_period(definition.output_sample_rate_hz),
        }
    }

    /// Fresh iterator over the window starts; may be called repeatedly
    pub fn windows(&self) -> WindowStarts {
        WindowStarts {
            window_start: self.reference.start,
            fk_start_time: self.reference.start + self.window_lead,
            end: self.reference.end,
            window_length: self.window_length,
            window_lead: self.window_lead,
            fk_sample_period: self.fk_sample_period,
        }
    }

    pub fn window_length(&self) -> Duration {
        self.window_length
    }

    pub fn window_lead(&self) -> Duration {
        self.window_lead
    }
}

impl IntoIterator for &WindowScheduler {
    type Item = OffsetDateTime;
    type IntoIter = WindowStarts;

    fn into_iter(self) -> Self::IntoIter {
        self.windows()
    }
}

/// Lazy iterator over window start instants
#[derive(Debug, Clone)]
pub struct WindowStarts {
    window_start: OffsetDateTime,
    fk_start_time: OffsetDateTime,
    end: OffsetDateTime,
    window_length: Duration,
    window_lead: Duration,
    fk_sample_period: Duration,
}

impl Iterator for WindowStarts {
    type Item = OffsetDateTime;

    fn next(&mut self) -> Option<Self::Item> {
        if self.window_start + self.window_length > self.end {
            return None;
        }
        let current = self.window_start;
        self.fk_start_time += self.fk_sample_period;
        self.window_start = self.fk_start_time - self.window_lead;
        Some(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_fixtures::definition;
    use time::macros::datetime;

    const T0: OffsetDateTime = datetime!(2010-05-20 22:30:00 UTC);

    fn scheduler(span: Duration, length: Duration, lead: Duration, rate: f64) -> WindowScheduler {
        let mut def = definition();
        def.window_length = length;
        def.window_lead = lead;
        def.output_sample_rate_hz = rate;
        let reference = ReferenceTimes {
            start: T0,
            end: T0 + span,
        };
        WindowScheduler::new(reference, &def)
    }

    #[test]
    fn test_exact_fit_yields_one_window() {
        let windows: Vec<_> = scheduler(
            Duration::seconds(4),
            Duration::seconds(4),
            Duration::seconds(1),
            1.0,
        )
        .windows()
        .collect();

        assert_eq!(windows, vec![T0]);
    }

    #[test]
    fn test_short_span_yields_nothing() {
        let count = scheduler(
            Duration::milliseconds(3999),
            Duration::seconds(4),
            Duration::seconds(1),
            1.0,
        )
        .windows()
        .count();

        assert_eq!(count, 0);
    }

    #[test]
    fn test_window_cadence() {
        let windows: Vec<_> = scheduler(
            Duration::seconds(10),
            Duration::seconds(4),
            Duration::seconds(2),
            2.0,
        )
        .windows()
        .collect();

        // starts at 0, 0.5, ..., 6.0
        assert_eq!(windows.len(), 13);
        assert_eq!(windows[1] - windows[0], Duration::milliseconds(500));
        assert_eq!(*windows.last().unwrap(), T0 + Duration::seconds(6));
    }

    #[test]
    fn test_restartable() {
        let scheduler = scheduler(
            Duration::seconds(10),
            Duration::seconds(4),
            Duration::seconds(1),
            1.0,
        );

        let first: Vec<_> = scheduler.windows().collect();
        let second: Vec<_> = (&scheduler).into_iter().collect();
        assert_eq!(first, second);
        assert_eq!(first.len(), 7);
    }
}
