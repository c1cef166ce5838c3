//! Present/absent/non-eating counts shown on the confirmation screen.

use serde::{Deserialize, Serialize};

use super::{AttendanceRecord, AttendanceState};

/// Counts of each attendance state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceSummary {
    /// `Si` marks.
    #[serde(rename = "Si")]
    pub si: u32,
    /// `No` marks.
    #[serde(rename = "No")]
    pub no: u32,
    /// `Ausente` marks.
    #[serde(rename = "Ausente")]
    pub ausente: u32,
}

impl AttendanceSummary {
    /// Count one decision.
    pub fn record(&mut self, state: AttendanceState) {
        let slot = match state {
            AttendanceState::Si => &mut self.si,
            AttendanceState::No => &mut self.no,
            AttendanceState::Ausente => &mut self.ausente,
        };
        *slot = slot.saturating_add(1);
    }

    /// Count for one state.
    pub fn count(&self, state: AttendanceState) -> u32 {
        match state {
            AttendanceState::Si => self.si,
            AttendanceState::No => self.no,
            AttendanceState::Ausente => self.ausente,
        }
    }

    /// Sum of all buckets.
    pub fn total(&self) -> u32 {
        self.si.saturating_add(self.no).saturating_add(self.ausente)
    }

    /// Rounded share of `state` in percent.
    ///
    /// An empty summary divides by one, so every percentage is `0`.
    ///
    /// # Examples
    /// ```
    /// use comedor_backend::domain::{AttendanceState, summarize};
    ///
    /// let summary = summarize(["Si", "No", "Si"]);
    /// assert_eq!(summary.percentage(AttendanceState::Si), 67);
    /// assert_eq!(summarize(Vec::<&str>::new()).percentage(AttendanceState::No), 0);
    /// ```
    pub fn percentage(&self, state: AttendanceState) -> u32 {
        let total = u64::from(self.total().max(1));
        let scaled = u64::from(self.count(state)) * 200 + total;
        u32::try_from(scaled / (2 * total)).unwrap_or(100)
    }

    /// Summary of persisted records.
    pub fn from_records(records: &[AttendanceRecord]) -> Self {
        records.iter().fold(Self::default(), |mut summary, record| {
            summary.record(record.state);
            summary
        })
    }
}

/// Count raw state strings, ignoring anything that is not a known state.
///
/// # Examples
/// ```
/// use std::collections::BTreeMap;
/// use comedor_backend::domain::summarize;
///
/// let decisions = BTreeMap::from([("A", "Si"), ("B", "No"), ("C", "Ausente"), ("D", "Si")]);
/// let summary = summarize(decisions.values());
/// assert_eq!((summary.si, summary.no, summary.ausente), (2, 1, 1));
/// ```
pub fn summarize<I, S>(states: I) -> AttendanceSummary
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    states
        .into_iter()
        .filter_map(|raw| raw.as_ref().parse::<AttendanceState>().ok())
        .fold(AttendanceSummary::default(), |mut summary, state| {
            summary.record(state);
            summary
        })
}
