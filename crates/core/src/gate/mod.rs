//! Client-side gate deciding when a report may be requested.
//!
//! A session moves `Idle -> Selecting -> Submitting -> Idle`. Validation is the pure
//! `can_generate` check. Manual ticker entry passes through `Adding` while metadata is
//! resolved. Both `Adding` and `Submitting` are plain flags: they block a second add or
//! submit, but selection edits stay allowed while a submission is in flight.

pub mod directory;

use chrono::{DateTime, NaiveDate, Utc};

use crate::domain::date_range::DateRange;
use crate::domain::persona::InvestorPersona;
use crate::domain::stock::{available_stocks, is_valid_stock_symbol, Stock};
use crate::time::calendar;
use directory::TickerDirectory;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GatePhase {
    Idle,
    Selecting,
    Adding,
    Submitting,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddRejection {
    Empty,
    Duplicate,
    InvalidSymbol,
    Busy,
    NotFound,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AddOutcome {
    Added(Stock),
    Ignored(AddRejection),
}

/// Why generation is currently disabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Blocker {
    NoStocks,
    InvalidDateRange,
    InFlight,
}

/// Snapshot taken when a submission starts. Later edits to the session do not affect it.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportRequest {
    pub tickers: Vec<String>,
    pub date_range: DateRange,
    pub persona: InvestorPersona,
}

#[derive(Debug, Clone)]
pub struct SessionState {
    selected: Vec<Stock>,
    date_range: DateRange,
    persona: InvestorPersona,
    pending_symbol: Option<String>,
    submitting: bool,
    dirty: bool,
}

impl SessionState {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            selected: Vec::new(),
            date_range: calendar::default_date_range(now),
            persona: InvestorPersona::default(),
            pending_symbol: None,
            submitting: false,
            dirty: false,
        }
    }

    pub fn selected_stocks(&self) -> &[Stock] {
        &self.selected
    }

    pub fn date_range(&self) -> DateRange {
        self.date_range
    }

    pub fn persona(&self) -> InvestorPersona {
        self.persona
    }

    pub fn is_adding_stock(&self) -> bool {
        self.pending_symbol.is_some()
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub fn phase(&self) -> GatePhase {
        if self.submitting {
            GatePhase::Submitting
        } else if self.pending_symbol.is_some() {
            GatePhase::Adding
        } else if self.dirty {
            GatePhase::Selecting
        } else {
            GatePhase::Idle
        }
    }

    fn contains(&self, symbol: &str) -> bool {
        self.selected.iter().any(|s| s.symbol == symbol)
    }

    /// Uppercases and checks a manually entered symbol, then enters `Adding`. Blank input is
    /// ignored; surrounding whitespace is not stripped, so padded input fails the format check.
    pub fn begin_add(&mut self, raw: &str) -> Result<String, AddRejection> {
        if raw.trim().is_empty() {
            return Err(AddRejection::Empty);
        }
        if self.pending_symbol.is_some() {
            return Err(AddRejection::Busy);
        }

        let symbol = raw.to_uppercase();
        if self.contains(&symbol) {
            return Err(AddRejection::Duplicate);
        }
        if !is_valid_stock_symbol(&symbol) {
            return Err(AddRejection::InvalidSymbol);
        }

        self.dirty = true;
        self.pending_symbol = Some(symbol.clone());
        Ok(symbol)
    }

    /// Leaves `Adding`, merging the resolved stock unless it was added in the meantime.
    pub fn complete_add(&mut self, resolved: Option<Stock>) -> AddOutcome {
        if self.pending_symbol.take().is_none() {
            return AddOutcome::Ignored(AddRejection::NotFound);
        }

        let Some(stock) = resolved else {
            return AddOutcome::Ignored(AddRejection::NotFound);
        };
        if self.contains(&stock.symbol) {
            return AddOutcome::Ignored(AddRejection::Duplicate);
        }

        self.selected.push(stock.clone());
        AddOutcome::Added(stock)
    }

    pub async fn add_stock(&mut self, directory: &dyn TickerDirectory, raw: &str) -> AddOutcome {
        let symbol = match self.begin_add(raw) {
            Ok(symbol) => symbol,
            Err(rejection) => {
                tracing::debug!(input = raw, ?rejection, "manual ticker ignored");
                return AddOutcome::Ignored(rejection);
            }
        };

        let resolved = directory.resolve_ticker_metadata(&symbol).await;
        self.complete_add(resolved)
    }

    pub fn remove_stock(&mut self, symbol: &str) -> bool {
        let before = self.selected.len();
        self.selected.retain(|s| s.symbol != symbol);
        self.dirty = true;
        self.selected.len() != before
    }

    /// Replaces the selection with the popular stocks named in `symbols`, in catalogue order.
    pub fn select_available<S: AsRef<str>>(&mut self, symbols: &[S]) {
        self.selected = available_stocks()
            .into_iter()
            .filter(|stock| symbols.iter().any(|s| s.as_ref() == stock.symbol))
            .collect();
        self.dirty = true;
    }

    pub fn set_date_range(&mut self, range: DateRange) {
        self.date_range = range;
        self.dirty = true;
    }

    /// Returns false, leaving the range unchanged, if `date` is in the future or before
    /// the calendar floor.
    pub fn select_from(&mut self, date: NaiveDate, today: NaiveDate) -> bool {
        if !calendar::is_selectable_from(date, today) {
            return false;
        }
        self.date_range.from = calendar::start_of_day(date);
        self.dirty = true;
        true
    }

    /// Returns false, leaving the range unchanged, if `date` is in the future or before `from`.
    pub fn select_to(&mut self, date: NaiveDate, today: NaiveDate) -> bool {
        let from = self.date_range.from.date_naive();
        if !calendar::is_selectable_to(date, from, today) {
            return false;
        }
        self.date_range.to = calendar::start_of_day(date);
        self.dirty = true;
        true
    }

    pub fn set_persona(&mut self, persona: InvestorPersona) {
        self.persona = persona;
        self.dirty = true;
    }

    pub fn blockers(&self) -> Vec<Blocker> {
        let mut out = Vec::new();
        if self.selected.is_empty() {
            out.push(Blocker::NoStocks);
        }
        if !self.date_range.is_valid() {
            out.push(Blocker::InvalidDateRange);
        }
        if self.submitting {
            out.push(Blocker::InFlight);
        }
        out
    }

    pub fn can_generate(&self) -> bool {
        !self.selected.is_empty() && self.date_range.is_valid() && !self.submitting
    }

    /// Enters `Submitting` and returns the request snapshot, or `None` if generation is
    /// currently disabled.
    pub fn begin_submission(&mut self) -> Option<ReportRequest> {
        if !self.can_generate() {
            return None;
        }
        self.submitting = true;
        Some(ReportRequest {
            tickers: self.selected.iter().map(|s| s.symbol.clone()).collect(),
            date_range: self.date_range,
            persona: self.persona,
        })
    }

    /// Returns to `Idle` after a submission, successful or not.
    pub fn finish_submission(&mut self) {
        self.submitting = false;
        self.dirty = false;
    }
}
