//! Economic events and the append-only economy log

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::calendar::Clock;
use crate::economy::account::AccountRef;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EconomyEventKind {
    Upkeep,
    Tariff,
    Trade,
    TradeIncome,
    Smuggling,
    LoanIssued,
    LoanInterest,
    LoanPayment,
    LoanDefault,
}

impl EconomyEventKind {
    /// Whether events of this kind change an account balance by their amount
    ///
    /// Interest accrual raises the debt, not the balance; a default notice
    /// carries no money. Trade events record the gross value; the credit the
    /// planet actually receives, net of tariff, is its TradeIncome event.
    pub fn moves_funds(&self) -> bool {
        !matches!(
            self,
            EconomyEventKind::LoanInterest | EconomyEventKind::LoanDefault | EconomyEventKind::Trade
        )
    }
}

impl fmt::Display for EconomyEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self {
            EconomyEventKind::Upkeep => "Upkeep",
            EconomyEventKind::Tariff => "Tariff",
            EconomyEventKind::Trade => "Trade",
            EconomyEventKind::TradeIncome => "TradeIncome",
            EconomyEventKind::Smuggling => "Smuggling",
            EconomyEventKind::LoanIssued => "LoanIssued",
            EconomyEventKind::LoanInterest => "LoanInterest",
            EconomyEventKind::LoanPayment => "LoanPayment",
            EconomyEventKind::LoanDefault => "LoanDefault",
        };
        f.write_str(tag)
    }
}

/// A single immutable ledger entry
///
/// Positive amounts are credits, negative amounts are debits.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EconomyEvent {
    pub year: i32,
    pub month: u32,
    pub kind: EconomyEventKind,
    pub owner: Option<AccountRef>,
    pub amount: i64,
    pub note: String,
}

/// The complete economic history, in insertion order
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct EconomyLog {
    events: Vec<EconomyEvent>,
}

impl EconomyLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn from_events(events: Vec<EconomyEvent>) -> Self {
        Self { events }
    }

    pub(crate) fn record(
        &mut self,
        clock: &Clock,
        kind: EconomyEventKind,
        owner: Option<AccountRef>,
        amount: i64,
        note: impl Into<String>,
    ) {
        self.events.push(EconomyEvent {
            year: clock.current_year(),
            month: clock.current_month(),
            kind,
            owner,
            amount,
            note: note.into(),
        });
    }

    pub fn events(&self) -> &[EconomyEvent] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn for_owner(&self, owner: AccountRef) -> impl Iterator<Item = &EconomyEvent> {
        self.events.iter().filter(move |e| e.owner == Some(owner))
    }

    pub fn of_kind(&self, kind: EconomyEventKind) -> impl Iterator<Item = &EconomyEvent> {
        self.events.iter().filter(move |e| e.kind == kind)
    }

    pub fn for_date(&self, year: i32, month: u32) -> impl Iterator<Item = &EconomyEvent> {
        self.events
            .iter()
            .filter(move |e| e.year == year && e.month == month)
    }

    /// Sum of fund-moving amounts recorded against an account
    pub fn net_funds_flow(&self, owner: AccountRef) -> i64 {
        self.for_owner(owner)
            .filter(|e| e.kind.moves_funds())
            .fold(0i64, |total, e| total.saturating_add(e.amount))
    }
}
