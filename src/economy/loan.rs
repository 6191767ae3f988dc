//! Loans - interest-bearing debt owed by a faction, planet or character
//!
//! A loan starts Active with `remaining == principal`. Interest accrues
//! monthly, rounded up to whole credits. It ends FullyRepaid once nothing
//! remains, or Defaulted when the economy gives up on it; both are terminal.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::core::error::{Result, SimError};
use crate::core::types::LoanId;
use crate::economy::account::AccountRef;
use crate::economy::ceil_credits;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum LoanStatus {
    Active,
    FullyRepaid,
    Defaulted,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Loan {
    pub id: LoanId,
    pub account: AccountRef,
    pub principal: i64,
    pub monthly_rate: f64,
    pub term_months: u32,
    pub start_year: i32,
    pub start_month: u32,
    remaining: i64,
    defaulted: bool,
}

impl Loan {
    pub fn new(
        id: LoanId,
        account: AccountRef,
        principal: i64,
        monthly_rate: f64,
        term_months: u32,
        start_year: i32,
        start_month: u32,
    ) -> Result<Self> {
        if principal <= 0 {
            return Err(SimError::Validation("loan principal must be positive".into()));
        }
        if !monthly_rate.is_finite() || monthly_rate < 0.0 {
            return Err(SimError::Validation(format!(
                "loan rate {} must be a non-negative number",
                monthly_rate
            )));
        }
        if term_months == 0 {
            return Err(SimError::Validation("loan term must be at least one month".into()));
        }
        Ok(Self {
            id,
            account,
            principal,
            monthly_rate,
            term_months,
            start_year,
            start_month,
            remaining: principal,
            defaulted: false,
        })
    }

    pub fn remaining(&self) -> i64 {
        self.remaining
    }

    pub fn is_defaulted(&self) -> bool {
        self.defaulted
    }

    pub fn status(&self) -> LoanStatus {
        if self.defaulted {
            LoanStatus::Defaulted
        } else if self.remaining <= 0 {
            LoanStatus::FullyRepaid
        } else {
            LoanStatus::Active
        }
    }

    pub fn is_active(&self) -> bool {
        self.status() == LoanStatus::Active
    }

    /// Add one month of interest; returns the amount added
    ///
    /// Debt saturates at `i64::MAX` credits.
    pub fn accrue_interest(&mut self) -> i64 {
        if !self.is_active() {
            return 0;
        }
        let interest = ceil_credits(self.remaining as f64 * self.monthly_rate)
            .clamp(0, i64::MAX - self.remaining);
        self.remaining += interest;
        interest
    }

    /// Pay down the loan; returns the amount actually applied
    pub fn make_payment(&mut self, amount: i64) -> i64 {
        if !self.is_active() || amount <= 0 {
            return 0;
        }
        let paid = amount.min(self.remaining);
        self.remaining -= paid;
        paid
    }

    pub fn mark_defaulted(&mut self) {
        self.defaulted = true;
    }

    /// Least the borrower must pay this turn to stay in good standing
    ///
    /// One installment of `principal / term`, scaled by `fraction` and
    /// rounded up, never more than what remains.
    pub fn minimum_obligation(&self, fraction: f64) -> i64 {
        if !self.is_active() {
            return 0;
        }
        let installment = ceil_credits(self.principal as f64 / f64::from(self.term_months) * fraction);
        installment.max(1).min(self.remaining)
    }
}

/// All loans, keyed by id in issue order
#[derive(Clone, Debug, Default)]
pub struct LoanBook {
    loans: BTreeMap<LoanId, Loan>,
    next_id: u32,
}

impl LoanBook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_id(&mut self) -> LoanId {
        self.next_id += 1;
        LoanId(self.next_id)
    }

    pub fn insert(&mut self, loan: Loan) {
        self.next_id = self.next_id.max(loan.id.0);
        self.loans.insert(loan.id, loan);
    }

    pub fn get(&self, id: LoanId) -> Option<&Loan> {
        self.loans.get(&id)
    }

    pub fn get_mut(&mut self, id: LoanId) -> Option<&mut Loan> {
        self.loans.get_mut(&id)
    }

    pub fn ids(&self) -> Vec<LoanId> {
        self.loans.keys().copied().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Loan> {
        self.loans.values()
    }

    pub fn len(&self) -> usize {
        self.loans.len()
    }

    pub fn is_empty(&self) -> bool {
        self.loans.is_empty()
    }
}
