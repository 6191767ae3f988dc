//! Economy effects - the closed set of money movements upkeep can make
//!
//! Settlement code decides *what* should happen as an [`EconomyEffect`];
//! [`EconomyEffect::apply`] is the only place that touches balances, and it
//! appends the matching log entry in the same step.

use crate::core::error::Result;
use crate::core::types::{FactionId, PlanetId};
use crate::economy::account::AccountRef;
use crate::economy::engine::EconomyContext;
use crate::economy::events::{EconomyEventKind, EconomyLog};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EconomyEffect {
    /// Maintenance charged to a faction
    Upkeep { faction: FactionId, amount: i64 },
    /// Tariff retained by the destination's owning faction
    Tariff { faction: FactionId, amount: i64 },
    /// Legitimate trade into a planet budget; logs `gross` as Trade and the
    /// credited `net` as TradeIncome
    Trade { planet: PlanetId, gross: i64, net: i64 },
    /// Contraband proceeds paid to a pirate faction
    Smuggling { faction: FactionId, amount: i64 },
    /// Principal paid out to a borrower
    LoanIssued { account: AccountRef, amount: i64 },
    /// Interest added to a borrower's debt
    LoanInterest { account: AccountRef, amount: i64 },
    /// Repayment taken from a borrower
    LoanPayment { account: AccountRef, amount: i64 },
    /// Borrower failed its minimum obligation
    LoanDefault { account: AccountRef },
}

impl EconomyEffect {
    pub fn kind(&self) -> EconomyEventKind {
        match self {
            EconomyEffect::Upkeep { .. } => EconomyEventKind::Upkeep,
            EconomyEffect::Tariff { .. } => EconomyEventKind::Tariff,
            EconomyEffect::Trade { .. } => EconomyEventKind::Trade,
            EconomyEffect::Smuggling { .. } => EconomyEventKind::Smuggling,
            EconomyEffect::LoanIssued { .. } => EconomyEventKind::LoanIssued,
            EconomyEffect::LoanInterest { .. } => EconomyEventKind::LoanInterest,
            EconomyEffect::LoanPayment { .. } => EconomyEventKind::LoanPayment,
            EconomyEffect::LoanDefault { .. } => EconomyEventKind::LoanDefault,
        }
    }

    /// Move the money and log it
    ///
    /// On error nothing has been changed and nothing logged.
    pub fn apply(
        self,
        note: impl Into<String>,
        ctx: &mut EconomyContext<'_>,
        log: &mut EconomyLog,
    ) -> Result<()> {
        let kind = self.kind();
        let mut income = None;
        let (owner, logged) = match self {
            EconomyEffect::Upkeep { faction, amount } => {
                let account = AccountRef::Faction(faction);
                account.adjust(-amount, ctx.world, ctx.funds)?;
                (account, -amount)
            }
            EconomyEffect::Tariff { faction, amount }
            | EconomyEffect::Smuggling { faction, amount } => {
                let account = AccountRef::Faction(faction);
                account.adjust(amount, ctx.world, ctx.funds)?;
                (account, amount)
            }
            EconomyEffect::Trade { planet, gross, net } => {
                let account = AccountRef::Planet(planet);
                account.adjust(net, ctx.world, ctx.funds)?;
                income = Some(net);
                (account, gross)
            }
            EconomyEffect::LoanIssued { account, amount } => {
                account.adjust(amount, ctx.world, ctx.funds)?;
                (account, amount)
            }
            EconomyEffect::LoanPayment { account, amount } => {
                account.adjust(-amount, ctx.world, ctx.funds)?;
                (account, -amount)
            }
            EconomyEffect::LoanInterest { account, amount } => {
                account.ensure_exists(ctx.world)?;
                (account, -amount)
            }
            EconomyEffect::LoanDefault { account } => {
                account.ensure_exists(ctx.world)?;
                (account, 0)
            }
        };
        let note = note.into();
        // Trade logs the gross value, then the net credit the budget received
        if let Some(net) = income {
            let income_note = format!("{} (net of tariff)", note);
            log.record(ctx.clock, kind, Some(owner), logged, note);
            log.record(ctx.clock, EconomyEventKind::TradeIncome, Some(owner), net, income_note);
        } else {
            log.record(ctx.clock, kind, Some(owner), logged, note);
        }
        Ok(())
    }
}
