//! Economy - funds, trade, tariffs, loans and end-of-turn upkeep
//!
//! [`EconomicEngine`] owns every economic registry and is the only writer of
//! the append-only [`EconomyLog`]. Faction balances live behind
//! [`FundsLedger`]; planet budgets and character purses are reached through
//! [`AccountRef`].

pub mod account;
pub mod effects;
pub mod engine;
pub mod events;
pub mod funds;
pub mod loan;
pub mod route;
pub mod tariff;

pub use account::AccountRef;
pub use effects::EconomyEffect;
pub use engine::{EconomicEngine, EconomyContext, EconomyState, UpkeepFailure, UpkeepReport, UpkeepStep};
pub use events::{EconomyEvent, EconomyEventKind, EconomyLog};
pub use funds::{FundsLedger, InMemoryFunds};
pub use loan::{Loan, LoanBook, LoanStatus};
pub use route::{TradeRoute, TradeRouteRegistry};
pub use tariff::{TariffPolicy, TariffTable};

/// Products within this distance of a whole credit count as whole
const ROUNDING_EPSILON: f64 = 1e-9;

/// Round a credit amount up to whole credits, ignoring float noise
///
/// `200.0 * 0.06` is `12.000000000000002` in binary floating point; that
/// must cost 12 credits, not 13.
pub(crate) fn ceil_credits(amount: f64) -> i64 {
    let nearest = amount.round();
    if (amount - nearest).abs() < ROUNDING_EPSILON {
        nearest as i64
    } else {
        amount.ceil() as i64
    }
}
