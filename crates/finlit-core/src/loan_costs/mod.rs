//! Vehicle purchase pricing: fees, sales tax, trade-in credits, and the
//! financed principal they compose into, plus full loan quotes built on the
//! amortization schedule.

pub mod purchase;
pub mod quote;

pub use purchase::{compose_purchase, financed_principal, FeeBundle, PurchaseComposition, PurchaseInput};
pub use quote::{price_loan, LoanQuoteInput, LoanQuoteOutput};
