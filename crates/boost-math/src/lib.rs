//! Financial derivation formulas for leveraged positions.
//!
//! Pure, stateless functions computing borrow sizing, realized leverage,
//! liquidation price, and health factor from price and position inputs.
//! Both the pre-trade quote path and the post-trade report path call into
//! this single implementation, so the two can never drift apart.

pub mod derive;
pub mod error;

pub use derive::{
    loan_to_value, position_figures, size_borrow, BorrowSizing, HealthFactor, PositionFigures,
};
pub use error::{MathError, Result};
