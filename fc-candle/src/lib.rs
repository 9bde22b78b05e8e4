//! This crate provides the state machine behind each candle flame.
//!
//! A [`CandleFlame`] starts out unresolved. Once the scene tells it how many candles are unlocked,
//! it becomes either hidden or revealed, and a revealed flame never goes back to being hidden.
//! Only revealed flames react to the pointer: hovering claims the shared [`InteractionContext`]
//! so the scene can show a pointer cursor, and clicking navigates to the destination.

mod context;
mod flame;
mod layout;

pub use self::{
    context::{Affordance, FlameId, InteractionContext},
    flame::{CandleFlame, ClickOutcome, Reveal},
    layout::{table_layout, CandleSpec, CANDLES_PER_ROW, COLUMN_SPACING, ROW_SPACING},
};
