//! This module describes where the candles go on the table.

use fc_calendar::{RevealIndex, CANDLE_COUNT};
use glam::Vec3;

/// How many candles fit in one row across the table.
pub const CANDLES_PER_ROW: u32 = 10;

/// The distance between neighbouring candles in a row.
pub const COLUMN_SPACING: f32 = 0.4;

/// The distance between rows of candles.
pub const ROW_SPACING: f32 = 0.8;

/// Everything needed to create one candle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CandleSpec {
    /// Which week this candle unlocks in.
    pub index: RevealIndex,

    /// Where the base of the candle sits on the table.
    pub position: Vec3,
}

/// Lay out all the candles in rows on the table, with index 0 in the back left corner.
///
/// The table top is centred on the origin and the candles stand at y = 0.
pub fn table_layout() -> Vec<CandleSpec> {
    (0..CANDLE_COUNT)
        .map(|index| {
            let row = (index / CANDLES_PER_ROW) as f32 - 2.3;
            let column = (index % CANDLES_PER_ROW) as f32 - 4.5;

            CandleSpec {
                index: RevealIndex::new(index),
                position: Vec3::new(column * COLUMN_SPACING, 0., row * ROW_SPACING),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_layout_test() {
        let layout = table_layout();
        assert_eq!(layout.len(), CANDLE_COUNT as usize);

        for (i, spec) in layout.iter().enumerate() {
            assert_eq!(spec.index.get() as usize, i);
            assert!(spec.position.x.abs() < 2.5, "{spec:?} is off the table");
            assert!(spec.position.z.abs() < 2.5, "{spec:?} is off the table");
        }

        for (i, a) in layout.iter().enumerate() {
            for b in &layout[i + 1..] {
                assert!(
                    a.position.distance(b.position) >= COLUMN_SPACING - 1e-4,
                    "{a:?} and {b:?} overlap"
                );
            }
        }
    }
}
