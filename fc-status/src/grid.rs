//! This module draws the table of candles as text.

use fc_calendar::{RevealIndex, CANDLE_COUNT};
use fc_candle::CANDLES_PER_ROW;
use termion::{color, style};

/// Draw every candle as its week label, in the same rows as the table.
///
/// Lit candles are wrapped in square brackets. With `styled`, they're also drawn in bold yellow
/// and unlit ones are dimmed.
pub fn candle_grid(unlocked: Option<u32>, styled: bool) -> String {
    let cells: Vec<String> = (0..CANDLE_COUNT)
        .map(RevealIndex::new)
        .map(|index| {
            let week = index.week_label();
            let lit = index.is_unlocked_by(unlocked);

            match (lit, styled) {
                (true, true) => format!(
                    "{}{}[{week:2}]{}",
                    style::Bold,
                    color::Fg(color::Yellow),
                    style::Reset
                ),
                (true, false) => format!("[{week:2}]"),
                (false, true) => format!("{} {week:2} {}", style::Faint, style::Reset),
                (false, false) => format!(" {week:2} "),
            }
        })
        .collect();

    cells
        .chunks(CANDLES_PER_ROW as usize)
        .map(|row| row.join(" "))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Describe how many candles are lit.
pub fn summary(unlocked: Option<u32>) -> String {
    match unlocked {
        Some(count) => format!(
            "{} of {CANDLE_COUNT} candles lit",
            count.min(CANDLE_COUNT)
        ),
        None => "Unable to work out the week, so no candles are lit".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grid_has_rows_of_ten() {
        let grid = candle_grid(Some(0), false);
        let rows: Vec<&str> = grid.lines().collect();

        assert_eq!(rows.len(), 6);
        assert_eq!(rows[0], "  1    2    3    4    5    6    7    8    9   10 ");
        assert_eq!(rows[5], " 51   52 ");
    }

    #[test]
    fn lit_candles_are_bracketed() {
        let grid = candle_grid(Some(12), false);
        let rows: Vec<&str> = grid.lines().collect();

        assert_eq!(rows[0], "[ 1] [ 2] [ 3] [ 4] [ 5] [ 6] [ 7] [ 8] [ 9] [10]");
        assert!(rows[1].starts_with("[11] [12]  13 "));
        assert_eq!(grid.matches('[').count(), 12);
    }

    #[test]
    fn no_count_lights_nothing() {
        assert!(!candle_grid(None, false).contains('['));
        assert_eq!(
            summary(None),
            "Unable to work out the week, so no candles are lit"
        );
    }

    #[test]
    fn summary_never_exceeds_the_candle_count() {
        assert_eq!(summary(Some(3)), "3 of 52 candles lit");
        assert_eq!(summary(Some(53)), "52 of 52 candles lit");
    }

    #[test]
    fn styled_grid_still_has_every_week() {
        let grid = candle_grid(Some(52), true);
        for week in 1..=52 {
            assert!(grid.contains(&format!("[{week:2}]")), "week {week}");
        }
    }
}
