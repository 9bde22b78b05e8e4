//! This crate provides a simple CLI to see which candles are lit without opening the scene.

mod grid;

use self::grid::{candle_grid, summary};
use chrono::{DateTime, Local, NaiveDate, TimeZone};
use clap::Parser;
use color_eyre::{eyre::eyre, Result};
use fc_calendar::{unlocked_count, WeekBoundary};
use termion::{color, style};
use tracing::{debug, Level};

/// Show which candles are lit.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// Pretend that it's this date (YYYY-MM-DD) rather than asking the system clock.
    #[arg(long)]
    date: Option<NaiveDate>,

    /// Don't use colours or bold text.
    #[arg(long)]
    plain: bool,
}

/// Get the moment to check, which is noon on the given date or right now.
fn moment(date: Option<NaiveDate>) -> Result<DateTime<Local>> {
    let Some(date) = date else {
        return Ok(Local::now());
    };

    date.and_hms_opt(12, 0, 0)
        .and_then(|datetime| Local.from_local_datetime(&datetime).earliest())
        .ok_or_else(|| eyre!("Noon on {date} doesn't exist in the local time zone"))
}

fn main() -> Result<()> {
    color_eyre::install()?;
    tracing_subscriber::fmt().with_max_level(Level::WARN).init();

    let args = Args::parse();
    let now = moment(args.date)?;
    let unlocked = unlocked_count(&now);
    debug!(%now, ?unlocked);

    let heading = format!("Candles on {}", now.format("%A %-d %B %Y"));
    if args.plain {
        println!("{heading}");
    } else {
        println!(
            "{}{}{heading}{}",
            style::Bold,
            color::Fg(color::LightCyan),
            style::Reset
        );
    }

    if let Some(boundary) = WeekBoundary::at(&now) {
        println!(
            "{} days since January 1, which was day {} of the week (Sunday is 0)",
            boundary.days_elapsed(),
            boundary.weekday_index()
        );
        if let Some(next) = boundary.next_unlock() {
            println!("The next candle lights at {}", next.format("%Y-%m-%d %H:%M"));
        }
    }

    println!("{}\n", summary(unlocked));
    println!("{}", candle_grid(unlocked, !args.plain));

    Ok(())
}
