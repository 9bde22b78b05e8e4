//! This crate provides a [`BrowserNavigator`] for use in `fc-scene`.

use fc_navigator_trait::{validate_destination, NavigationError, Navigator};
use tracing::{debug, instrument};

/// A navigator that opens destinations in the user's default web browser.
///
/// This is the desktop version of redirecting the page, so the scene stays open behind the
/// browser window.
#[derive(Clone, Copy, Debug, Default)]
pub struct BrowserNavigator;

impl BrowserNavigator {
    /// Initialise the navigator.
    pub fn init() -> Self {
        Self
    }
}

impl Navigator for BrowserNavigator {
    #[instrument(skip(self))]
    fn navigate(&mut self, destination: &str) -> Result<(), NavigationError> {
        validate_destination(destination)?;

        open::that(destination.trim())?;
        debug!("Opened destination in browser");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_bad_destinations_before_opening_anything() {
        let mut navigator = BrowserNavigator::init();
        assert!(matches!(
            navigator.navigate(""),
            Err(NavigationError::EmptyDestination)
        ));
        assert!(matches!(
            navigator.navigate("ftp://example.com"),
            Err(NavigationError::NotHttp(_))
        ));
    }
}
