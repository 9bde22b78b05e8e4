//! This crate provides a very simple [`DebugNavigator`] to test things with.

use fc_navigator_trait::{validate_destination, NavigationError, Navigator};
use tracing::{info, instrument};

/// A simple debug navigator that just logs its destination with tracing at the info level.
#[derive(Clone, Debug, Default)]
pub struct DebugNavigator {
    /// How many times this navigator has been asked to navigate.
    pub navigations: usize,
}

impl DebugNavigator {
    /// Initialise the navigator.
    pub fn init() -> Self {
        Self::default()
    }
}

impl Navigator for DebugNavigator {
    #[instrument(skip(self))]
    fn navigate(&mut self, destination: &str) -> Result<(), NavigationError> {
        validate_destination(destination)?;

        self.navigations += 1;
        info!(navigations = self.navigations, "Would navigate");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn navigate_counts_valid_destinations() {
        let mut navigator = DebugNavigator::init();
        assert!(navigator.navigate("https://www.52weeks.substack.com").is_ok());
        assert!(navigator.navigate("").is_err());
        assert_eq!(navigator.navigations, 1);
    }
}
