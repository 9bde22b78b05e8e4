//! This module picks the navigator that the scene was built with.

cfg_if::cfg_if! {
    if #[cfg(feature = "navigator-browser")] {
        pub use browser::BrowserNavigator as SelectedNavigator;
    } else if #[cfg(feature = "navigator-debug")] {
        pub use debug::DebugNavigator as SelectedNavigator;
    }
}
