//! This module handles the state machine for a single candle flame.

use crate::{CandleSpec, FlameId, InteractionContext};
use fc_calendar::RevealIndex;
use fc_navigator_trait::Navigator;
use fc_projector::{ScreenContext, ScreenPoint};
use tracing::{debug, info, instrument, trace, warn};

/// Whether a flame can be seen.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Reveal {
    /// The flame hasn't been told how many candles are unlocked yet, so it ignores all input.
    Unresolved,

    /// The flame's week hasn't come yet.
    Hidden,

    /// The flame is lit. This is terminal.
    Revealed,
}

/// What happened when a flame was clicked.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ClickOutcome {
    /// The flame wasn't revealed, so nothing happened.
    Ignored,

    /// The navigator was asked to go to the destination and it did.
    Navigated {
        /// Where the flame was on screen when it was clicked, if that could be worked out.
        anchor: Option<ScreenPoint>,
    },

    /// The navigator was asked to go to the destination but it failed. The error has been
    /// logged.
    NavigationFailed {
        /// Where the flame was on screen when it was clicked, if that could be worked out.
        anchor: Option<ScreenPoint>,
    },
}

/// The state of a single candle flame.
#[derive(Clone, Debug, PartialEq)]
pub struct CandleFlame {
    /// The ID of this flame in its [`InteractionContext`].
    id: FlameId,

    /// The candle this flame sits on.
    spec: CandleSpec,

    /// Whether the flame is lit.
    reveal: Reveal,

    /// Whether the pointer is over this flame.
    hovered: bool,
}

impl CandleFlame {
    /// Create a new unresolved flame and register it with the context.
    pub fn new(spec: CandleSpec, ctx: &mut InteractionContext) -> Self {
        Self {
            id: ctx.register(),
            spec,
            reveal: Reveal::Unresolved,
            hovered: false,
        }
    }

    /// The ID of this flame in its [`InteractionContext`].
    pub fn id(&self) -> FlameId {
        self.id
    }

    /// The candle this flame sits on.
    pub fn spec(&self) -> &CandleSpec {
        &self.spec
    }

    /// The reveal index of this flame.
    pub fn index(&self) -> RevealIndex {
        self.spec.index
    }

    /// The current reveal state.
    pub fn reveal(&self) -> Reveal {
        self.reveal
    }

    /// Should the flame (and its label) be drawn?
    pub fn is_visible(&self) -> bool {
        self.reveal == Reveal::Revealed
    }

    /// Is the pointer over this flame?
    pub fn is_hovered(&self) -> bool {
        self.hovered
    }

    /// Decide whether this flame is lit, given how many candles are unlocked.
    ///
    /// This only does anything the first time it's called. An unknown count leaves the flame
    /// hidden.
    pub fn resolve(&mut self, unlocked: Option<u32>) -> Reveal {
        if self.reveal == Reveal::Unresolved {
            self.reveal = if self.spec.index.is_unlocked_by(unlocked) {
                Reveal::Revealed
            } else {
                Reveal::Hidden
            };
            trace!(index = ?self.spec.index, ?unlocked, reveal = ?self.reveal, "Resolved flame");
        }

        self.reveal
    }

    /// Check again whether a hidden flame should now be lit. Return true if it just became
    /// revealed.
    ///
    /// Unlike [`Self::resolve`], this can be called repeatedly, but it can only ever move the
    /// flame from hidden to revealed.
    pub fn refresh(&mut self, unlocked: Option<u32>) -> bool {
        match self.reveal {
            Reveal::Revealed => false,
            Reveal::Unresolved => self.resolve(unlocked) == Reveal::Revealed,
            Reveal::Hidden if self.spec.index.is_unlocked_by(unlocked) => {
                debug!(index = ?self.spec.index, "Flame revealed on re-check");
                self.reveal = Reveal::Revealed;
                true
            }
            Reveal::Hidden => false,
        }
    }

    /// The pointer moved onto this flame.
    pub fn pointer_enter(&mut self, ctx: &mut InteractionContext) {
        if self.reveal != Reveal::Revealed || self.hovered {
            return;
        }

        self.hovered = true;
        ctx.set_affordance(self.id, true);
    }

    /// The pointer moved off this flame.
    pub fn pointer_leave(&mut self, ctx: &mut InteractionContext) {
        if !self.hovered {
            return;
        }

        self.hovered = false;
        ctx.set_affordance(self.id, false);
    }

    /// The flame was clicked.
    ///
    /// A revealed flame works out where it is on the screen and then asks the navigator to go to
    /// the destination, exactly once. Any other flame does nothing at all.
    #[instrument(skip_all, fields(index = self.spec.index.get()))]
    pub fn click(
        &self,
        screen: &ScreenContext,
        navigator: &mut dyn Navigator,
        destination: &str,
    ) -> ClickOutcome {
        if self.reveal != Reveal::Revealed {
            trace!(reveal = ?self.reveal, "Ignoring click on unrevealed flame");
            return ClickOutcome::Ignored;
        }

        let anchor = screen.project().finite();
        info!(?anchor, destination, "Clicked flame");

        match navigator.navigate(destination) {
            Ok(()) => ClickOutcome::Navigated { anchor },
            Err(error) => {
                warn!(?error, destination, "Failed to navigate");
                ClickOutcome::NavigationFailed { anchor }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Affordance;
    use fc_navigator_trait::NavigationError;
    use fc_projector::{CameraView, Viewport};
    use glam::{Mat4, Vec3};

    /// A navigator that stores every destination it's asked to go to.
    #[derive(Default)]
    struct TestNavigator {
        visited: Vec<String>,
        fail: bool,
    }

    impl Navigator for TestNavigator {
        fn navigate(&mut self, destination: &str) -> Result<(), NavigationError> {
            self.visited.push(destination.to_string());
            if self.fail {
                Err(NavigationError::EmptyDestination)
            } else {
                Ok(())
            }
        }
    }

    fn flame(index: u32, ctx: &mut InteractionContext) -> CandleFlame {
        CandleFlame::new(
            CandleSpec {
                index: RevealIndex::new(index),
                position: Vec3::ZERO,
            },
            ctx,
        )
    }

    fn screen(projection: Mat4) -> ScreenContext {
        ScreenContext {
            world_transform: Mat4::from_translation(Vec3::new(0., 0., -5.)),
            camera: CameraView::new(Mat4::IDENTITY, projection),
            viewport: Viewport::new(800., 600.),
        }
    }

    fn perspective() -> Mat4 {
        Mat4::perspective_rh(1., 800. / 600., 0.1, 100.)
    }

    #[test]
    fn resolve_only_happens_once() {
        let mut ctx = InteractionContext::new();
        let mut f = flame(3, &mut ctx);
        assert_eq!(f.reveal(), Reveal::Unresolved);

        assert_eq!(f.resolve(Some(4)), Reveal::Revealed);
        assert_eq!(f.resolve(Some(0)), Reveal::Revealed);
        assert_eq!(f.resolve(None), Reveal::Revealed);

        let mut g = flame(3, &mut ctx);
        assert_eq!(g.resolve(Some(3)), Reveal::Hidden);
        assert_eq!(g.resolve(Some(10)), Reveal::Hidden);
        assert!(!g.is_visible());
    }

    #[test]
    fn unknown_count_hides_everything() {
        let mut ctx = InteractionContext::new();
        let mut f = flame(0, &mut ctx);
        assert_eq!(f.resolve(None), Reveal::Hidden);
    }

    #[test]
    fn refresh_only_reveals() {
        let mut ctx = InteractionContext::new();
        let mut f = flame(5, &mut ctx);
        f.resolve(Some(2));

        assert!(!f.refresh(Some(5)));
        assert!(!f.refresh(None));
        assert!(f.refresh(Some(6)));
        assert!(f.is_visible());

        // A smaller count later on (like after new year) doesn't hide it again
        assert!(!f.refresh(Some(0)));
        assert!(f.is_visible());

        let mut unresolved = flame(0, &mut ctx);
        assert!(unresolved.refresh(Some(1)));
    }

    #[test]
    fn hover_on_revealed_flame() {
        let mut ctx = InteractionContext::new();
        let mut f = flame(0, &mut ctx);
        f.resolve(Some(1));

        f.pointer_enter(&mut ctx);
        assert!(f.is_hovered());
        assert_eq!(ctx.affordance(), Affordance::Pointer);

        // Repeated enters change nothing
        let before = f.clone();
        f.pointer_enter(&mut ctx);
        assert_eq!(f, before);
        assert_eq!(ctx.owner(), Some(f.id()));

        f.pointer_leave(&mut ctx);
        assert!(!f.is_hovered());
        assert_eq!(ctx.affordance(), Affordance::Default);

        // Repeated leaves change nothing
        let before = f.clone();
        f.pointer_leave(&mut ctx);
        assert_eq!(f, before);
        assert_eq!(ctx.affordance(), Affordance::Default);
    }

    #[test]
    fn hover_on_hidden_or_unresolved_flame_does_nothing() {
        let mut ctx = InteractionContext::new();
        let mut unresolved = flame(0, &mut ctx);
        let mut hidden = flame(1, &mut ctx);
        hidden.resolve(Some(1));

        for f in [&mut unresolved, &mut hidden] {
            f.pointer_enter(&mut ctx);
            assert!(!f.is_hovered());
            assert_eq!(ctx.affordance(), Affordance::Default);
        }
    }

    #[test]
    fn moving_between_flames_keeps_one_owner() {
        let mut ctx = InteractionContext::new();
        let mut a = flame(0, &mut ctx);
        let mut b = flame(1, &mut ctx);
        a.resolve(Some(2));
        b.resolve(Some(2));

        // Enter b before a's leave arrives
        a.pointer_enter(&mut ctx);
        b.pointer_enter(&mut ctx);
        a.pointer_leave(&mut ctx);
        assert_eq!(ctx.owner(), Some(b.id()));
        assert_eq!(ctx.affordance(), Affordance::Pointer);

        // And the other way round
        b.pointer_leave(&mut ctx);
        a.pointer_enter(&mut ctx);
        assert_eq!(ctx.owner(), Some(a.id()));

        a.pointer_leave(&mut ctx);
        assert_eq!(ctx.affordance(), Affordance::Default);
    }

    #[test]
    fn click_on_revealed_flame_navigates_once() {
        let mut ctx = InteractionContext::new();
        let mut f = flame(0, &mut ctx);
        f.resolve(Some(1));

        let mut navigator = TestNavigator::default();
        let outcome = f.click(&screen(perspective()), &mut navigator, "https://example.com");

        assert_eq!(
            outcome,
            ClickOutcome::Navigated {
                anchor: Some(ScreenPoint::new(400., 300.))
            }
        );
        assert_eq!(navigator.visited, vec!["https://example.com".to_string()]);
    }

    #[test]
    fn click_on_hidden_flame_is_ignored() {
        let mut ctx = InteractionContext::new();
        let unresolved = flame(0, &mut ctx);
        let mut hidden = flame(4, &mut ctx);
        hidden.resolve(Some(4));

        let mut navigator = TestNavigator::default();
        for f in [&unresolved, &hidden] {
            assert_eq!(
                f.click(&screen(perspective()), &mut navigator, "https://example.com"),
                ClickOutcome::Ignored
            );
        }
        assert!(navigator.visited.is_empty());
    }

    #[test]
    fn click_with_degenerate_camera_still_navigates() {
        let mut ctx = InteractionContext::new();
        let mut f = flame(0, &mut ctx);
        f.resolve(Some(1));

        let mut navigator = TestNavigator::default();
        assert_eq!(
            f.click(&screen(Mat4::ZERO), &mut navigator, "https://example.com"),
            ClickOutcome::Navigated { anchor: None }
        );
        assert_eq!(navigator.visited.len(), 1);
    }

    #[test]
    fn failed_navigation_is_reported() {
        let mut ctx = InteractionContext::new();
        let mut f = flame(0, &mut ctx);
        f.resolve(Some(1));

        let mut navigator = TestNavigator {
            fail: true,
            ..Default::default()
        };
        assert!(matches!(
            f.click(&screen(perspective()), &mut navigator, "https://example.com"),
            ClickOutcome::NavigationFailed { anchor: Some(_) }
        ));
        assert_eq!(navigator.visited.len(), 1);
    }
}
