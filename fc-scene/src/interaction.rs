//! This module connects the candle flames to the calendar, the pointer, and the navigator.

use crate::config::SceneConfig;
use bevy::{prelude::*, window::CursorIcon};
use chrono::{DateTime, NaiveDate, TimeZone};
use color_eyre::{eyre::eyre, Result};
use fc_calendar::{next_unlock, unlocked_count, RevealIndex};
use fc_candle::{Affordance, CandleFlame, FlameId, InteractionContext};
use fc_navigator_trait::Navigator;
use fc_projector::{
    is_in_front, project, world_position, CameraView, ScreenContext, ScreenPoint, Viewport,
};
use std::{collections::HashMap, time::Duration};
use tracing::{debug, info, instrument, trace};

/// The state machine of a single candle flame.
#[derive(Component, Debug)]
pub(super) struct Flame(pub(super) CandleFlame);

/// The text label that follows the hovered flame.
#[derive(Component, Clone, Copy, Debug)]
pub(super) struct FlamePopup;

/// The week number drawn above a lit flame.
#[derive(Component, Clone, Copy, Debug)]
pub(super) struct FlameLabel(pub(super) RevealIndex);

/// The interaction context shared by every flame.
#[derive(Resource, Debug, Default)]
pub(super) struct SharedInteraction(pub(super) InteractionContext);

/// The navigator used when a lit flame is clicked.
#[derive(Resource)]
pub(super) struct ActiveNavigator(pub(super) Box<dyn Navigator>);

/// The clock that decides which candles are lit.
#[derive(Resource, Clone, Copy, Debug)]
pub(super) struct RevealClock {
    /// A moment to pretend it is, instead of asking the system clock.
    fixed: Option<DateTime<chrono::Local>>,
}

impl RevealClock {
    /// Create a clock, optionally fixed to noon on the given date.
    ///
    /// Fails if noon on that date doesn't exist in the local time zone.
    pub(super) fn new(date_override: Option<NaiveDate>) -> Result<Self> {
        let fixed = date_override
            .map(|date| {
                noon_on(date, &chrono::Local)
                    .ok_or_else(|| eyre!("Noon on {date} doesn't exist in the local time zone"))
            })
            .transpose()?;

        Ok(Self { fixed })
    }

    /// The current moment in local time.
    pub(super) fn now(&self) -> DateTime<chrono::Local> {
        self.fixed.unwrap_or_else(chrono::Local::now)
    }
}

/// Noon on the given date in the given time zone, if that time exists there.
pub(super) fn noon_on<Tz: TimeZone>(date: NaiveDate, tz: &Tz) -> Option<DateTime<Tz>> {
    tz.from_local_datetime(&date.and_hms_opt(12, 0, 0)?)
        .earliest()
}

/// The timer for checking whether more candles have unlocked since the scene started.
#[derive(Resource, Debug)]
pub(super) struct RecheckTimer(Option<Timer>);

impl RecheckTimer {
    /// Create the timer from the configured interval. No interval means no re-checking.
    pub(super) fn new(interval_secs: Option<u64>) -> Self {
        Self(interval_secs.map(|secs| {
            Timer::new(Duration::from_secs(secs.max(1)), TimerMode::Repeating)
        }))
    }
}

/// Convert a Bevy matrix to the matrix type used by the projector.
fn to_projector_mat4(matrix: Mat4) -> glam::Mat4 {
    glam::Mat4::from_cols_array(&matrix.to_cols_array())
}

/// Convert a position used by the candle layout to a Bevy vector.
pub(super) fn to_bevy_vec3(vector: glam::Vec3) -> Vec3 {
    Vec3::from_array(vector.to_array())
}

/// Get the projector's view of a Bevy camera.
fn camera_view(camera: &Camera, camera_transform: &GlobalTransform) -> CameraView {
    CameraView::from_camera_transform(
        to_projector_mat4(camera_transform.compute_matrix()),
        to_projector_mat4(camera.projection_matrix()),
    )
}

/// Where a flame is on the screen, if it's in front of the camera and the projection is usable.
pub(super) fn flame_anchor(
    world_transform: &glam::Mat4,
    camera: &CameraView,
    viewport: Viewport,
) -> Option<ScreenPoint> {
    if !is_in_front(world_position(world_transform), camera) {
        return None;
    }

    project(world_transform, camera, viewport).finite()
}

/// Where to put the week label of every lit flame.
pub(super) fn label_anchors<'f>(
    camera: &CameraView,
    viewport: Viewport,
    flames: impl IntoIterator<Item = (&'f CandleFlame, glam::Mat4)>,
) -> HashMap<RevealIndex, ScreenPoint> {
    flames
        .into_iter()
        .filter(|(flame, _)| flame.is_visible())
        .filter_map(|(flame, world)| Some((flame.index(), flame_anchor(&world, camera, viewport)?)))
        .collect()
}

/// Find the flame closest to the cursor, as long as it's within `radius` pixels and in front of
/// the camera.
pub(super) fn nearest_flame(
    cursor: ScreenPoint,
    camera: &CameraView,
    viewport: Viewport,
    radius: f32,
    flames: impl IntoIterator<Item = (FlameId, glam::Mat4)>,
) -> Option<FlameId> {
    flames
        .into_iter()
        .filter_map(|(id, world)| {
            let point = flame_anchor(&world, camera, viewport)?;
            Some((id, point.distance(cursor)))
        })
        .filter(|&(_, distance)| distance <= radius)
        .min_by(|(_, a), (_, b)| a.total_cmp(b))
        .map(|(id, _)| id)
}

/// Decide which flames are lit. This runs once, after all the flames have been spawned and
/// before any pointer input is handled.
#[instrument(skip_all)]
pub(super) fn resolve_reveals(
    clock: Res<RevealClock>,
    mut flames: Query<(&mut Flame, &mut Visibility)>,
) {
    let now = clock.now();
    let unlocked = unlocked_count(&now);
    info!(%now, ?unlocked, next_unlock = ?next_unlock(&now), "Resolving candle flames");

    for (mut flame, mut visibility) in &mut flames {
        flame.0.resolve(unlocked);
        visibility.is_visible = flame.0.is_visible();
    }
}

/// Periodically check whether any hidden flames should now be lit.
pub(super) fn recheck_reveals(
    time: Res<Time>,
    clock: Res<RevealClock>,
    mut timer: ResMut<RecheckTimer>,
    mut flames: Query<(&mut Flame, &mut Visibility)>,
) {
    let Some(timer) = timer.0.as_mut() else {
        return;
    };
    if !timer.tick(time.delta()).just_finished() {
        return;
    }

    let now = clock.now();
    let unlocked = unlocked_count(&now);
    trace!(?unlocked, "Re-checking candle flames");

    for (mut flame, mut visibility) in &mut flames {
        if flame.0.refresh(unlocked) {
            info!(index = flame.0.index().get(), "Candle lit");
            visibility.is_visible = true;
        }
    }
}

/// Send hover and click events to the flames, and update the cursor to match.
#[allow(clippy::too_many_arguments)]
pub(super) fn handle_pointer(
    mut windows: ResMut<Windows>,
    mouse: Res<Input<MouseButton>>,
    config: Res<SceneConfig>,
    mut interaction: ResMut<SharedInteraction>,
    mut navigator: ResMut<ActiveNavigator>,
    mut last_affordance: Local<Affordance>,
    cameras: Query<(&Camera, &GlobalTransform), With<Camera3d>>,
    mut flames: Query<(&mut Flame, &GlobalTransform)>,
) {
    let Some(window) = windows.get_primary_mut() else {
        return;
    };
    let Ok((camera, camera_transform)) = cameras.get_single() else {
        return;
    };

    let viewport = Viewport::new(window.width(), window.height());
    let camera = camera_view(camera, camera_transform);

    // Bevy puts the origin of the cursor in the bottom left
    let cursor = window
        .cursor_position()
        .map(|position| ScreenPoint::new(position.x, viewport.height - position.y));

    // Only lit flames are drawn, so only they can be under the pointer
    let target = cursor.and_then(|cursor| {
        nearest_flame(
            cursor,
            &camera,
            viewport,
            config.hover_radius_px,
            flames
                .iter()
                .filter(|(flame, _)| flame.0.is_visible())
                .map(|(flame, transform)| {
                    (flame.0.id(), to_projector_mat4(transform.compute_matrix()))
                }),
        )
    });

    // Leaves go first so that the flame under the pointer ends up owning the affordance
    for (mut flame, _) in &mut flames {
        if Some(flame.0.id()) != target && flame.0.is_hovered() {
            flame.0.pointer_leave(&mut interaction.0);
        }
    }
    for (mut flame, _) in &mut flames {
        if Some(flame.0.id()) == target && !flame.0.is_hovered() {
            flame.0.pointer_enter(&mut interaction.0);
        }
    }

    if mouse.just_pressed(MouseButton::Left) {
        if let Some((flame, transform)) = flames
            .iter()
            .find(|(flame, _)| Some(flame.0.id()) == target)
        {
            let screen = ScreenContext {
                world_transform: to_projector_mat4(transform.compute_matrix()),
                camera,
                viewport,
            };
            let outcome = flame
                .0
                .click(&screen, navigator.0.as_mut(), &config.destination_url);
            debug!(?outcome, "Handled click");
        }
    }

    let affordance = interaction.0.affordance();
    if affordance != *last_affordance {
        window.set_cursor_icon(match affordance {
            Affordance::Pointer => CursorIcon::Hand,
            Affordance::Default => CursorIcon::Default,
        });
        *last_affordance = affordance;
    }
}

/// Move the week label to the hovered flame, or hide it if nothing is hovered.
pub(super) fn update_popup(
    windows: Res<Windows>,
    cameras: Query<(&Camera, &GlobalTransform), With<Camera3d>>,
    flames: Query<(&Flame, &GlobalTransform)>,
    mut popups: Query<(&mut Text, &mut Style, &mut Visibility), With<FlamePopup>>,
) {
    let Ok((mut text, mut style, mut visibility)) = popups.get_single_mut() else {
        return;
    };

    let anchor = windows
        .get_primary()
        .zip(cameras.get_single().ok())
        .and_then(|(window, (camera, camera_transform))| {
            let (flame, transform) = flames.iter().find(|(flame, _)| flame.0.is_hovered())?;
            let point = flame_anchor(
                &to_projector_mat4(transform.compute_matrix()),
                &camera_view(camera, camera_transform),
                Viewport::new(window.width(), window.height()),
            )?;

            Some((flame.0.index().week_label(), point))
        });

    match anchor {
        Some((week, point)) => {
            if let Some(section) = text.sections.first_mut() {
                section.value = format!("Week {week}");
            }
            style.position = UiRect {
                left: Val::Px(point.x + 12.),
                top: Val::Px(point.y - 12.),
                ..default()
            };
            visibility.is_visible = true;
        }
        None => visibility.is_visible = false,
    }
}

/// Keep the week label of every lit flame above it, and hide the rest.
pub(super) fn update_flame_labels(
    windows: Res<Windows>,
    cameras: Query<(&Camera, &GlobalTransform), With<Camera3d>>,
    flames: Query<(&Flame, &GlobalTransform)>,
    mut labels: Query<(&FlameLabel, &mut Style, &mut Visibility)>,
) {
    if labels.is_empty() {
        return;
    }
    let (Some(window), Ok((camera, camera_transform))) =
        (windows.get_primary(), cameras.get_single())
    else {
        return;
    };

    let anchors = label_anchors(
        &camera_view(camera, camera_transform),
        Viewport::new(window.width(), window.height()),
        flames
            .iter()
            .map(|(flame, transform)| (&flame.0, to_projector_mat4(transform.compute_matrix()))),
    );

    for (label, mut style, mut visibility) in &mut labels {
        match anchors.get(&label.0) {
            Some(point) => {
                style.position = UiRect {
                    left: Val::Px(point.x - 6.),
                    top: Val::Px(point.y - 32.),
                    ..default()
                };
                visibility.is_visible = true;
            }
            None => visibility.is_visible = false,
        }
    }
}
