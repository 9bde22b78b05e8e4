//! This crate projects points in the 3D scene onto the 2D screen.
//!
//! Screen coordinates are in pixels, with the origin in the top left corner and y increasing
//! downwards. Normalised device coordinates have y increasing upwards, so the vertical axis gets
//! flipped on the way.
//!
//! Nothing here clips. A point behind the camera or outside the view still projects to some
//! numeric [`ScreenPoint`], and a degenerate camera produces NaNs. Use [`ScreenPoint::finite`]
//! before placing anything with the result, and [`is_in_front`] if it matters which side of the
//! camera the point is on.

use glam::{Mat4, Vec2, Vec3};

/// A point on the screen in pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScreenPoint {
    /// Pixels from the left edge.
    pub x: f32,

    /// Pixels from the top edge.
    pub y: f32,
}

impl ScreenPoint {
    /// Create a new screen point.
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Are both coordinates finite?
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// Return the point if it's usable, or `None` if the position is unavailable.
    pub fn finite(self) -> Option<Self> {
        self.is_finite().then_some(self)
    }

    /// The distance in pixels to another point.
    pub fn distance(self, other: Self) -> f32 {
        Vec2::from(self).distance(other.into())
    }
}

impl From<ScreenPoint> for Vec2 {
    fn from(ScreenPoint { x, y }: ScreenPoint) -> Self {
        Vec2::new(x, y)
    }
}

impl From<Vec2> for ScreenPoint {
    fn from(Vec2 { x, y }: Vec2) -> Self {
        Self { x, y }
    }
}

/// The size of the viewport in pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    /// The width of the viewport.
    pub width: f32,

    /// The height of the viewport.
    pub height: f32,
}

impl Viewport {
    /// Create a new viewport.
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// The point in the middle of the viewport.
    pub fn center(&self) -> ScreenPoint {
        ScreenPoint::new(self.width / 2., self.height / 2.)
    }
}

/// The transforms of a camera.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraView {
    /// The transform from world space to view space.
    view: Mat4,

    /// The transform from view space to clip space.
    projection: Mat4,
}

impl CameraView {
    /// Create a camera from its view and projection matrices.
    pub const fn new(view: Mat4, projection: Mat4) -> Self {
        Self { view, projection }
    }

    /// Create a camera from its world transform (where the camera is and which way it's facing)
    /// and its projection matrix.
    pub fn from_camera_transform(camera_world: Mat4, projection: Mat4) -> Self {
        Self {
            view: camera_world.inverse(),
            projection,
        }
    }

    /// The view matrix.
    pub fn view(&self) -> Mat4 {
        self.view
    }

    /// The projection matrix.
    pub fn projection(&self) -> Mat4 {
        self.projection
    }

    /// The combined view-projection matrix.
    pub fn view_projection(&self) -> Mat4 {
        self.projection * self.view
    }
}

/// Everything needed to work out where an object is on the screen.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScreenContext {
    /// The accumulated world transform of the object, including all its ancestors.
    pub world_transform: Mat4,

    /// The active camera.
    pub camera: CameraView,

    /// The size of the viewport.
    pub viewport: Viewport,
}

impl ScreenContext {
    /// Project the object onto the screen. See [`project`].
    pub fn project(&self) -> ScreenPoint {
        project(&self.world_transform, &self.camera, self.viewport)
    }
}

/// The world space position of an object, taken from the translation of its world transform.
pub fn world_position(world_transform: &Mat4) -> Vec3 {
    world_transform.w_axis.truncate()
}

/// Map a world space point to normalised device coordinates, with the perspective divide.
pub fn to_ndc(point: Vec3, camera: &CameraView) -> Vec3 {
    camera.view_projection().project_point3(point)
}

/// Map normalised device coordinates to pixels in the viewport.
pub fn ndc_to_screen(ndc: Vec3, viewport: Viewport) -> ScreenPoint {
    let half_width = viewport.width / 2.;
    let half_height = viewport.height / 2.;

    ScreenPoint {
        x: ndc.x * half_width + half_width,
        y: -ndc.y * half_height + half_height,
    }
}

/// Project an object with the given world transform onto the screen.
pub fn project(world_transform: &Mat4, camera: &CameraView, viewport: Viewport) -> ScreenPoint {
    ndc_to_screen(to_ndc(world_position(world_transform), camera), viewport)
}

/// Is the given world space point in front of the camera?
///
/// The camera looks down its negative z axis, so a point is in front of it when its view space
/// z is negative.
pub fn is_in_front(point: Vec3, camera: &CameraView) -> bool {
    camera.view.transform_point3(point).z < 0.
}
