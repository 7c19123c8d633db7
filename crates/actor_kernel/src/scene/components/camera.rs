//! Camera components
//!
//! Cameras run after movement, derive a view matrix from the owner (or from
//! a path, for [`SplineCamera`]) and publish it to the renderer and the
//! audio listener.

use crate::foundation::math::utils::{axis_angle, unit_up};
use crate::foundation::math::{constants, Mat4, Point3, Vec3};
use crate::input::{InputState, MouseButton};
use crate::physics::collision::primitives::GEOMETRY_EPSILON;
use crate::scene::{ActorContext, Component};

/// Update order of cameras; after movement, before audio
pub const CAMERA_UPDATE_ORDER: i32 = 200;

fn look_at(eye: &Vec3, target: &Vec3, up: &Vec3) -> Mat4 {
    Mat4::look_at_rh(&Point3::from(*eye), &Point3::from(*target), up)
}

/// Third-person camera trailing the owner on a damped spring
#[derive(Debug, Clone)]
pub struct FollowCamera {
    /// Distance behind the owner
    pub horz_dist: f32,
    /// Height above the owner
    pub vert_dist: f32,
    /// Distance in front of the owner the camera looks at
    pub target_dist: f32,
    /// Spring stiffness; damping is critical for this value
    pub spring_constant: f32,
    actual_pos: Vec3,
    velocity: Vec3,
}

impl Default for FollowCamera {
    fn default() -> Self {
        Self {
            horz_dist: 350.0,
            vert_dist: 150.0,
            target_dist: 100.0,
            spring_constant: 64.0,
            actual_pos: Vec3::zeros(),
            velocity: Vec3::zeros(),
        }
    }
}

impl FollowCamera {
    /// A follow camera with the default spring
    pub fn new() -> Self {
        Self::default()
    }

    /// Where the camera would sit with no spring lag
    pub fn ideal_position(&self, ctx: &ActorContext<'_>) -> Vec3 {
        ctx.position() - ctx.forward() * self.horz_dist + unit_up() * self.vert_dist
    }

    /// Current (lagging) camera position
    pub fn actual_position(&self) -> Vec3 {
        self.actual_pos
    }

    /// Jump to the ideal position, drop all velocity and publish the view
    pub fn snap_to_ideal(&mut self, ctx: &mut ActorContext<'_>) {
        self.actual_pos = self.ideal_position(ctx);
        self.velocity = Vec3::zeros();
        self.publish(ctx);
    }

    fn publish(&self, ctx: &mut ActorContext<'_>) {
        let target = ctx.position() + ctx.forward() * self.target_dist;
        ctx.set_view_matrix(look_at(&self.actual_pos, &target, &unit_up()));
    }
}

impl Component for FollowCamera {
    fn update_order(&self) -> i32 {
        CAMERA_UPDATE_ORDER
    }

    fn on_attach(&mut self, ctx: &mut ActorContext<'_>) {
        self.snap_to_ideal(ctx);
    }

    fn update(&mut self, ctx: &mut ActorContext<'_>, delta_time: f32) {
        let dampening = 2.0 * self.spring_constant.sqrt();
        let ideal = self.ideal_position(ctx);
        let diff = self.actual_pos - ideal;
        let acceleration = -self.spring_constant * diff - dampening * self.velocity;

        self.velocity += acceleration * delta_time;
        self.actual_pos += self.velocity * delta_time;
        self.publish(ctx);
    }
}

/// Mouse units per frame that map to full turn speed
const MOUSE_RANGE: f32 = 500.0;

/// Top turn speed reached from mouse motion, radians per second
const MAX_MOUSE_TURN_SPEED: f32 = constants::PI * 8.0;

/// First-person camera at the owner's position with clamped pitch
#[derive(Debug, Clone)]
pub struct FpsCamera {
    /// Radians per second of pitch change
    pub pitch_speed: f32,
    /// Largest pitch away from level, either way
    pub max_pitch: f32,
    pitch: f32,
}

impl Default for FpsCamera {
    fn default() -> Self {
        Self {
            pitch_speed: 0.0,
            max_pitch: constants::PI / 3.0,
            pitch: 0.0,
        }
    }
}

impl FpsCamera {
    /// A level camera
    pub fn new() -> Self {
        Self::default()
    }

    /// Current pitch in radians, positive looking down
    pub fn pitch(&self) -> f32 {
        self.pitch
    }
}

impl Component for FpsCamera {
    fn update_order(&self) -> i32 {
        CAMERA_UPDATE_ORDER
    }

    fn process_input(&mut self, _ctx: &mut ActorContext<'_>, input: &InputState) {
        if input.mouse.is_relative() {
            let motion = (input.mouse.position().y / MOUSE_RANGE).clamp(-1.0, 1.0);
            self.pitch_speed = motion * MAX_MOUSE_TURN_SPEED;
        }
    }

    fn update(&mut self, ctx: &mut ActorContext<'_>, delta_time: f32) {
        self.pitch = (self.pitch + self.pitch_speed * delta_time).clamp(-self.max_pitch, self.max_pitch);

        // Pitch is a rotation about the owner's right axis
        let q = axis_angle(&ctx.right(), self.pitch);
        let view_forward = q * ctx.forward();
        let eye = ctx.position();
        let target = eye + view_forward * 100.0;
        let up = q * unit_up();
        ctx.set_view_matrix(look_at(&eye, &target, &up));
    }
}

/// Camera circling the owner, steered by yaw and pitch speeds
///
/// Yaw turns about world up; pitch turns about the camera's own right axis,
/// so the camera may roll all the way over the owner.
#[derive(Debug, Clone)]
pub struct OrbitCamera {
    /// Radians per second about the camera's right axis
    pub pitch_speed: f32,
    /// Radians per second about world up
    pub yaw_speed: f32,
    offset: Vec3,
    up: Vec3,
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self {
            pitch_speed: 0.0,
            yaw_speed: 0.0,
            offset: Vec3::new(-400.0, 0.0, 300.0),
            up: unit_up(),
        }
    }
}

impl OrbitCamera {
    /// A still orbit behind and above the owner
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder pattern: start from a different offset relative to the owner
    pub fn with_offset(mut self, offset: Vec3) -> Self {
        self.offset = offset;
        self
    }

    /// Eye position relative to the owner
    pub fn offset(&self) -> Vec3 {
        self.offset
    }

    /// Camera up vector, rotated along with the orbit
    pub fn up(&self) -> Vec3 {
        self.up
    }
}

impl Component for OrbitCamera {
    fn update_order(&self) -> i32 {
        CAMERA_UPDATE_ORDER
    }

    fn process_input(&mut self, _ctx: &mut ActorContext<'_>, input: &InputState) {
        // Orbit only while the right button is held
        if input.mouse.is_relative() && input.mouse.button_value(MouseButton::Right) {
            let motion = input.mouse.position() / MOUSE_RANGE;
            self.yaw_speed = -motion.x.clamp(-1.0, 1.0) * MAX_MOUSE_TURN_SPEED;
            self.pitch_speed = motion.y.clamp(-1.0, 1.0) * MAX_MOUSE_TURN_SPEED;
        }
    }

    fn update(&mut self, ctx: &mut ActorContext<'_>, delta_time: f32) {
        let yaw = axis_angle(&unit_up(), self.yaw_speed * delta_time);
        self.offset = yaw * self.offset;
        self.up = yaw * self.up;

        // Right axis degenerates only if up and offset line up
        if let Some(right) = self.up.cross(&-self.offset).try_normalize(GEOMETRY_EPSILON) {
            let pitch = axis_angle(&right, self.pitch_speed * delta_time);
            self.offset = pitch * self.offset;
            self.up = pitch * self.up;
        }

        let target = ctx.position();
        ctx.set_view_matrix(look_at(&(target + self.offset), &target, &self.up));
    }
}

/// Catmull-Rom path through a list of control points
///
/// A segment starting at index `i` runs from point `i` to point `i + 1` and
/// needs a neighbour on each side, so `n` points give `n - 3` segments.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Spline {
    /// Control points, including the leading and trailing tangent points
    pub control_points: Vec<Vec3>,
}

impl Spline {
    /// Build a spline from its control points
    pub fn new(control_points: Vec<Vec3>) -> Self {
        Self { control_points }
    }

    /// Position at `t` along the segment starting at `start`
    ///
    /// Indices without a full neighbourhood return that control point
    /// unchanged; an empty spline returns `None`.
    pub fn compute(&self, start: usize, t: f32) -> Option<Vec3> {
        let points = &self.control_points;
        if start >= points.len() {
            return points.last().copied();
        }
        if start == 0 || start + 2 >= points.len() {
            return Some(points[start]);
        }

        let (p0, p1, p2, p3) = (points[start - 1], points[start], points[start + 1], points[start + 2]);
        let t2 = t * t;
        let t3 = t2 * t;
        Some(
            0.5 * (2.0 * p1
                + (p2 - p0) * t
                + (2.0 * p0 - 5.0 * p1 + 4.0 * p2 - p3) * t2
                + (3.0 * p1 - p0 - 3.0 * p2 + p3) * t3),
        )
    }

    /// Number of control points
    pub fn len(&self) -> usize {
        self.control_points.len()
    }

    /// Whether the spline has no control points
    pub fn is_empty(&self) -> bool {
        self.control_points.is_empty()
    }
}

/// Camera that travels along a [`Spline`], looking ahead along the path
#[derive(Debug, Clone)]
pub struct SplineCamera {
    /// Change of `t` per second
    pub speed: f32,
    path: Spline,
    index: usize,
    t: f32,
    paused: bool,
}

impl Default for SplineCamera {
    fn default() -> Self {
        Self {
            speed: 0.5,
            path: Spline::default(),
            index: 1,
            t: 0.0,
            paused: true,
        }
    }
}

/// How far ahead on the path the camera looks, in segment `t`
const SPLINE_LOOK_AHEAD: f32 = 0.01;

impl SplineCamera {
    /// A paused camera on `path`
    pub fn new(path: Spline) -> Self {
        Self { path, ..Self::default() }
    }

    /// Back to the first segment and running
    pub fn restart(&mut self) {
        self.index = 1;
        self.t = 0.0;
        self.paused = false;
    }

    /// Hold or resume travel along the path
    pub fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
    }

    /// Stops by itself at the end of the path
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Current segment start and `t` within it
    pub fn progress(&self) -> (usize, f32) {
        (self.index, self.t)
    }

    /// The path being travelled
    pub fn path(&self) -> &Spline {
        &self.path
    }
}

impl Component for SplineCamera {
    fn update_order(&self) -> i32 {
        CAMERA_UPDATE_ORDER
    }

    fn update(&mut self, ctx: &mut ActorContext<'_>, delta_time: f32) {
        if !self.paused {
            self.t += self.speed * delta_time;
            if self.t >= 1.0 {
                if self.index + 3 < self.path.len() {
                    self.index += 1;
                    self.t -= 1.0;
                } else {
                    self.paused = true;
                }
            }
        }

        let eye = self.path.compute(self.index, self.t);
        let ahead = self.path.compute(self.index, self.t + SPLINE_LOOK_AHEAD);
        if let (Some(eye), Some(ahead)) = (eye, ahead) {
            ctx.set_view_matrix(look_at(&eye, &ahead, &unit_up()));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::components::MoveComponent;
    use crate::scene::{Actor, World};
    use approx::assert_relative_eq;

    fn to_view(view: &Mat4, p: Vec3) -> Vec3 {
        (view * p.push(1.0)).xyz()
    }

    #[test]
    fn test_follow_camera_snaps_behind_and_above() {
        let mut world = World::default();
        let id = world.add_actor(Actor::new("car").with_position(Vec3::new(0.0, 0.0, -100.0)));
        world.add_component(id, FollowCamera::new());

        // Ideal eye is (-350, 0, 50); it maps to the view-space origin
        let view = *world.render().view_matrix();
        assert_relative_eq!(to_view(&view, Vec3::new(-350.0, 0.0, 50.0)), Vec3::zeros(), epsilon = 1e-3);
    }

    #[test]
    fn test_follow_camera_lags_then_settles() {
        let mut world = World::default();
        let id = world.add_actor(Actor::new("car"));
        world.add_component(id, MoveComponent::new().with_forward_speed(100.0));
        let cid = world.add_component(id, FollowCamera::new());

        world.update(0.1);
        let camera = world.component::<FollowCamera>(id, cid).unwrap();
        // Camera trails the ideal point while the owner moves
        assert!(camera.actual_position().x < 10.0 - 350.0);

        for _ in 0..600 {
            world.update(0.016);
        }
        let owner = world.transform(id).position();
        let camera = world.component::<FollowCamera>(id, cid).unwrap();
        // Steady state: constant lag behind the ideal point
        let lag = (owner.x - 350.0) - camera.actual_position().x;
        assert!(lag > 0.0 && lag < 50.0);
    }

    #[test]
    fn test_fps_camera_pitch_is_clamped() {
        let mut world = World::default();
        let id = world.add_actor(Actor::new("player"));
        let cid = world.add_component(id, FpsCamera { pitch_speed: 10.0, ..FpsCamera::default() });

        world.update(1.0);
        let camera = world.component::<FpsCamera>(id, cid).unwrap();
        assert_relative_eq!(camera.pitch(), constants::PI / 3.0);
    }

    fn eye_of(view: &Mat4) -> Vec3 {
        view.try_inverse().unwrap().column(3).xyz()
    }

    #[test]
    fn test_orbit_yaw_keeps_eye_distance() {
        let mut world = World::default();
        let id = world.add_actor(Actor::new("car").with_position(Vec3::new(0.0, 0.0, -100.0)));
        let cid = world.add_component(id, OrbitCamera { yaw_speed: constants::HALF_PI, ..OrbitCamera::default() });

        world.update(1.0);
        let camera = world.component::<OrbitCamera>(id, cid).unwrap();
        assert_relative_eq!(camera.offset(), Vec3::new(0.0, -400.0, 300.0), epsilon = 1e-2);

        let eye = eye_of(world.render().view_matrix());
        assert_relative_eq!((eye - Vec3::new(0.0, 0.0, -100.0)).norm(), 500.0, epsilon = 1e-2);
    }

    #[test]
    fn test_orbit_pitch_and_yaw_preserve_lengths() {
        let mut world = World::default();
        let id = world.add_actor(Actor::new("car"));
        let cid = world.add_component(id, OrbitCamera { pitch_speed: 0.3, yaw_speed: 0.7, ..OrbitCamera::default() });

        for _ in 0..10 {
            world.update(0.1);
        }
        let camera = world.component::<OrbitCamera>(id, cid).unwrap();
        assert_relative_eq!(camera.offset().norm(), 500.0, epsilon = 1e-2);
        assert_relative_eq!(camera.up().norm(), 1.0, epsilon = 1e-4);
    }

    fn zigzag() -> Spline {
        let mut points = vec![Vec3::zeros()];
        for i in 0..5 {
            let x = 300.0 * (i + 1) as f32;
            points.push(if i % 2 == 0 { Vec3::new(x, 300.0, 300.0) } else { Vec3::new(x, 0.0, 0.0) });
        }
        Spline::new(points)
    }

    #[test]
    fn test_spline_passes_control_points() {
        let path = zigzag();
        for i in 1..path.len() - 2 {
            assert_relative_eq!(path.compute(i, 0.0).unwrap(), path.control_points[i], epsilon = 1e-3);
            assert_relative_eq!(path.compute(i, 1.0).unwrap(), path.control_points[i + 1], epsilon = 1e-3);
        }
        // No full neighbourhood: the point itself
        assert_eq!(path.compute(0, 0.5), Some(Vec3::zeros()));
        assert_eq!(Spline::default().compute(1, 0.5), None);
    }

    #[test]
    fn test_spline_camera_advances_then_stops() {
        let mut world = World::default();
        let id = world.add_actor(Actor::new("rig"));
        let mut camera = SplineCamera::new(zigzag());
        camera.restart();
        let cid = world.add_component(id, camera);

        // Speed 0.5: two seconds per segment
        world.update(1.0);
        let camera = world.component::<SplineCamera>(id, cid).unwrap();
        assert_eq!(camera.progress().0, 1);
        assert_relative_eq!(camera.progress().1, 0.5);

        world.update(1.0);
        assert_eq!(world.component::<SplineCamera>(id, cid).unwrap().progress().0, 2);

        // Six points give segments 1..=3; the camera parks on the last one
        for _ in 0..10 {
            world.update(1.0);
        }
        let camera = world.component::<SplineCamera>(id, cid).unwrap();
        assert!(camera.is_paused());
        assert_eq!(camera.progress().0, 3);
        let eye = eye_of(world.render().view_matrix());
        assert_relative_eq!(eye, camera.path().control_points[4], epsilon = 1e-2);
    }

    #[test]
    fn test_spline_camera_starts_paused() {
        let mut world = World::default();
        let id = world.add_actor(Actor::new("rig"));
        let cid = world.add_component(id, SplineCamera::new(zigzag()));

        world.update(1.0);
        let camera = world.component::<SplineCamera>(id, cid).unwrap();
        assert_eq!(camera.progress(), (1, 0.0));
        assert_relative_eq!(eye_of(world.render().view_matrix()), Vec3::new(300.0, 300.0, 300.0), epsilon = 1e-2);
    }
}
