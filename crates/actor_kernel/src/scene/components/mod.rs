//! Concrete components
//!
//! Small behaviors that compose instead of inheriting: components that need
//! movement own a [`MoveComponent`] rather than extending it.

pub mod audio;
pub mod ball_move;
pub mod camera;
pub mod collision;
pub mod lifetime;
pub mod mesh;
pub mod movement;
pub mod target;

pub use audio::AudioComponent;
pub use ball_move::BallMove;
pub use camera::{FollowCamera, FpsCamera, OrbitCamera, Spline, SplineCamera};
pub use collision::BoxComponent;
pub use lifetime::LifetimeComponent;
pub use mesh::MeshComponent;
pub use movement::{InputComponent, KeyBindings, MoveComponent};
pub use target::TargetComponent;
