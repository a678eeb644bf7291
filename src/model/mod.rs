// MODEL: Actor, static world and camera state
pub mod actor;
pub mod camera;
pub mod collider;
pub mod level;

pub use actor::Actor;
pub use camera::{Camera, CameraRig};
pub use collider::{Collider, ColliderShape};
pub use level::{Level, LevelError};
