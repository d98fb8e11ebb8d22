//! Scene state: the authoritative CPU-side object pool, light and camera.
//!
//! Responsibilities:
//! - own the fixed-size instance pool (static wall + floor, bouncing spheres)
//! - integrate sphere motion once per frame
//! - derive the light and camera matrices uploaded by the render layer
//!
//! Nothing here touches the GPU; `render` consumes these values by reference.

mod camera;
mod layout;
mod light;
mod object;
mod state;

pub use camera::{CameraConfig, CameraState};
pub use layout::{DrawCall, InstanceLayout, MeshClass, BOX_COUNT};
pub use light::{LightConfig, LightState};
pub use object::{Bounce, SceneObject};
pub use state::{SceneConfig, SceneState};
