mod animation;
mod controller;
mod cutscene;
mod probe;
mod raycast;
mod states;
mod transform;

pub use animation::{blended_pose, pose_system, rest_pose, LimbPose};
pub use controller::{character_controller_system, integrate};
pub use cutscene::{rock_system, timeline_system};
pub use probe::{ground_correction, probe_system};
pub use raycast::{raycast_mesh, raycast_static, RaycastHit};
pub use states::character_fsm;
pub use transform::transform_propagation_system;
