use glam::Vec3;
use hecs::{Entity, World};

use super::raycast::raycast_static;
use crate::components::{LocalTransform, ProbeState};
use crate::config::ProbeConfig;

/// Vertical correction from the down ray: hold the character inside the
/// configured clearance band, or drift upward when nothing is below.
pub fn ground_correction(hit_distance: Option<f32>, config: &ProbeConfig) -> f32 {
    match hit_distance {
        Some(d) => d.clamp(config.ground_min_distance, config.ground_max_distance) - d,
        None => config.no_ground_drift,
    }
}

/// Grounding and forward-obstacle probes against the static map.
///
/// Runs **before** `character_controller_system`: the obstacle result is the
/// `blocked` flag the controller reads on the same tick.
pub fn probe_system(world: &mut World, config: &ProbeConfig) {
    let probed: Vec<(Entity, Vec3, Vec3)> = world
        .query::<(&LocalTransform, &ProbeState)>()
        .iter()
        .map(|(e, (t, _))| (e, t.position, t.forward()))
        .collect();

    for (entity, position, forward) in probed {
        let ground = raycast_static(world, position, Vec3::NEG_Y, f32::MAX).map(|h| h.distance);
        let dy = ground_correction(ground, config);
        // The forward ray starts from the corrected height.
        let origin = position + Vec3::Y * dy;
        let obstacle = raycast_static(world, origin, forward, config.obstacle_distance);

        if let Ok((local, probe)) =
            world.query_one_mut::<(&mut LocalTransform, &mut ProbeState)>(entity)
        {
            local.position.y += dy;
            probe.grounded = ground.is_some();
            let blocked = obstacle.is_some();
            if blocked && !probe.blocked {
                log::debug!("probe: obstacle ahead of {entity:?}");
            }
            probe.blocked = blocked;
        }
    }
}
