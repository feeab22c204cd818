use glam::Quat;
use hecs::{Entity, World};

use crate::components::{LocalTransform, Rock};
use crate::timeline::{Cue, Timeline};

/// Advance every timeline and collect the cues they fire, in entity order.
/// Finished timelines are removed from their entities.
pub fn timeline_system(world: &mut World, dt: f32) -> Vec<(Entity, Cue)> {
    let mut fired = Vec::new();
    let mut finished = Vec::new();

    for (entity, (timeline, local)) in world.query_mut::<(&mut Timeline, &mut LocalTransform)>() {
        fired.extend(timeline.advance(local, dt).into_iter().map(|cue| (entity, cue)));
        if timeline.is_finished() {
            finished.push(entity);
        }
    }

    for entity in finished {
        let _ = world.remove_one::<Timeline>(entity);
    }
    fired
}

pub fn rock_system(world: &mut World, dt: f32) {
    for (_entity, (rock, local)) in world.query_mut::<(&mut Rock, &mut LocalTransform)>() {
        rock.phase += rock.rate * dt;
        local.rotation = rock.base * Quat::from_rotation_x(rock.phase.sin() * rock.amplitude);
    }
}
