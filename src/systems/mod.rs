mod collision;
mod raycast;
mod transform;

pub use collision::{closest_point, penetration, sphere_overlaps, Placed};
pub use raycast::ray_collider;
pub use transform::{propagate_subtree, transform_propagation_system};
