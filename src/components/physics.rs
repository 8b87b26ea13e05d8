use glam::Vec3;
use hecs::Entity;

/// Collision shape attached to an entity, in the entity's own frame.
#[derive(Debug, Clone, Copy)]
pub enum Collider {
    Sphere { radius: f32 },
    /// Oriented by the entity's `GlobalTransform`.
    Box { half_extents: Vec3 },
    /// Infinite world plane `dot(p, normal) = offset`; ignores the transform.
    Plane { normal: Vec3, offset: f32 },
}

/// Bit set of collision layers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LayerMask(pub u32);

impl LayerMask {
    pub const NONE: LayerMask = LayerMask(0);
    pub const DEFAULT: LayerMask = LayerMask(1 << 0);
    pub const ENVIRONMENT: LayerMask = LayerMask(1 << 1);
    pub const PLAYER: LayerMask = LayerMask(1 << 2);
    pub const ALL: LayerMask = LayerMask(u32::MAX);

    pub fn contains(self, other: LayerMask) -> bool {
        self.0 & other.0 != 0
    }
}

impl std::ops::BitOr for LayerMask {
    type Output = LayerMask;

    fn bitor(self, rhs: LayerMask) -> LayerMask {
        LayerMask(self.0 | rhs.0)
    }
}

/// The single layer a collider lives on.
#[derive(Debug, Clone, Copy)]
pub struct Layer(pub LayerMask);

/// Marker: volume-only collider. Reported only to queries that ask for triggers.
pub struct Trigger;

/// Marker: the collider is part of the agent whose root is the given entity.
#[derive(Debug, Clone, Copy)]
pub struct BodyPart(pub Entity);

/// Marker: touching this trigger ends the game for the player.
pub struct Hazard;

/// Which colliders a physics query may report.
#[derive(Debug, Clone, Copy)]
pub struct QueryFilter {
    pub layers: LayerMask,
    pub include_triggers: bool,
}

impl QueryFilter {
    /// Solid colliders on `layers`; triggers ignored.
    pub fn solid(layers: LayerMask) -> Self {
        Self {
            layers,
            include_triggers: false,
        }
    }

    pub fn accepts(&self, layer: LayerMask, is_trigger: bool) -> bool {
        self.layers.contains(layer) && (self.include_triggers || !is_trigger)
    }
}

impl Default for QueryFilter {
    fn default() -> Self {
        Self::solid(LayerMask::ALL)
    }
}

/// A ray hit reported by `raycast_all`.
#[derive(Debug, Clone, Copy)]
pub struct RayHit {
    pub body: Entity,
    pub distance: f32,
    pub point: Vec3,
}

/// Minimal separation of one collider from another.
#[derive(Debug, Clone, Copy)]
pub struct Penetration {
    /// Unit direction that moves the first collider out of the second.
    pub direction: Vec3,
    pub depth: f32,
}
