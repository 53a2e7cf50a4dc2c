//! Minimal rigid-body world
//!
//! Dynamic circles integrate under gravity and resolve contacts against static
//! circles and rotated rectangles. Gameplay only ever holds `BodyHandle`s; the
//! world owns the body data.
//!
//! Dynamic-vs-dynamic contacts are not resolved: the live game has at most one
//! moving body.

use std::collections::{BTreeMap, BTreeSet};

use glam::Vec2;

use super::sdf::{check_sdf_collision, sd_box, sd_circle};
use crate::rotate;

/// Frame rate the air friction coefficient is expressed against
const AIR_FRICTION_REFERENCE_DT: f32 = 1.0 / 60.0;
/// Normal speed below which a contact stops bouncing (pixels/s)
const REST_BOUNCE_SPEED: f32 = 40.0;

/// Opaque reference to a body owned by a `World`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BodyHandle(u32);

/// What a body represents in the game
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyLabel {
    Projectile,
    Target,
    Obstacle,
    Ground,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shape {
    Circle { radius: f32 },
    /// Rectangle centered on the body position
    Rect { width: f32, height: f32 },
}

/// Physical properties supplied at creation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyProps {
    pub label: BodyLabel,
    pub is_static: bool,
    pub restitution: f32,
    pub friction: f32,
    /// Velocity fraction lost per 60 Hz frame
    pub air_friction: f32,
    /// Rotation in radians
    pub angle: f32,
}

impl BodyProps {
    pub fn fixed(label: BodyLabel) -> Self {
        Self {
            label,
            is_static: true,
            restitution: 0.0,
            friction: 0.1,
            air_friction: 0.0,
            angle: 0.0,
        }
    }

    pub fn with_angle(mut self, angle: f32) -> Self {
        self.angle = angle;
        self
    }

    pub fn with_friction(mut self, friction: f32) -> Self {
        self.friction = friction;
        self
    }
}

#[derive(Debug, Clone)]
pub struct Body {
    pub handle: BodyHandle,
    pub shape: Shape,
    pub position: Vec2,
    pub velocity: Vec2,
    pub props: BodyProps,
}

impl Body {
    pub fn label(&self) -> BodyLabel {
        self.props.label
    }

    pub fn speed(&self) -> f32 {
        self.velocity.length()
    }

    /// Signed distance from `p` to this body's surface
    pub fn distance(&self, p: Vec2) -> f32 {
        match self.shape {
            Shape::Circle { radius } => sd_circle(p, self.position, radius),
            Shape::Rect { width, height } => sd_box(
                p,
                self.position,
                Vec2::new(width / 2.0, height / 2.0),
                self.props.angle,
            ),
        }
    }

    /// Outline in world space (rect corners clockwise, or a 16-gon for circles)
    pub fn vertices(&self) -> Vec<Vec2> {
        match self.shape {
            Shape::Circle { radius } => (0..16)
                .map(|i| {
                    let t = i as f32 / 16.0 * std::f32::consts::TAU;
                    self.position + Vec2::new(t.cos(), t.sin()) * radius
                })
                .collect(),
            Shape::Rect { width, height } => {
                let (hw, hh) = (width / 2.0, height / 2.0);
                [
                    Vec2::new(-hw, -hh),
                    Vec2::new(hw, -hh),
                    Vec2::new(hw, hh),
                    Vec2::new(-hw, hh),
                ]
                .into_iter()
                .map(|c| self.position + rotate(c, self.props.angle))
                .collect()
            }
        }
    }
}

/// A contact that began during the last step. `dynamic` is the moving body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollisionPair {
    pub dynamic: BodyHandle,
    pub other: BodyHandle,
}

impl CollisionPair {
    /// Whether this pair involves `handle` on either side
    pub fn involves(&self, handle: BodyHandle) -> bool {
        self.dynamic == handle || self.other == handle
    }
}

/// The simulation world
#[derive(Debug, Clone)]
pub struct World {
    pub gravity: Vec2,
    /// Every created body, whether or not it is simulated
    bodies: BTreeMap<BodyHandle, Body>,
    /// Bodies currently part of the simulation
    active: BTreeSet<BodyHandle>,
    /// Pairs in contact at the end of the previous step
    touching: BTreeSet<(BodyHandle, BodyHandle)>,
    next_id: u32,
}

impl World {
    pub fn new(gravity: Vec2) -> Self {
        Self {
            gravity,
            bodies: BTreeMap::new(),
            active: BTreeSet::new(),
            touching: BTreeSet::new(),
            next_id: 1,
        }
    }

    /// Create a body. It is not simulated until passed to `add`.
    pub fn create_body(&mut self, shape: Shape, position: Vec2, props: BodyProps) -> BodyHandle {
        let handle = BodyHandle(self.next_id);
        self.next_id += 1;
        self.bodies.insert(
            handle,
            Body {
                handle,
                shape,
                position,
                velocity: Vec2::ZERO,
                props,
            },
        );
        handle
    }

    pub fn add(&mut self, handles: &[BodyHandle]) {
        for &h in handles {
            if self.bodies.contains_key(&h) {
                self.active.insert(h);
            }
        }
    }

    /// Remove bodies from the world and free their data
    pub fn remove(&mut self, handles: &[BodyHandle]) {
        for h in handles {
            self.active.remove(h);
            self.bodies.remove(h);
        }
        self.touching
            .retain(|(a, b)| !handles.contains(a) && !handles.contains(b));
    }

    pub fn clear(&mut self) {
        self.bodies.clear();
        self.active.clear();
        self.touching.clear();
    }

    /// Simulated bodies in creation order
    pub fn bodies(&self) -> Vec<BodyHandle> {
        self.active.iter().copied().collect()
    }

    pub fn body(&self, handle: BodyHandle) -> Option<&Body> {
        if self.active.contains(&handle) {
            self.bodies.get(&handle)
        } else {
            None
        }
    }

    pub fn contains(&self, handle: BodyHandle) -> bool {
        self.active.contains(&handle)
    }

    pub fn set_velocity(&mut self, handle: BodyHandle, velocity: Vec2) {
        if let Some(body) = self.bodies.get_mut(&handle) {
            if !body.props.is_static {
                body.velocity = velocity;
            }
        }
    }

    /// Advance by `dt` seconds. Returns the contacts that started this step.
    pub fn step(&mut self, dt: f32) -> Vec<CollisionPair> {
        let (dynamic, fixed): (Vec<BodyHandle>, Vec<BodyHandle>) = self
            .active
            .iter()
            .copied()
            .partition(|h| self.bodies.get(h).is_some_and(|b| !b.props.is_static));
        let statics: Vec<Body> = fixed
            .iter()
            .filter_map(|h| self.bodies.get(h).cloned())
            .collect();

        let mut touching = BTreeSet::new();
        let mut started = Vec::new();

        for handle in dynamic {
            let Some(body) = self.bodies.get_mut(&handle) else {
                continue;
            };
            let Shape::Circle { radius } = body.shape else {
                continue;
            };

            body.velocity += self.gravity * dt;
            let damping = (1.0 - body.props.air_friction).powf(dt / AIR_FRICTION_REFERENCE_DT);
            body.velocity *= damping;
            body.position += body.velocity * dt;

            for other in &statics {
                let hit = check_sdf_collision(body.position, radius, |p| other.distance(p));
                if !hit.hit || hit.normal == Vec2::ZERO {
                    continue;
                }

                body.position += hit.normal * hit.penetration;

                let vn = body.velocity.dot(hit.normal);
                if vn < 0.0 {
                    let restitution = body.props.restitution.max(other.props.restitution);
                    let friction = body.props.friction.min(other.props.friction);
                    let normal_vel = hit.normal * vn;
                    let tangent_vel = body.velocity - normal_vel;
                    let bounce = if -vn * restitution < REST_BOUNCE_SPEED {
                        Vec2::ZERO
                    } else {
                        -normal_vel * restitution
                    };
                    body.velocity = tangent_vel * (1.0 - friction) + bounce;
                }

                let pair = (handle, other.handle);
                if !self.touching.contains(&pair) {
                    started.push(CollisionPair {
                        dynamic: handle,
                        other: other.handle,
                    });
                }
                touching.insert(pair);
            }
        }

        self.touching = touching;
        started
    }
}
