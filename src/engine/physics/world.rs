use std::fmt;

use super::body::RigidBody;
use super::contact::{line_intersection, Contact};
use super::PhysicsError;

/// Handle identifying a body inside a [`PhysicsWorld`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BodyHandle(u64);

impl BodyHandle {
    /// Get the raw u64 value
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for BodyHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// How the restitution of a colliding pair is derived from both bodies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RestitutionRule {
    /// Use the restitution of the earlier body in insertion order
    #[default]
    First,
    /// Mean of both coefficients
    Average,
    /// Smaller of both coefficients
    Minimum,
}

impl RestitutionRule {
    pub fn combine(self, first: f64, second: f64) -> f64 {
        match self {
            RestitutionRule::First => first,
            RestitutionRule::Average => (first + second) / 2.0,
            RestitutionRule::Minimum => first.min(second),
        }
    }
}

/// World-level configuration
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct WorldConfig {
    pub restitution: RestitutionRule,
}

#[derive(Debug, Clone)]
struct Entry {
    handle: BodyHandle,
    body: RigidBody,
}

/// Ordered collection of rigid bodies stepped together
///
/// Insertion order decides pair order during a step, so the same sequence of
/// calls always reproduces the same trajectories.
#[derive(Debug, Clone, Default)]
pub struct PhysicsWorld {
    config: WorldConfig,
    entries: Vec<Entry>,
    next_handle: u64,
    /// Collisions resolved during the last step
    contacts: Vec<Contact>,
}

impl PhysicsWorld {
    /// Create an empty world with default settings
    pub fn new() -> Self {
        Self::with_config(WorldConfig::default())
    }

    /// Create an empty world with custom settings
    pub fn with_config(config: WorldConfig) -> Self {
        Self {
            config,
            entries: Vec::new(),
            next_handle: 0,
            contacts: Vec::new(),
        }
    }

    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    /// Add a body at the end of the collection
    pub fn add(&mut self, body: RigidBody) -> BodyHandle {
        let handle = BodyHandle(self.next_handle);
        self.next_handle += 1;
        self.entries.push(Entry { handle, body });
        log::debug!("Body added {}", handle);
        handle
    }

    /// Add several bodies, keeping their order
    pub fn add_all<I>(&mut self, bodies: I) -> Vec<BodyHandle>
    where
        I: IntoIterator<Item = RigidBody>,
    {
        bodies.into_iter().map(|body| self.add(body)).collect()
    }

    /// Remove a body, returning it
    pub fn remove(&mut self, handle: BodyHandle) -> Result<RigidBody, PhysicsError> {
        let index = self
            .entries
            .iter()
            .position(|entry| entry.handle == handle)
            .ok_or(PhysicsError::NotFound(handle))?;
        let entry = self.entries.remove(index);
        log::debug!("Body removed {}", handle);
        Ok(entry.body)
    }

    /// Remove every body matching `predicate`, returning their handles
    pub fn cull<F>(&mut self, mut predicate: F) -> Vec<BodyHandle>
    where
        F: FnMut(&RigidBody) -> bool,
    {
        let mut removed = Vec::new();
        self.entries.retain(|entry| {
            if predicate(&entry.body) {
                removed.push(entry.handle);
                false
            } else {
                true
            }
        });
        for handle in &removed {
            log::debug!("Body removed {}", handle);
        }
        removed
    }

    pub fn get(&self, handle: BodyHandle) -> Option<&RigidBody> {
        self.entries
            .iter()
            .find(|entry| entry.handle == handle)
            .map(|entry| &entry.body)
    }

    pub fn get_mut(&mut self, handle: BodyHandle) -> Option<&mut RigidBody> {
        self.entries
            .iter_mut()
            .find(|entry| entry.handle == handle)
            .map(|entry| &mut entry.body)
    }

    pub fn contains(&self, handle: BodyHandle) -> bool {
        self.get(handle).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Bodies in insertion order
    pub fn bodies(&self) -> impl Iterator<Item = (BodyHandle, &RigidBody)> {
        self.entries.iter().map(|entry| (entry.handle, &entry.body))
    }

    /// Handles in insertion order
    pub fn handles(&self) -> Vec<BodyHandle> {
        self.entries.iter().map(|entry| entry.handle).collect()
    }

    /// Collisions resolved during the last step
    pub fn contacts(&self) -> &[Contact] {
        &self.contacts
    }

    /// Advance the simulation by `dt` seconds
    ///
    /// Every pair is tested and resolved once, in insertion order, then all
    /// bodies are integrated. The world is left untouched if the step fails.
    pub fn step(&mut self, dt: f64) -> Result<(), PhysicsError> {
        let mut entries = self.entries.clone();
        let mut contacts = Vec::new();

        for i in 0..entries.len() {
            let (head, tail) = entries.split_at_mut(i + 1);
            let first = &mut head[i];
            for second in tail.iter_mut() {
                if let Some(contact) = resolve_pair(self.config.restitution, first, second)? {
                    contacts.push(contact);
                }
            }
        }

        for entry in &mut entries {
            entry.body.integrate(dt);
        }

        self.entries = entries;
        self.contacts = contacts;
        Ok(())
    }
}

/// Test one pair and apply impulses and position correction on collision
fn resolve_pair(
    rule: RestitutionRule,
    first: &mut Entry,
    second: &mut Entry,
) -> Result<Option<Contact>, PhysicsError> {
    let (a, b) = (&mut first.body, &mut second.body);
    let Some(collision) = a.test(b)? else {
        return Ok(None);
    };

    // Orient the normal from b toward a
    let direction = a.position - b.position;
    let mut normal = collision.normal.normalize()?;
    if normal.dot(direction) < 0.0 {
        normal = -normal;
    }
    let depth = collision.depth;

    let inverse_mass_sum = a.inverse_mass + b.inverse_mass;
    if inverse_mass_sum == 0.0 {
        log::trace!("Immovable pair {} / {} overlapping", first.handle, second.handle);
        return Ok(Some(Contact {
            a: first.handle,
            b: second.handle,
            normal,
            depth,
            impulse: 0.0,
            point: None,
        }));
    }

    let restitution = rule.combine(a.restitution(), b.restitution());
    let relative_velocity = (a.velocity - b.velocity).dot(normal);
    let impulse = -(1.0 + restitution) * relative_velocity / normal.dot(normal * inverse_mass_sum);

    if !a.is_immovable() {
        a.velocity += normal * (impulse * a.inverse_mass);
        a.position += normal * depth;
    }
    if !b.is_immovable() {
        b.velocity -= normal * (impulse * b.inverse_mass);
        b.position -= normal * depth;
    }

    let point = line_intersection(a.support_edge(-direction), b.support_edge(direction));
    if let Some(point) = point {
        let impulse_vector = normal * impulse;
        if !a.is_immovable() {
            a.angular_velocity += (a.position - point).dot(impulse_vector * a.inverse_inertia);
        }
        if !b.is_immovable() {
            b.angular_velocity -= (b.position - point).dot(impulse_vector * b.inverse_inertia);
        }
    }

    log::trace!(
        "Resolved {} / {}: normal {}, depth {}, impulse {}",
        first.handle,
        second.handle,
        normal,
        depth,
        impulse
    );

    Ok(Some(Contact {
        a: first.handle,
        b: second.handle,
        normal,
        depth,
        impulse,
        point,
    }))
}
