//! Transient weapon effects: muzzle flash, magazine-insert flash and sparks.
//!
//! All of it is cosmetic. Timers here never feed back into ammo or reload state.

use glam::Vec3;
use rand::Rng;

/// Sparks spawned per magazine insert.
const INSERT_PARTICLES: usize = 2;
/// Spark lifetime (12 frames of 20 ms).
const PARTICLE_LIFETIME: f32 = 0.24;
const PARTICLE_OPACITY: f32 = 0.9;
const INSERT_LIGHT_DURATION: f32 = 0.15;
const FLASH_START_OPACITY: f32 = 0.7;
const FLASH_GROWTH: f32 = 9.375; // scale units per second
const FLASH_FADE: f32 = 6.25; // opacity per second
const FLASH_MIN_OPACITY: f32 = 0.05;

/// A pooled spark, in weapon-model local space.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Particle {
    pub position: Vec3,
    pub velocity: Vec3,
    pub age: f32,
    pub lifetime: f32,
    pub opacity: f32,
    pub active: bool,
}

impl Particle {
    fn reset(&mut self, position: Vec3, velocity: Vec3, lifetime: f32) {
        *self = Particle {
            position,
            velocity,
            age: 0.0,
            lifetime,
            opacity: PARTICLE_OPACITY,
            active: true,
        };
    }
}

/// Fixed-capacity spark pool. Slots are reset on reuse; nothing is allocated after construction.
#[derive(Debug, Clone)]
pub struct ParticlePool {
    slots: Vec<Particle>,
}

impl ParticlePool {
    pub const DEFAULT_CAPACITY: usize = 3;

    pub fn new(capacity: usize) -> Self {
        Self { slots: vec![Particle::default(); capacity] }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Claim a slot: a free one if any, otherwise the oldest live spark.
    pub fn spawn(&mut self, position: Vec3, velocity: Vec3, lifetime: f32) -> bool {
        let slot = match self.slots.iter().position(|p| !p.active) {
            Some(i) => Some(i),
            None => self
                .slots
                .iter()
                .enumerate()
                .max_by(|a, b| a.1.age.total_cmp(&b.1.age))
                .map(|(i, _)| i),
        };
        match slot {
            Some(i) => {
                self.slots[i].reset(position, velocity, lifetime);
                true
            }
            None => false,
        }
    }

    pub fn update(&mut self, dt: f32) {
        for p in self.slots.iter_mut().filter(|p| p.active) {
            p.age += dt;
            if p.age >= p.lifetime {
                p.active = false;
                p.opacity = 0.0;
                continue;
            }
            p.position += p.velocity * dt;
            p.opacity = PARTICLE_OPACITY * (1.0 - p.age / p.lifetime);
        }
    }

    /// Every slot, live or not. Renderers draw the `active` ones.
    pub fn slots(&self) -> &[Particle] {
        &self.slots
    }

    pub fn active(&self) -> impl Iterator<Item = &Particle> {
        self.slots.iter().filter(|p| p.active)
    }

    pub fn active_count(&self) -> usize {
        self.active().count()
    }

    pub fn clear(&mut self) {
        for p in &mut self.slots {
            p.active = false;
            p.opacity = 0.0;
        }
    }
}

impl Default for ParticlePool {
    fn default() -> Self {
        Self::new(Self::DEFAULT_CAPACITY)
    }
}

/// Countdown for the muzzle flash light and cone.
#[derive(Debug, Clone, Copy, Default)]
pub struct MuzzleFlash {
    remaining: f32,
}

impl MuzzleFlash {
    pub fn trigger(&mut self, duration: f32) {
        self.remaining = duration;
    }

    /// Returns true on the frame the flash expires.
    pub fn update(&mut self, dt: f32) -> bool {
        if self.remaining <= 0.0 {
            return false;
        }
        self.remaining -= dt;
        self.remaining <= 0.0
    }

    pub fn is_visible(&self) -> bool {
        self.remaining > 0.0
    }

    pub fn clear(&mut self) {
        self.remaining = 0.0;
    }
}

/// Light pulse and expanding sphere at the magazine well when a magazine seats.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InsertFlash {
    pub position: Vec3,
    pub light_remaining: f32,
    pub scale: f32,
    pub opacity: f32,
}

impl InsertFlash {
    fn new(position: Vec3) -> Self {
        Self {
            position,
            light_remaining: INSERT_LIGHT_DURATION,
            scale: 1.0,
            opacity: FLASH_START_OPACITY,
        }
    }

    pub fn light_on(&self) -> bool {
        self.light_remaining > 0.0
    }

    pub fn sphere_visible(&self) -> bool {
        self.opacity > FLASH_MIN_OPACITY
    }

    fn update(&mut self, dt: f32) {
        self.light_remaining -= dt;
        if self.sphere_visible() {
            self.scale += FLASH_GROWTH * dt;
            self.opacity -= FLASH_FADE * dt;
        }
    }

    fn finished(&self) -> bool {
        !self.light_on() && !self.sphere_visible()
    }
}

/// All transient effect state owned by one weapon controller.
#[derive(Debug, Clone, Default)]
pub struct WeaponEffects {
    pub muzzle_flash: MuzzleFlash,
    pub insert_flash: Option<InsertFlash>,
    pub particles: ParticlePool,
}

impl WeaponEffects {
    /// Spawn the magazine-seat flash and sparks around `magazine_position`.
    pub fn magazine_inserted(&mut self, magazine_position: Vec3, rng: &mut impl Rng) {
        self.insert_flash = Some(InsertFlash::new(magazine_position));

        for _ in 0..INSERT_PARTICLES {
            let jitter = Vec3::new(
                rng.gen::<f32>() - 0.5,
                rng.gen::<f32>() - 0.5,
                rng.gen::<f32>() - 0.5,
            ) * 0.05;
            // Per-20ms-frame drift, rising.
            let step = Vec3::new(
                (rng.gen::<f32>() - 0.5) * 0.03,
                0.025 + rng.gen::<f32>() * 0.015,
                (rng.gen::<f32>() - 0.5) * 0.03,
            );
            self.particles
                .spawn(magazine_position + jitter, step / 0.02, PARTICLE_LIFETIME);
        }
    }

    /// Advance all timers. Returns true if the muzzle flash expired this frame.
    pub fn update(&mut self, dt: f32) -> bool {
        let flash_expired = self.muzzle_flash.update(dt);
        if let Some(flash) = self.insert_flash.as_mut() {
            flash.update(dt);
            if flash.finished() {
                self.insert_flash = None;
            }
        }
        self.particles.update(dt);
        flash_expired
    }

    pub fn clear(&mut self) {
        self.muzzle_flash.clear();
        self.insert_flash = None;
        self.particles.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn pool_never_grows_and_recycles_oldest() {
        let mut pool = ParticlePool::new(3);
        for i in 0..3 {
            assert!(pool.spawn(Vec3::ZERO, Vec3::Y, 1.0));
            pool.update(0.1 * (i + 1) as f32);
        }
        assert_eq!(pool.active_count(), 3);

        // Oldest slot (spawned first) is reset for the new spark.
        assert!(pool.spawn(Vec3::X, Vec3::ZERO, 1.0));
        assert_eq!(pool.capacity(), 3);
        assert_eq!(pool.active_count(), 3);
        let fresh = pool.active().filter(|p| p.age == 0.0).count();
        assert_eq!(fresh, 1);
    }

    #[test]
    fn particles_fade_and_expire() {
        let mut pool = ParticlePool::default();
        pool.spawn(Vec3::ZERO, Vec3::new(0.0, 1.0, 0.0), 0.24);
        pool.update(0.12);
        let p = *pool.active().next().expect("live spark");
        assert!((p.opacity - 0.45).abs() < 1e-5);
        assert!((p.position.y - 0.12).abs() < 1e-5);
        pool.update(0.2);
        assert_eq!(pool.active_count(), 0);
    }

    #[test]
    fn zero_capacity_pool_refuses_spawns() {
        let mut pool = ParticlePool::new(0);
        assert!(!pool.spawn(Vec3::ZERO, Vec3::ZERO, 1.0));
    }

    #[test]
    fn muzzle_flash_reports_expiry_once() {
        let mut flash = MuzzleFlash::default();
        flash.trigger(0.05);
        assert!(flash.is_visible());
        assert!(!flash.update(0.03));
        assert!(flash.update(0.03));
        assert!(!flash.is_visible());
        assert!(!flash.update(0.03));
    }

    #[test]
    fn insert_effect_spawns_sparks_and_winds_down() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut effects = WeaponEffects::default();
        effects.magazine_inserted(Vec3::new(0.0, -0.1, 0.1), &mut rng);
        assert_eq!(effects.particles.active_count(), 2);
        assert!(effects.insert_flash.is_some());
        for p in effects.particles.active() {
            assert!(p.velocity.y > 0.0);
        }

        for _ in 0..30 {
            effects.update(1.0 / 60.0);
        }
        assert!(effects.insert_flash.is_none());
        assert_eq!(effects.particles.active_count(), 0);
    }
}
