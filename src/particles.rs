//! Particle arena
//!
//! A fixed number of particle slots. Free slots sit in a FIFO list so the slot
//! released longest ago is reused first. Visual only, never affects gameplay.

use std::collections::VecDeque;

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

/// Gravity applied to burst particles (pixels/s²)
const PARTICLE_GRAVITY: f32 = 400.0;
/// Life lost per second (1.0 = full life)
const FADE_RATE: f32 = 1.6;

#[derive(Debug, Clone, Default)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    /// 0-1, decreases over time
    pub life: f32,
    pub size: f32,
    pub color: [f32; 3],
    pub active: bool,
}

#[derive(Debug, Clone)]
pub struct ParticlePool {
    slots: Vec<Particle>,
    free: VecDeque<usize>,
    rng: Pcg32,
}

impl ParticlePool {
    pub fn new(capacity: usize) -> Self {
        Self {
            slots: vec![Particle::default(); capacity],
            free: (0..capacity).collect(),
            rng: Pcg32::seed_from_u64(0x5eed),
        }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn active_count(&self) -> usize {
        self.slots.len() - self.free.len()
    }

    /// Claim the oldest free slot, or `None` if every slot is live
    pub fn acquire(&mut self) -> Option<usize> {
        let idx = self.free.pop_front()?;
        self.slots[idx].active = true;
        Some(idx)
    }

    /// Return a slot to the back of the free list
    pub fn release(&mut self, idx: usize) {
        if let Some(slot) = self.slots.get_mut(idx) {
            if slot.active {
                slot.active = false;
                self.free.push_back(idx);
            }
        }
    }

    /// Spray up to `count` particles outward from `pos`
    pub fn burst(&mut self, pos: Vec2, count: usize, color: [f32; 3]) {
        for i in 0..count {
            let Some(idx) = self.acquire() else {
                break;
            };
            let base = i as f32 / count as f32 * std::f32::consts::TAU;
            let jitter: f32 = self.rng.random_range(-0.3..0.3);
            let speed: f32 = self.rng.random_range(80.0..260.0);
            let size: f32 = self.rng.random_range(2.0..5.0);
            let angle = base + jitter;
            let slot = &mut self.slots[idx];
            slot.pos = pos;
            slot.vel = Vec2::new(angle.cos(), angle.sin()) * speed;
            slot.life = 1.0;
            slot.size = size;
            slot.color = color;
        }
    }

    pub fn update(&mut self, dt: f32) {
        for idx in 0..self.slots.len() {
            let p = &mut self.slots[idx];
            if !p.active {
                continue;
            }
            p.vel.y += PARTICLE_GRAVITY * dt;
            p.vel *= 0.99;
            p.pos += p.vel * dt;
            p.life -= dt * FADE_RATE;
            if p.life <= 0.0 {
                self.release(idx);
            }
        }
    }

    pub fn clear(&mut self) {
        for idx in 0..self.slots.len() {
            self.release(idx);
        }
    }

    pub fn active(&self) -> impl Iterator<Item = &Particle> {
        self.slots.iter().filter(|p| p.active)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pool_is_bounded() {
        let mut pool = ParticlePool::new(3);
        assert!(pool.acquire().is_some());
        assert!(pool.acquire().is_some());
        assert!(pool.acquire().is_some());
        assert_eq!(pool.acquire(), None);
        assert_eq!(pool.active_count(), 3);
    }

    #[test]
    fn test_oldest_released_reused_first() {
        let mut pool = ParticlePool::new(4);
        let slots: Vec<usize> = (0..4).filter_map(|_| pool.acquire()).collect();
        pool.release(slots[2]);
        pool.release(slots[0]);
        assert_eq!(pool.acquire(), Some(slots[2]));
        assert_eq!(pool.acquire(), Some(slots[0]));
    }

    #[test]
    fn test_double_release_is_ignored() {
        let mut pool = ParticlePool::new(2);
        let a = pool.acquire().unwrap();
        pool.release(a);
        pool.release(a);
        assert_eq!(pool.active_count(), 0);
        assert!(pool.acquire().is_some());
        assert!(pool.acquire().is_some());
        assert_eq!(pool.acquire(), None);
    }

    #[test]
    fn test_burst_fades_and_frees() {
        let mut pool = ParticlePool::new(16);
        pool.burst(Vec2::new(100.0, 100.0), 10, [1.0, 0.5, 0.2]);
        assert_eq!(pool.active_count(), 10);
        for _ in 0..120 {
            pool.update(1.0 / 60.0);
        }
        assert_eq!(pool.active_count(), 0);
    }

    #[test]
    fn test_burst_stops_when_full() {
        let mut pool = ParticlePool::new(5);
        pool.burst(Vec2::ZERO, 20, [1.0; 3]);
        assert_eq!(pool.active_count(), 5);
        assert_eq!(pool.active().count(), 5);
    }
}
