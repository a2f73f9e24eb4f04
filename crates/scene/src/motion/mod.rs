//! Per-word animation: springs toward confirmed coordinates, idle orbits for
//! words awaiting them.
//!
//! Sampling is split from stepping. [`MotionSet::advance`] integrates springs
//! once per frame; [`MotionSet::sample`] is a pure read for time `t` and is
//! what the renderer calls.

pub mod orbit;
pub mod spring;

use std::collections::BTreeMap;

use foundation::math::Vec3;
use foundation::time::Time;
use runtime::frame::Frame;

use crate::corpus::Corpus;

pub use orbit::*;
pub use spring::*;

#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub struct MotionParams {
    pub spring: SpringParams,
    pub orbit: OrbitParams,
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub enum MotionPhase {
    /// Easing toward confirmed coordinates.
    Tracking { target: Vec3 },
    /// Orbiting the position the word had when it went idle.
    Idle { anchor: Vec3, since: Time },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Motion {
    spring: Spring,
    phase: MotionPhase,
    orbit_phase: f64,
}

impl Motion {
    pub fn new(word: &str, start: Vec3, target: Option<Vec3>, now: Time) -> Self {
        let phase = match target {
            Some(target) => MotionPhase::Tracking { target },
            None => MotionPhase::Idle {
                anchor: start,
                since: now,
            },
        };
        Self {
            spring: Spring::at_rest(start),
            phase,
            orbit_phase: phase_for(word),
        }
    }

    pub fn phase(&self) -> MotionPhase {
        self.phase
    }

    pub fn is_idle(&self) -> bool {
        matches!(self.phase, MotionPhase::Idle { .. })
    }

    /// Rendered position at time `t`.
    pub fn sample(&self, t: Time, orbit: &OrbitParams) -> Vec3 {
        match self.phase {
            MotionPhase::Tracking { .. } => self.spring.position,
            MotionPhase::Idle { anchor, since } => {
                anchor + orbit_offset(t.since(since), self.orbit_phase, orbit)
            }
        }
    }

    /// Switches between tracking and idling without moving the rendered
    /// position at `now`.
    pub fn set_target(&mut self, target: Option<Vec3>, now: Time, orbit: &OrbitParams) {
        match (self.phase, target) {
            (MotionPhase::Tracking { .. }, Some(target)) => {
                self.phase = MotionPhase::Tracking { target };
            }
            (MotionPhase::Tracking { .. }, None) => {
                self.phase = MotionPhase::Idle {
                    anchor: self.spring.position,
                    since: now,
                };
            }
            (MotionPhase::Idle { .. }, Some(target)) => {
                self.spring = Spring::at_rest(self.sample(now, orbit));
                self.phase = MotionPhase::Tracking { target };
            }
            (MotionPhase::Idle { .. }, None) => {}
        }
    }

    pub fn advance(&mut self, dt: f64, params: &SpringParams) {
        if let MotionPhase::Tracking { target } = self.phase {
            self.spring.step(target, dt, params);
        }
    }
}

/// Motions for every word of the displayed corpus.
#[derive(Debug, Clone, Default)]
pub struct MotionSet {
    motions: BTreeMap<String, Motion>,
    params: MotionParams,
}

impl MotionSet {
    pub fn new(params: MotionParams) -> Self {
        Self {
            motions: BTreeMap::new(),
            params,
        }
    }

    pub fn params(&self) -> &MotionParams {
        &self.params
    }

    pub fn len(&self) -> usize {
        self.motions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.motions.is_empty()
    }

    pub fn get(&self, word: &str) -> Option<&Motion> {
        self.motions.get(word)
    }

    /// Aligns motions with `corpus`.
    ///
    /// Words that left the corpus are dropped, new words enter at the origin
    /// marker. A word idles when it is stale or when `awaiting` is set (a
    /// fetch is in flight); otherwise it tracks its confirmed coordinates.
    pub fn sync(&mut self, corpus: &Corpus, awaiting: bool, now: Time) {
        self.motions.retain(|word, _| corpus.contains(word));
        for point in corpus.iter() {
            let target = if awaiting || point.is_stale() {
                None
            } else {
                point.world_position()
            };
            match self.motions.get_mut(point.word()) {
                Some(motion) => motion.set_target(target, now, &self.params.orbit),
                None => {
                    let motion = Motion::new(point.word(), Vec3::ZERO, target, now);
                    self.motions.insert(point.word().to_string(), motion);
                }
            }
        }
    }

    pub fn advance(&mut self, frame: &Frame) {
        for motion in self.motions.values_mut() {
            motion.advance(frame.dt_s, &self.params.spring);
        }
    }

    pub fn sample(&self, word: &str, t: Time) -> Option<Vec3> {
        self.motions
            .get(word)
            .map(|m| m.sample(t, &self.params.orbit))
    }
}
