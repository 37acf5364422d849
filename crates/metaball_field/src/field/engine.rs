//! Seam to the external iso-surface engine.
//!
//! The crate never reconstructs meshes itself; it pushes generators into a
//! [`MeshEngine`] once per frame via [`apply_frame`].
use glam::Vec3;
use mint::Vector3;

use crate::field::Generator;

/// Iso-surface reconstruction engine fed with metaball generators.
pub trait MeshEngine {
    /// Discard every generator added since the last reset.
    fn reset(&mut self);

    /// Register one generator for the current rebuild pass.
    fn add_generator(&mut self, position: Vector3<f32>, strength: f32, falloff: f32);

    /// Rebuild the surface from all generators added since the last reset.
    fn update(&mut self);
}

impl<E: MeshEngine + ?Sized> MeshEngine for &mut E {
    fn reset(&mut self) {
        (**self).reset();
    }

    fn add_generator(&mut self, position: Vector3<f32>, strength: f32, falloff: f32) {
        (**self).add_generator(position, strength, falloff);
    }

    fn update(&mut self) {
        (**self).update();
    }
}

/// Push one frame into `engine`: a single reset, every generator in index order, a single update.
pub fn apply_frame<E: MeshEngine + ?Sized>(engine: &mut E, generators: &[Generator]) {
    engine.reset();
    for g in generators {
        engine.add_generator(g.position.into(), g.strength, g.falloff);
    }
    engine.update();
}

/// One call observed by a [`RecordingEngine`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EngineCall {
    Reset,
    AddGenerator {
        position: Vec3,
        strength: f32,
        falloff: f32,
    },
    Update,
}

/// Engine that records the calls it receives and the generators of the last pass.
#[derive(Debug, Default)]
pub struct RecordingEngine {
    calls: Vec<EngineCall>,
    pending: Vec<EngineCall>,
    last_pass: Vec<EngineCall>,
    updates: usize,
}

impl RecordingEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every call since construction or the last [`RecordingEngine::clear`].
    pub fn calls(&self) -> &[EngineCall] {
        &self.calls
    }

    /// `AddGenerator` calls that made up the most recent `update`.
    pub fn last_pass(&self) -> &[EngineCall] {
        &self.last_pass
    }

    /// Number of `update` calls received.
    pub fn updates(&self) -> usize {
        self.updates
    }

    pub fn clear(&mut self) {
        self.calls.clear();
        self.pending.clear();
        self.last_pass.clear();
        self.updates = 0;
    }
}

impl MeshEngine for RecordingEngine {
    fn reset(&mut self) {
        self.calls.push(EngineCall::Reset);
        self.pending.clear();
    }

    fn add_generator(&mut self, position: Vector3<f32>, strength: f32, falloff: f32) {
        let call = EngineCall::AddGenerator {
            position: Vec3::from(position),
            strength,
            falloff,
        };
        self.calls.push(call);
        self.pending.push(call);
    }

    fn update(&mut self) {
        self.calls.push(EngineCall::Update);
        self.last_pass = std::mem::take(&mut self.pending);
        self.updates += 1;
    }
}
