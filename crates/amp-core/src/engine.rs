use fnv::FnvHashSet;
use log::debug;

use crate::error::HostError;
use crate::host::AudioHost;
use crate::registry::MediaRegistry;

/// Gain factor meaning "no amplification".
pub const UNITY_GAIN: f32 = 1.0;

/// Snapshot returned by status queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Status {
    pub gain: f32,
    pub media_count: usize,
}

/// Per-page amplification context.
///
/// Owns the registry, the lazily created output pipeline and the current
/// gain factor. One instance per page load; independent instances share
/// nothing. All entry points take `&mut self`, matching the single-threaded
/// run-to-completion callbacks that drive the engine.
pub struct AmpEngine<H: AudioHost> {
    pub(crate) host: H,
    pub(crate) pipeline: Option<H::Pipeline>,
    pub(crate) registry: MediaRegistry<H>,
    pub(crate) gain: f32,
    pub(crate) skipped: FnvHashSet<H::ElementId>,
}

impl<H: AudioHost> AmpEngine<H> {
    pub fn new(host: H) -> Self {
        Self {
            host,
            pipeline: None,
            registry: MediaRegistry::new(),
            gain: UNITY_GAIN,
            skipped: FnvHashSet::default(),
        }
    }

    /// Current amplification factor and managed element count.
    pub fn status(&self) -> Status {
        Status {
            gain: self.gain,
            media_count: self.registry.count(),
        }
    }

    /// Apply a new amplification factor to every active chain and remember
    /// it for chains built later. Also resumes the shared pipeline if the
    /// host has it suspended: this call is gesture-driven, which is exactly
    /// when hosts allow audio to start.
    pub fn set_gain(&mut self, factor: f32) {
        if !(factor > 0.0 && factor.is_finite()) {
            debug!("[gain] discarding unusable factor {}", factor);
            return;
        }
        self.gain = factor;
        if let Some(pipeline) = &self.pipeline {
            if self.host.pipeline_suspended(pipeline) {
                debug!("[gain] resuming suspended pipeline");
                self.host.resume_pipeline(pipeline);
            }
        }
        let mut applied = 0usize;
        for gain in self.registry.active_gains() {
            self.host.set_gain_value(gain, factor);
            applied += 1;
        }
        debug!("[gain] factor {} applied to {} chain(s)", factor, applied);
    }

    /// The shared pipeline, created on first need. A creation failure leaves
    /// the slot empty so a later discovery can retry.
    pub(crate) fn pipeline(&mut self) -> Result<H::Pipeline, HostError> {
        if let Some(pipeline) = &self.pipeline {
            return Ok(pipeline.clone());
        }
        let pipeline = self.host.create_pipeline()?;
        debug!("[chain] output pipeline created");
        self.pipeline = Some(pipeline.clone());
        Ok(pipeline)
    }
}
