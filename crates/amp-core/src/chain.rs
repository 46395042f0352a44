use crate::error::SkipReason;
use crate::host::AudioHost;

/// Dynamics limiter settings. Fixed at build time, not runtime configurable.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LimiterParams {
    pub threshold_db: f32,
    pub knee_db: f32,
    pub ratio: f32,
    pub attack_sec: f32,
    pub release_sec: f32,
}

/// The limiter every chain is built with. Hard-knee-ish compression that
/// only bites near full scale, so amplified audio stops short of clipping.
pub const LIMITER: LimiterParams = LimiterParams {
    threshold_db: -6.0,
    knee_db: 30.0,
    ratio: 12.0,
    attack_sec: 0.003,
    release_sec: 0.25,
};

struct Downstream<H: AudioHost> {
    gain: H::Gain,
    limiter: H::Limiter,
}

/// Per-element amplification chain.
///
/// The source stage lives as long as the element does: the platform allows
/// exactly one source bind per element, so it is never released. The gain
/// and limiter stages are dropped while the chain is parked (element left
/// the document) and rebuilt on revival.
pub struct Chain<H: AudioHost> {
    source: H::Source,
    downstream: Option<Downstream<H>>,
}

impl<H: AudioHost> Chain<H> {
    pub fn is_active(&self) -> bool {
        self.downstream.is_some()
    }

    pub(crate) fn gain_stage(&self) -> Option<&H::Gain> {
        self.downstream.as_ref().map(|d| &d.gain)
    }

    /// Disconnect and drop the downstream stages, keeping the bound source.
    pub fn park(&mut self, host: &H) {
        if let Some(d) = self.downstream.take() {
            host.disconnect(&self.source, &d.gain, &d.limiter);
        }
    }

    /// Rebuild gain and limiter from the retained source. No-op on an
    /// already active chain.
    pub fn revive(
        &mut self,
        host: &H,
        pipeline: &H::Pipeline,
        gain_value: f32,
    ) -> Result<(), SkipReason> {
        if self.downstream.is_none() {
            self.downstream = Some(build_downstream(host, pipeline, &self.source, gain_value)?);
        }
        Ok(())
    }
}

/// Build the full chain for a freshly discovered element: bind the source,
/// then wire source -> gain -> limiter -> shared output. The gain stage is
/// initialized from the engine's current gain so late-built chains need no
/// backfill.
pub fn build_chain<H: AudioHost>(
    host: &H,
    pipeline: &H::Pipeline,
    element: &H::Element,
    gain_value: f32,
) -> Result<Chain<H>, SkipReason> {
    let source = host
        .bind_source(pipeline, element)
        .map_err(SkipReason::SourceTaken)?;
    let downstream = build_downstream(host, pipeline, &source, gain_value)?;
    Ok(Chain {
        source,
        downstream: Some(downstream),
    })
}

fn build_downstream<H: AudioHost>(
    host: &H,
    pipeline: &H::Pipeline,
    source: &H::Source,
    gain_value: f32,
) -> Result<Downstream<H>, SkipReason> {
    let gain = host
        .create_gain(pipeline, gain_value)
        .map_err(SkipReason::StageFailed)?;
    let limiter = host
        .create_limiter(pipeline, &LIMITER)
        .map_err(SkipReason::StageFailed)?;
    host.connect(pipeline, source, &gain, &limiter)
        .map_err(SkipReason::StageFailed)?;
    Ok(Downstream { gain, limiter })
}
