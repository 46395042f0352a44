//! Platform seam for the engine.
//!
//! Everything the engine needs from the page and its audio system is
//! expressed through these traits, so the same logic runs against web-sys in
//! the browser shell and against plain fakes in native tests.

use std::fmt::Debug;
use std::hash::Hash;

use crate::chain::LimiterParams;
use crate::error::HostError;

/// Audio graph and element identity services provided by the platform.
pub trait AudioHost {
    /// Handle to one media element. Cloning is cheap on real hosts.
    type Element: Clone;
    /// Stable identity for an element. Two attribute-identical elements must
    /// yield distinct ids.
    type ElementId: Copy + Eq + Hash + Debug;
    /// Non-owning element handle used for liveness checks.
    type WeakElement;
    /// Shared output pipeline, at most one per engine.
    type Pipeline: Clone;
    type Source;
    type Gain;
    type Limiter;

    fn element_id(&self, element: &Self::Element) -> Self::ElementId;
    fn downgrade(&self, element: &Self::Element) -> Self::WeakElement;
    /// Whether the element behind a weak handle still exists.
    fn is_alive(&self, weak: &Self::WeakElement) -> bool;
    /// Whether the element is currently attached to the document.
    fn is_connected(&self, element: &Self::Element) -> bool;

    fn create_pipeline(&self) -> Result<Self::Pipeline, HostError>;
    fn pipeline_suspended(&self, pipeline: &Self::Pipeline) -> bool;
    /// Best-effort resume. Hosts keep pipelines suspended until a user
    /// gesture; the state flip may land after this call returns.
    fn resume_pipeline(&self, pipeline: &Self::Pipeline);

    /// Bind a source stage to `element`. At most one bind per element per
    /// page lifetime; fails if the element is captured by another graph.
    fn bind_source(
        &self,
        pipeline: &Self::Pipeline,
        element: &Self::Element,
    ) -> Result<Self::Source, HostError>;
    fn create_gain(&self, pipeline: &Self::Pipeline, value: f32)
        -> Result<Self::Gain, HostError>;
    fn create_limiter(
        &self,
        pipeline: &Self::Pipeline,
        params: &LimiterParams,
    ) -> Result<Self::Limiter, HostError>;
    /// Wire source -> gain -> limiter -> shared output.
    fn connect(
        &self,
        pipeline: &Self::Pipeline,
        source: &Self::Source,
        gain: &Self::Gain,
        limiter: &Self::Limiter,
    ) -> Result<(), HostError>;
    /// Detach the downstream stages when a chain is parked. The source stays
    /// bound; only gain and limiter leave the graph.
    fn disconnect(&self, source: &Self::Source, gain: &Self::Gain, limiter: &Self::Limiter);

    fn set_gain_value(&self, gain: &Self::Gain, value: f32);
}

/// A node delivered by the page watch, or the document root at startup.
///
/// Capabilities are explicit: a node either is a media element, or can be
/// searched for media beneath it, or neither (text and comment nodes).
pub trait PageNode {
    type Media;
    type Search: MediaSearch<Media = Self::Media>;

    /// The node itself, when it is a qualifying media element.
    fn as_media(&self) -> Option<Self::Media>;
    /// The subtree query capability, when this node kind has one. Absence
    /// means "no nested media", not an error.
    fn as_searchable(&self) -> Option<Self::Search>;
}

/// Capability to find qualifying media elements anywhere beneath a node.
pub trait MediaSearch {
    type Media;

    fn find_media(&self) -> Vec<Self::Media>;
}
