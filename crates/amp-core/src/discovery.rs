//! Finding media elements and keeping the registry in step with the page.

use log::{debug, info};
use smallvec::SmallVec;

use crate::chain::build_chain;
use crate::engine::AmpEngine;
use crate::error::SkipReason;
use crate::host::{AudioHost, MediaSearch, PageNode};

/// Batch scratch space; insertion batches are small in the common case.
type Found<M> = SmallVec<[M; 8]>;

impl<H: AudioHost> AmpEngine<H> {
    /// One-time startup pass over the current document.
    pub fn scan<N>(&mut self, root: &N)
    where
        N: PageNode<Media = H::Element>,
    {
        let mut found = Found::new();
        collect(root, &mut found);
        let seen = found.len();
        for element in &found {
            self.adopt(element);
        }
        info!(
            "[scan] startup saw {} media element(s), managing {}",
            seen,
            self.registry.count()
        );
    }

    /// Batch of nodes the page watch reported as inserted. Each node counts
    /// itself plus any media nested beneath it, so bulk widget insertions
    /// are picked up in one pass.
    pub fn on_inserted<N>(&mut self, nodes: &[N])
    where
        N: PageNode<Media = H::Element>,
    {
        let mut found = Found::new();
        for node in nodes {
            collect(node, &mut found);
        }
        for element in &found {
            self.adopt(element);
        }
    }

    /// Batch of nodes reported as removed: park the chains of elements that
    /// actually left the document, then reclaim entries whose element is
    /// gone entirely.
    pub fn on_removed<N>(&mut self, nodes: &[N])
    where
        N: PageNode<Media = H::Element>,
    {
        let mut found = Found::new();
        for node in nodes {
            collect(node, &mut found);
        }
        for element in &found {
            // A move within the document reports a removal too; the element
            // is still connected and its chain must stay live.
            if self.host.is_connected(element) {
                continue;
            }
            let id = self.host.element_id(element);
            if let Some(chain) = self.registry.chain_mut(id) {
                chain.park(&self.host);
                debug!("[watch] parked chain for departed element {:?}", id);
            }
        }
        let pruned = self.registry.prune(&self.host);
        if pruned > 0 {
            debug!("[watch] pruned {} discarded element(s)", pruned);
        }
    }

    /// Bring one element under management. Idempotent per element lifetime:
    /// already managed elements at most get a parked chain revived, and
    /// elements that previously failed to bind are never retried.
    fn adopt(&mut self, element: &H::Element) {
        let id = self.host.element_id(element);
        if self.skipped.contains(&id) {
            return;
        }
        if self.registry.has(id) {
            self.revive(id);
            return;
        }
        let pipeline = match self.pipeline() {
            Ok(pipeline) => pipeline,
            Err(e) => {
                debug!(
                    "[chain] skipping element {:?}: {}",
                    id,
                    SkipReason::NoPipeline(e)
                );
                return;
            }
        };
        match build_chain(&self.host, &pipeline, element, self.gain) {
            Ok(chain) => {
                let weak = self.host.downgrade(element);
                self.registry.register(id, weak, chain);
                debug!("[chain] managing element {:?} at gain {}", id, self.gain);
            }
            Err(reason) => {
                // Either the source is owned elsewhere or our own dead bind
                // now occupies it. Both are permanent for this element.
                self.skipped.insert(id);
                debug!("[chain] skipping element {:?}: {}", id, reason);
            }
        }
    }

    /// Rebuild the downstream stages of a parked chain at the current gain.
    fn revive(&mut self, id: H::ElementId) {
        let gain = self.gain;
        let pipeline = match self.pipeline() {
            Ok(pipeline) => pipeline,
            Err(e) => {
                debug!(
                    "[chain] cannot revive {:?}: {}",
                    id,
                    SkipReason::NoPipeline(e)
                );
                return;
            }
        };
        if let Some(chain) = self.registry.chain_mut(id) {
            if chain.is_active() {
                return;
            }
            match chain.revive(&self.host, &pipeline, gain) {
                Ok(()) => debug!("[chain] revived element {:?} at gain {}", id, gain),
                Err(reason) => debug!("[chain] revive failed for {:?}: {}", id, reason),
            }
        }
    }
}

/// The node itself if it is media, plus all media beneath it. Nodes without
/// the subtree query capability contribute no descendants.
fn collect<N, M>(node: &N, found: &mut Found<M>)
where
    N: PageNode<Media = M>,
{
    if let Some(element) = node.as_media() {
        found.push(element);
    }
    if let Some(scope) = node.as_searchable() {
        found.extend(scope.find_media());
    }
}
