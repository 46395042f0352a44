use fnv::FnvHashMap;

use crate::chain::Chain;
use crate::host::AudioHost;

struct Entry<H: AudioHost> {
    element: H::WeakElement,
    chain: Chain<H>,
}

/// Association from element identity to its amplification chain.
///
/// Registration is idempotent per element lifetime and there is no
/// caller-facing removal: entries hold only a weak element handle, and
/// `prune` reclaims those whose element the page has discarded.
pub struct MediaRegistry<H: AudioHost> {
    entries: FnvHashMap<H::ElementId, Entry<H>>,
}

impl<H: AudioHost> Default for MediaRegistry<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H: AudioHost> MediaRegistry<H> {
    pub fn new() -> Self {
        Self {
            entries: FnvHashMap::default(),
        }
    }

    pub fn has(&self, id: H::ElementId) -> bool {
        self.entries.contains_key(&id)
    }

    /// Number of managed elements, parked chains included.
    pub fn count(&self) -> usize {
        self.entries.len()
    }

    /// Insert a chain for `id`. Callers check `has` first; a duplicate
    /// insert silently replaces.
    pub fn register(&mut self, id: H::ElementId, element: H::WeakElement, chain: Chain<H>) {
        self.entries.insert(id, Entry { element, chain });
    }

    pub(crate) fn chain_mut(&mut self, id: H::ElementId) -> Option<&mut Chain<H>> {
        self.entries.get_mut(&id).map(|e| &mut e.chain)
    }

    /// Gain stages of the currently active chains.
    pub(crate) fn active_gains(&self) -> impl Iterator<Item = &H::Gain> {
        self.entries.values().filter_map(|e| e.chain.gain_stage())
    }

    /// Drop entries whose element no longer exists. Returns how many were
    /// reclaimed.
    pub(crate) fn prune(&mut self, host: &H) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, e| host.is_alive(&e.element));
        before - self.entries.len()
    }
}
