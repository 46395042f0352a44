//! Hand-rolled page and audio fakes driving the engine in native tests.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::{Rc, Weak};

use amp_core::{AudioHost, HostError, LimiterParams, MediaSearch, PageNode};

/// One fake media element. Identity is the explicit `id`; flags steer how
/// the fake host treats it.
pub struct FakeElement {
    pub id: u64,
    /// Attached to the fake document. Tests flip this before removal
    /// notifications.
    pub connected: Cell<bool>,
    /// A competing graph already owns this element's audio.
    pub capture_conflict: Cell<bool>,
    /// Set by the host on the first successful bind.
    bound: Cell<bool>,
}

pub type Element = Rc<FakeElement>;

pub fn element(id: u64) -> Element {
    Rc::new(FakeElement {
        id,
        connected: Cell::new(true),
        capture_conflict: Cell::new(false),
        bound: Cell::new(false),
    })
}

#[derive(Clone, Copy)]
pub struct FakeSource;

#[derive(Clone, Copy)]
pub struct FakeGain(u64);

#[derive(Clone, Copy)]
pub struct FakeLimiter;

pub struct FakePipeline;

/// Everything the fake host records, shared with the test through `Rc`.
#[derive(Default)]
pub struct HostState {
    pub pipelines_created: usize,
    pub suspended: bool,
    pub resumes: usize,
    pub binds: usize,
    /// Live gain stages by stage id. Entries disappear on disconnect.
    pub gains: HashMap<u64, f32>,
    pub limiters: Vec<LimiterParams>,
    pub connects: usize,
    pub disconnects: usize,
    pub fail_pipeline: bool,
    pub fail_gain: bool,
    next_stage: u64,
}

impl HostState {
    /// Values of all live gain stages, order unspecified.
    pub fn gain_values(&self) -> Vec<f32> {
        self.gains.values().copied().collect()
    }
}

pub struct FakeHost {
    pub state: Rc<RefCell<HostState>>,
}

pub fn host() -> (FakeHost, Rc<RefCell<HostState>>) {
    let state = Rc::new(RefCell::new(HostState {
        suspended: true,
        ..HostState::default()
    }));
    (
        FakeHost {
            state: state.clone(),
        },
        state,
    )
}

impl AudioHost for FakeHost {
    type Element = Element;
    type ElementId = u64;
    type WeakElement = Weak<FakeElement>;
    type Pipeline = Rc<FakePipeline>;
    type Source = FakeSource;
    type Gain = FakeGain;
    type Limiter = FakeLimiter;

    fn element_id(&self, element: &Element) -> u64 {
        element.id
    }

    fn downgrade(&self, element: &Element) -> Weak<FakeElement> {
        Rc::downgrade(element)
    }

    fn is_alive(&self, weak: &Weak<FakeElement>) -> bool {
        weak.strong_count() > 0
    }

    fn is_connected(&self, element: &Element) -> bool {
        element.connected.get()
    }

    fn create_pipeline(&self) -> Result<Rc<FakePipeline>, HostError> {
        let mut state = self.state.borrow_mut();
        if state.fail_pipeline {
            return Err(HostError::new("pipeline construction refused"));
        }
        state.pipelines_created += 1;
        Ok(Rc::new(FakePipeline))
    }

    fn pipeline_suspended(&self, _pipeline: &Rc<FakePipeline>) -> bool {
        self.state.borrow().suspended
    }

    fn resume_pipeline(&self, _pipeline: &Rc<FakePipeline>) {
        let mut state = self.state.borrow_mut();
        state.resumes += 1;
        state.suspended = false;
    }

    fn bind_source(
        &self,
        _pipeline: &Rc<FakePipeline>,
        element: &Element,
    ) -> Result<FakeSource, HostError> {
        let mut state = self.state.borrow_mut();
        state.binds += 1;
        if element.capture_conflict.get() {
            return Err(HostError::new("element already captured"));
        }
        if element.bound.get() {
            return Err(HostError::new("second bind on one element"));
        }
        element.bound.set(true);
        Ok(FakeSource)
    }

    fn create_gain(&self, _pipeline: &Rc<FakePipeline>, value: f32) -> Result<FakeGain, HostError> {
        let mut state = self.state.borrow_mut();
        if state.fail_gain {
            return Err(HostError::new("gain stage refused"));
        }
        let id = state.next_stage;
        state.next_stage += 1;
        state.gains.insert(id, value);
        Ok(FakeGain(id))
    }

    fn create_limiter(
        &self,
        _pipeline: &Rc<FakePipeline>,
        params: &LimiterParams,
    ) -> Result<FakeLimiter, HostError> {
        self.state.borrow_mut().limiters.push(*params);
        Ok(FakeLimiter)
    }

    fn connect(
        &self,
        _pipeline: &Rc<FakePipeline>,
        _source: &FakeSource,
        _gain: &FakeGain,
        _limiter: &FakeLimiter,
    ) -> Result<(), HostError> {
        self.state.borrow_mut().connects += 1;
        Ok(())
    }

    fn disconnect(&self, _source: &FakeSource, gain: &FakeGain, _limiter: &FakeLimiter) {
        let mut state = self.state.borrow_mut();
        state.disconnects += 1;
        state.gains.remove(&gain.0);
    }

    fn set_gain_value(&self, gain: &FakeGain, value: f32) {
        self.state.borrow_mut().gains.insert(gain.0, value);
    }
}

/// Fake page tree. `Text` stands in for node kinds with no query
/// capability.
#[derive(Clone)]
pub enum FakeNode {
    Media(Element),
    Container(Vec<FakeNode>),
    Text,
}

pub struct FakeScope {
    children: Vec<FakeNode>,
}

impl PageNode for FakeNode {
    type Media = Element;
    type Search = FakeScope;

    fn as_media(&self) -> Option<Element> {
        match self {
            FakeNode::Media(element) => Some(element.clone()),
            _ => None,
        }
    }

    fn as_searchable(&self) -> Option<FakeScope> {
        match self {
            FakeNode::Container(children) => Some(FakeScope {
                children: children.clone(),
            }),
            FakeNode::Media(_) => Some(FakeScope {
                children: Vec::new(),
            }),
            FakeNode::Text => None,
        }
    }
}

impl MediaSearch for FakeScope {
    type Media = Element;

    fn find_media(&self) -> Vec<Element> {
        let mut found = Vec::new();
        for child in &self.children {
            walk(child, &mut found);
        }
        found
    }
}

fn walk(node: &FakeNode, found: &mut Vec<Element>) {
    match node {
        FakeNode::Media(element) => found.push(element.clone()),
        FakeNode::Container(children) => {
            for child in children {
                walk(child, found);
            }
        }
        FakeNode::Text => {}
    }
}
