//! web-sys implementation of the engine's platform seam.

use std::cell::Cell;

use amp_core::{AudioHost, HostError, LimiterParams};
use wasm_bindgen::JsValue;
use web_sys as web;

/// Element identity comes from a stamp stored in a `WeakMap`, so the host
/// itself never keeps a page element alive and identical-looking elements
/// still get distinct ids.
pub struct WebHost {
    stamps: js_sys::WeakMap,
    next_id: Cell<u64>,
}

impl WebHost {
    pub fn new() -> Self {
        Self {
            stamps: js_sys::WeakMap::new(),
            next_id: Cell::new(1),
        }
    }
}

impl Default for WebHost {
    fn default() -> Self {
        Self::new()
    }
}

#[inline]
fn host_err(stage: &str, value: &JsValue) -> HostError {
    HostError::new(format!("{} error: {:?}", stage, value))
}

impl AudioHost for WebHost {
    type Element = web::HtmlMediaElement;
    type ElementId = u64;
    type WeakElement = js_sys::WeakRef;
    type Pipeline = web::AudioContext;
    type Source = web::MediaElementAudioSourceNode;
    type Gain = web::GainNode;
    type Limiter = web::DynamicsCompressorNode;

    fn element_id(&self, element: &Self::Element) -> u64 {
        if let Some(id) = self.stamps.get(element).as_f64() {
            return id as u64;
        }
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        self.stamps.set(element, &JsValue::from_f64(id as f64));
        id
    }

    fn downgrade(&self, element: &Self::Element) -> js_sys::WeakRef {
        js_sys::WeakRef::new(element)
    }

    fn is_alive(&self, weak: &js_sys::WeakRef) -> bool {
        !weak.deref().is_undefined()
    }

    fn is_connected(&self, element: &Self::Element) -> bool {
        element.is_connected()
    }

    fn create_pipeline(&self) -> Result<web::AudioContext, HostError> {
        web::AudioContext::new().map_err(|e| host_err("AudioContext", &e))
    }

    fn pipeline_suspended(&self, pipeline: &web::AudioContext) -> bool {
        pipeline.state() == web::AudioContextState::Suspended
    }

    fn resume_pipeline(&self, pipeline: &web::AudioContext) {
        // resume() returns a promise; the state flip lands asynchronously.
        _ = pipeline.resume();
    }

    fn bind_source(
        &self,
        pipeline: &web::AudioContext,
        element: &web::HtmlMediaElement,
    ) -> Result<web::MediaElementAudioSourceNode, HostError> {
        pipeline
            .create_media_element_source(element)
            .map_err(|e| host_err("MediaElementAudioSourceNode", &e))
    }

    fn create_gain(
        &self,
        pipeline: &web::AudioContext,
        value: f32,
    ) -> Result<web::GainNode, HostError> {
        let gain = web::GainNode::new(pipeline).map_err(|e| host_err("GainNode", &e))?;
        gain.gain().set_value(value);
        Ok(gain)
    }

    fn create_limiter(
        &self,
        pipeline: &web::AudioContext,
        params: &LimiterParams,
    ) -> Result<web::DynamicsCompressorNode, HostError> {
        let limiter =
            web::DynamicsCompressorNode::new(pipeline).map_err(|e| host_err("DynamicsCompressorNode", &e))?;
        limiter.threshold().set_value(params.threshold_db);
        limiter.knee().set_value(params.knee_db);
        limiter.ratio().set_value(params.ratio);
        limiter.attack().set_value(params.attack_sec);
        limiter.release().set_value(params.release_sec);
        Ok(limiter)
    }

    fn connect(
        &self,
        pipeline: &web::AudioContext,
        source: &web::MediaElementAudioSourceNode,
        gain: &web::GainNode,
        limiter: &web::DynamicsCompressorNode,
    ) -> Result<(), HostError> {
        source
            .connect_with_audio_node(gain)
            .map_err(|e| host_err("connect source", &e))?;
        gain.connect_with_audio_node(limiter)
            .map_err(|e| host_err("connect gain", &e))?;
        limiter
            .connect_with_audio_node(&pipeline.destination())
            .map_err(|e| host_err("connect limiter", &e))?;
        Ok(())
    }

    fn disconnect(
        &self,
        source: &web::MediaElementAudioSourceNode,
        gain: &web::GainNode,
        limiter: &web::DynamicsCompressorNode,
    ) {
        _ = source.disconnect_with_audio_node(gain);
        _ = gain.disconnect();
        _ = limiter.disconnect();
    }

    fn set_gain_value(&self, gain: &web::GainNode, value: f32) {
        gain.gain().set_value(value);
    }
}
