//! Control surface: typed request/response messages and their handling.
//!
//! The wire format is JSON with a `type` tag. Unknown kinds deserialize to
//! [`Request::Unknown`] instead of failing, so every request gets answered
//! and the reply channel is never left hanging.

use serde::{Deserialize, Serialize};

use crate::engine::AmpEngine;
use crate::host::AudioHost;

/// Inbound control message.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Request {
    /// Apply a new amplification factor to every managed chain.
    SetGain { value: f32 },
    /// Report current gain and managed element count. Mutates nothing.
    GetStatus,
    /// Anything this build does not understand.
    #[serde(other)]
    Unknown,
}

/// Outbound reply payload. `Empty` serializes as `{}`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Response {
    #[serde(rename_all = "camelCase")]
    SetGain { success: bool, media_count: usize },
    #[serde(rename_all = "camelCase")]
    Status { gain: f32, media_count: usize },
    Empty {},
}

impl<H: AudioHost> AmpEngine<H> {
    /// One request in, exactly one response out.
    pub fn handle(&mut self, request: Request) -> Response {
        match request {
            Request::SetGain { value } => {
                self.set_gain(value);
                Response::SetGain {
                    success: true,
                    media_count: self.status().media_count,
                }
            }
            Request::GetStatus => {
                let status = self.status();
                Response::Status {
                    gain: status.gain,
                    media_count: status.media_count,
                }
            }
            Request::Unknown => Response::Empty {},
        }
    }
}
