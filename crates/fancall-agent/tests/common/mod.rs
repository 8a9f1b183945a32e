//! Shared doubles for dispatch tests.

#![allow(dead_code)]

use fancall_agent::env::{
    FISH_API_KEY, HEDRA_API_KEY, HEDRA_ENABLED, LIVEKIT_API_KEY, LIVEKIT_API_SECRET, LIVEKIT_URL,
    OPENAI_API_KEY,
};
use fancall_agent::DeploymentEnv;
use fancall_voice::{AcquisitionError, Capabilities, ImageAcquirer, Room, VoiceError};
use image::RgbImage;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoomCall {
    Connect,
    StartSession { avatar: bool, instructions: String },
    Shutdown(String),
}

/// A room that records every call made on it.
#[derive(Clone, Default)]
pub struct RecordingRoom {
    calls: Arc<Mutex<Vec<RoomCall>>>,
    fail_connect: bool,
}

impl RecordingRoom {
    pub fn failing_connect() -> Self {
        Self {
            fail_connect: true,
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<RoomCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn shutdowns(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                RoomCall::Shutdown(reason) => Some(reason),
                _ => None,
            })
            .collect()
    }

    pub fn connected(&self) -> bool {
        self.calls().contains(&RoomCall::Connect)
    }

    pub fn started(&self) -> bool {
        self.calls()
            .iter()
            .any(|call| matches!(call, RoomCall::StartSession { .. }))
    }

    fn record(&self, call: RoomCall) {
        self.calls.lock().unwrap().push(call);
    }
}

impl Room for RecordingRoom {
    fn name(&self) -> &str {
        "test-room"
    }

    async fn connect(&mut self) -> Result<(), VoiceError> {
        self.record(RoomCall::Connect);
        if self.fail_connect {
            return Err(VoiceError::RoomService("connection refused".to_string()));
        }
        Ok(())
    }

    async fn start_session(&mut self, capabilities: &Capabilities) -> Result<(), VoiceError> {
        self.record(RoomCall::StartSession {
            avatar: capabilities.avatar.is_some(),
            instructions: capabilities.instructions.clone(),
        });
        Ok(())
    }

    fn shutdown(&mut self, reason: &str) {
        self.record(RoomCall::Shutdown(reason.to_string()));
    }
}

/// An image acquirer that counts invocations and never touches the network.
#[derive(Clone, Default)]
pub struct StubAcquirer {
    calls: Arc<AtomicUsize>,
    fail: bool,
    delay: Option<Duration>,
}

impl StubAcquirer {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    /// An acquirer whose fetches take `delay` to complete.
    pub fn slow(delay: Duration) -> Self {
        Self {
            delay: Some(delay),
            ..Self::default()
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl ImageAcquirer for StubAcquirer {
    async fn acquire(&self, reference: &str) -> Result<RgbImage, AcquisitionError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail {
            return Err(AcquisitionError::FetchFailed {
                status: Some(404),
                message: format!("{} not found", reference),
            });
        }
        Ok(RgbImage::new(4, 4))
    }
}

/// A complete deployment environment with avatar mode on or off.
pub fn full_env(avatar: bool) -> Vec<(&'static str, &'static str)> {
    let mut pairs = vec![
        (FISH_API_KEY, "fish-key"),
        (OPENAI_API_KEY, "sk-test"),
        (LIVEKIT_URL, "ws://localhost:7880"),
        (LIVEKIT_API_KEY, "devkey"),
        (LIVEKIT_API_SECRET, "devsecret"),
    ];
    if avatar {
        pairs.push((HEDRA_ENABLED, "true"));
        pairs.push((HEDRA_API_KEY, "hedra-key"));
    }
    pairs
}

pub fn env_without(avatar: bool, key: &str) -> DeploymentEnv {
    DeploymentEnv::from_pairs(full_env(avatar).into_iter().filter(|(k, _)| *k != key))
}
