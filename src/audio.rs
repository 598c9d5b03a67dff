//! Sound-trigger interface
//!
//! The core never mixes or plays anything. Gameplay code announces events
//! through a [`SoundSink`] and the host's audio collaborator decides what,
//! if anything, to do with them. Tests hand in a [`SoundQueue`] and assert
//! on what was announced.

use crate::elapsed_since;

/// Gameplay sound events the core announces
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundId {
    BrickHit,
    BulletFire,
    PowerPickup,
}

impl SoundId {
    pub const COUNT: usize = 3;

    /// Stable name, doubles as the asset file stem
    pub fn as_str(&self) -> &'static str {
        match self {
            SoundId::BrickHit => "brick_hit",
            SoundId::BulletFire => "bullet_fire",
            SoundId::PowerPickup => "power_pickup",
        }
    }

    fn index(&self) -> usize {
        match self {
            SoundId::BrickHit => 0,
            SoundId::BulletFire => 1,
            SoundId::PowerPickup => 2,
        }
    }
}

/// Receiver for gameplay sound events
pub trait SoundSink {
    fn trigger(&mut self, sound: SoundId);
}

/// Discards every event; for headless hosts and benchmarks
#[derive(Debug, Default)]
pub struct NullSound;

impl SoundSink for NullSound {
    fn trigger(&mut self, _sound: SoundId) {}
}

/// Records events in trigger order. Hosts drain it once per frame to batch
/// playback; tests drain it to assert on what fired.
#[derive(Debug, Default)]
pub struct SoundQueue {
    queued: Vec<SoundId>,
}

impl SoundQueue {
    pub fn drain(&mut self) -> Vec<SoundId> {
        std::mem::take(&mut self.queued)
    }

    pub fn is_empty(&self) -> bool {
        self.queued.is_empty()
    }
}

impl SoundSink for SoundQueue {
    fn trigger(&mut self, sound: SoundId) {
        self.queued.push(sound);
    }
}

/// Per-sound rate limiter wrapped around another sink.
///
/// A frame with many brick hits would otherwise stack the same sample into a
/// single loud burst. The window compares against the clock supplied through
/// [`Cooldown::advance`], which the host calls once per frame.
#[derive(Debug)]
pub struct Cooldown<S: SoundSink> {
    inner: S,
    window_ms: u64,
    now_ms: u64,
    last_ms: [Option<u64>; SoundId::COUNT],
}

impl<S: SoundSink> Cooldown<S> {
    pub fn new(inner: S, window_ms: u64) -> Self {
        Self {
            inner,
            window_ms,
            now_ms: 0,
            last_ms: [None; SoundId::COUNT],
        }
    }

    /// Update the clock the suppression window compares against
    pub fn advance(&mut self, now_ms: u64) {
        self.now_ms = now_ms;
    }

    pub fn inner_mut(&mut self) -> &mut S {
        &mut self.inner
    }

    pub fn into_inner(self) -> S {
        self.inner
    }
}

impl<S: SoundSink> SoundSink for Cooldown<S> {
    fn trigger(&mut self, sound: SoundId) {
        let slot = &mut self.last_ms[sound.index()];
        if let Some(last) = *slot
            && elapsed_since(last, self.now_ms) < self.window_ms
        {
            return;
        }
        *slot = Some(self.now_ms);
        self.inner.trigger(sound);
    }
}
