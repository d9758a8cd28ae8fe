/// A time-based interpolation between two values.
///
/// Tweens are plain values; a [`crate::TweenScheduler`] or a [`crate::ScrollController`] samples
/// them with the host's frame time.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tween {
    pub from: f32,
    pub to: f32,
    pub start_ms: u64,
    pub duration_ms: u64,
    pub easing: Easing,
}

impl Tween {
    pub fn new(from: f32, to: f32, start_ms: u64, duration_ms: u64, easing: Easing) -> Self {
        Self {
            from,
            to,
            start_ms,
            duration_ms: duration_ms.max(1),
            easing,
        }
    }

    pub fn is_done(&self, now_ms: u64) -> bool {
        now_ms.saturating_sub(self.start_ms) >= self.duration_ms
    }

    /// Elapsed fraction in `[0, 1]`, before easing.
    pub fn progress(&self, now_ms: u64) -> f32 {
        let elapsed = now_ms.saturating_sub(self.start_ms);
        (elapsed as f32 / self.duration_ms as f32).clamp(0.0, 1.0)
    }

    pub fn sample(&self, now_ms: u64) -> f32 {
        if self.is_done(now_ms) {
            return self.to;
        }
        let eased = self.easing.sample(self.progress(now_ms));
        self.from + (self.to - self.from) * eased
    }

    /// Restarts from the current value towards `new_to`.
    pub fn retarget(&mut self, now_ms: u64, new_to: f32, duration_ms: u64) {
        let cur = self.sample(now_ms);
        *self = Self::new(cur, new_to, now_ms, duration_ms, self.easing);
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Easing {
    #[default]
    Linear,
    InQuad,
    OutQuad,
    SmoothStep,
    EaseInOutCubic,
}

impl Easing {
    pub fn sample(self, t: f32) -> f32 {
        match self {
            Self::Linear => t,
            Self::InQuad => t * t,
            Self::OutQuad => t * (2.0 - t),
            Self::SmoothStep => t * t * (3.0 - 2.0 * t),
            Self::EaseInOutCubic => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    let u = -2.0 * t + 2.0;
                    1.0 - (u * u * u) / 2.0
                }
            }
        }
    }
}
