// Copyright 2025 the GridVar Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Time-based tweens derived from scene diffs.
//!
//! A [`Transition`] never mutates the scene. Hosts that animate call [`Transition::sample`]
//! each frame and draw the sampled values in place of the final ones until
//! [`Transition::end_ms`] has passed.

use alloc::vec::Vec;

use kurbo::{Point, Rect};

use crate::mark::{MarkId, MarkPayload};
use crate::scene::MarkDiff;

/// Easing curve applied to normalized time.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Easing {
    /// `t`.
    Linear,
    /// Symmetric cubic ease-in-out.
    #[default]
    CubicInOut,
}

impl Easing {
    /// Maps `t` in `0..=1` to eased progress.
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::CubicInOut => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    let u = -2.0 * t + 2.0;
                    1.0 - u * u * u / 2.0
                }
            }
        }
    }
}

/// The animated property of one mark.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TweenValue {
    /// Origin (group, path or text position) moves from `from` to `to`.
    Translate {
        /// Start origin.
        from: Point,
        /// End origin.
        to: Point,
    },
    /// Rectangle geometry interpolates edge by edge.
    Rect {
        /// Start geometry.
        from: Rect,
        /// End geometry.
        to: Rect,
    },
    /// Opacity interpolates linearly in eased time.
    Opacity {
        /// Start opacity.
        from: f64,
        /// End opacity.
        to: f64,
    },
}

/// One animated property with its start delay.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tween {
    /// Animated mark.
    pub id: MarkId,
    /// Delay before this tween starts, in milliseconds.
    pub delay_ms: f64,
    /// What moves.
    pub value: TweenValue,
}

/// Values of a mark at a point in time. Fields are `None` when the mark has no tween
/// for that property.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Sampled {
    /// Interpolated origin.
    pub origin: Option<Point>,
    /// Interpolated rectangle.
    pub rect: Option<Rect>,
    /// Interpolated opacity.
    pub opacity: Option<f64>,
}

/// A set of tweens sharing one duration and easing.
#[derive(Clone, Debug, PartialEq)]
pub struct Transition {
    /// Duration of each tween, in milliseconds.
    pub duration_ms: f64,
    /// Easing curve.
    pub easing: Easing,
    /// Tweens, in the order they were added.
    pub tweens: Vec<Tween>,
}

impl Transition {
    /// Creates an empty transition.
    pub fn new(duration_ms: f64) -> Self {
        Self {
            duration_ms: duration_ms.max(0.0),
            easing: Easing::default(),
            tweens: Vec::new(),
        }
    }

    /// Sets the easing curve.
    pub fn with_easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    /// Builds tweens for the given diffs.
    ///
    /// - Updates that move a mark become a `Translate` tween, or a `Rect` tween for rectangles.
    /// - Entering rectangles grow from zero width at their right edge.
    /// - Entering text fades in.
    /// - Exits are immediate.
    ///
    /// The `n`-th tween produced is delayed by `n * stagger_ms`.
    pub fn from_diffs(diffs: &[MarkDiff], duration_ms: f64, stagger_ms: f64) -> Self {
        let mut out = Self::new(duration_ms);
        for diff in diffs {
            let value = match diff {
                MarkDiff::Update { old, new, .. } => match (&**old, &**new) {
                    (MarkPayload::Rect(a), MarkPayload::Rect(b)) if a.rect != b.rect => {
                        Some(TweenValue::Rect {
                            from: a.rect,
                            to: b.rect,
                        })
                    }
                    (a, b) if a.kind() == b.kind() && a.origin() != b.origin() => {
                        Some(TweenValue::Translate {
                            from: a.origin(),
                            to: b.origin(),
                        })
                    }
                    _ => None,
                },
                MarkDiff::Enter { new, .. } => match &**new {
                    MarkPayload::Rect(r) => Some(TweenValue::Rect {
                        from: Rect::new(r.rect.x1, r.rect.y0, r.rect.x1, r.rect.y1),
                        to: r.rect,
                    }),
                    MarkPayload::Text(t) => Some(TweenValue::Opacity {
                        from: 0.0,
                        to: t.opacity,
                    }),
                    _ => None,
                },
                MarkDiff::Exit { .. } => None,
            };
            if let Some(value) = value {
                out.push_staggered(diff.id(), stagger_ms, value);
            }
        }
        out
    }

    /// Builds opacity `0 → 1` tweens for `ids`, the `n`-th delayed by `n * stagger_ms`.
    pub fn fade_in(ids: impl IntoIterator<Item = MarkId>, duration_ms: f64, stagger_ms: f64) -> Self {
        let mut out = Self::new(duration_ms);
        for id in ids {
            out.push_staggered(id, stagger_ms, TweenValue::Opacity { from: 0.0, to: 1.0 });
        }
        out
    }

    fn push_staggered(&mut self, id: MarkId, stagger_ms: f64, value: TweenValue) {
        #[allow(
            clippy::cast_precision_loss,
            reason = "tween counts are far below 2^52"
        )]
        let delay_ms = self.tweens.len() as f64 * stagger_ms.max(0.0);
        self.tweens.push(Tween {
            id,
            delay_ms,
            value,
        });
    }

    /// Appends the tweens of `other`. `other`'s duration and easing are discarded.
    pub fn merge(&mut self, other: Self) {
        self.tweens.extend(other.tweens);
    }

    /// Whether there is nothing to animate.
    pub fn is_empty(&self) -> bool {
        self.tweens.is_empty()
    }

    /// Time at which the last tween finishes.
    pub fn end_ms(&self) -> f64 {
        self.tweens
            .iter()
            .map(|t| t.delay_ms + self.duration_ms)
            .fold(0.0, f64::max)
    }

    /// Samples every tween of `id` at `t_ms` since the transition started.
    pub fn sample(&self, id: MarkId, t_ms: f64) -> Sampled {
        let mut out = Sampled::default();
        for tween in self.tweens.iter().filter(|tw| tw.id == id) {
            let local = t_ms - tween.delay_ms;
            let raw = if self.duration_ms <= 0.0 {
                if local >= 0.0 { 1.0 } else { 0.0 }
            } else {
                local / self.duration_ms
            };
            let k = self.easing.apply(raw);
            match tween.value {
                TweenValue::Translate { from, to } => out.origin = Some(from.lerp(to, k)),
                TweenValue::Rect { from, to } => out.rect = Some(lerp_rect(from, to, k)),
                TweenValue::Opacity { from, to } => out.opacity = Some(from + (to - from) * k),
            }
        }
        out
    }
}

fn lerp_rect(a: Rect, b: Rect, t: f64) -> Rect {
    Rect::new(
        a.x0 + (b.x0 - a.x0) * t,
        a.y0 + (b.y0 - a.y0) * t,
        a.x1 + (b.x1 - a.x1) * t,
        a.y1 + (b.y1 - a.y1) * t,
    )
}
