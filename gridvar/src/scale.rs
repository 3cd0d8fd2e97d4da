// Copyright 2025 the GridVar Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scales mapping row/column keys and histogram values to pixels.

extern crate alloc;

use alloc::string::String;
use alloc::vec::Vec;

use hashbrown::HashMap;

#[cfg(not(feature = "std"))]
use crate::float::FloatExt;

/// An ordinal band scale over string keys with rounded, unpadded bands.
///
/// The range `[0, extent]` is split into `keys.len()` equal bands of integer width
/// `floor(extent / n)`, centred in the range. A scale is rebuilt from scratch for every new
/// key order; offsets are never carried over from a previous order.
#[derive(Clone, Debug, Default)]
pub struct ScaleBand {
    keys: Vec<String>,
    index: HashMap<String, usize>,
    extent: f64,
    start: f64,
    step: f64,
}

impl ScaleBand {
    /// Creates a band scale for `keys` over `[0, extent]`.
    ///
    /// Duplicate keys keep their first position.
    pub fn new<I, S>(keys: I, extent: f64) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut ordered = Vec::new();
        let mut index = HashMap::new();
        for key in keys {
            let key = key.into();
            if !index.contains_key(&key) {
                index.insert(key.clone(), ordered.len());
                ordered.push(key);
            }
        }
        #[allow(
            clippy::cast_precision_loss,
            reason = "key counts are far below 2^52"
        )]
        let n = ordered.len() as f64;
        let extent = extent.max(0.0);
        let (start, step) = if n > 0.0 {
            let step = (extent / n).floor();
            (((extent - step * n) / 2.0).round(), step)
        } else {
            (0.0, 0.0)
        };
        Self {
            keys: ordered,
            index,
            extent,
            start,
            step,
        }
    }

    /// Start offset of the band for `key`, or `None` if the key is not in the domain.
    pub fn offset(&self, key: &str) -> Option<f64> {
        let i = *self.index.get(key)?;
        #[allow(
            clippy::cast_precision_loss,
            reason = "key counts are far below 2^52"
        )]
        let i = i as f64;
        Some(self.start + self.step * i)
    }

    /// Centre of the band for `key`.
    pub fn center(&self, key: &str) -> Option<f64> {
        self.offset(key).map(|o| o + self.step * 0.5)
    }

    /// Width of every band.
    pub fn band(&self) -> f64 {
        self.step
    }

    /// The output range `(0, extent)`.
    pub fn range_extent(&self) -> (f64, f64) {
        (0.0, self.extent)
    }

    /// The key whose band contains `pos`.
    pub fn key_at(&self, pos: f64) -> Option<&str> {
        #[allow(
            clippy::cast_precision_loss,
            reason = "key counts are far below 2^52"
        )]
        let end = self.start + self.step * self.keys.len() as f64;
        if self.step <= 0.0 || pos < self.start || pos >= end {
            return None;
        }
        let i = ((pos - self.start) / self.step).floor();
        if !i.is_finite() || i < 0.0 {
            return None;
        }
        #[allow(
            clippy::cast_possible_truncation,
            clippy::cast_sign_loss,
            reason = "checked finite and non-negative; out-of-range indices miss below"
        )]
        let i = i as usize;
        self.keys.get(i).map(String::as_str)
    }

    /// Keys in band order.
    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    /// Number of keys.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Whether the domain is empty.
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

/// A linear mapping from a continuous domain to a continuous range.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScaleLinear {
    domain: (f64, f64),
    range: (f64, f64),
}

impl ScaleLinear {
    /// Creates a new scale mapping `domain` values to `range` values.
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self { domain, range }
    }

    /// Maps a value from domain space into range space.
    pub fn map(&self, x: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        let denom = d1 - d0;
        if denom == 0.0 {
            return r0;
        }
        let t = (x - d0) / denom;
        r0 + t * (r1 - r0)
    }

    /// The configured domain.
    pub fn domain(&self) -> (f64, f64) {
        self.domain
    }
}
