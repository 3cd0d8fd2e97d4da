// Copyright 2025 the GridVar Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Retained mark scene for GridVar.
//!
//! The widget never touches a DOM directly. Instead it generates a flat list of
//! [`Mark`]s per panel, each with a stable [`MarkId`], and hands them to a [`Scene`]:
//! - [`Scene::tick`] replaces the scene contents and reports what changed as
//!   [`MarkDiff`]s (enter/update/exit), keyed by id.
//! - [`Transition`] turns update diffs into time-based tweens that a host can sample
//!   while it animates. The scene itself always holds the final state.
//!
//! Marks nest through [`Mark::parent`]; a child's geometry is
//! relative to its parent group's origin.

#![no_std]

extern crate alloc;

mod mark;
mod scene;
mod transition;

pub use mark::{
    AttrList, GroupMark, Mark, MarkId, MarkKind, MarkPayload, PathData, PathMark, RectMark,
    TextAnchor, TextBaseline, TextMark,
};
pub use scene::{MarkDiff, Scene};
pub use transition::{Easing, Sampled, Transition, Tween, TweenValue};
