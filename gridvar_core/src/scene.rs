// Copyright 2025 the GridVar Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Keyed mark storage and diffing.

use alloc::boxed::Box;
use alloc::vec::Vec;

use hashbrown::{HashMap, HashSet};
use kurbo::Rect;

use crate::mark::{Mark, MarkId, MarkPayload};

/// A change produced by [`Scene::tick`].
#[derive(Clone, Debug, PartialEq)]
pub enum MarkDiff {
    /// A mark that was not present in the previous tick.
    Enter {
        /// Mark id.
        id: MarkId,
        /// Enclosing group.
        parent: Option<MarkId>,
        /// Paint order.
        z_index: i32,
        /// New payload.
        new: Box<MarkPayload>,
    },
    /// A mark whose payload, parent or z-index changed.
    Update {
        /// Mark id.
        id: MarkId,
        /// Enclosing group after the update.
        parent: Option<MarkId>,
        /// Paint order before the update.
        old_z_index: i32,
        /// Paint order after the update.
        new_z_index: i32,
        /// Previous payload.
        old: Box<MarkPayload>,
        /// New payload.
        new: Box<MarkPayload>,
    },
    /// A mark that is no longer present.
    Exit {
        /// Mark id.
        id: MarkId,
        /// Last payload.
        old: Box<MarkPayload>,
    },
}

impl MarkDiff {
    /// The id this diff refers to.
    pub fn id(&self) -> MarkId {
        match self {
            Self::Enter { id, .. } | Self::Update { id, .. } | Self::Exit { id, .. } => *id,
        }
    }
}

/// The current set of marks for one panel.
///
/// A scene always holds the final state of the last tick; animation is layered on top
/// by [`crate::Transition`].
#[derive(Clone, Debug, Default)]
pub struct Scene {
    marks: HashMap<MarkId, Mark>,
}

impl Scene {
    /// Creates an empty scene.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the scene contents with `marks` and returns what changed.
    ///
    /// Enter and update diffs follow the order of `marks`; exit diffs come last, sorted by id.
    /// If an id appears more than once, the last occurrence wins.
    pub fn tick(&mut self, marks: impl IntoIterator<Item = Mark>) -> Vec<MarkDiff> {
        let mut next: HashMap<MarkId, Mark> = HashMap::new();
        let mut order: Vec<MarkId> = Vec::new();
        for mark in marks {
            if next.insert(mark.id, mark.clone()).is_none() {
                order.push(mark.id);
            }
        }

        let mut diffs = Vec::new();
        for id in &order {
            let Some(new) = next.get(id) else {
                continue;
            };
            match self.marks.get(id) {
                None => diffs.push(MarkDiff::Enter {
                    id: *id,
                    parent: new.parent,
                    z_index: new.z_index,
                    new: Box::new(new.payload.clone()),
                }),
                Some(old) if old != new => diffs.push(MarkDiff::Update {
                    id: *id,
                    parent: new.parent,
                    old_z_index: old.z_index,
                    new_z_index: new.z_index,
                    old: Box::new(old.payload.clone()),
                    new: Box::new(new.payload.clone()),
                }),
                Some(_) => {}
            }
        }

        let mut exits: Vec<&Mark> = self
            .marks
            .values()
            .filter(|m| !next.contains_key(&m.id))
            .collect();
        exits.sort_by_key(|m| m.id);
        for old in exits {
            diffs.push(MarkDiff::Exit {
                id: old.id,
                old: Box::new(old.payload.clone()),
            });
        }

        self.marks = next;
        diffs
    }

    /// Removes every mark, returning exit diffs.
    pub fn clear(&mut self) -> Vec<MarkDiff> {
        self.tick(core::iter::empty())
    }

    /// Looks up a mark.
    pub fn get(&self, id: MarkId) -> Option<&Mark> {
        self.marks.get(&id)
    }

    /// Number of marks.
    pub fn len(&self) -> usize {
        self.marks.len()
    }

    /// Whether the scene has no marks.
    pub fn is_empty(&self) -> bool {
        self.marks.is_empty()
    }

    /// Iterates over every mark in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = &Mark> {
        self.marks.values()
    }

    /// Top-level marks in paint order (`z_index`, then id).
    ///
    /// Marks whose parent is not in the scene are treated as top-level.
    pub fn roots(&self) -> Vec<&Mark> {
        let mut out: Vec<&Mark> = self
            .marks
            .values()
            .filter(|m| m.parent.is_none_or(|p| !self.marks.contains_key(&p)))
            .collect();
        out.sort_by_key(|m| (m.z_index, m.id));
        out
    }

    /// Children of `parent` in paint order.
    pub fn children(&self, parent: MarkId) -> Vec<&Mark> {
        let mut out: Vec<&Mark> = self
            .marks
            .values()
            .filter(|m| m.parent == Some(parent))
            .collect();
        out.sort_by_key(|m| (m.z_index, m.id));
        out
    }

    /// Absolute origin of the group a mark is nested in, or zero.
    pub fn parent_offset(&self, id: MarkId) -> kurbo::Vec2 {
        let mut offset = kurbo::Vec2::ZERO;
        let mut seen = HashSet::new();
        let mut cursor = self.marks.get(&id).and_then(|m| m.parent);
        while let Some(pid) = cursor {
            if !seen.insert(pid) {
                break;
            }
            let Some(parent) = self.marks.get(&pid) else {
                break;
            };
            offset += parent.payload.origin().to_vec2();
            cursor = parent.parent;
        }
        offset
    }

    /// Union of the absolute bounds of all marks that have computable bounds.
    pub fn bounds(&self) -> Option<Rect> {
        let mut out: Option<Rect> = None;
        for mark in self.marks.values() {
            let Some(b) = mark.payload.bounds() else {
                continue;
            };
            let b = b + self.parent_offset(mark.id);
            out = Some(match out {
                Some(acc) => acc.union(b),
                None => b,
            });
        }
        out
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use crate::mark::{GroupMark, RectMark};
    use kurbo::Point;

    fn rect(id: u64, x: f64) -> Mark {
        Mark::new(
            MarkId::from_raw(id),
            RectMark::new(Rect::new(x, 0.0, x + 1.0, 1.0)),
        )
    }

    #[test]
    fn first_tick_enters_everything() {
        let mut scene = Scene::new();
        let diffs = scene.tick([rect(1, 0.0), rect(2, 5.0)]);
        assert_eq!(diffs.len(), 2);
        assert!(diffs.iter().all(|d| matches!(d, MarkDiff::Enter { .. })));
        assert_eq!(scene.len(), 2);
    }

    #[test]
    fn unchanged_marks_produce_no_diffs() {
        let mut scene = Scene::new();
        scene.tick([rect(1, 0.0)]);
        assert!(scene.tick([rect(1, 0.0)]).is_empty());
    }

    #[test]
    fn moved_and_removed_marks_are_reported() {
        let mut scene = Scene::new();
        scene.tick([rect(1, 0.0), rect(2, 5.0)]);
        let diffs = scene.tick([rect(1, 3.0)]);
        assert_eq!(diffs.len(), 2);
        assert!(matches!(diffs[0], MarkDiff::Update { .. }));
        assert!(matches!(diffs[1], MarkDiff::Exit { id, .. } if id == MarkId(2)));
    }

    #[test]
    fn children_are_offset_by_their_group() {
        let mut scene = Scene::new();
        let group = Mark::new(MarkId(10), GroupMark::new(Point::new(100.0, 50.0)));
        let child = rect(11, 0.0).with_parent(MarkId(10));
        scene.tick([group, child]);
        assert_eq!(scene.roots().len(), 1);
        assert_eq!(scene.children(MarkId(10)).len(), 1);
        let b = scene.bounds().expect("rects have bounds");
        assert_eq!(b.x1, 101.0);
        assert_eq!(b.y1, 51.0);
    }
}
