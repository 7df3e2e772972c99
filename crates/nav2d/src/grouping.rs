//! Grouping coordinator
//!
//! Groups are exactly the connected components of the AABB-overlap graph
//! over current elements. Two mechanisms keep them that way:
//!
//! - element-level regroup: an element queries the quadtree for its
//!   overlap neighbourhood and either founds a group, adopts the single
//!   incumbent, or merges several incumbents under a fresh id;
//! - dismantle: before an element moves or disappears, its whole group is
//!   cleared and every former member is re-queued, since the change may
//!   bridge or sever components.
//!
//! Merging always allocates a fresh id and absorbs every member of every
//! incumbent group, which is what empties the incumbents and lets them be
//! dropped. Queue draining runs each element at most once per settle pass;
//! later id reassignments reach already-processed elements through the
//! group-level absorption, not through a second run.

use crate::element::{ElementId, NavElement};
use crate::group::{ElementGroup, GroupId};
use crate::quadtree::QuadTree;
use std::collections::{BTreeMap, BTreeSet, HashSet, VecDeque};

/// Mutable scratch of one settle pass: the regroup queue, the processed
/// set, and the group ids whose membership changed
#[derive(Debug, Default)]
pub(crate) struct RegroupState {
    queue: VecDeque<ElementId>,
    seen: HashSet<ElementId>,
    rebuild: BTreeSet<GroupId>,
    neighbours: Vec<ElementId>,
    changed: bool,
}

impl RegroupState {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn enqueue(&mut self, id: ElementId) {
        self.queue.push_back(id);
        self.changed = true;
    }

    /// Group ids marked for rebuild during the drain
    pub(crate) fn rebuild_ids(&self) -> &BTreeSet<GroupId> {
        &self.rebuild
    }

    /// True once any membership or queue activity happened
    pub(crate) fn has_changes(&self) -> bool {
        self.changed
    }
}

/// Clears a group's membership, re-queues every former member and drops
/// the group from the table
pub(crate) fn dismantle_group(
    group_id: GroupId,
    elements: &mut BTreeMap<ElementId, NavElement>,
    groups: &mut BTreeMap<GroupId, ElementGroup>,
    state: &mut RegroupState,
) {
    let Some(group) = groups.remove(&group_id) else {
        return;
    };
    for member in group.member_ids() {
        if let Some(e) = elements.get_mut(&member) {
            e.set_group_id(GroupId::NONE);
            state.enqueue(member);
        }
    }
    state.changed = true;
    log::debug!("dismantled group {group_id}");
}

/// Drains the regroup queue, running element-level regroup on each queued
/// element at most once
pub(crate) fn drain_regroup(
    elements: &mut BTreeMap<ElementId, NavElement>,
    groups: &mut BTreeMap<GroupId, ElementGroup>,
    tree: &QuadTree,
    next_group_id: &mut u32,
    state: &mut RegroupState,
) {
    while let Some(id) = state.queue.pop_front() {
        if !state.seen.insert(id) {
            continue;
        }
        if !elements.contains_key(&id) {
            continue;
        }
        regroup_element(id, elements, groups, tree, next_group_id, state);
    }
}

fn alloc_group_id(next_group_id: &mut u32) -> GroupId {
    let id = GroupId(*next_group_id);
    *next_group_id += 1;
    id
}

fn regroup_element(
    id: ElementId,
    elements: &mut BTreeMap<ElementId, NavElement>,
    groups: &mut BTreeMap<GroupId, ElementGroup>,
    tree: &QuadTree,
    next_group_id: &mut u32,
    state: &mut RegroupState,
) {
    let rect = match elements.get(&id) {
        Some(e) => e.rect(),
        None => return,
    };

    let mut neighbours = std::mem::take(&mut state.neighbours);
    tree.query_intersecting(&rect, &mut neighbours);
    if neighbours.is_empty() {
        // The element queries its own rect, so it is always its own
        // neighbour while indexed; an empty result means it is not.
        log::warn!("regroup of {id} found no neighbourhood, element not indexed");
        state.neighbours = neighbours;
        return;
    }

    let incumbents: BTreeSet<GroupId> = neighbours
        .iter()
        .filter_map(|n| elements.get(n))
        .map(|e| e.group_id())
        .filter(|g| !g.is_none())
        .collect();

    let target = match incumbents.len() {
        // Nobody around carries a group yet: found a fresh one. This covers
        // both the solo element and a cluster of still-unassigned elements.
        0 => {
            let fresh = alloc_group_id(next_group_id);
            groups.insert(fresh, ElementGroup::new(fresh));
            fresh
        }
        // A single incumbent: everyone in the neighbourhood adopts it.
        1 => *incumbents.iter().next().unwrap_or(&GroupId::NONE),
        // Several incumbents are bridged: merge them under a fresh id,
        // absorbing all of their members, and let the emptied groups go.
        _ => {
            let fresh = alloc_group_id(next_group_id);
            let mut merged = ElementGroup::new(fresh);
            for old_id in &incumbents {
                let Some(old) = groups.remove(old_id) else {
                    continue;
                };
                for member in old.member_ids() {
                    if let Some(e) = elements.get_mut(&member) {
                        e.set_group_id(fresh);
                        merged.add(member, e.nav_type());
                    }
                }
            }
            groups.insert(fresh, merged);
            state.rebuild.insert(fresh);
            state.changed = true;
            fresh
        }
    };

    for n in &neighbours {
        let Some(e) = elements.get_mut(n) else {
            continue;
        };
        if e.group_id() == target {
            continue;
        }
        e.set_group_id(target);
        let nav_type = e.nav_type();
        if let Some(g) = groups.get_mut(&target) {
            g.add(*n, nav_type);
        }
        state.rebuild.insert(target);
        state.changed = true;
        if *n != id {
            state.queue.push_back(*n);
        }
    }

    neighbours.clear();
    state.neighbours = neighbours;
}
