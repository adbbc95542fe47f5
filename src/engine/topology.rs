// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Topological levelling and cycle extraction over a forward adjacency map.
//!
//! Both routines are generic over the node type so the graph (keyed by
//! `ModuleId`) and pipeline validation (keyed by module id strings) share them.
//! Adjacency maps may contain repeated targets: one per parallel edge.

use std::collections::{BTreeMap, BTreeSet};

/// Split `adjacency` into Kahn levels.
///
/// Level 0 holds every node with no incoming edge; level N holds nodes whose
/// producers all sit in levels `0..N`. Every node must appear as a key.
/// Returns a cycle path (first node repeated at the end) if the graph is cyclic.
pub(crate) fn compute_levels<N>(adjacency: &BTreeMap<N, Vec<N>>) -> Result<Vec<Vec<N>>, Vec<N>>
where
    N: Ord + Clone,
{
    let mut in_degree: BTreeMap<&N, usize> = adjacency.keys().map(|node| (node, 0)).collect();
    for targets in adjacency.values() {
        for target in targets {
            if let Some(count) = in_degree.get_mut(target) {
                *count += 1;
            }
        }
    }

    let mut current: Vec<&N> = in_degree
        .iter()
        .filter(|(_, count)| **count == 0)
        .map(|(node, _)| *node)
        .collect();
    let mut levels = Vec::new();
    let mut placed = 0;

    while !current.is_empty() {
        let mut next = BTreeSet::new();
        for node in &current {
            for target in adjacency.get(*node).into_iter().flatten() {
                if let Some(count) = in_degree.get_mut(target) {
                    *count -= 1;
                    if *count == 0 {
                        next.insert(target);
                    }
                }
            }
        }
        placed += current.len();
        levels.push(current.into_iter().cloned().collect());
        current = next.into_iter().collect();
    }

    if placed != adjacency.len() {
        let remaining: BTreeMap<N, Vec<N>> = in_degree
            .iter()
            .filter(|(_, count)| **count > 0)
            .map(|(node, _)| {
                let targets = adjacency
                    .get(*node)
                    .map(|targets| targets.to_vec())
                    .unwrap_or_default();
                ((*node).clone(), targets)
            })
            .collect();
        // every node left over has a producer left over, so a cycle must exist
        return Err(find_cycle(&remaining).unwrap_or_else(|| remaining.keys().cloned().collect()));
    }

    Ok(levels)
}

/// Depth-first search for a cycle, returning its path with the first node repeated.
pub(crate) fn find_cycle<N>(adjacency: &BTreeMap<N, Vec<N>>) -> Option<Vec<N>>
where
    N: Ord + Clone,
{
    let mut visited = BTreeSet::new();
    let mut on_stack = BTreeSet::new();
    let mut path = Vec::new();

    for node in adjacency.keys() {
        if !visited.contains(node) {
            if let Some(cycle) = dfs(node, adjacency, &mut visited, &mut on_stack, &mut path) {
                return Some(cycle);
            }
        }
    }
    None
}

fn dfs<'a, N>(
    node: &'a N,
    adjacency: &'a BTreeMap<N, Vec<N>>,
    visited: &mut BTreeSet<&'a N>,
    on_stack: &mut BTreeSet<&'a N>,
    path: &mut Vec<&'a N>,
) -> Option<Vec<N>>
where
    N: Ord + Clone,
{
    visited.insert(node);
    on_stack.insert(node);
    path.push(node);

    for neighbor in adjacency.get(node).into_iter().flatten() {
        // edges leaving the map's key set are ignored
        let Some((neighbor, _)) = adjacency.get_key_value(neighbor) else {
            continue;
        };
        if on_stack.contains(neighbor) {
            let start = path.iter().position(|n| *n == neighbor).unwrap_or(0);
            let mut cycle: Vec<N> = path[start..].iter().map(|n| (*n).clone()).collect();
            cycle.push(neighbor.clone());
            return Some(cycle);
        }
        if !visited.contains(neighbor) {
            if let Some(cycle) = dfs(neighbor, adjacency, visited, on_stack, path) {
                return Some(cycle);
            }
        }
    }

    on_stack.remove(node);
    path.pop();
    None
}
