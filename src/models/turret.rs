//! Circular tool turret.
//!
//! Slots form a ring: index arithmetic wraps modulo the turret size and
//! distances are signed, clockwise positive. Rotating by one slot costs one
//! unit of travel.
//!
//! # Scoring
//!
//! [`Turret::score`] simulates producing a number of identical parts. Each
//! operation picks the nearest tool of the required type that still has
//! life, retiring exhausted duplicates on the way. The simulation wears the
//! tools it uses, so a turret should be scored once per construction (clone
//! it first when the original must stay pristine).

use serde::Serialize;
use std::collections::BTreeMap;
use tracing::{debug, instrument, warn};

use super::{ProductionReport, Tool, ToolId, ToolLife, ToolLifeTable, DEAD_TOOL};
use crate::error::{Result, TurretError};

/// Signed slot offset (clockwise positive).
pub type Distance = i64;

/// A fixed-size ring of tool slots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Turret {
    array: Vec<Tool>,
}

impl Turret {
    /// Builds a turret from slot ids and a tool-life table.
    ///
    /// Every id gets a fresh tool with the table's life. Dead slots
    /// ([`DEAD_TOOL`]) need no table entry and are mounted already worn out.
    pub fn new(slots: &[ToolId], tool_data: &ToolLifeTable) -> Result<Self> {
        if slots.is_empty() {
            return Err(TurretError::EmptyTurret);
        }
        let array = slots
            .iter()
            .map(|&id| {
                if id == DEAD_TOOL {
                    return Ok(Tool::new(DEAD_TOOL, ToolLife::Finite(0)));
                }
                tool_data
                    .get(&id)
                    .map(|&life| Tool::new(id, life))
                    .ok_or(TurretError::UnknownTool { id })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { array })
    }

    /// Number of slots.
    pub fn size(&self) -> usize {
        self.array.len()
    }

    /// Tools in slot order.
    pub fn tools(&self) -> &[Tool] {
        &self.array
    }

    /// Tool ids in slot order.
    pub fn slot_ids(&self) -> Vec<ToolId> {
        self.array.iter().map(|t| t.id).collect()
    }

    /// Occurrences per tool id (dead slots included under [`DEAD_TOOL`]).
    pub fn counts(&self) -> BTreeMap<ToolId, usize> {
        let mut counts = BTreeMap::new();
        for tool in &self.array {
            *counts.entry(tool.id).or_insert(0) += 1;
        }
        counts
    }

    /// Current life per live tool id. Later slots overwrite earlier ones.
    pub fn life_table(&self) -> ToolLifeTable {
        self.array
            .iter()
            .filter(|t| !t.is_dead())
            .map(|t| (t.id, t.life))
            .collect()
    }

    /// Replaces the tool mounted at `index`.
    pub(crate) fn mount(&mut self, index: usize, tool: Tool) {
        self.array[index] = tool;
    }

    /// Finds every slot holding `tool_id` with its signed distance from
    /// `start_idx`.
    ///
    /// The ring is scanned outward from the start, clockwise before
    /// anticlockwise at each offset, so a clockwise hit precedes an
    /// anticlockwise hit of equal magnitude. Each index appears once, with
    /// its smallest-magnitude distance. Dead slots never match.
    pub fn find(&self, tool_id: ToolId, start_idx: usize) -> Vec<(usize, Distance)> {
        let size = self.array.len();
        if size == 0 || tool_id == DEAD_TOOL {
            return Vec::new();
        }
        let start = start_idx % size;
        let mut hits: Vec<(usize, Distance)> = Vec::new();

        for i in 0..size {
            let cw = (start + i) % size;
            if self.array[cw].id == tool_id {
                record_hit(&mut hits, cw, i as Distance);
            }
            if i != 0 {
                let acw = (start + size - i) % size;
                if self.array[acw].id == tool_id {
                    record_hit(&mut hits, acw, -(i as Distance));
                }
            }
        }
        hits
    }

    /// Nearest slot holding `tool_id`, clockwise on ties.
    pub fn find_nearest(&self, tool_id: ToolId, start_idx: usize) -> Option<(usize, Distance)> {
        self.find(tool_id, start_idx)
            .into_iter()
            .min_by_key(|&(_, d)| d.abs())
    }

    /// Rotation options offered along an operation sequence.
    ///
    /// Starting from slot 0, records edges from the current slot to every
    /// slot holding the next required tool, then moves to the nearest one.
    /// Tools not mounted in the turret are skipped.
    pub fn transition_graph(&self, ops: &[ToolId]) -> BTreeMap<usize, Vec<(usize, Distance)>> {
        let mut graph: BTreeMap<usize, Vec<(usize, Distance)>> = BTreeMap::new();
        let mut current = 0;

        for &tool_id in ops {
            let hits = self.find(tool_id, current);
            let Some(&(next, _)) = hits.first() else {
                warn!(tool_id, "tool not mounted in turret, skipping");
                continue;
            };
            graph.entry(current).or_default().extend(hits);
            current = next;
        }
        graph
    }

    /// Simulates producing `parts` parts, each running `ops` in order,
    /// starting with the turret pointed at slot `point`.
    ///
    /// The tool at `point` must already be `ops[0]`. The simulation stops
    /// early, returning what was completed so far, as soon as an operation
    /// finds no usable tool. Tool wear and retired slots persist.
    #[instrument(level = "debug", skip(self, ops), fields(size = self.array.len(), parts = parts, ops_len = ops.len(), point = point))]
    pub fn score(&mut self, parts: usize, ops: &[ToolId], point: usize) -> Result<ProductionReport> {
        let expected = *ops.first().ok_or(TurretError::EmptyOperations)?;
        let size = self.array.len();
        if point >= size {
            return Err(TurretError::PositionOutOfRange {
                position: point,
                size,
            });
        }
        let found = self.array[point].id;
        if found != expected {
            return Err(TurretError::StartToolMismatch {
                position: point,
                found,
                expected,
            });
        }

        let mut report = ProductionReport::new(parts, point);
        let mut point = point;
        let mut previous_route: Vec<usize> = Vec::new();

        while report.parts_completed < parts {
            let mut path: u64 = 0;
            let mut route = Vec::with_capacity(ops.len());

            for &tool_id in ops {
                let Some((index, distance)) = self.take_nearest_usable(tool_id, point) else {
                    debug!(
                        tool_id,
                        parts_remaining = parts - report.parts_completed,
                        path,
                        "no usable tool left, stopping early"
                    );
                    report.final_position = point;
                    return Ok(report);
                };
                path += distance.unsigned_abs();
                point = index;
                route.push(index);
            }

            report.score += path;
            report.parts_completed += 1;

            if route != previous_route {
                if !previous_route.is_empty() {
                    report.route_changes += 1;
                    debug!(
                        previous = ?previous_route,
                        current = ?route,
                        path,
                        parts_remaining = parts - report.parts_completed,
                        "route changed"
                    );
                }
                previous_route = route;
            }
        }

        report.final_position = point;
        Ok(report)
    }

    /// Uses the nearest live instance of `tool_id`, retiring exhausted ones.
    fn take_nearest_usable(&mut self, tool_id: ToolId, point: usize) -> Option<(usize, Distance)> {
        let mut candidates = self.find(tool_id, point);
        candidates.sort_by_key(|&(_, d)| d.abs());

        for (index, distance) in candidates {
            let tool = &mut self.array[index];
            if tool.use_once() {
                return Some((index, distance));
            }
            tool.retire();
        }
        None
    }
}

/// Keeps one hit per index, preferring the smaller magnitude.
fn record_hit(hits: &mut Vec<(usize, Distance)>, index: usize, distance: Distance) {
    match hits.iter_mut().find(|(i, _)| *i == index) {
        Some(hit) if distance.abs() < hit.1.abs() => hit.1 = distance,
        Some(_) => {}
        None => hits.push((index, distance)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(entries: &[(ToolId, u32)]) -> ToolLifeTable {
        entries
            .iter()
            .map(|&(id, life)| (id, ToolLife::Finite(life)))
            .collect()
    }

    fn magazine() -> Turret {
        Turret::new(
            &[1, 1, 3, 2, 2, 3, 4, 2],
            &table(&[(1, 150), (2, 100), (3, 150), (4, 600)]),
        )
        .unwrap()
    }

    #[test]
    fn test_new_turret() {
        let t = magazine();
        assert_eq!(t.size(), 8);
        assert_eq!(t.slot_ids(), vec![1, 1, 3, 2, 2, 3, 4, 2]);
        assert_eq!(t.tools()[6], Tool::new(4, ToolLife::Finite(600)));
        assert_eq!(t.counts()[&2], 3);
    }

    #[test]
    fn test_new_rejects_bad_input() {
        let data = table(&[(1, 10)]);
        assert_eq!(Turret::new(&[], &data), Err(TurretError::EmptyTurret));
        assert_eq!(
            Turret::new(&[1, 5], &data),
            Err(TurretError::UnknownTool { id: 5 })
        );
    }

    #[test]
    fn test_dead_slots_need_no_table_entry() {
        let t = Turret::new(&[1, DEAD_TOOL], &table(&[(1, 10)])).unwrap();
        assert!(t.tools()[1].is_dead());
        assert!(t.find(DEAD_TOOL, 0).is_empty());
        assert!(!t.life_table().contains_key(&DEAD_TOOL));
    }

    #[test]
    fn test_find_at_start() {
        let t = magazine();
        assert_eq!(t.find(4, 6), vec![(6, 0)]);
    }

    #[test]
    fn test_find_all_occurrences_in_scan_order() {
        let t = magazine();
        assert_eq!(t.find(2, 6), vec![(7, 1), (4, -2), (3, -3)]);
        assert!(t.find(9, 0).is_empty());
    }

    #[test]
    fn test_find_wraps_around() {
        let t = magazine();
        // From slot 7, slot 0 is one step clockwise
        assert_eq!(t.find(1, 7), vec![(0, 1), (1, 2)]);
    }

    #[test]
    fn test_find_prefers_clockwise_on_ties() {
        let data = table(&[(1, 10), (2, 10)]);
        let t = Turret::new(&[2, 1, 2, 2, 2, 1], &data).unwrap();
        // Slots 1 and 5 are both two steps from slot 3
        let hits = t.find(1, 3);
        assert_eq!(hits, vec![(5, 2), (1, -2)]);
        assert_eq!(t.find_nearest(1, 3), Some((5, 2)));
    }

    #[test]
    fn test_find_dedups_small_rings() {
        let data = table(&[(1, 10), (2, 10)]);
        let t = Turret::new(&[1, 2], &data).unwrap();
        // Slot 1 is reached at +1 and -1; only the first survives
        assert_eq!(t.find(2, 0), vec![(1, 1)]);
    }

    #[test]
    fn test_transition_graph() {
        let t = magazine();
        let graph = t.transition_graph(&[4, 9, 2]);
        // Tool 4 from slot 0: slot 6 is two steps anticlockwise
        assert_eq!(graph[&0], vec![(6, -2)]);
        assert_eq!(graph[&6], vec![(7, 1), (4, -2), (3, -3)]);
        assert_eq!(graph.len(), 2);
    }

    #[test]
    fn test_score_precondition() {
        let mut t = magazine();
        let ops = [4, 2, 3, 4, 1];
        assert_eq!(
            t.score(1, &ops, 0),
            Err(TurretError::StartToolMismatch {
                position: 0,
                found: 1,
                expected: 4
            })
        );
        assert_eq!(
            t.score(1, &ops, 8),
            Err(TurretError::PositionOutOfRange {
                position: 8,
                size: 8
            })
        );
        assert_eq!(t.score(1, &[], 6), Err(TurretError::EmptyOperations));
    }

    #[test]
    fn test_score_single_part() {
        let mut t = magazine();
        let report = t.score(1, &[4, 2, 3, 4, 1], 6).unwrap();
        // 4@6 (0), 2@7 (1), 3@5 (2), 4@6 (1), 1@0 (2)
        assert_eq!(report.score, 6);
        assert_eq!(report.parts_completed, 1);
        assert_eq!(report.final_position, 0);
        assert!(report.is_complete());
        assert_eq!(t.tools()[6].life, ToolLife::Finite(598));
    }

    #[test]
    fn test_score_stops_when_tool_type_exhausted() {
        let mut t = magazine();
        let report = t.score(300, &[4, 2, 3, 4, 1], 6).unwrap();
        // Three tool-2 instances give 99 uses each
        assert_eq!(report.parts_completed, 297);
        assert!(!report.is_complete());
        assert_eq!(t.counts().get(&2), None);
        assert!(t.counts()[&DEAD_TOOL] >= 3);
    }

    #[test]
    fn test_score_accumulates_travel() {
        let mut t = Turret::new(&[1, 2, 3], &table(&[(1, 10), (2, 10), (3, 10)])).unwrap();
        let report = t.score(3, &[1, 2, 3], 0).unwrap();
        // First part 0+1+1, then 1+1+1 per part
        assert_eq!(report.score, 8);
        assert_eq!(report.parts_completed, 3);
        assert_eq!(report.route_changes, 0);
    }

    #[test]
    fn test_score_partial_credit() {
        let mut t = Turret::new(&[1, 2, 3], &table(&[(1, 10), (2, 10), (3, 10)])).unwrap();
        let report = t.score(20, &[1, 2, 3], 0).unwrap();
        // Life 10 serves 9 uses
        assert_eq!(report.parts_completed, 9);
        assert_eq!(report.score, 2 + 8 * 3);
        assert_eq!(t.slot_ids(), vec![DEAD_TOOL, 2, 3]);
    }

    #[test]
    fn test_score_substitutes_duplicates() {
        let mut data = table(&[(1, 2)]);
        data.insert(2, ToolLife::Unbounded);
        let mut t = Turret::new(&[1, 2, 1], &data).unwrap();

        let report = t.score(5, &[1, 2], 0).unwrap();
        // Part 1 uses slot 0, part 2 switches to slot 2, part 3 finds both exhausted
        assert_eq!(report.parts_completed, 2);
        assert_eq!(report.score, 1 + 2);
        assert_eq!(report.route_changes, 1);
        assert_eq!(t.slot_ids(), vec![DEAD_TOOL, 2, DEAD_TOOL]);
    }

    #[test]
    fn test_score_missing_tool_stops_immediately() {
        let mut t = Turret::new(&[1, 2], &table(&[(1, 10), (2, 10), (3, 10)])).unwrap();
        let report = t.score(4, &[1, 3], 0).unwrap();
        assert_eq!(report.parts_completed, 0);
        assert_eq!(report.score, 0);
    }

    #[test]
    fn test_rescoring_never_scores_higher() {
        let mut t = Turret::new(&[1, 2, 3], &table(&[(1, 10), (2, 10), (3, 10)])).unwrap();
        let first = t.score(5, &[1, 2, 3], 0).unwrap();
        let second = t.score(5, &[1, 2, 3], 0).unwrap();
        assert_eq!(first.score, 14);
        assert_eq!(second.score, 11);
        assert!(second.score <= first.score);
    }

    #[test]
    fn test_unbounded_tools_complete_every_part() {
        let data: ToolLifeTable = [(1, ToolLife::Unbounded), (2, ToolLife::Unbounded)]
            .into_iter()
            .collect();
        let mut t = Turret::new(&[1, 2], &data).unwrap();
        let report = t.score(1000, &[1, 2], 0).unwrap();
        assert!(report.is_complete());
        assert_eq!(report.score, 1 + 999 * 2);
    }
}
