//! Bridge detection over the threshold-filtered subgraph.
//!
//! A file is a bridge when its degree is at least 1.5x the mean degree, or
//! when it has at least 4 edges with traffic in both directions.

use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet, HashSet};

use super::types::FileScore;

const MIN_BIDIRECTIONAL_DEGREE: usize = 4;

/// In/out degree of one file inside the filtered subgraph.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Degree {
    pub in_degree: usize,
    pub out_degree: usize,
}

impl Degree {
    pub fn total(&self) -> usize {
        self.in_degree + self.out_degree
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BridgeReport {
    pub degrees: BTreeMap<String, Degree>,
    pub avg_degree: f64,
    pub bridges: BTreeSet<String>,
}

/// Compute degrees and flag bridges among `files`, counting only edges whose
/// both endpoints are in `files`.
///
/// The mean comparison is done in integers (`2·total·n ≥ 3·Σtotal`) so that
/// borderline degrees are not decided by float rounding. An edgeless set has
/// no bridges.
pub fn detect_bridges(files: &[String], edges: &BTreeMap<String, Vec<String>>) -> BridgeReport {
    let members: HashSet<&str> = files.iter().map(String::as_str).collect();
    let mut degrees: BTreeMap<String, Degree> =
        files.iter().map(|f| (f.clone(), Degree::default())).collect();

    for (from, targets) in edges {
        if !members.contains(from.as_str()) {
            continue;
        }
        for to in targets {
            if to == from || !members.contains(to.as_str()) {
                continue;
            }
            if let Some(d) = degrees.get_mut(from) {
                d.out_degree += 1;
            }
            if let Some(d) = degrees.get_mut(to) {
                d.in_degree += 1;
            }
        }
    }

    let n = degrees.len();
    let sum: usize = degrees.values().map(Degree::total).sum();
    let avg_degree = if n == 0 { 0.0 } else { sum as f64 / n as f64 };

    let bridges = degrees
        .iter()
        .filter(|(_, d)| {
            let total = d.total();
            let above_mean = sum > 0 && 2 * total * n >= 3 * sum;
            let busy_crossing =
                total >= MIN_BIDIRECTIONAL_DEGREE && d.in_degree >= 1 && d.out_degree >= 1;
            above_mean || busy_crossing
        })
        .map(|(path, _)| path.clone())
        .collect();

    BridgeReport {
        degrees,
        avg_degree,
        bridges,
    }
}

/// Set `is_bridge` on every score according to `report`.
pub fn apply_bridges(scores: &mut [FileScore], report: &BridgeReport) {
    for score in scores.iter_mut() {
        score.is_bridge = report.bridges.contains(&score.path);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paths(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    fn edges(list: &[(&str, &[&str])]) -> BTreeMap<String, Vec<String>> {
        list.iter()
            .map(|(from, tos)| (from.to_string(), paths(tos)))
            .collect()
    }

    #[test]
    fn test_shared_dependency_is_bridge() {
        let report = detect_bridges(
            &paths(&["a.ts", "b.ts", "util.ts"]),
            &edges(&[("a.ts", &["util.ts"]), ("b.ts", &["util.ts"])]),
        );
        assert_eq!(report.degrees["util.ts"].in_degree, 2);
        assert!((report.avg_degree - 4.0 / 3.0).abs() < 1e-9);
        assert_eq!(report.bridges, ["util.ts".to_string()].into_iter().collect());
    }

    #[test]
    fn test_no_edges_no_bridges() {
        let report = detect_bridges(&paths(&["a.ts", "b.ts"]), &BTreeMap::new());
        assert_eq!(report.avg_degree, 0.0);
        assert!(report.bridges.is_empty());

        let single = detect_bridges(&paths(&["a.ts"]), &BTreeMap::new());
        assert!(single.bridges.is_empty());
    }

    #[test]
    fn test_uniform_chain_has_no_bridges_at_ends() {
        // a -> b -> c: degrees 1,2,1, mean 4/3, threshold 2
        let report = detect_bridges(
            &paths(&["a.ts", "b.ts", "c.ts"]),
            &edges(&[("a.ts", &["b.ts"]), ("b.ts", &["c.ts"])]),
        );
        assert!(report.bridges.contains("b.ts"));
        assert!(!report.bridges.contains("a.ts"));
        assert!(!report.bridges.contains("c.ts"));
    }

    #[test]
    fn test_busy_crossing_clause() {
        // Ring where every node has in=2,out=2: nobody exceeds 1.5x mean,
        // but all qualify through the degree-4 bidirectional rule.
        let report = detect_bridges(
            &paths(&["a", "b", "c", "d", "e"]),
            &edges(&[
                ("a", &["b", "c"]),
                ("b", &["c", "d"]),
                ("c", &["d", "e"]),
                ("d", &["e", "a"]),
                ("e", &["a", "b"]),
            ]),
        );
        assert_eq!(report.bridges.len(), 5);
        assert_eq!(report.avg_degree, 4.0);
    }

    #[test]
    fn test_edges_outside_set_ignored() {
        let report = detect_bridges(
            &paths(&["a.ts", "b.ts"]),
            &edges(&[("a.ts", &["gone.ts", "b.ts"]), ("gone.ts", &["b.ts"])]),
        );
        assert_eq!(report.degrees["a.ts"].out_degree, 1);
        assert_eq!(report.degrees["b.ts"].in_degree, 1);
        assert!(!report.degrees.contains_key("gone.ts"));
    }

    #[test]
    fn test_apply_bridges() {
        let report = detect_bridges(
            &paths(&["a.ts", "b.ts", "util.ts"]),
            &edges(&[("a.ts", &["util.ts"]), ("b.ts", &["util.ts"])]),
        );
        let mut scores = vec![
            FileScore::new("util.ts", crate::feature::FileKind::Util),
            FileScore::new("a.ts", crate::feature::FileKind::File),
        ];
        apply_bridges(&mut scores, &report);
        assert!(scores[0].is_bridge);
        assert!(!scores[1].is_bridge);
    }
}
