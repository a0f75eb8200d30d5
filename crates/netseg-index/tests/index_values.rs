//! Index values on a small fixed network, checked by hand.

use netseg_core::config::NetsegConfig;
use netseg_core::graph::AttributedGraph;
use netseg_core::mixing::{MixingMatrix, MixingOptions, mixingm};
use netseg_index::summary::summarize;
use netseg_index::{GroupScore, IndexError, assort, coleman, ei, freeman, gamix, orwg, smi, ssi};

/// Directed network: 5 people, by gender.
///
/// ```text
/// ann(f) → bob(m) → cat(f) → ann
/// dan(m) → ann, eve(f) → dan, eve → cat
/// ```
///
/// Contact layer (f, m): `[[2, 2], [2, 0]]`; sizes `[3, 2]`.
const OFFICE: &str = r#"{
    "directed": true,
    "vertices": [
        {"name": "ann", "attrs": {"gender": "f"}},
        {"name": "bob", "attrs": {"gender": "m"}},
        {"name": "cat", "attrs": {"gender": "f"}},
        {"name": "dan", "attrs": {"gender": "m"}},
        {"name": "eve", "attrs": {"gender": "f"}}
    ],
    "edges": [
        ["ann", "bob"], ["bob", "cat"], ["cat", "ann"],
        ["dan", "ann"], ["eve", "dan"], ["eve", "cat"]
    ]
}"#;

fn office() -> AttributedGraph {
    AttributedGraph::from_json_str(OFFICE).expect("office graph")
}

fn office_full() -> MixingMatrix {
    mixingm(&office(), "gender", "gender", MixingOptions::full()).expect("mm")
}

fn close(actual: f64, expected: f64) -> bool {
    (actual - expected).abs() < 1e-12
}

fn value(scores: &[GroupScore], group: &str) -> Option<f64> {
    scores
        .iter()
        .find(|s| s.group == group)
        .and_then(|s| s.value)
}

#[test]
fn graph_level_indices() {
    let mm = office_full();
    // internal 2, external 4
    assert!(close(ei::ei(&mm).expect("ei"), 1.0 / 3.0));
    // Σe_ii = 1/3, Σa_i b_i = 5/9
    assert!(close(assort::assort(&mm).expect("assort"), -0.5));
    // p = 2/3, π = 12/20
    assert!(close(freeman::freeman(&mm).expect("freeman"), -1.0 / 9.0));
    // f: 2/4 within, m: 0/2
    assert!(close(gamix::gamix(&mm, true).expect("gamix"), -0.5));
    // (2 · 8) / (6 · 4)
    assert!(close(orwg::orwg(&mm).expect("orwg"), 2.0 / 3.0));
}

#[test]
fn group_level_indices() {
    let mm = office_full();

    let h = coleman::coleman(&mm).expect("coleman");
    assert!(close(value(&h, "f").expect("f"), 0.0));
    assert!(close(value(&h, "m").expect("m"), -1.0));

    let s = smi::smi(&mm, true).expect("smi");
    assert!(close(value(&s, "f").expect("f"), 0.0));
    assert!(close(value(&s, "m").expect("m"), -1.0));

    let raw = smi::smi(&mm, false).expect("raw smi");
    assert!(close(value(&raw, "f").expect("f"), 1.0));
    assert!(close(value(&raw, "m").expect("m"), 0.0));
}

#[test]
fn summary_agrees_with_single_indices() {
    let s = summarize(&office(), "gender", &NetsegConfig::default()).expect("summary");
    assert!(s.directed);
    assert_eq!((s.ties, s.dyads), (6, 20));
    assert!(close(s.ei.expect("ei"), 1.0 / 3.0));
    assert!(close(s.assortativity.expect("assort"), -0.5));
    assert!(close(s.orwg.expect("orwg"), 2.0 / 3.0));

    let json = serde_json::to_value(&s).expect("serialize");
    assert_eq!(json["attr"], "gender");
    assert_eq!(json["ties"], 6);
}

#[test]
fn ssi_needs_undirected_graph() {
    let err = ssi::ssi(&office(), "gender", &NetsegConfig::default().ssi).expect_err("directed");
    assert_eq!(err, IndexError::RequiresUndirected { index: "ssi" });
}

#[test]
fn cross_attribute_tables_are_rejected() {
    let g = AttributedGraph::from_json_str(
        r#"{
            "directed": true,
            "vertices": [
                {"name": "a", "attrs": {"g": "x", "h": "p"}},
                {"name": "b", "attrs": {"g": "y", "h": "q"}}
            ],
            "edges": [["a", "b"]]
        }"#,
    )
    .expect("graph");
    let mm = mixingm(&g, "g", "h", MixingOptions::full()).expect("mm");
    assert_eq!(
        ei::ei(&mm),
        Err(IndexError::MismatchedGroups { index: "ei" })
    );
    assert_eq!(
        freeman::freeman(&mm),
        Err(IndexError::MismatchedGroups { index: "freeman" })
    );
}
