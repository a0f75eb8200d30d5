//! Hand-computed mixing matrices for small fixed networks.

use netseg_core::graph::{AttributedGraph, GroupSizes, Grouping};
use netseg_core::mixing::{CountMatrix, MixingOptions, mixingm, mixingm_grouped};
use netseg_core::{ErrorCode, MixingError};

/// Directed network: 5 people, gender and club.
///
/// ```text
/// ann(f,red) → bob(m,red) → cat(f,blue) → ann
/// dan(m,blue) → ann, eve(f,red) → dan, eve → cat
/// ```
const OFFICE: &str = r#"{
    "directed": true,
    "vertices": [
        {"name": "ann", "attrs": {"gender": "f", "club": "red"}},
        {"name": "bob", "attrs": {"gender": "m", "club": "red"}},
        {"name": "cat", "attrs": {"gender": "f", "club": "blue"}},
        {"name": "dan", "attrs": {"gender": "m", "club": "blue"}},
        {"name": "eve", "attrs": {"gender": "f", "club": "red"}}
    ],
    "edges": [
        ["ann", "bob"], ["bob", "cat"], ["cat", "ann"],
        ["dan", "ann"], ["eve", "dan"], ["eve", "cat"]
    ]
}"#;

fn office() -> AttributedGraph {
    // Surface debug! output from mixing code on failure.
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_test_writer()
        .try_init();
    AttributedGraph::from_json_str(OFFICE).expect("office graph")
}

#[test]
fn gender_contact_layer() {
    let mm = mixingm(&office(), "gender", "gender", MixingOptions::contact()).expect("mm");
    assert_eq!(mm.ego_levels(), ["f", "m"]);
    // f→f: cat→ann, eve→cat; f→m: ann→bob, eve→dan; m→f: bob→cat, dan→ann
    assert_eq!(mm.contact().to_rows(), vec![vec![2, 2], vec![2, 0]]);
    assert_eq!(mm.sizes(), &GroupSizes::Vector(vec![3, 2]));
}

#[test]
fn gender_full_census() {
    let mm = mixingm(&office(), "gender", "gender", MixingOptions::full()).expect("mm");
    // margins: ff = 3*2 = 6, fm = 6, mf = 6, mm = 2*1 = 2
    assert_eq!(
        mm.no_tie().expect("full").to_rows(),
        vec![vec![4, 4], vec![4, 2]]
    );
    assert_eq!(mm.total_dyads(), Some(20));
}

#[test]
fn gender_by_club_uses_cross_table_margins() {
    let mm = mixingm(&office(), "gender", "club", MixingOptions::full()).expect("mm");
    assert_eq!(mm.alter_levels(), ["blue", "red"]);
    // ties: ann→bob f/red, bob→cat m/blue, cat→ann f/red, dan→ann m/red,
    //       eve→dan f/blue, eve→cat f/blue
    assert_eq!(mm.contact().to_rows(), vec![vec![2, 2], vec![1, 1]]);

    let GroupSizes::Table(sizes) = mm.sizes() else {
        panic!("two attributes give a size table");
    };
    // f: cat(blue), ann(red), eve(red); m: dan(blue), bob(red)
    assert_eq!(sizes.to_rows(), vec![vec![1, 2], vec![1, 1]]);

    // margins: f×blue = 3*2-1 = 5, f×red = 3*3-2 = 7, m×blue = 2*2-1 = 3, m×red = 2*3-1 = 5
    assert_eq!(
        mm.no_tie().expect("full").to_rows(),
        vec![vec![3, 5], vec![2, 4]]
    );
    assert_eq!(mm.total_dyads(), Some(20));
}

#[test]
fn explicit_levels_reorder_and_pad() {
    let g = office();
    let grp = Grouping::with_levels(&g, "gender", vec!["m".into(), "x".into(), "f".into()])
        .expect("grouping");
    let mm = mixingm_grouped(&g, &grp, &grp, MixingOptions::full()).expect("mm");
    let expected = CountMatrix::from_rows(&[vec![0, 0, 2], vec![0, 0, 0], vec![2, 0, 2]])
        .expect("matrix");
    assert_eq!(mm.contact(), &expected);
    assert_eq!(mm.get(1, 1, false), Some(0));
    assert_eq!(mm.total_dyads(), Some(20));
}

#[test]
fn undirected_view_with_two_attributes_fails() {
    let err = mixingm(
        &office(),
        "gender",
        "club",
        MixingOptions::contact().with_directed(false),
    )
    .expect_err("cannot fold across attributes");
    assert_eq!(err.code(), ErrorCode::UndirectedCrossAttributes);
}

#[test]
fn multi_edges_overflow_margins() {
    let g = AttributedGraph::from_json_str(
        r#"{"directed": false,
            "vertices": [{"name": "a", "attrs": {"g": "x"}}, {"name": "b", "attrs": {"g": "x"}}],
            "edges": [["a", "b"], ["b", "a"]]}"#,
    )
    .expect("graph");
    assert!(g.has_multi_edges());
    let err = mixingm(&g, "g", "g", MixingOptions::full()).expect_err("two ties, one dyad");
    assert_eq!(
        err,
        MixingError::ContactExceedsMargin {
            ego: "x".into(),
            alter: "x".into(),
            contact: 2,
            margin: 1,
        }
    );
    // The contact layer alone is still available.
    let mm = mixingm(&g, "g", "g", MixingOptions::contact()).expect("contact only");
    assert_eq!(mm.contact().total(), 2);
}
