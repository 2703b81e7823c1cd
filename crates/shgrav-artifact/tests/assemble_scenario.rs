use proptest::prelude::*;
use shgrav_artifact::{assemble, DenseCoefficients};
use shgrav_core::{CoefficientEntry, CoefficientTable, GravError};

fn scenario_table() -> CoefficientTable {
    CoefficientTable::from_entries([
        CoefficientEntry::new(2, 0, -4.84165e-4, 0.0),
        CoefficientEntry::new(2, 1, -2.06616e-10, 1.38441e-9),
        CoefficientEntry::new(2, 2, 2.43938e-6, -1.40027e-6),
        CoefficientEntry::new(3, 0, 9.57161e-7, 0.0),
        CoefficientEntry::new(3, 1, 2.03046e-6, 2.48200e-7),
    ])
    .expect("valid table")
}

#[test]
fn concrete_scenario_shape_and_positions() {
    let dense = assemble(scenario_table()).expect("assemble");
    assert_eq!(dense.l_max(), 3);
    assert_eq!(dense.m_max(), 2);
    assert_eq!(dense.shape(), (4, 3));

    let (c, _) = dense.position(3, 1).expect("in bounds");
    assert!((c - -4.84165e-4).abs() < 1e-18);
    let (_, s) = dense.position(3, 2).expect("in bounds");
    assert!((s - 1.38441e-9).abs() < 1e-22);
    assert_eq!(dense.position(1, 1), Some((0.0, 0.0)));

    assert_eq!(dense.c(3, 1), Some(2.03046e-6));
    assert_eq!(dense.s(3, 2), Some(0.0));
    assert_eq!(dense.c(4, 0), None);
}

#[test]
fn empty_table_fails_fast() {
    let err = assemble(CoefficientTable::new()).unwrap_err();
    assert!(matches!(err, GravError::Assembly(ref info) if info.code == "empty-table"));
}

#[test]
fn try_from_matches_assemble() {
    let via_trait = DenseCoefficients::try_from(scenario_table()).expect("try_from");
    assert_eq!(via_trait, assemble(scenario_table()).expect("assemble"));
}

#[test]
fn maxima_are_independent_not_per_row() {
    // m_max comes from (5, 5) even though l_max's row (9, 0) is zonal only.
    let table = CoefficientTable::from_entries([
        CoefficientEntry::new(9, 0, 1.0, 0.0),
        CoefficientEntry::new(5, 5, 2.0, 3.0),
    ])
    .unwrap();
    let dense = assemble(table).unwrap();
    assert_eq!(dense.shape(), (10, 6));
    assert_eq!(dense.c(9, 5), Some(0.0));
}

#[test]
fn cells_above_the_diagonal_stay_zero() {
    // Structurally invalid cells (m > l) are inside the rectangle but are
    // never written; the zero-fill is relied on downstream.
    let dense = assemble(scenario_table()).unwrap();
    assert!(dense.upper_triangle_is_zero());
    assert_eq!(dense.c(0, 2), Some(0.0));
    assert_eq!(dense.s(1, 2), Some(0.0));
}

fn entries() -> impl Strategy<Value = Vec<(usize, usize, f64, f64)>> {
    prop::collection::vec(
        (0usize..24).prop_flat_map(|l| (Just(l), 0..=l, -1.0f64..1.0, -1.0f64..1.0)),
        1..40,
    )
}

proptest! {
    #[test]
    fn shape_indexing_and_zero_fill(raw in entries()) {
        let table = CoefficientTable::from_entries(
            raw.iter().map(|&(l, m, c, s)| CoefficientEntry::new(l, m, c, s)),
        ).unwrap();
        let expected = table.clone();
        let l_max = raw.iter().map(|e| e.0).max().unwrap();
        let m_max = raw.iter().map(|e| e.1).max().unwrap();

        let dense = assemble(table).unwrap();
        prop_assert_eq!(dense.shape(), (l_max + 1, m_max + 1));
        for l in 0..=l_max {
            for m in 0..=m_max {
                let cell = dense.position(l + 1, m + 1).unwrap();
                match expected.get(l, m) {
                    Some(pair) => prop_assert_eq!(cell, pair),
                    None => prop_assert_eq!(cell, (0.0, 0.0)),
                }
            }
        }
        prop_assert!(dense.upper_triangle_is_zero());
    }
}
