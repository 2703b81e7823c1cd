use proptest::prelude::*;
use shgrav_text::{parse_icgem_str, parse_pgda_str};

fn noise_line() -> impl Strategy<Value = String> {
    prop_oneof![
        "[ \t]{0,6}",
        ("[ \t]{0,3}", "[ -~]{0,30}").prop_map(|(ws, body)| format!("{ws}#{body}")),
    ]
}

proptest! {
    #[test]
    fn blank_and_comment_lines_never_produce_entries(lines in prop::collection::vec(noise_line(), 0..20)) {
        let text = lines.join("\n");
        let icgem = parse_icgem_str(&text, 1).unwrap();
        prop_assert!(icgem.table.is_empty());
        let pgda = parse_pgda_str(&text, 1).unwrap();
        prop_assert!(pgda.table.is_empty());
        prop_assert_eq!(pgda.skipped_lines, 0);
    }

    #[test]
    fn noise_between_records_does_not_change_the_table(
        noise in prop::collection::vec(noise_line(), 1..8),
        c in -1.0e-3f64..1.0e-3,
        s in -1.0e-3f64..1.0e-3,
    ) {
        let record = format!("gfc 4 3 {c:e} {s:e}");
        let mut lines = noise.clone();
        lines.insert(noise.len() / 2, record);
        let table = parse_icgem_str(&lines.join("\n"), 1).unwrap().table;
        prop_assert_eq!(table.len(), 1);
        prop_assert_eq!(table.get(4, 3), Some((c, s)));

        let mut rows = noise;
        rows.push(format!("4, 3, {c:e}, {s:e}"));
        let table = parse_pgda_str(&rows.join("\n"), 1).unwrap().table;
        prop_assert_eq!(table.get(4, 3), Some((c, s)));
    }
}
