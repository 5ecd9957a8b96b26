//! Reduce a batch of case records to one record per postal code.
//!
//! The first record seen for a given (trimmed) postal code wins, later ones are ignored without
//! any attempt at merging.  Records without a usable postal code are dropped here.
//!

use itertools::Itertools;
use tracing::{trace, warn};

use crate::CaseRecord;

/// Keep the first record of every postal code, in input order.
///
pub fn dedupe<I>(records: I) -> Vec<CaseRecord>
where
    I: IntoIterator<Item = CaseRecord>,
{
    dedupe_counted(records).0
}

/// Same as `dedupe()`, also returns how many records were dropped for lack of a postal code.
///
#[tracing::instrument(skip(records))]
pub fn dedupe_counted<I>(records: I) -> (Vec<CaseRecord>, usize)
where
    I: IntoIterator<Item = CaseRecord>,
{
    let mut dropped = 0;
    let out: Vec<_> = records
        .into_iter()
        .filter_map(|mut rec| {
            let code = match rec.postal_code() {
                Some(code) => code.to_owned(),
                None => {
                    warn!("child {:?}: no postal code, ignored", rec.child_id);
                    dropped += 1;
                    return None;
                }
            };
            rec.postal_code = Some(code);
            Some(rec)
        })
        .unique_by(|rec| rec.postal_code.clone())
        .collect();
    trace!("{} unique postal codes, {} dropped", out.len(), dropped);
    (out, dropped)
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use proptest::prelude::*;
    use rstest::rstest;

    use crate::Severity;

    use super::*;

    fn rec(id: &str, code: Option<&str>, severity: Severity) -> CaseRecord {
        CaseRecord {
            child_id: id.to_string(),
            postal_code: code.map(str::to_string),
            severity,
            ..Default::default()
        }
    }

    #[test]
    fn test_dedupe_first_seen_wins() {
        let input = vec![
            rec("a", Some("110001"), Severity::Severe),
            rec("b", Some("110001"), Severity::Moderate),
            rec("c", Some("400001"), Severity::Moderate),
        ];
        let out = dedupe(input);

        assert_eq!(2, out.len());
        assert_eq!("a", out[0].child_id);
        assert_eq!(Severity::Severe, out[0].severity);
        assert_eq!("c", out[1].child_id);
    }

    #[test]
    fn test_dedupe_empty() {
        assert!(dedupe(vec![]).is_empty());
    }

    #[rstest]
    #[case(None)]
    #[case(Some(""))]
    #[case(Some("   "))]
    fn test_dedupe_no_postal_code(#[case] code: Option<&str>) {
        let out = dedupe(vec![
            rec("a", code, Severity::Severe),
            rec("b", Some("560001"), Severity::Moderate),
        ]);
        assert_eq!(1, out.len());
        assert_eq!("b", out[0].child_id);
    }

    #[test]
    fn test_dedupe_counts_dropped() {
        let (out, dropped) = dedupe_counted(vec![
            rec("a", None, Severity::Severe),
            rec("b", Some("110001"), Severity::Moderate),
            rec("c", Some(" "), Severity::Moderate),
            rec("d", Some("110001"), Severity::Moderate),
        ]);
        assert_eq!(1, out.len());
        // duplicates are not counted as dropped
        assert_eq!(2, dropped);
    }

    #[test]
    fn test_dedupe_trims_key() {
        let out = dedupe(vec![
            rec("a", Some(" 110001"), Severity::Severe),
            rec("b", Some("110001 "), Severity::Moderate),
        ]);
        assert_eq!(1, out.len());
        assert_eq!(Some("110001".to_string()), out[0].postal_code);
    }

    fn arb_record() -> impl Strategy<Value = CaseRecord> {
        (
            "[a-z]{1,4}",
            prop::option::of(prop::sample::select(vec!["1", "2", "3", "4", " ", ""])),
            any::<bool>(),
        )
            .prop_map(|(id, code, sev)| {
                let severity = if sev {
                    Severity::Severe
                } else {
                    Severity::Moderate
                };
                rec(&id, code, severity)
            })
    }

    proptest! {
        #[test]
        fn test_dedupe_properties(input in prop::collection::vec(arb_record(), 0..40)) {
            let out = dedupe(input.clone());
            let valid: Vec<_> = input.iter().filter(|r| r.postal_code().is_some()).collect();
            let codes: HashSet<_> = valid.iter().filter_map(|r| r.postal_code()).collect();

            prop_assert!(out.len() <= input.len());
            prop_assert_eq!(codes.len(), out.len());

            // Every output is the first valid input with that code.
            for o in &out {
                let first = valid
                    .iter()
                    .find(|r| r.postal_code() == o.postal_code())
                    .unwrap();
                prop_assert_eq!(&first.child_id, &o.child_id);
                prop_assert_eq!(first.severity, o.severity);
            }

            // Idempotent
            prop_assert_eq!(dedupe(out.clone()), out);
        }
    }
}
