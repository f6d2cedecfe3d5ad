//! Property tests relating thresholds to the directories a sweep creates.

mod common;

use std::collections::BTreeSet;

use ctsweep_core::{InvocationRequest, InvocationTemplate, Sweeper, Threshold};
use ctsweep_test_support::fixtures::{SweepWorkspace, directory_names};
use proptest::prelude::*;

use common::RecordingRunner;

fn thresholds_strategy() -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(0.0_f64..=1.0, 1..8)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn one_directory_per_distinct_label(values in thresholds_strategy()) {
        let workspace = SweepWorkspace::new().expect("temp dir");
        let input = workspace.write_fasta("reads.fasta").expect("input");
        let out_dir = workspace.out_dir();
        let thresholds: Vec<Threshold> = values.iter().copied().map(Threshold::new).collect();
        let expected: BTreeSet<String> = thresholds
            .iter()
            .map(|threshold| threshold.label().expect("finite").to_string())
            .collect();

        let runner = RecordingRunner::default();
        let sweeper = Sweeper::with_runner(InvocationTemplate::default(), runner.clone());
        let request = InvocationRequest::new(&input, &out_dir).with_thresholds(thresholds);
        let report = sweeper.run_single(&request).expect("sweep must succeed");

        let created: BTreeSet<String> = directory_names(&out_dir)
            .expect("output root must exist")
            .into_iter()
            .collect();
        prop_assert_eq!(created, expected);
        prop_assert_eq!(report.invocation_count(), values.len());
        prop_assert_eq!(runner.calls().len(), values.len());
    }

    #[test]
    fn labels_stay_within_percentage_range(value in 0.0_f64..=1.0) {
        let label = Threshold::new(value).label().expect("finite");
        prop_assert!((0.0..=100.0).contains(&label.value()));
        prop_assert_eq!(label.value().fract(), 0.0);
    }
}
