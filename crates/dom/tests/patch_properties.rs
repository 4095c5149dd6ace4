mod common;

use common::strategies::{
    arb_operation_seed, arb_value, arb_value_with_repeated_keys, pick_operation,
};
use dom::{generate_hierarchical_delta_patch, DeltaPatchGenerationParameters, Patch, PatchOperation};
use proptest::prelude::*;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn diff_roundtrips(before in arb_value(), after in arb_value()) {
        let info = generate_hierarchical_delta_patch(&before, &after, &Default::default());
        let forward = info.forward_patches.apply(before.clone()).unwrap();
        prop_assert_eq!(&forward, &after);
        let back = info.inverse_patches.apply(forward).unwrap();
        prop_assert_eq!(&back, &before);
    }

    #[test]
    fn diff_roundtrips_with_any_threshold(
        before in arb_value(),
        after in arb_value(),
        threshold in 0usize..4,
    ) {
        let params = DeltaPatchGenerationParameters::with_replace_threshold(threshold);
        let info = generate_hierarchical_delta_patch(&before, &after, &params);
        prop_assert_eq!(&info.forward_patches.apply(before.clone()).unwrap(), &after);
        prop_assert_eq!(&info.inverse_patches.apply(after.clone()).unwrap(), &before);
    }

    #[test]
    fn diff_roundtrips_with_repeated_keys(
        before in arb_value_with_repeated_keys(),
        after in arb_value_with_repeated_keys(),
    ) {
        let info = generate_hierarchical_delta_patch(&before, &after, &Default::default());
        let forward = info.forward_patches.apply(before.clone()).unwrap();
        prop_assert_eq!(&forward, &after);
        prop_assert_eq!(&info.inverse_patches.apply(forward).unwrap(), &before);
    }

    #[test]
    fn equality_is_symmetric(
        a in arb_value_with_repeated_keys(),
        b in arb_value_with_repeated_keys(),
    ) {
        prop_assert_eq!(a == b, b == a);
        prop_assert_eq!(&a, &a.deep_copy());
    }

    #[test]
    fn diff_of_equal_trees_is_empty(value in arb_value()) {
        let info = generate_hierarchical_delta_patch(&value, &value.deep_copy(), &Default::default());
        prop_assert!(info.forward_patches.is_empty());
        prop_assert!(info.inverse_patches.is_empty());
    }

    #[test]
    fn dom_representation_roundtrips(before in arb_value(), after in arb_value()) {
        let info = generate_hierarchical_delta_patch(&before, &after, &Default::default());
        for patch in [&info.forward_patches, &info.inverse_patches] {
            let repr = patch.get_dom_representation();
            prop_assert_eq!(&Patch::create_from_dom_representation(&repr).unwrap(), patch);
        }
    }

    #[test]
    fn operation_inverse_cancels(before in arb_value(), seed in arb_operation_seed()) {
        let op = pick_operation(&before, &seed);
        let Ok(after) = op.apply(before.clone()) else {
            return Ok(());
        };
        let inverse = op.get_inverse(&before).unwrap();
        let restored = inverse.apply(after).unwrap();
        prop_assert_eq!(&restored, &before, "inverse of {} failed", op);
    }

    #[test]
    fn patch_inverse_cancels(
        before in arb_value(),
        seeds in prop::collection::vec(arb_operation_seed(), 1..5),
    ) {
        // Build a patch whose every step is valid against the running state
        let mut state = before.clone();
        let mut patch = Patch::new();
        for seed in &seeds {
            let op = pick_operation(&state, seed);
            if op.apply_in_place(&mut state).is_ok() {
                patch.push_back(op);
            }
        }
        let after = patch.apply(before.clone()).unwrap();
        prop_assert_eq!(&after, &state);
        let inverse = patch.get_inverse(&before).unwrap();
        prop_assert_eq!(&inverse.apply(after).unwrap(), &before);
    }

    #[test]
    fn clones_are_isolated_from_writes(original in arb_value(), seed in arb_operation_seed()) {
        let snapshot = original.deep_copy();
        let mut copy = original.clone();
        let op = pick_operation(&copy, &seed);
        let _ = op.apply_in_place(&mut copy);
        prop_assert_eq!(&original, &snapshot);
    }

    #[test]
    fn replace_is_idempotent(value in arb_value(), seed in arb_operation_seed()) {
        let target = pick_operation(&value, &seed).destination_path().clone();
        let op = PatchOperation::replace(target, seed.leaf.clone());
        let Ok(once) = op.apply(value) else {
            return Ok(());
        };
        let twice = op.apply(once.clone()).unwrap();
        prop_assert_eq!(twice, once);
    }
}
