use ledger_adapters::models::{ChainHead, FinalityPolicy, SyncStatus};
use proptest::{prelude::*, test_runner::Config};

proptest! {
	#![proptest_config(Config {
		failure_persistence: None,
		..Config::default()
	})]

	#[test]
	fn test_sync_progress_stays_in_unit_range(progress in any::<f64>()) {
		let status = SyncStatus::new(false, Some(progress), None);
		if let Some(progress) = status.progress {
			prop_assert!((0.0..=1.0).contains(&progress));
		} else {
			prop_assert!(!progress.is_finite());
		}
	}

	#[test]
	fn test_head_with_any_position_is_valid(
		height in prop::option::of(any::<i64>()),
		slot in prop::option::of(any::<i64>()),
		head_id in prop::option::of("[0-9a-f]{8}"),
	) {
		let head = ChainHead {
			height_like: height,
			slot_like: slot,
			head_id: head_id.clone(),
			finality_hint: None,
			raw: None,
		};
		prop_assert_eq!(
			head.is_valid(),
			height.is_some() || slot.is_some() || head_id.is_some()
		);
	}

	#[test]
	fn test_confirmation_policy_is_monotonic(required in 0u64..1000, depth in 0u64..2000) {
		let policy = FinalityPolicy::Confirmations(required);
		if policy.is_deep_enough(depth) {
			prop_assert!(policy.is_deep_enough(depth + 1));
		}
		prop_assert_eq!(policy.is_deep_enough(depth), depth >= required);
	}
}
