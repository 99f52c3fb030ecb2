//! Weights for pallet-multi-token.
//!
//! Hand-estimated from the storage accesses of each call until the
//! benchmarks in `benchmarking.rs` are run on reference hardware. Proof sizes
//! are left at zero.

use core::marker::PhantomData;
use frame_support::{
    traits::Get,
    weights::{constants::RocksDbWeight, RuntimeDbWeight, Weight},
};

pub trait WeightInfo {
    fn initialize() -> Weight;
    fn mint() -> Weight;
    fn mint_batch(n: u32) -> Weight;
    fn burn() -> Weight;
    fn burn_batch(n: u32) -> Weight;
    fn safe_transfer_from() -> Weight;
    fn safe_batch_transfer_from(n: u32) -> Weight;
    fn set_approval_for_all() -> Weight;
    fn grant_role() -> Weight;
    fn revoke_role() -> Weight;
    fn renounce_role() -> Weight;
    fn upgrade() -> Weight;
    fn pause() -> Weight;
    fn unpause() -> Weight;
    fn set_token_uri() -> Weight;
}

fn estimate<D: Get<RuntimeDbWeight>>(ref_time: u64, reads: u64, writes: u64) -> Weight {
    Weight::from_parts(ref_time, 0).saturating_add(D::get().reads_writes(reads, writes))
}

fn per_entry(n: u32, each: u64) -> u64 {
    each.saturating_mul(n.into())
}

// Reads include the role or approval lookup and the pause flag.
macro_rules! estimates {
    ($db:ty) => {
        fn initialize() -> Weight {
            estimate::<$db>(18_000_000, 3, 6)
        }
        fn mint() -> Weight {
            estimate::<$db>(22_000_000, 4, 2)
        }
        fn mint_batch(n: u32) -> Weight {
            estimate::<$db>(
                20_000_000u64.saturating_add(per_entry(n, 9_000_000)),
                2u64.saturating_add(per_entry(n, 2)),
                per_entry(n, 2),
            )
        }
        fn burn() -> Weight {
            estimate::<$db>(21_000_000, 4, 2)
        }
        fn burn_batch(n: u32) -> Weight {
            estimate::<$db>(
                19_000_000u64.saturating_add(per_entry(n, 8_500_000)),
                2u64.saturating_add(per_entry(n, 2)),
                per_entry(n, 2),
            )
        }
        fn safe_transfer_from() -> Weight {
            estimate::<$db>(24_000_000, 4, 2)
        }
        fn safe_batch_transfer_from(n: u32) -> Weight {
            estimate::<$db>(
                21_000_000u64.saturating_add(per_entry(n, 10_000_000)),
                2u64.saturating_add(per_entry(n, 2)),
                per_entry(n, 2),
            )
        }
        fn set_approval_for_all() -> Weight {
            estimate::<$db>(12_000_000, 0, 1)
        }
        fn grant_role() -> Weight {
            estimate::<$db>(14_000_000, 2, 1)
        }
        fn revoke_role() -> Weight {
            estimate::<$db>(14_000_000, 2, 1)
        }
        fn renounce_role() -> Weight {
            estimate::<$db>(12_000_000, 1, 1)
        }
        fn upgrade() -> Weight {
            estimate::<$db>(15_000_000, 3, 1)
        }
        fn pause() -> Weight {
            estimate::<$db>(13_000_000, 3, 1)
        }
        fn unpause() -> Weight {
            estimate::<$db>(13_000_000, 3, 1)
        }
        fn set_token_uri() -> Weight {
            estimate::<$db>(16_000_000, 2, 1)
        }
    };
}

/// Weights for a runtime, scaled by its database weights.
pub struct SubstrateWeight<T>(PhantomData<T>);

impl<T: frame_system::Config> WeightInfo for SubstrateWeight<T> {
    estimates!(T::DbWeight);
}

// For backwards compatibility and tests.
impl WeightInfo for () {
    estimates!(RocksDbWeight);
}
