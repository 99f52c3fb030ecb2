//! Storage migrations for pallet-multi-token.
//!
//! Logic upgrades (see [`crate::logic`]) only append storage items and never
//! need a migration. The migrations here cover runtime upgrades that change
//! the pallet's `StorageVersion`; each one is versioned and runs exactly once.
//!
//! # Guidelines
//!
//! - **Never skip versions**: migrate sequentially (v1 → v2 → v3)
//! - **Idempotent migrations**: check the on-chain version before migrating
//! - **Preserve the ledger**: balances, supplies, approvals and roles must
//!   read the same afterwards; the `try-runtime` hooks compare snapshots
//! - **Logging**: use `log::info!` with the pallet target
//!
//! Wire migrations into the runtime's `Executive` migration tuple, oldest
//! first.

use frame_support::{pallet_prelude::*, traits::OnRuntimeUpgrade};
use sp_std::marker::PhantomData;

use crate::{ActiveLogic, Config, Initialized, LogicVersion, Pallet, LOG_TARGET};

/// Migration to version 1.
///
/// Ledgers deployed before the `ActiveLogic` slot existed carry storage
/// version 0 and read `ActiveLogic` as unbound. For an initialized ledger
/// this binds `V1`, the behavior such a ledger was running.
pub mod v1 {
    use super::*;

    pub struct MigrateToV1<T>(PhantomData<T>);

    impl<T: Config> OnRuntimeUpgrade for MigrateToV1<T> {
        fn on_runtime_upgrade() -> Weight {
            let on_chain_version = Pallet::<T>::on_chain_storage_version();

            if on_chain_version < 1 {
                let mut writes = 1;
                if Initialized::<T>::get() && ActiveLogic::<T>::get() == LogicVersion::UNBOUND {
                    ActiveLogic::<T>::put(LogicVersion::V1);
                    writes += 1;
                    log::info!(target: LOG_TARGET, "Bound logic V1 to pre-versioned ledger");
                }

                StorageVersion::new(1).put::<Pallet<T>>();
                log::info!(target: LOG_TARGET, "Migrated pallet-multi-token storage v0 → v1");

                // Version, Initialized and ActiveLogic read.
                T::DbWeight::get().reads_writes(3, writes)
            } else {
                log::info!(
                    target: LOG_TARGET,
                    "Storage already at v{on_chain_version:?}, skipping v1 migration"
                );
                T::DbWeight::get().reads(1)
            }
        }

        /// Captures the on-chain version and a full ledger snapshot.
        #[cfg(feature = "try-runtime")]
        fn pre_upgrade() -> Result<sp_std::vec::Vec<u8>, sp_runtime::TryRuntimeError> {
            let on_chain_version = Pallet::<T>::on_chain_storage_version();
            log::info!(
                target: LOG_TARGET,
                "Pre-upgrade: on-chain storage version is {on_chain_version:?}"
            );
            Ok((on_chain_version, Pallet::<T>::ledger_snapshot()).encode())
        }

        /// Verifies the version moved forward and the ledger is unchanged.
        #[cfg(feature = "try-runtime")]
        fn post_upgrade(state: sp_std::vec::Vec<u8>) -> Result<(), sp_runtime::TryRuntimeError> {
            let (pre_version, pre_snapshot): (
                StorageVersion,
                crate::logic::LedgerSnapshot<T::AccountId>,
            ) = Decode::decode(&mut &state[..])
                .map_err(|_| sp_runtime::TryRuntimeError::Other("Failed to decode pre-state"))?;

            let post_version = Pallet::<T>::on_chain_storage_version();
            log::info!(
                target: LOG_TARGET,
                "Post-upgrade: version changed from {pre_version:?} to {post_version:?}"
            );

            if pre_version < 1 {
                ensure!(
                    post_version >= 1,
                    sp_runtime::TryRuntimeError::Other("Migration to v1 did not complete")
                );
            }
            ensure!(
                Pallet::<T>::ledger_snapshot() == pre_snapshot,
                sp_runtime::TryRuntimeError::Other("Ledger state changed during migration")
            );
            if Initialized::<T>::get() {
                ensure!(
                    ActiveLogic::<T>::get() != LogicVersion::UNBOUND,
                    sp_runtime::TryRuntimeError::Other("Initialized ledger has no bound logic")
                );
            }
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{new_test_ext, ExtBuilder, MultiToken, Test, OWNER};
    use frame_support::traits::StorageVersion;

    #[test]
    fn migration_v1_from_v0_works() {
        new_test_ext().execute_with(|| {
            StorageVersion::new(0).put::<Pallet<Test>>();
            assert_eq!(Pallet::<Test>::on_chain_storage_version(), 0);

            let _weight = v1::MigrateToV1::<Test>::on_runtime_upgrade();

            assert_eq!(Pallet::<Test>::on_chain_storage_version(), 1);
        });
    }

    #[test]
    fn migration_v1_binds_logic_for_pre_versioned_ledger() {
        new_test_ext().execute_with(|| {
            assert!(MultiToken::has_role(crate::Role::Admin, &OWNER));
            StorageVersion::new(0).put::<Pallet<Test>>();
            ActiveLogic::<Test>::kill();
            let before = MultiToken::ledger_snapshot();

            v1::MigrateToV1::<Test>::on_runtime_upgrade();

            assert_eq!(MultiToken::active_logic(), LogicVersion::V1);
            assert_eq!(MultiToken::ledger_snapshot(), before);
        });
    }

    #[test]
    fn migration_v1_leaves_uninitialized_ledger_unbound() {
        ExtBuilder::default().uninitialized().build().execute_with(|| {
            StorageVersion::new(0).put::<Pallet<Test>>();

            v1::MigrateToV1::<Test>::on_runtime_upgrade();

            assert_eq!(MultiToken::active_logic(), LogicVersion::UNBOUND);
            assert_eq!(Pallet::<Test>::on_chain_storage_version(), 1);
        });
    }

    #[test]
    fn migration_v1_idempotent() {
        new_test_ext().execute_with(|| {
            StorageVersion::new(1).put::<Pallet<Test>>();
            ActiveLogic::<Test>::put(LogicVersion::V2);

            let _weight = v1::MigrateToV1::<Test>::on_runtime_upgrade();

            assert_eq!(Pallet::<Test>::on_chain_storage_version(), 1);
            assert_eq!(MultiToken::active_logic(), LogicVersion::V2);
        });
    }

    #[test]
    fn migration_v1_skipped_on_higher_version() {
        new_test_ext().execute_with(|| {
            StorageVersion::new(5).put::<Pallet<Test>>();

            let _weight = v1::MigrateToV1::<Test>::on_runtime_upgrade();

            assert_eq!(Pallet::<Test>::on_chain_storage_version(), 5);
        });
    }
}
