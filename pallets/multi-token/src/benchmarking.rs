//! Benchmarking setup for pallet-multi-token

use super::*;

#[allow(unused)]
use crate::Pallet as MultiToken;
use frame_benchmarking::v2::*;
use frame_system::RawOrigin;
use sp_std::vec;

/// Caller holding `Admin` and `Minter` on an initialized ledger.
fn admin<T: Config>() -> T::AccountId {
    let admin: T::AccountId = whitelisted_caller();
    if Initialized::<T>::get() {
        Pallet::<T>::insert_role(Role::Admin, &admin, &admin);
        Pallet::<T>::insert_role(Role::Minter, &admin, &admin);
    } else {
        Pallet::<T>::do_initialize(&admin, UriOf::<T>::default()).expect("ledger is uninitialized");
    }
    admin
}

fn amount<T: Config>() -> Balance {
    (T::MaxSupply::get() / 2).max(1)
}

fn ids<T: Config>(n: u32) -> BatchOf<T, TokenId> {
    BoundedVec::truncate_from((0..TokenId::from(n)).collect())
}

fn amounts<T: Config>(n: u32) -> BatchOf<T, Balance> {
    BoundedVec::truncate_from(vec![amount::<T>(); n as usize])
}

fn max_data<T: Config>() -> DataOf<T> {
    BoundedVec::truncate_from(vec![0u8; T::MaxDataLength::get() as usize])
}

fn seed<T: Config>(owner: &T::AccountId, ids: &[TokenId]) {
    for id in ids {
        Pallet::<T>::do_mint(owner, owner, *id, amount::<T>(), &[]).expect("seed mint fits cap");
    }
}

#[benchmarks]
mod benchmarks {
    use super::*;

    #[benchmark]
    fn initialize() {
        let caller: T::AccountId = whitelisted_caller();
        Initialized::<T>::kill();
        let uri = BoundedVec::truncate_from(vec![b'u'; T::MaxUriLength::get() as usize]);

        #[extrinsic_call]
        _(RawOrigin::Signed(caller.clone()), uri);

        assert!(Initialized::<T>::get());
        assert!(Pallet::<T>::has_role(Role::Admin, &caller));
    }

    #[benchmark]
    fn mint() {
        let caller = admin::<T>();
        let recipient: T::AccountId = account("recipient", 0, 0);

        #[extrinsic_call]
        _(RawOrigin::Signed(caller), recipient.clone(), 1, amount::<T>(), max_data::<T>());

        assert_eq!(Pallet::<T>::balance_of(&recipient, 1), amount::<T>());
    }

    #[benchmark]
    fn mint_batch(n: Linear<1, { T::MaxBatchSize::get() }>) {
        let caller = admin::<T>();
        let recipient: T::AccountId = account("recipient", 0, 0);

        #[extrinsic_call]
        _(
            RawOrigin::Signed(caller),
            recipient.clone(),
            ids::<T>(n),
            amounts::<T>(n),
            max_data::<T>(),
        );

        assert_eq!(Pallet::<T>::balance_of(&recipient, 0), amount::<T>());
    }

    #[benchmark]
    fn burn() {
        let caller = admin::<T>();
        seed::<T>(&caller, &[1]);

        #[extrinsic_call]
        _(RawOrigin::Signed(caller.clone()), caller.clone(), 1, amount::<T>());

        assert!(!Pallet::<T>::exists(1));
    }

    #[benchmark]
    fn burn_batch(n: Linear<1, { T::MaxBatchSize::get() }>) {
        let caller = admin::<T>();
        let ids = ids::<T>(n);
        seed::<T>(&caller, &ids);

        #[extrinsic_call]
        _(RawOrigin::Signed(caller.clone()), caller.clone(), ids, amounts::<T>(n));

        assert!(!Pallet::<T>::exists(0));
    }

    #[benchmark]
    fn safe_transfer_from() {
        let owner = admin::<T>();
        seed::<T>(&owner, &[1]);
        // Worst case: an approved operator moves the tokens.
        let operator: T::AccountId = account("operator", 0, 0);
        let recipient: T::AccountId = account("recipient", 0, 0);
        OperatorApprovals::<T>::insert(&owner, &operator, true);

        #[extrinsic_call]
        _(
            RawOrigin::Signed(operator),
            owner.clone(),
            recipient.clone(),
            1,
            amount::<T>(),
            max_data::<T>(),
        );

        assert_eq!(Pallet::<T>::balance_of(&recipient, 1), amount::<T>());
    }

    #[benchmark]
    fn safe_batch_transfer_from(n: Linear<1, { T::MaxBatchSize::get() }>) {
        let owner = admin::<T>();
        let ids = ids::<T>(n);
        seed::<T>(&owner, &ids);
        let operator: T::AccountId = account("operator", 0, 0);
        let recipient: T::AccountId = account("recipient", 0, 0);
        OperatorApprovals::<T>::insert(&owner, &operator, true);

        #[extrinsic_call]
        _(
            RawOrigin::Signed(operator),
            owner.clone(),
            recipient.clone(),
            ids,
            amounts::<T>(n),
            max_data::<T>(),
        );

        assert_eq!(Pallet::<T>::balance_of(&recipient, 0), amount::<T>());
    }

    #[benchmark]
    fn set_approval_for_all() {
        let owner: T::AccountId = whitelisted_caller();
        let operator: T::AccountId = account("operator", 0, 0);

        #[extrinsic_call]
        _(RawOrigin::Signed(owner.clone()), operator.clone(), true);

        assert!(Pallet::<T>::is_approved_for_all(&owner, &operator));
    }

    #[benchmark]
    fn grant_role() {
        let caller = admin::<T>();
        let account: T::AccountId = account("minter", 0, 0);

        #[extrinsic_call]
        _(RawOrigin::Signed(caller), Role::Minter, account.clone());

        assert!(Pallet::<T>::has_role(Role::Minter, &account));
    }

    #[benchmark]
    fn revoke_role() {
        let caller = admin::<T>();
        let account: T::AccountId = account("minter", 0, 0);
        Roles::<T>::insert(Role::Minter, &account, ());

        #[extrinsic_call]
        _(RawOrigin::Signed(caller), Role::Minter, account.clone());

        assert!(!Pallet::<T>::has_role(Role::Minter, &account));
    }

    #[benchmark]
    fn renounce_role() {
        let caller = admin::<T>();

        #[extrinsic_call]
        _(RawOrigin::Signed(caller.clone()), Role::Minter);

        assert!(!Pallet::<T>::has_role(Role::Minter, &caller));
    }

    #[benchmark]
    fn upgrade() {
        let caller = admin::<T>();
        ActiveLogic::<T>::put(LogicVersion::V1);

        #[extrinsic_call]
        _(RawOrigin::Signed(caller), LogicVersion::V2);

        assert_eq!(Pallet::<T>::active_logic(), LogicVersion::V2);
    }

    #[benchmark]
    fn pause() {
        let caller = admin::<T>();
        ActiveLogic::<T>::put(LogicVersion::LATEST);

        #[extrinsic_call]
        _(RawOrigin::Signed(caller));

        assert!(Pallet::<T>::is_paused());
    }

    #[benchmark]
    fn unpause() {
        let caller = admin::<T>();
        ActiveLogic::<T>::put(LogicVersion::LATEST);
        Paused::<T>::put(true);

        #[extrinsic_call]
        _(RawOrigin::Signed(caller));

        assert!(!Pallet::<T>::is_paused());
    }

    #[benchmark]
    fn set_token_uri() {
        let caller = admin::<T>();
        ActiveLogic::<T>::put(LogicVersion::LATEST);
        let uri: UriOf<T> =
            BoundedVec::truncate_from(vec![b'u'; T::MaxUriLength::get() as usize]);

        #[extrinsic_call]
        _(RawOrigin::Signed(caller), 1, uri.clone());

        assert_eq!(Pallet::<T>::uri(1), uri.into_inner());
    }

    impl_benchmark_test_suite!(
        MultiToken,
        crate::mock::ExtBuilder::default().uninitialized().build(),
        crate::mock::Test
    );
}
