#![cfg_attr(not(feature = "std"), no_std)]
// `Config::RuntimeEvent` is deprecated upstream; kept until the runtime adopts the new event bound.
#![allow(deprecated)]
#![allow(clippy::let_unit_value)]

//! # Multi-token ledger pallet
//!
//! Tracks an unsigned balance per `(token id, account)`, caps every token's
//! total supply at [`Config::MaxSupply`] and gates mutations behind a small
//! role registry. The logic bound to the ledger's storage can be upgraded in
//! sequence (`V1 → V2 → V3`); see [`logic`] for the append-only layout rules
//! that keep persisted state readable across upgrades.
//!
//! Every dispatchable stages its writes, checks them, and only then applies
//! them: a failing call leaves storage exactly as it found it.

use frame_support::{dispatch::DispatchResult, pallet_prelude::*};
use frame_system::{ensure_signed, pallet_prelude::*};
use sp_std::prelude::*;

pub use pallet::*;

mod access;
mod extensions;
mod ledger;
pub mod logic;
pub mod migrations;
pub mod weights;

pub use access::Role;
pub use ledger::OnTokensReceived;
pub use logic::{Capability, LogicBundle, LogicVersion};
pub use weights::WeightInfo;

#[cfg(test)]
mod mock;


#[cfg(feature = "runtime-benchmarks")]
mod benchmarking;

/// Identifies a fungible class within the ledger.
pub type TokenId = u128;

/// Token amounts. Unsigned, so a negative balance is unrepresentable.
pub type Balance = u128;

pub type UriOf<T> = BoundedVec<u8, <T as Config>::MaxUriLength>;
pub type BatchOf<T, V> = BoundedVec<V, <T as Config>::MaxBatchSize>;
pub type DataOf<T> = BoundedVec<u8, <T as Config>::MaxDataLength>;

pub(crate) const LOG_TARGET: &str = "pallet-multi-token";

/// The current storage version.
///
/// Logic upgrades only append storage items, so this stays at 1 across them.
const STORAGE_VERSION: StorageVersion = StorageVersion::new(1);

#[frame_support::pallet]
pub mod pallet {
    use super::*;

    #[pallet::config]
    pub trait Config: frame_system::Config {
        type RuntimeEvent: From<Event<Self>> + IsType<<Self as frame_system::Config>::RuntimeEvent>;

        /// Issuance cap, applied to each token id independently.
        #[pallet::constant]
        type MaxSupply: Get<Balance>;

        /// Maximum length of the base URI and of per-token URI overrides.
        #[pallet::constant]
        type MaxUriLength: Get<u32>;

        /// Maximum number of entries in a batch call.
        #[pallet::constant]
        type MaxBatchSize: Get<u32>;

        /// Maximum length of the opaque `data` handed to receivers.
        #[pallet::constant]
        type MaxDataLength: Get<u32>;

        /// Acceptance check for accounts receiving minted or transferred tokens.
        type OnReceived: OnTokensReceived<Self::AccountId>;

        type WeightInfo: WeightInfo;
    }

    #[pallet::pallet]
    #[pallet::storage_version(STORAGE_VERSION)]
    pub struct Pallet<T>(_);

    // Storage items are declared in layout order. Never reorder, retype or
    // remove one; new items go at the end (see `logic::BUNDLES`).

    /// Base metadata URI, e.g. `https://example.com/{id}.json`
    #[pallet::storage]
    pub type Uri<T: Config> = StorageValue<_, UriOf<T>, ValueQuery>;

    /// Balances keyed by token id, then holder. Zero balances are not stored.
    #[pallet::storage]
    pub type Balances<T: Config> = StorageDoubleMap<
        _,
        Blake2_128Concat,
        TokenId,
        Blake2_128Concat,
        T::AccountId,
        Balance,
        ValueQuery,
    >;

    /// Total supply per token id. Zero supplies are not stored.
    #[pallet::storage]
    pub type TotalSupply<T> = StorageMap<_, Blake2_128Concat, TokenId, Balance, ValueQuery>;

    /// Operators approved to move or burn all of an owner's tokens.
    #[pallet::storage]
    pub type OperatorApprovals<T: Config> = StorageDoubleMap<
        _,
        Blake2_128Concat,
        T::AccountId,
        Blake2_128Concat,
        T::AccountId,
        bool,
        ValueQuery,
    >;

    /// Role membership.
    #[pallet::storage]
    pub type Roles<T: Config> =
        StorageDoubleMap<_, Blake2_128Concat, Role, Blake2_128Concat, T::AccountId, (), OptionQuery>;

    /// Set once genesis initialization has run.
    #[pallet::storage]
    pub type Initialized<T> = StorageValue<_, bool, ValueQuery>;

    /// Logic version currently bound to this storage.
    #[pallet::storage]
    pub type ActiveLogic<T> = StorageValue<_, LogicVersion, ValueQuery>;

    /// Ledger-wide pause switch (V2).
    #[pallet::storage]
    pub type Paused<T> = StorageValue<_, bool, ValueQuery>;

    /// Per-token URI overrides (V3).
    #[pallet::storage]
    pub type TokenUris<T: Config> = StorageMap<_, Blake2_128Concat, TokenId, UriOf<T>, OptionQuery>;

    #[pallet::event]
    #[pallet::generate_deposit(pub(super) fn deposit_event)]
    pub enum Event<T: Config> {
        /// Genesis initialization ran; the deployer holds `Admin` and `Minter`.
        Initialized { deployer: T::AccountId, uri: UriOf<T> },
        /// New tokens minted
        Minted { operator: T::AccountId, to: T::AccountId, id: TokenId, amount: Balance },
        /// Several token ids minted in one call
        MintedBatch {
            operator: T::AccountId,
            to: T::AccountId,
            ids: Vec<TokenId>,
            amounts: Vec<Balance>,
        },
        /// Tokens burned
        Burned { operator: T::AccountId, from: T::AccountId, id: TokenId, amount: Balance },
        /// Several token ids burned in one call
        BurnedBatch {
            operator: T::AccountId,
            from: T::AccountId,
            ids: Vec<TokenId>,
            amounts: Vec<Balance>,
        },
        /// Tokens transferred from one account to another
        Transferred {
            operator: T::AccountId,
            from: T::AccountId,
            to: T::AccountId,
            id: TokenId,
            amount: Balance,
        },
        /// Several token ids transferred in one call
        TransferredBatch {
            operator: T::AccountId,
            from: T::AccountId,
            to: T::AccountId,
            ids: Vec<TokenId>,
            amounts: Vec<Balance>,
        },
        /// Operator approval changed
        ApprovalForAll { owner: T::AccountId, operator: T::AccountId, approved: bool },
        /// Account gained a role
        RoleGranted { role: Role, account: T::AccountId, sender: T::AccountId },
        /// Account lost a role
        RoleRevoked { role: Role, account: T::AccountId, sender: T::AccountId },
        /// A newer logic version was bound to the ledger
        LogicUpgraded { from: LogicVersion, to: LogicVersion },
        /// Ledger paused
        Paused { account: T::AccountId },
        /// Ledger unpaused
        Unpaused { account: T::AccountId },
        /// Per-token URI override set (empty clears it)
        TokenUriSet { id: TokenId, uri: UriOf<T> },
    }

    #[pallet::error]
    pub enum Error<T> {
        /// Caller lacks the required role or operator approval.
        AccessDenied,
        /// The mint would push a token's supply above `MaxSupply`.
        MaxSupplyExceeded,
        /// Burn or transfer exceeds the holder's balance.
        InsufficientBalance,
        /// Batch id and amount lists differ in length.
        LengthMismatch,
        /// Genesis initialization already ran.
        AlreadyInitialized,
        /// The ledger has not been initialized yet.
        NotInitialized,
        /// Target logic is unknown, not the next version, or not layout compatible.
        InvalidUpgrade,
        /// The bound logic version does not offer this call.
        CapabilityUnavailable,
        /// The ledger is paused.
        LedgerPaused,
        /// The ledger is not paused.
        NotPaused,
        /// An account cannot be its own operator.
        InvalidOperator,
        /// Balance or supply bookkeeping overflowed.
        Overflow,
    }

    #[pallet::hooks]
    impl<T: Config> Hooks<BlockNumberFor<T>> for Pallet<T> {
        fn integrity_test() {
            assert!(T::MaxSupply::get() > 0, "MaxSupply must allow issuance");
            assert!(
                logic::registry_is_consistent(),
                "logic bundles must be consecutive and append-only"
            );
        }

        #[cfg(feature = "try-runtime")]
        fn try_state(_n: BlockNumberFor<T>) -> Result<(), sp_runtime::TryRuntimeError> {
            Self::do_try_state()
        }
    }

    #[pallet::call]
    impl<T: Config> Pallet<T> {
        /// Run genesis initialization: record `uri` and grant the caller
        /// `Admin` and `Minter`. Succeeds once.
        #[pallet::call_index(0)]
        #[pallet::weight(T::WeightInfo::initialize())]
        pub fn initialize(origin: OriginFor<T>, uri: UriOf<T>) -> DispatchResult {
            let deployer = ensure_signed(origin)?;
            Self::do_initialize(&deployer, uri)
        }

        #[pallet::call_index(1)]
        #[pallet::weight(T::WeightInfo::mint())]
        pub fn mint(
            origin: OriginFor<T>,
            to: T::AccountId,
            id: TokenId,
            amount: Balance,
            data: DataOf<T>,
        ) -> DispatchResult {
            let operator = ensure_signed(origin)?;
            Self::do_mint(&operator, &to, id, amount, &data)
        }

        /// Mint several token ids at once. Either every entry is minted or none is.
        #[pallet::call_index(2)]
        #[pallet::weight(T::WeightInfo::mint_batch(ids.len() as u32))]
        pub fn mint_batch(
            origin: OriginFor<T>,
            to: T::AccountId,
            ids: BatchOf<T, TokenId>,
            amounts: BatchOf<T, Balance>,
            data: DataOf<T>,
        ) -> DispatchResult {
            let operator = ensure_signed(origin)?;
            Self::do_mint_batch(&operator, &to, &ids, &amounts, &data)
        }

        #[pallet::call_index(3)]
        #[pallet::weight(T::WeightInfo::burn())]
        pub fn burn(
            origin: OriginFor<T>,
            from: T::AccountId,
            id: TokenId,
            amount: Balance,
        ) -> DispatchResult {
            let operator = ensure_signed(origin)?;
            Self::do_burn(&operator, &from, id, amount)
        }

        #[pallet::call_index(4)]
        #[pallet::weight(T::WeightInfo::burn_batch(ids.len() as u32))]
        pub fn burn_batch(
            origin: OriginFor<T>,
            from: T::AccountId,
            ids: BatchOf<T, TokenId>,
            amounts: BatchOf<T, Balance>,
        ) -> DispatchResult {
            let operator = ensure_signed(origin)?;
            Self::do_burn_batch(&operator, &from, &ids, &amounts)
        }

        #[pallet::call_index(5)]
        #[pallet::weight(T::WeightInfo::safe_transfer_from())]
        pub fn safe_transfer_from(
            origin: OriginFor<T>,
            from: T::AccountId,
            to: T::AccountId,
            id: TokenId,
            amount: Balance,
            data: DataOf<T>,
        ) -> DispatchResult {
            let operator = ensure_signed(origin)?;
            Self::do_transfer(&operator, &from, &to, id, amount, &data)
        }

        #[pallet::call_index(6)]
        #[pallet::weight(T::WeightInfo::safe_batch_transfer_from(ids.len() as u32))]
        pub fn safe_batch_transfer_from(
            origin: OriginFor<T>,
            from: T::AccountId,
            to: T::AccountId,
            ids: BatchOf<T, TokenId>,
            amounts: BatchOf<T, Balance>,
            data: DataOf<T>,
        ) -> DispatchResult {
            let operator = ensure_signed(origin)?;
            Self::do_batch_transfer(&operator, &from, &to, &ids, &amounts, &data)
        }

        #[pallet::call_index(7)]
        #[pallet::weight(T::WeightInfo::set_approval_for_all())]
        pub fn set_approval_for_all(
            origin: OriginFor<T>,
            operator: T::AccountId,
            approved: bool,
        ) -> DispatchResult {
            let owner = ensure_signed(origin)?;
            Self::do_set_approval_for_all(&owner, &operator, approved)
        }

        #[pallet::call_index(8)]
        #[pallet::weight(T::WeightInfo::grant_role())]
        pub fn grant_role(origin: OriginFor<T>, role: Role, account: T::AccountId) -> DispatchResult {
            let sender = ensure_signed(origin)?;
            Self::do_grant_role(&sender, role, &account)
        }

        #[pallet::call_index(9)]
        #[pallet::weight(T::WeightInfo::revoke_role())]
        pub fn revoke_role(
            origin: OriginFor<T>,
            role: Role,
            account: T::AccountId,
        ) -> DispatchResult {
            let sender = ensure_signed(origin)?;
            Self::do_revoke_role(&sender, role, &account)
        }

        /// Drop one of the caller's own roles.
        #[pallet::call_index(10)]
        #[pallet::weight(T::WeightInfo::renounce_role())]
        pub fn renounce_role(origin: OriginFor<T>, role: Role) -> DispatchResult {
            let who = ensure_signed(origin)?;
            Self::do_renounce_role(&who, role);
            Ok(())
        }

        /// Bind the next logic version to the ledger's storage.
        #[pallet::call_index(11)]
        #[pallet::weight(T::WeightInfo::upgrade())]
        pub fn upgrade(origin: OriginFor<T>, new_logic: LogicVersion) -> DispatchResult {
            let caller = ensure_signed(origin)?;
            Self::do_upgrade(&caller, new_logic)
        }

        #[pallet::call_index(12)]
        #[pallet::weight(T::WeightInfo::pause())]
        pub fn pause(origin: OriginFor<T>) -> DispatchResult {
            let who = ensure_signed(origin)?;
            Self::do_pause(&who)
        }

        #[pallet::call_index(13)]
        #[pallet::weight(T::WeightInfo::unpause())]
        pub fn unpause(origin: OriginFor<T>) -> DispatchResult {
            let who = ensure_signed(origin)?;
            Self::do_unpause(&who)
        }

        #[pallet::call_index(14)]
        #[pallet::weight(T::WeightInfo::set_token_uri())]
        pub fn set_token_uri(origin: OriginFor<T>, id: TokenId, uri: UriOf<T>) -> DispatchResult {
            let who = ensure_signed(origin)?;
            Self::do_set_token_uri(&who, id, uri)
        }
    }

    #[pallet::genesis_config]
    #[derive(frame_support::DefaultNoBound)]
    pub struct GenesisConfig<T: Config> {
        /// Account that runs genesis initialization. `None` leaves the ledger
        /// uninitialized until someone calls `initialize`.
        pub deployer: Option<T::AccountId>,
        /// Base metadata URI
        pub uri: Vec<u8>,
    }

    #[pallet::genesis_build]
    impl<T: Config> BuildGenesisConfig for GenesisConfig<T> {
        fn build(&self) {
            if let Some(ref deployer) = self.deployer {
                let uri: UriOf<T> =
                    self.uri.clone().try_into().expect("Metadata URI exceeds MaxUriLength");
                Pallet::<T>::do_initialize(deployer, uri)
                    .expect("Genesis storage starts uninitialized");
            }
        }
    }
}
