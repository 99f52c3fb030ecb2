//! Logic versions bound to the ledger's persisted state.
//!
//! Every version runs over the same storage items; a version decides which
//! [`Capability`]s are reachable. Upgrading rebinds
//! [`ActiveLogic`](crate::ActiveLogic) and nothing else, so balances,
//! supplies, approvals and roles carry across untouched.
//!
//! # Storage layout
//!
//! Each [`LogicBundle`] lists the pallet's storage items in declaration order.
//! A newer bundle keeps the older list as a prefix and only appends names that
//! were never used before. Appended items read as their defaults until the new
//! logic writes them, so binding a version never needs a data migration.
//!
//! # Adding a version
//!
//! 1. Declare the new storage items after the existing ones in `lib.rs`
//! 2. Append a bundle to [`BUNDLES`] with the extended layout and capabilities
//! 3. Point [`LogicVersion::LATEST`] at it
//!
//! `integrity_test` rejects a registry that skips a version or rewrites a
//! slot, and the pallet tests compare the latest layout with the storage
//! metadata.

use codec::{Decode, DecodeWithMemTracking, Encode, MaxEncodedLen};
use frame_support::{dispatch::DispatchResult, ensure};
use scale_info::TypeInfo;
use sp_runtime::RuntimeDebug;
#[cfg(any(feature = "try-runtime", test))]
use sp_std::prelude::*;

use crate::{
    ActiveLogic, Config, Error, Event, Initialized, Pallet, Role, Uri, UriOf, LOG_TARGET,
};
#[cfg(any(feature = "try-runtime", test))]
use crate::{Balance, Balances, OperatorApprovals, Roles, TokenId, TotalSupply};

/// Identifies the behavior set bound to the ledger. `0` means unbound.
#[derive(
    Encode,
    Decode,
    DecodeWithMemTracking,
    MaxEncodedLen,
    TypeInfo,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    RuntimeDebug,
)]
pub struct LogicVersion(pub u32);

impl LogicVersion {
    pub const UNBOUND: Self = Self(0);
    pub const V1: Self = Self(1);
    pub const V2: Self = Self(2);
    pub const V3: Self = Self(3);
    pub const LATEST: Self = Self::V3;

    pub fn bundle(self) -> Option<&'static LogicBundle> {
        BUNDLES.iter().find(|bundle| bundle.version == self)
    }

    pub fn supports(self, capability: Capability) -> bool {
        self.bundle().is_some_and(|bundle| bundle.capabilities.contains(&capability))
    }

    pub fn label(self) -> &'static str {
        match self.bundle() {
            Some(bundle) => bundle.label,
            None if self == Self::UNBOUND => "uninitialized",
            None => "unknown",
        }
    }

    pub fn successor(self) -> Option<Self> {
        self.0.checked_add(1).map(Self)
    }
}

/// Calls that only some logic versions offer.
#[derive(Clone, Copy, PartialEq, Eq, RuntimeDebug)]
pub enum Capability {
    /// `pause` / `unpause`, and the pause check on ledger mutations.
    Pause,
    /// `set_token_uri` and per-token answers from `uri`.
    TokenUri,
}

/// A logic version together with the storage it expects.
pub struct LogicBundle {
    pub version: LogicVersion,
    pub label: &'static str,
    /// Storage item names in declaration order.
    pub layout: &'static [&'static str],
    pub capabilities: &'static [Capability],
}

const V1_LAYOUT: &[&str] = &[
    "Uri",
    "Balances",
    "TotalSupply",
    "OperatorApprovals",
    "Roles",
    "Initialized",
    "ActiveLogic",
];

const V2_LAYOUT: &[&str] = &[
    "Uri",
    "Balances",
    "TotalSupply",
    "OperatorApprovals",
    "Roles",
    "Initialized",
    "ActiveLogic",
    "Paused",
];

const V3_LAYOUT: &[&str] = &[
    "Uri",
    "Balances",
    "TotalSupply",
    "OperatorApprovals",
    "Roles",
    "Initialized",
    "ActiveLogic",
    "Paused",
    "TokenUris",
];

/// Every logic version this pallet can bind, oldest first.
pub const BUNDLES: &[LogicBundle] = &[
    LogicBundle { version: LogicVersion::V1, label: "V1", layout: V1_LAYOUT, capabilities: &[] },
    LogicBundle {
        version: LogicVersion::V2,
        label: "V2",
        layout: V2_LAYOUT,
        capabilities: &[Capability::Pause],
    },
    LogicBundle {
        version: LogicVersion::V3,
        label: "V3",
        layout: V3_LAYOUT,
        capabilities: &[Capability::Pause, Capability::TokenUri],
    },
];

/// Whether `next` keeps `current` as a prefix and only appends fresh names.
pub fn is_append_only(current: &[&str], next: &[&str]) -> bool {
    if next.len() < current.len() || &next[..current.len()] != current {
        return false;
    }
    next.iter().enumerate().skip(current.len()).all(|(i, slot)| !next[..i].contains(slot))
}

/// The registry starts at `V1`, ends at `LATEST`, has no gaps, and each
/// layout appends to its predecessor.
pub(crate) fn registry_is_consistent() -> bool {
    let (Some(first), Some(last)) = (BUNDLES.first(), BUNDLES.last()) else {
        return false;
    };
    first.version == LogicVersion::V1 &&
        last.version == LogicVersion::LATEST &&
        is_append_only(&[], first.layout) &&
        BUNDLES.windows(2).all(|pair| {
            pair[0].version.successor() == Some(pair[1].version) &&
                is_append_only(pair[0].layout, pair[1].layout)
        })
}

/// Everything a logic upgrade must leave unchanged.
#[cfg(any(feature = "try-runtime", test))]
#[derive(Encode, Decode, Clone, PartialEq, Eq, RuntimeDebug)]
pub struct LedgerSnapshot<AccountId> {
    pub uri: Vec<u8>,
    pub initialized: bool,
    pub supplies: Vec<(TokenId, Balance)>,
    pub balances: Vec<(TokenId, AccountId, Balance)>,
    pub approvals: Vec<(AccountId, AccountId)>,
    pub roles: Vec<(Role, AccountId)>,
}

impl<T: Config> Pallet<T> {
    pub fn active_logic() -> LogicVersion {
        ActiveLogic::<T>::get()
    }

    /// Label of the bound logic, e.g. `"V2"`.
    pub fn version_label() -> &'static str {
        Self::active_logic().label()
    }

    pub fn is_initialized() -> bool {
        Initialized::<T>::get()
    }

    pub(crate) fn ensure_capability(capability: Capability) -> DispatchResult {
        ensure!(Self::active_logic().supports(capability), Error::<T>::CapabilityUnavailable);
        Ok(())
    }

    /// One-shot genesis: record the URI, grant the deployer `Admin` and
    /// `Minter`, bind `V1`. The only grant path without an `Admin` check.
    pub(crate) fn do_initialize(deployer: &T::AccountId, uri: UriOf<T>) -> DispatchResult {
        ensure!(!Initialized::<T>::get(), Error::<T>::AlreadyInitialized);

        Uri::<T>::put(&uri);
        Self::insert_role(Role::Admin, deployer, deployer);
        Self::insert_role(Role::Minter, deployer, deployer);
        Initialized::<T>::put(true);
        ActiveLogic::<T>::put(LogicVersion::V1);

        log::info!(target: LOG_TARGET, "Ledger initialized by {deployer:?}, bound logic V1");
        Self::deposit_event(Event::Initialized { deployer: deployer.clone(), uri });
        Ok(())
    }

    /// Bind `target` if it is the registered successor of the bound logic
    /// and its layout extends the bound layout.
    pub(crate) fn do_upgrade(caller: &T::AccountId, target: LogicVersion) -> DispatchResult {
        ensure!(Initialized::<T>::get(), Error::<T>::NotInitialized);
        Self::ensure_role(Role::Admin, caller)?;

        let current = Self::active_logic();
        let (Some(bound), Some(next)) = (current.bundle(), target.bundle()) else {
            return Err(Error::<T>::InvalidUpgrade.into());
        };
        ensure!(current.successor() == Some(target), Error::<T>::InvalidUpgrade);
        ensure!(is_append_only(bound.layout, next.layout), Error::<T>::InvalidUpgrade);

        ActiveLogic::<T>::put(target);

        log::info!(
            target: LOG_TARGET,
            "Logic upgraded {} -> {} by {caller:?}",
            bound.label,
            next.label
        );
        Self::deposit_event(Event::LogicUpgraded { from: current, to: target });
        Ok(())
    }

    #[cfg(any(feature = "try-runtime", test))]
    pub fn ledger_snapshot() -> LedgerSnapshot<T::AccountId> {
        let mut supplies: Vec<_> = TotalSupply::<T>::iter().collect();
        supplies.sort();
        let mut balances: Vec<_> = Balances::<T>::iter().collect();
        balances.sort();
        let mut approvals: Vec<_> = OperatorApprovals::<T>::iter()
            .filter(|(_, _, approved)| *approved)
            .map(|(owner, operator, _)| (owner, operator))
            .collect();
        approvals.sort();
        let mut roles: Vec<_> = Roles::<T>::iter().map(|(role, who, ())| (role, who)).collect();
        roles.sort();

        LedgerSnapshot {
            uri: Uri::<T>::get().into_inner(),
            initialized: Initialized::<T>::get(),
            supplies,
            balances,
            approvals,
            roles,
        }
    }
}
