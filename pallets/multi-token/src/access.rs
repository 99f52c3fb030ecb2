//! Role registry consulted explicitly by every gated call.

use codec::{Decode, DecodeWithMemTracking, Encode, MaxEncodedLen};
use frame_support::{dispatch::DispatchResult, ensure};
use scale_info::TypeInfo;
use sp_runtime::RuntimeDebug;

use crate::{Config, Error, Event, Pallet, Roles};

/// Capability roles.
///
/// The encoded variant index is part of the `Roles` storage key, so variants
/// may only be appended.
#[derive(
    Encode,
    Decode,
    DecodeWithMemTracking,
    MaxEncodedLen,
    TypeInfo,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    RuntimeDebug,
)]
pub enum Role {
    /// Grants and revokes roles, upgrades logic, pauses the ledger.
    Admin,
    /// Mints new tokens.
    Minter,
}

impl<T: Config> Pallet<T> {
    pub fn has_role(role: Role, who: &T::AccountId) -> bool {
        Roles::<T>::contains_key(role, who)
    }

    pub(crate) fn ensure_role(role: Role, who: &T::AccountId) -> DispatchResult {
        ensure!(Self::has_role(role, who), Error::<T>::AccessDenied);
        Ok(())
    }

    pub(crate) fn do_grant_role(
        sender: &T::AccountId,
        role: Role,
        account: &T::AccountId,
    ) -> DispatchResult {
        Self::ensure_role(Role::Admin, sender)?;
        Self::insert_role(role, account, sender);
        Ok(())
    }

    pub(crate) fn do_revoke_role(
        sender: &T::AccountId,
        role: Role,
        account: &T::AccountId,
    ) -> DispatchResult {
        Self::ensure_role(Role::Admin, sender)?;
        Self::remove_role(role, account, sender);
        Ok(())
    }

    pub(crate) fn do_renounce_role(who: &T::AccountId, role: Role) {
        Self::remove_role(role, who, who);
    }

    /// Unchecked grant. Every caller except genesis initialization has
    /// already verified `sender` holds `Admin`.
    pub(crate) fn insert_role(role: Role, account: &T::AccountId, sender: &T::AccountId) {
        if Self::has_role(role, account) {
            return;
        }
        Roles::<T>::insert(role, account, ());
        Self::deposit_event(Event::RoleGranted {
            role,
            account: account.clone(),
            sender: sender.clone(),
        });
    }

    fn remove_role(role: Role, account: &T::AccountId, sender: &T::AccountId) {
        if !Self::has_role(role, account) {
            return;
        }
        Roles::<T>::remove(role, account);
        Self::deposit_event(Event::RoleRevoked {
            role,
            account: account.clone(),
            sender: sender.clone(),
        });
    }
}
