//! Balance and supply bookkeeping.
//!
//! Mutations follow one shape: authorize, stage every new value while
//! checking it, ask the receiver hook, then write the staged values.

use frame_support::{dispatch::DispatchResult, ensure, traits::Get};
use sp_runtime::DispatchError;
use sp_std::{collections::btree_map::BTreeMap, prelude::*};

use crate::{
    Balance, Balances, Config, Error, Event, OperatorApprovals, Pallet, Role, TokenId,
    TotalSupply, LOG_TARGET,
};

/// Acceptance check for accounts that receive tokens.
///
/// Invoked after every ledger check has passed and before anything is written,
/// so an `Err` aborts the call with no state applied. `from` is `None` for
/// mints.
pub trait OnTokensReceived<AccountId> {
    fn on_received(
        operator: &AccountId,
        from: Option<&AccountId>,
        to: &AccountId,
        ids: &[TokenId],
        amounts: &[Balance],
        data: &[u8],
    ) -> DispatchResult;
}

impl<AccountId> OnTokensReceived<AccountId> for () {
    fn on_received(
        _operator: &AccountId,
        _from: Option<&AccountId>,
        _to: &AccountId,
        _ids: &[TokenId],
        _amounts: &[Balance],
        _data: &[u8],
    ) -> DispatchResult {
        Ok(())
    }
}

impl<T: Config> Pallet<T> {
    pub fn balance_of(who: &T::AccountId, id: TokenId) -> Balance {
        Balances::<T>::get(id, who)
    }

    /// Balances for `accounts[i]` in `ids[i]`.
    pub fn balance_of_batch(
        accounts: &[T::AccountId],
        ids: &[TokenId],
    ) -> Result<Vec<Balance>, DispatchError> {
        ensure!(accounts.len() == ids.len(), Error::<T>::LengthMismatch);
        Ok(accounts.iter().zip(ids).map(|(who, id)| Self::balance_of(who, *id)).collect())
    }

    pub fn total_supply(id: TokenId) -> Balance {
        TotalSupply::<T>::get(id)
    }

    pub fn exists(id: TokenId) -> bool {
        Self::total_supply(id) > 0
    }

    pub fn is_approved_for_all(owner: &T::AccountId, operator: &T::AccountId) -> bool {
        OperatorApprovals::<T>::get(owner, operator)
    }

    pub(crate) fn do_mint(
        operator: &T::AccountId,
        to: &T::AccountId,
        id: TokenId,
        amount: Balance,
        data: &[u8],
    ) -> DispatchResult {
        Self::ensure_role(Role::Minter, operator)?;
        Self::ensure_not_paused()?;

        let supply = Self::raised_supply(id, amount)?;
        let balance = Balances::<T>::get(id, to).checked_add(amount).ok_or(Error::<T>::Overflow)?;
        T::OnReceived::on_received(operator, None, to, &[id], &[amount], data)?;

        Self::write_supply(id, supply);
        Self::write_balance(id, to, balance);

        log::debug!(target: LOG_TARGET, "minted {amount} of token {id} to {to:?}");
        Self::deposit_event(Event::Minted { operator: operator.clone(), to: to.clone(), id, amount });
        Ok(())
    }

    pub(crate) fn do_mint_batch(
        operator: &T::AccountId,
        to: &T::AccountId,
        ids: &[TokenId],
        amounts: &[Balance],
        data: &[u8],
    ) -> DispatchResult {
        Self::ensure_role(Role::Minter, operator)?;
        Self::ensure_not_paused()?;
        ensure!(ids.len() == amounts.len(), Error::<T>::LengthMismatch);

        // A repeated id is capped on its combined amount.
        let totals = Self::aggregate(ids, amounts).ok_or(Error::<T>::MaxSupplyExceeded)?;
        let mut staged = Vec::with_capacity(totals.len());
        for (id, amount) in totals {
            let supply = Self::raised_supply(id, amount)?;
            let balance =
                Balances::<T>::get(id, to).checked_add(amount).ok_or(Error::<T>::Overflow)?;
            staged.push((id, supply, balance));
        }
        T::OnReceived::on_received(operator, None, to, ids, amounts, data)?;

        for (id, supply, balance) in staged {
            Self::write_supply(id, supply);
            Self::write_balance(id, to, balance);
        }

        log::debug!(target: LOG_TARGET, "minted batch of {} entries to {to:?}", ids.len());
        Self::deposit_event(Event::MintedBatch {
            operator: operator.clone(),
            to: to.clone(),
            ids: ids.to_vec(),
            amounts: amounts.to_vec(),
        });
        Ok(())
    }

    pub(crate) fn do_burn(
        operator: &T::AccountId,
        from: &T::AccountId,
        id: TokenId,
        amount: Balance,
    ) -> DispatchResult {
        Self::ensure_owner_or_operator(operator, from)?;
        Self::ensure_not_paused()?;

        let balance = Balances::<T>::get(id, from)
            .checked_sub(amount)
            .ok_or(Error::<T>::InsufficientBalance)?;
        let supply = TotalSupply::<T>::get(id).checked_sub(amount).ok_or(Error::<T>::Overflow)?;

        Self::write_balance(id, from, balance);
        Self::write_supply(id, supply);

        log::debug!(target: LOG_TARGET, "burned {amount} of token {id} from {from:?}");
        Self::deposit_event(Event::Burned {
            operator: operator.clone(),
            from: from.clone(),
            id,
            amount,
        });
        Ok(())
    }

    pub(crate) fn do_burn_batch(
        operator: &T::AccountId,
        from: &T::AccountId,
        ids: &[TokenId],
        amounts: &[Balance],
    ) -> DispatchResult {
        Self::ensure_owner_or_operator(operator, from)?;
        Self::ensure_not_paused()?;
        ensure!(ids.len() == amounts.len(), Error::<T>::LengthMismatch);

        let totals = Self::aggregate(ids, amounts).ok_or(Error::<T>::InsufficientBalance)?;
        let mut staged = Vec::with_capacity(totals.len());
        for (id, amount) in totals {
            let balance = Balances::<T>::get(id, from)
                .checked_sub(amount)
                .ok_or(Error::<T>::InsufficientBalance)?;
            let supply =
                TotalSupply::<T>::get(id).checked_sub(amount).ok_or(Error::<T>::Overflow)?;
            staged.push((id, balance, supply));
        }

        for (id, balance, supply) in staged {
            Self::write_balance(id, from, balance);
            Self::write_supply(id, supply);
        }

        log::debug!(target: LOG_TARGET, "burned batch of {} entries from {from:?}", ids.len());
        Self::deposit_event(Event::BurnedBatch {
            operator: operator.clone(),
            from: from.clone(),
            ids: ids.to_vec(),
            amounts: amounts.to_vec(),
        });
        Ok(())
    }

    pub(crate) fn do_transfer(
        operator: &T::AccountId,
        from: &T::AccountId,
        to: &T::AccountId,
        id: TokenId,
        amount: Balance,
        data: &[u8],
    ) -> DispatchResult {
        Self::ensure_owner_or_operator(operator, from)?;
        Self::ensure_not_paused()?;

        let from_balance = Balances::<T>::get(id, from)
            .checked_sub(amount)
            .ok_or(Error::<T>::InsufficientBalance)?;
        let to_balance = if from == to {
            None
        } else {
            Some(Balances::<T>::get(id, to).checked_add(amount).ok_or(Error::<T>::Overflow)?)
        };
        T::OnReceived::on_received(operator, Some(from), to, &[id], &[amount], data)?;

        if let Some(to_balance) = to_balance {
            Self::write_balance(id, from, from_balance);
            Self::write_balance(id, to, to_balance);
        }

        log::debug!(target: LOG_TARGET, "moved {amount} of token {id} from {from:?} to {to:?}");
        Self::deposit_event(Event::Transferred {
            operator: operator.clone(),
            from: from.clone(),
            to: to.clone(),
            id,
            amount,
        });
        Ok(())
    }

    pub(crate) fn do_batch_transfer(
        operator: &T::AccountId,
        from: &T::AccountId,
        to: &T::AccountId,
        ids: &[TokenId],
        amounts: &[Balance],
        data: &[u8],
    ) -> DispatchResult {
        Self::ensure_owner_or_operator(operator, from)?;
        Self::ensure_not_paused()?;
        ensure!(ids.len() == amounts.len(), Error::<T>::LengthMismatch);

        let totals = Self::aggregate(ids, amounts).ok_or(Error::<T>::InsufficientBalance)?;
        let mut staged = Vec::with_capacity(totals.len());
        for (id, amount) in totals {
            let from_balance = Balances::<T>::get(id, from)
                .checked_sub(amount)
                .ok_or(Error::<T>::InsufficientBalance)?;
            if from != to {
                let to_balance =
                    Balances::<T>::get(id, to).checked_add(amount).ok_or(Error::<T>::Overflow)?;
                staged.push((id, from_balance, to_balance));
            }
        }
        T::OnReceived::on_received(operator, Some(from), to, ids, amounts, data)?;

        for (id, from_balance, to_balance) in staged {
            Self::write_balance(id, from, from_balance);
            Self::write_balance(id, to, to_balance);
        }

        log::debug!(
            target: LOG_TARGET,
            "moved batch of {} entries from {from:?} to {to:?}",
            ids.len()
        );
        Self::deposit_event(Event::TransferredBatch {
            operator: operator.clone(),
            from: from.clone(),
            to: to.clone(),
            ids: ids.to_vec(),
            amounts: amounts.to_vec(),
        });
        Ok(())
    }

    pub(crate) fn do_set_approval_for_all(
        owner: &T::AccountId,
        operator: &T::AccountId,
        approved: bool,
    ) -> DispatchResult {
        ensure!(owner != operator, Error::<T>::InvalidOperator);
        if approved {
            OperatorApprovals::<T>::insert(owner, operator, true);
        } else {
            OperatorApprovals::<T>::remove(owner, operator);
        }
        Self::deposit_event(Event::ApprovalForAll {
            owner: owner.clone(),
            operator: operator.clone(),
            approved,
        });
        Ok(())
    }

    pub(crate) fn ensure_owner_or_operator(
        operator: &T::AccountId,
        owner: &T::AccountId,
    ) -> DispatchResult {
        ensure!(
            operator == owner || Self::is_approved_for_all(owner, operator),
            Error::<T>::AccessDenied
        );
        Ok(())
    }

    /// Supply of `id` after adding `amount`, if it stays within the cap.
    fn raised_supply(id: TokenId, amount: Balance) -> Result<Balance, DispatchError> {
        TotalSupply::<T>::get(id)
            .checked_add(amount)
            .filter(|supply| *supply <= T::MaxSupply::get())
            .ok_or_else(|| Error::<T>::MaxSupplyExceeded.into())
    }

    /// Sums amounts per token id. `None` if a sum overflows.
    fn aggregate(ids: &[TokenId], amounts: &[Balance]) -> Option<BTreeMap<TokenId, Balance>> {
        let mut totals = BTreeMap::new();
        for (id, amount) in ids.iter().zip(amounts) {
            let total: &mut Balance = totals.entry(*id).or_insert(0);
            *total = total.checked_add(*amount)?;
        }
        Some(totals)
    }

    fn write_balance(id: TokenId, who: &T::AccountId, balance: Balance) {
        if balance == 0 {
            Balances::<T>::remove(id, who);
        } else {
            Balances::<T>::insert(id, who, balance);
        }
    }

    fn write_supply(id: TokenId, supply: Balance) {
        if supply == 0 {
            TotalSupply::<T>::remove(id);
        } else {
            TotalSupply::<T>::insert(id, supply);
        }
    }

    /// Every token's supply equals the sum of its balances and stays within
    /// the cap. Zero entries are never stored.
    #[cfg(any(feature = "try-runtime", test))]
    pub fn do_try_state() -> Result<(), DispatchError> {
        let mut sums: BTreeMap<TokenId, Balance> = BTreeMap::new();
        for (id, _, balance) in Balances::<T>::iter() {
            ensure!(balance > 0, DispatchError::Other("zero balance stored"));
            let sum = sums.entry(id).or_insert(0);
            *sum = sum.checked_add(balance).ok_or(DispatchError::Other("balance sum overflow"))?;
        }

        let supplies: BTreeMap<TokenId, Balance> = TotalSupply::<T>::iter().collect();
        ensure!(
            supplies.values().all(|supply| *supply > 0 && *supply <= T::MaxSupply::get()),
            DispatchError::Other("total supply out of bounds")
        );
        ensure!(sums == supplies, DispatchError::Other("total supply differs from balances"));
        Ok(())
    }
}
