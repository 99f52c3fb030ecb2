//! Capabilities introduced by later logic versions: pausing (V2) and per-token
//! URIs (V3). Each call checks the bound logic before anything else.

use frame_support::{dispatch::DispatchResult, ensure};
use sp_std::prelude::*;

use crate::{
    Capability, Config, Error, Event, Pallet, Paused, Role, TokenId, TokenUris, Uri, UriOf,
    LOG_TARGET,
};

impl<T: Config> Pallet<T> {
    pub fn is_paused() -> bool {
        Paused::<T>::get()
    }

    /// `Paused` defaults to false, so this never trips before V2 is bound.
    pub(crate) fn ensure_not_paused() -> DispatchResult {
        ensure!(!Paused::<T>::get(), Error::<T>::LedgerPaused);
        Ok(())
    }

    pub(crate) fn do_pause(who: &T::AccountId) -> DispatchResult {
        Self::ensure_capability(Capability::Pause)?;
        Self::ensure_role(Role::Admin, who)?;
        ensure!(!Paused::<T>::get(), Error::<T>::LedgerPaused);

        Paused::<T>::put(true);

        log::info!(target: LOG_TARGET, "Ledger paused by {who:?}");
        Self::deposit_event(Event::Paused { account: who.clone() });
        Ok(())
    }

    pub(crate) fn do_unpause(who: &T::AccountId) -> DispatchResult {
        Self::ensure_capability(Capability::Pause)?;
        Self::ensure_role(Role::Admin, who)?;
        ensure!(Paused::<T>::get(), Error::<T>::NotPaused);

        Paused::<T>::kill();

        log::info!(target: LOG_TARGET, "Ledger unpaused by {who:?}");
        Self::deposit_event(Event::Unpaused { account: who.clone() });
        Ok(())
    }

    /// Metadata URI for `id`: the per-token override when the bound logic
    /// supports one and it is set, the base URI otherwise.
    pub fn uri(id: TokenId) -> Vec<u8> {
        if Self::active_logic().supports(Capability::TokenUri) {
            if let Some(uri) = TokenUris::<T>::get(id) {
                return uri.into_inner();
            }
        }
        Uri::<T>::get().into_inner()
    }

    pub(crate) fn do_set_token_uri(
        who: &T::AccountId,
        id: TokenId,
        uri: UriOf<T>,
    ) -> DispatchResult {
        Self::ensure_capability(Capability::TokenUri)?;
        Self::ensure_role(Role::Admin, who)?;

        if uri.is_empty() {
            TokenUris::<T>::remove(id);
        } else {
            TokenUris::<T>::insert(id, &uri);
        }

        Self::deposit_event(Event::TokenUriSet { id, uri });
        Ok(())
    }
}
