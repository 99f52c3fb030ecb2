use crate as pallet_multi_token;
use crate::{Balance, OnTokensReceived, TokenId};
use frame_support::{
    derive_impl,
    traits::{ConstU128, ConstU32},
    BoundedVec,
};
use sp_core::H256;
use sp_runtime::{
    traits::{BlakeTwo256, IdentityLookup},
    BuildStorage, DispatchError, DispatchResult,
};

type Block = frame_system::mocking::MockBlock<Test>;

// Configure a mock runtime to test the pallet.
frame_support::construct_runtime!(
    pub enum Test {
        System: frame_system,
        MultiToken: pallet_multi_token,
    }
);

#[derive_impl(frame_system::config_preludes::TestDefaultConfig)]
impl frame_system::Config for Test {
    type DbWeight = ();
    type Hash = H256;
    type Hashing = BlakeTwo256;
    type AccountId = u64;
    type Lookup = IdentityLookup<Self::AccountId>;
    type Block = Block;
}

/// Deployer: holds `Admin` and `Minter` after genesis.
pub const OWNER: u64 = 1;
pub const OTHER: u64 = 2;
pub const THIRD: u64 = 3;
/// Receiver hook refuses every credit to this account.
pub const REJECTING: u64 = 99;

pub const MAX_SUPPLY: Balance = 10_001;
pub const METADATA_URI: &[u8] = b"https://my-metadata-uri.com/{id}.json";

pub type MaxUriLength = ConstU32<128>;
pub type MaxBatchSize = ConstU32<16>;
pub type MaxDataLength = ConstU32<64>;

pub struct RejectingReceiver;

impl OnTokensReceived<u64> for RejectingReceiver {
    fn on_received(
        _operator: &u64,
        _from: Option<&u64>,
        to: &u64,
        _ids: &[TokenId],
        _amounts: &[Balance],
        _data: &[u8],
    ) -> DispatchResult {
        if *to == REJECTING {
            return Err(DispatchError::Other("ReceiverRejected"));
        }
        Ok(())
    }
}

impl pallet_multi_token::Config for Test {
    type RuntimeEvent = RuntimeEvent;
    type MaxSupply = ConstU128<MAX_SUPPLY>;
    type MaxUriLength = MaxUriLength;
    type MaxBatchSize = MaxBatchSize;
    type MaxDataLength = MaxDataLength;
    type OnReceived = RejectingReceiver;
    type WeightInfo = ();
}

pub struct ExtBuilder {
    deployer: Option<u64>,
}

impl Default for ExtBuilder {
    fn default() -> Self {
        Self { deployer: Some(OWNER) }
    }
}

impl ExtBuilder {
    /// Skip genesis initialization; the ledger starts `Uninitialized`.
    pub fn uninitialized(mut self) -> Self {
        self.deployer = None;
        self
    }

    // Build genesis storage according to the mock runtime.
    pub fn build(self) -> sp_io::TestExternalities {
        let mut t = frame_system::GenesisConfig::<Test>::default().build_storage().unwrap();

        pallet_multi_token::GenesisConfig::<Test> {
            deployer: self.deployer,
            uri: METADATA_URI.to_vec(),
        }
        .assimilate_storage(&mut t)
        .unwrap();

        let mut ext = sp_io::TestExternalities::new(t);
        ext.execute_with(|| System::set_block_number(1));
        ext
    }

    /// Run `test`, then check the ledger invariants on whatever it left behind.
    pub fn build_and_execute(self, test: impl FnOnce()) {
        self.build().execute_with(|| {
            test();
            MultiToken::do_try_state().expect("ledger invariants hold");
        });
    }
}

pub fn new_test_ext() -> sp_io::TestExternalities {
    ExtBuilder::default().build()
}

pub fn batch<V>(items: &[V]) -> BoundedVec<V, MaxBatchSize>
where
    V: Clone + core::fmt::Debug,
{
    items.to_vec().try_into().expect("batch fits MaxBatchSize")
}

pub fn no_data() -> BoundedVec<u8, MaxDataLength> {
    BoundedVec::default()
}

pub fn uri(value: &[u8]) -> BoundedVec<u8, MaxUriLength> {
    value.to_vec().try_into().expect("uri fits MaxUriLength")
}
