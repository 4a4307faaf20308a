//!

use ethers::core::rand;
use ethers::signers::{LocalWallet, Signer};
use ethers::types::Address;

use crate::constants;
use crate::errors::DevNodeError;

/// Test externally owned account (EOA) used to sign deployments and
/// transactions against a local dev node.
pub struct TestEOA {
    /// Account address (derived from the key)
    address: Address,
    /// Signing key
    wallet: LocalWallet,
}

impl TestEOA {
    /// Create new test EOA with randomly generated private key.
    ///
    /// The account holds no funds; on Hardhat/Anvil either fund it from a
    /// dev account or use it together with [`DevNode::impersonate`].
    ///
    /// [`DevNode::impersonate`]: crate::DevNode::impersonate
    pub fn new() -> TestEOA {
        let wallet = LocalWallet::new(&mut rand::thread_rng());
        TestEOA {
            address: wallet.address(),
            wallet,
        }
    }

    /// Create test EOA from a hex-encoded private key.
    pub fn from_private_key(private_key: &str) -> Result<TestEOA, DevNodeError> {
        let wallet = private_key
            .parse::<LocalWallet>()
            .map_err(|e| DevNodeError::InvalidPrivateKey(e.to_string()))?;
        Ok(TestEOA {
            address: wallet.address(),
            wallet,
        })
    }

    /// First pre-funded account of the default Hardhat/Anvil dev mnemonic.
    pub fn dev_account() -> TestEOA {
        // constant key, parse cannot fail
        Self::from_private_key(constants::DEFAULT_DEV_PRIVATE_KEY).unwrap()
    }

    /// Get address of EOA.
    pub fn address(&self) -> Address {
        self.address
    }

    /// Get signing wallet of EOA.
    pub(crate) fn wallet(&self) -> LocalWallet {
        self.wallet.clone()
    }
}

impl Default for TestEOA {
    fn default() -> Self {
        Self::new()
    }
}
