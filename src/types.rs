//!

use std::collections::HashMap;

use ethers::contract::Contract;
use ethers::middleware::SignerMiddleware;
use ethers::providers::{Http, Provider};
use ethers::signers::LocalWallet;
use ethers::types::Address;

/// RPC client with signer middleware, bound to a local dev node.
pub type EthRpcClient = SignerMiddleware<Provider<Http>, LocalWallet>;

/// Handle to a deployed contract, bound to a signing RPC client.
pub type DeployedContract = Contract<EthRpcClient>;

/// Deployed addresses for external libraries, keyed by library name or by
/// fully qualified `source:Name`.
pub type Libraries = HashMap<String, Address>;
