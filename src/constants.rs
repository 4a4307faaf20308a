//!

/// Default JSON-RPC endpoint for a local dev node (Hardhat and Anvil default).
pub const DEFAULT_RPC_URL: &'static str = "http://127.0.0.1:8545";
/// Chain identifier used by Hardhat and Anvil dev networks.
pub const DEFAULT_LOCAL_CHAIN_ID: u64 = 31337;
/// Private key of the first pre-funded account of the default dev mnemonic.
pub const DEFAULT_DEV_PRIVATE_KEY: &'static str =
    "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";
/// Simulated seconds in one hour, used for time advancement.
pub const SECONDS_PER_HOUR: u64 = 3600;
/// Default Hardhat artifacts directory, relative to the project root.
pub const DEFAULT_ARTIFACTS_DIR: &'static str = "artifacts";
/// Artifact name of the upgrade proxy contract deployed in front of
/// upgradeable implementations.
pub const PROXY_CONTRACT_NAME: &'static str = "ERC1967Proxy";
/// Name of the initializer function called through the proxy constructor.
pub const INITIALIZER_NAME: &'static str = "initialize";
