//! Testing utilities for Ethereum smart contract development against a
//! local dev node (Hardhat or Anvil): advancing simulated chain time and
//! blocks, impersonating accounts, formatting token amounts, and deploying
//! contracts plainly or behind an ERC1967 upgrade proxy.

// TODO: Support the Foundry `out/` artifact layout (abi + bytecode.object) in ArtifactStore.

pub mod artifact;
pub mod assertions;
pub mod constants;
pub mod deploy;
pub mod eoa;
pub mod errors;
pub mod node;
pub mod types;
pub mod utils;

pub use crate::artifact::{ArtifactStore, ContractArtifact};
pub use crate::deploy::{
    deploy_contract, deploy_contract_upgradeable, deploy_contract_upgradeable_with_lib,
    ContractDeployment, ContractDeploymentWithLib,
};
pub use crate::eoa::TestEOA;
pub use crate::errors::DevNodeError;
pub use crate::node::DevNode;
pub use crate::utils::{format_balance, format_units_trimmed, format_value};
