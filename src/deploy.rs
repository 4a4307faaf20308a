//! Contract deployment helpers: plain constructor deployment, and
//! upgradeable deployment behind an ERC1967 proxy with an initializer call.
//!
//! The proxy contract itself is not bundled; Hardhat projects that compile
//! `@openzeppelin/contracts` have an `ERC1967Proxy` artifact in their
//! artifacts tree and the store loads it like any other contract.

use std::collections::HashMap;

use ethers::abi::{Abi, Token};
use ethers::contract::{Contract, ContractFactory};
use ethers::types::Bytes;
use tracing::info;

use crate::artifact::ArtifactStore;
use crate::constants;
use crate::eoa::TestEOA;
use crate::errors::DevNodeError;
use crate::node::DevNode;
use crate::types::{DeployedContract, Libraries};

/// Parameters for a single contract deployment.
///
/// Transient value object, consumed by the deployment call.
pub struct ContractDeployment {
    /// Artifact name of the contract e.g. "Token"
    pub name: String,
    /// EOA signing the deployment transaction
    pub from: TestEOA,
    /// ABI-encoded constructor (or initializer) arguments
    pub args: Vec<Token>,
}

/// Parameters for deploying a contract that links external libraries.
pub struct ContractDeploymentWithLib {
    /// Artifact name of the contract e.g. "Vault"
    pub name: String,
    /// EOA signing the deployment transactions
    pub from: TestEOA,
    /// Deployed library addresses to link into the bytecode
    pub libraries: Libraries,
    /// ABI-encoded initializer arguments
    pub args: Vec<Token>,
}

/// Deploy a contract directly with its constructor arguments and wait for
/// on-chain confirmation.
///
/// Fails with [`DevNodeError::MissingLibrary`] if the artifact's bytecode
/// still references external libraries; use the upgradeable-with-library
/// variant (or pre-link) for those.
pub async fn deploy_contract(
    node: &DevNode,
    artifacts: &ArtifactStore,
    params: ContractDeployment,
) -> Result<DeployedContract, DevNodeError> {
    let artifact = artifacts.load(&params.name)?;
    let bytecode = artifact.linked_bytecode(&HashMap::new())?;
    let client = node.client_for(&params.from).await?;

    let factory = ContractFactory::new(artifact.abi.clone(), bytecode, client);
    let contract = factory
        .deploy_tokens(params.args)
        .map_err(|e| DevNodeError::DeploymentFailed(e.to_string()))?
        .send()
        .await
        .map_err(|e| DevNodeError::DeploymentFailed(e.to_string()))?;

    info!(name = %params.name, address = %contract.address(), "deployed contract");
    Ok(contract)
}

/// Deploy a contract behind an ERC1967 upgrade proxy.
///
/// The implementation is deployed without constructor arguments, then the
/// proxy is deployed pointing at it with `initialize(args)` calldata. The
/// returned handle speaks the implementation ABI at the proxy address.
///
/// Implementations with external library link references are refused;
/// linking requires the explicit opt-in of
/// [`deploy_contract_upgradeable_with_lib`].
pub async fn deploy_contract_upgradeable(
    node: &DevNode,
    artifacts: &ArtifactStore,
    params: ContractDeployment,
) -> Result<DeployedContract, DevNodeError> {
    deploy_proxied(
        node,
        artifacts,
        params.name,
        params.from,
        HashMap::new(),
        params.args,
        false,
    )
    .await
}

/// Deploy a contract behind an ERC1967 upgrade proxy, linking the given
/// external libraries into the implementation bytecode first.
///
/// Passing libraries here is the explicit opt-in to external library
/// linking for an upgradeable contract.
pub async fn deploy_contract_upgradeable_with_lib(
    node: &DevNode,
    artifacts: &ArtifactStore,
    params: ContractDeploymentWithLib,
) -> Result<DeployedContract, DevNodeError> {
    deploy_proxied(
        node,
        artifacts,
        params.name,
        params.from,
        params.libraries,
        params.args,
        true,
    )
    .await
}

async fn deploy_proxied(
    node: &DevNode,
    artifacts: &ArtifactStore,
    name: String,
    from: TestEOA,
    libraries: Libraries,
    args: Vec<Token>,
    allow_external_libraries: bool,
) -> Result<DeployedContract, DevNodeError> {
    let artifact = artifacts.load(&name)?;
    if artifact.has_link_references() && !allow_external_libraries {
        return Err(DevNodeError::ExternalLibraryLinking(name));
    }
    let bytecode = artifact.linked_bytecode(&libraries)?;
    let client = node.client_for(&from).await?;

    // implementation deploys bare; its state lives behind the proxy and is
    // set up through the initializer, not the constructor
    let impl_factory = ContractFactory::new(artifact.abi.clone(), bytecode, client.clone());
    let implementation = impl_factory
        .deploy_tokens(vec![])
        .map_err(|e| DevNodeError::DeploymentFailed(e.to_string()))?
        .send()
        .await
        .map_err(|e| DevNodeError::DeploymentFailed(e.to_string()))?;
    info!(name = %name, address = %implementation.address(), "deployed implementation");

    let init_data = encode_initializer(&artifact.abi, &args)?;

    let proxy_artifact = artifacts.load(constants::PROXY_CONTRACT_NAME)?;
    let proxy_bytecode = proxy_artifact.linked_bytecode(&HashMap::new())?;
    let proxy_factory = ContractFactory::new(proxy_artifact.abi.clone(), proxy_bytecode, client.clone());
    let proxy = proxy_factory
        .deploy_tokens(vec![
            Token::Address(implementation.address()),
            Token::Bytes(init_data.to_vec()),
        ])
        .map_err(|e| DevNodeError::DeploymentFailed(e.to_string()))?
        .send()
        .await
        .map_err(|e| DevNodeError::DeploymentFailed(e.to_string()))?;
    info!(name = %name, address = %proxy.address(), "deployed proxy");

    Ok(Contract::new(proxy.address(), artifact.abi, client))
}

/// ABI-encode the `initialize(args)` call routed through the proxy
/// constructor.
fn encode_initializer(abi: &Abi, args: &[Token]) -> Result<Bytes, DevNodeError> {
    let function = abi
        .function(constants::INITIALIZER_NAME)
        .map_err(|e| DevNodeError::InitializerEncode(e.to_string()))?;
    let data = function
        .encode_input(args)
        .map_err(|e| DevNodeError::InitializerEncode(e.to_string()))?;
    Ok(data.into())
}
