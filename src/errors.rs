//! Error types for the dev node test harness.

#[derive(thiserror::Error, Debug)]
pub enum DevNodeError {
    #[error("failed to instantiate RPC client: {0}")]
    FailedToCreateRpcClient(String),
    #[error("rpc request failed: {0}")]
    RpcRequest(String),
    #[error("node returned no latest block")]
    NoLatestBlock,
    #[error("invalid private key: {0}")]
    InvalidPrivateKey(String),
    #[error("contract call failed: {0}")]
    ContractCall(String),
    #[error("failed to format value: {0}")]
    FormatValue(String),
    #[error("artifact not found for contract: {0}")]
    ArtifactNotFound(String),
    #[error("failed to read artifact: {0}")]
    ArtifactRead(String),
    #[error("failed to parse artifact: {0}")]
    ArtifactParse(String),
    #[error("no address provided for linked library: {0}")]
    MissingLibrary(String),
    #[error("invalid contract bytecode: {0}")]
    InvalidBytecode(String),
    #[error("failed to encode initializer call: {0}")]
    InitializerEncode(String),
    #[error("implementation links external libraries, use deploy_contract_upgradeable_with_lib: {0}")]
    ExternalLibraryLinking(String),
    #[error("contract deployment failed: {0}")]
    DeploymentFailed(String),
}
