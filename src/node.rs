//!

use std::sync::Arc;

use ethers::middleware::SignerMiddleware;
use ethers::providers::{Http, Middleware, Provider};
use ethers::types::{Address, Block, BlockNumber, H256};
use tracing::debug;

use crate::constants;
use crate::eoa::TestEOA;
use crate::errors::DevNodeError;
use crate::types::EthRpcClient;

/// Handle to a local Ethereum development node (Hardhat or Anvil).
///
/// All operations are single-shot JSON-RPC requests; failures from the node
/// or the client library propagate unmodified as [`DevNodeError`].
pub struct DevNode {
    /// JSON-RPC provider for the node
    provider: Provider<Http>,
    /// Endpoint the provider is connected to
    rpc_url: String,
}

impl DevNode {
    /// Connect to a dev node at the given JSON-RPC endpoint.
    pub fn connect(rpc_url: &str) -> Result<Self, DevNodeError> {
        let provider = Provider::<Http>::try_from(rpc_url)
            .map_err(|e| DevNodeError::FailedToCreateRpcClient(e.to_string()))?;
        Ok(Self {
            provider,
            rpc_url: rpc_url.to_string(),
        })
    }

    /// Connect to a dev node on the default local endpoint.
    pub fn localhost() -> Result<Self, DevNodeError> {
        Self::connect(constants::DEFAULT_RPC_URL)
    }

    /// JSON-RPC provider for the node.
    pub fn provider(&self) -> &Provider<Http> {
        &self.provider
    }

    /// Endpoint URL the node handle is connected to.
    pub fn rpc_url(&self) -> &str {
        &self.rpc_url
    }

    /// Query chain network ID from the node.
    pub async fn chain_id(&self) -> Result<u64, DevNodeError> {
        let chain_id = self
            .provider
            .get_chainid()
            .await
            .map_err(|e| DevNodeError::RpcRequest(e.to_string()))?;
        Ok(chain_id.as_u64())
    }

    /// Timestamp of the current chain head.
    pub async fn current_timestamp(&self) -> Result<u64, DevNodeError> {
        let latest = self.latest_block().await?;
        Ok(latest.timestamp.as_u64())
    }

    /// Block number of the current chain head.
    pub async fn current_block_number(&self) -> Result<u64, DevNodeError> {
        let block_num = self
            .provider
            .get_block_number()
            .await
            .map_err(|e| DevNodeError::RpcRequest(e.to_string()))?;
        Ok(block_num.as_u64())
    }

    /// Advance simulated chain time by mining one block timestamped
    /// `round(hours * 3600)` seconds after the current head.
    ///
    /// Fractional hours are allowed and rounded to the nearest second.
    pub async fn advance_hours(&self, hours: f64) -> Result<(), DevNodeError> {
        let offset = (hours * constants::SECONDS_PER_HOUR as f64).round() as u64;
        let target = self.current_timestamp().await? + offset;
        debug!(target, "mining block with future timestamp");
        let _: serde_json::Value = self
            .provider
            .request("evm_mine", [target])
            .await
            .map_err(|e| DevNodeError::RpcRequest(e.to_string()))?;
        Ok(())
    }

    /// Advance the chain by mining `num_blocks` empty blocks.
    ///
    /// Mining requests are issued sequentially, each awaited before the
    /// next, so blocks land in order.
    pub async fn advance_blocks(&self, num_blocks: u64) -> Result<(), DevNodeError> {
        for _ in 0..num_blocks {
            let _: serde_json::Value = self
                .provider
                .request("evm_mine", ())
                .await
                .map_err(|e| DevNodeError::RpcRequest(e.to_string()))?;
        }
        Ok(())
    }

    /// Enable impersonation for the given addresses, allowing transactions
    /// to be signed as them without their private keys.
    ///
    /// Dev-node-only feature (`hardhat_impersonateAccount`, also accepted
    /// by Anvil). Addresses are forwarded one request at a time.
    pub async fn impersonate(&self, addresses: &[Address]) -> Result<(), DevNodeError> {
        for address in addresses {
            debug!(?address, "impersonating account");
            let _: serde_json::Value = self
                .provider
                .request("hardhat_impersonateAccount", [address])
                .await
                .map_err(|e| DevNodeError::RpcRequest(e.to_string()))?;
        }
        Ok(())
    }

    /// Disable impersonation for an address previously passed to
    /// [`impersonate`](Self::impersonate).
    pub async fn stop_impersonating(&self, address: Address) -> Result<(), DevNodeError> {
        let _: serde_json::Value = self
            .provider
            .request("hardhat_stopImpersonatingAccount", [address])
            .await
            .map_err(|e| DevNodeError::RpcRequest(e.to_string()))?;
        Ok(())
    }

    /// Instantiate RPC client with signer middleware for the given EOA.
    pub async fn client_for(&self, signer: &TestEOA) -> Result<Arc<EthRpcClient>, DevNodeError> {
        let client = SignerMiddleware::new_with_provider_chain(self.provider.clone(), signer.wallet())
            .await
            .map_err(|e| DevNodeError::FailedToCreateRpcClient(e.to_string()))?;
        Ok(Arc::new(client))
    }

    async fn latest_block(&self) -> Result<Block<H256>, DevNodeError> {
        self.provider
            .get_block(BlockNumber::Latest)
            .await
            .map_err(|e| DevNodeError::RpcRequest(e.to_string()))?
            .ok_or(DevNodeError::NoLatestBlock)
    }
}
