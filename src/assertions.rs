//!

use ethers::contract::Contract;
use ethers::providers::Middleware;
use ethers::types::{Address, U256};

use crate::node::DevNode;

/// Assert that an address has non-empty deployed code.
pub async fn assert_has_code(node: &DevNode, address: Address) {
    let code = node.provider().get_code(address, None).await.unwrap();
    assert!(!code.is_empty(), "no code deployed at {:?}", address);
}

/// Assert an account's ERC20 token balance.
pub async fn assert_token_balance<M: Middleware>(
    token: &Contract<M>,
    account: Address,
    expected: U256,
) {
    let balance: U256 = token
        .method::<_, U256>("balanceOf", account)
        .unwrap()
        .call()
        .await
        .unwrap();
    assert_eq!(balance, expected);
}

/// Assert the current chain head block number.
pub async fn assert_block_number(node: &DevNode, expected: u64) {
    let block_num = node.current_block_number().await.unwrap();
    assert_eq!(block_num, expected);
}
