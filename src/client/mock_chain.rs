//! Scripted JSON-RPC answers for `Provider::mocked()`.

use ethers::abi::{self, Token};
use ethers::providers::MockProvider;
use ethers::types::{
    Block, Bytes, FeeHistory, Log, Transaction, TransactionReceipt, H256, U256, U64,
};
use serde_json::{json, Value};

/// Queues `responses` so they are answered in the order given.
pub fn script(mock: &MockProvider, responses: Vec<Value>) {
    // the mock pops from the back
    for response in responses.into_iter().rev() {
        mock.push::<Value, _>(response).unwrap();
    }
}

/// `eth_call` result of a view returning one `uint256`.
pub fn uint(n: U256) -> Value {
    json!(Bytes::from(abi::encode(&[Token::Uint(n)])))
}

/// Answers for one successful send: pending nonce, EIP-1559 fee
/// estimation, broadcast, then the mined transaction and its receipt.
pub fn mined(tx_hash: H256, logs: Vec<Log>) -> Vec<Value> {
    let gwei = U256::exp10(9);
    vec![
        json!(U256::zero()),
        json!(Block::<H256> {
            base_fee_per_gas: Some(gwei),
            ..Default::default()
        }),
        json!(FeeHistory {
            base_fee_per_gas: vec![gwei],
            gas_used_ratio: vec![0.5],
            oldest_block: U256::zero(),
            reward: vec![vec![gwei]],
        }),
        json!(tx_hash),
        json!(Transaction {
            hash: tx_hash,
            block_number: Some(U64::from(1)),
            ..Default::default()
        }),
        json!(TransactionReceipt {
            transaction_hash: tx_hash,
            block_number: Some(U64::from(1)),
            status: Some(U64::from(1)),
            logs,
            ..Default::default()
        }),
    ]
}
