use alloy::rpc::types::Log;
use alloy::sol;
use alloy::sol_types::SolEvent;
use alloy_primitives::{Address, B256, U256};

sol! {
    event Transfer(address indexed from, address indexed to, uint256 indexed tokenId);
}

/// A decoded `Transfer` out of the zero address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MintLog {
    pub token_id: U256,
    pub minter: Address,
    pub transaction_hash: Option<B256>,
    pub block_number: Option<u64>,
}

pub fn decode_transfer_event(log: &Log) -> anyhow::Result<Transfer> {
    let log_data = log.data();
    let decoded = Transfer::decode_raw_log(log.topics(), &log_data.data)?;
    Ok(decoded)
}

/// Returns `None` for transfers whose sender is not the zero address.
pub fn decode_mint(log: &Log) -> anyhow::Result<Option<MintLog>> {
    let event = decode_transfer_event(log)?;
    if event.from != Address::ZERO {
        return Ok(None);
    }

    Ok(Some(MintLog {
        token_id: event.tokenId,
        minter: event.to,
        transaction_hash: log.transaction_hash,
        block_number: log.block_number,
    }))
}
