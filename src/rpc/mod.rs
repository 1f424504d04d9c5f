mod rpc;

pub use rpc::{
    error_chain, parse_signer, ChainClient, RateLimitConfig, ReceiptInfo, ReceiptLog, RpcClient,
    RpcClientConfig, RpcError,
};
