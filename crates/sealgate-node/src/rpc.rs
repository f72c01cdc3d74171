//! JSON-RPC server exposing the miner facade.
//!
//! Uses jsonrpsee 0.24 to serve the `eth_getWork`, `eth_submitWork`,
//! `eth_submitHashrate`, and `eth_hashrate` methods external miners expect.

use std::net::SocketAddr;

use jsonrpsee::core::async_trait;
use jsonrpsee::proc_macros::rpc;
use jsonrpsee::server::{Server, ServerHandle};
use jsonrpsee::types::ErrorObjectOwned;
use jsonrpsee::types::error::INVALID_PARAMS_CODE;
use tracing::debug;

use sealgate_core::error::NodeError;
use sealgate_core::hexutil;
use sealgate_core::types::{BlockNonce, Hash256, WorkPackage};

use crate::api::SealerApi;

/// Generic server-side failure code used for facade errors.
pub const SERVER_ERROR_CODE: i32 = -32000;

/// Create a JSON-RPC error.
fn rpc_error(code: i32, msg: &str) -> ErrorObjectOwned {
    ErrorObjectOwned::owned(code, msg.to_string(), None::<()>)
}

fn invalid_param(name: &str, err: impl std::fmt::Display) -> ErrorObjectOwned {
    rpc_error(INVALID_PARAMS_CODE, &format!("invalid {name}: {err}"))
}

/// Parse a `0x`-prefixed 32-byte hash parameter.
pub fn parse_hash(name: &str, text: &str) -> Result<Hash256, ErrorObjectOwned> {
    text.parse().map_err(|e| invalid_param(name, e))
}

/// Parse a `0x`-prefixed 8-byte nonce parameter.
pub fn parse_nonce(text: &str) -> Result<BlockNonce, ErrorObjectOwned> {
    text.parse().map_err(|e| invalid_param("nonce", e))
}

/// Parse a hex quantity parameter.
pub fn parse_quantity(name: &str, text: &str) -> Result<u64, ErrorObjectOwned> {
    hexutil::decode_quantity(text).map_err(|e| invalid_param(name, e))
}

/// The external-miner JSON-RPC interface.
#[rpc(server, namespace = "eth")]
pub trait MinerRpc {
    /// Returns the current work package (11 strings).
    #[method(name = "getWork")]
    async fn get_work(&self) -> Result<WorkPackage, ErrorObjectOwned>;

    /// Submits a proof-of-work solution; returns whether it was accepted.
    #[method(name = "submitWork")]
    async fn submit_work(
        &self,
        nonce: String,
        hash: String,
        digest: String,
        extra_nonce: Option<String>,
    ) -> Result<bool, ErrorObjectOwned>;

    /// Reports a miner's hash rate under a unique 32-byte id.
    #[method(name = "submitHashrate")]
    async fn submit_hashrate(&self, rate: String, id: String) -> Result<bool, ErrorObjectOwned>;

    /// Returns the aggregate hash rate of all remote miners.
    #[method(name = "hashrate")]
    async fn hashrate(&self) -> Result<u64, ErrorObjectOwned>;
}

/// Implementation of the miner JSON-RPC server.
pub struct RpcServerImpl {
    api: SealerApi,
}

impl RpcServerImpl {
    /// Create a new RPC server implementation wrapping the given facade.
    pub fn new(api: SealerApi) -> Self {
        Self { api }
    }
}

#[async_trait]
impl MinerRpcServer for RpcServerImpl {
    async fn get_work(&self) -> Result<WorkPackage, ErrorObjectOwned> {
        self.api
            .get_work()
            .await
            .map_err(|e| rpc_error(SERVER_ERROR_CODE, &e.to_string()))
    }

    async fn submit_work(
        &self,
        nonce: String,
        hash: String,
        digest: String,
        extra_nonce: Option<String>,
    ) -> Result<bool, ErrorObjectOwned> {
        let nonce = parse_nonce(&nonce)?;
        let hash = parse_hash("hash", &hash)?;
        let digest = parse_hash("digest", &digest)?;
        let accepted = self
            .api
            .submit_work(nonce, hash, digest, extra_nonce.as_deref())
            .await;
        debug!(%hash, accepted, "eth_submitWork");
        Ok(accepted)
    }

    async fn submit_hashrate(&self, rate: String, id: String) -> Result<bool, ErrorObjectOwned> {
        let rate = parse_quantity("rate", &rate)?;
        let id = parse_hash("id", &id)?;
        Ok(self.api.submit_hashrate(rate, id).await)
    }

    async fn hashrate(&self) -> Result<u64, ErrorObjectOwned> {
        Ok(self.api.get_hashrate())
    }
}

/// Start the JSON-RPC server on the given address.
///
/// Returns the bound address (useful with port 0) and a [`ServerHandle`]
/// that can be used to stop the server.
pub async fn start_rpc_server(
    addr: &str,
    api: SealerApi,
) -> Result<(SocketAddr, ServerHandle), NodeError> {
    let server = Server::builder()
        .build(addr)
        .await
        .map_err(|e| NodeError::Rpc(format!("bind {addr}: {e}")))?;
    let local_addr = server
        .local_addr()
        .map_err(|e| NodeError::Rpc(format!("local address: {e}")))?;

    let rpc_impl = RpcServerImpl::new(api);
    let handle = server.start(rpc_impl.into_rpc());

    Ok((local_addr, handle))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_hash_valid() {
        let text = format!("0x{}", "aa".repeat(32));
        assert_eq!(parse_hash("hash", &text).unwrap(), Hash256([0xAA; 32]));
    }

    #[test]
    fn parse_hash_wrong_length() {
        let err = parse_hash("hash", "0xabcdef").unwrap_err();
        assert_eq!(err.code(), INVALID_PARAMS_CODE);
        assert!(err.message().contains("invalid hash"));
    }

    #[test]
    fn parse_hash_requires_prefix() {
        let err = parse_hash("digest", &"aa".repeat(32)).unwrap_err();
        assert!(err.message().contains("invalid digest"));
    }

    #[test]
    fn parse_nonce_valid() {
        assert_eq!(parse_nonce("0x00000000000000ff").unwrap().as_u64(), 255);
    }

    #[test]
    fn parse_nonce_invalid_hex() {
        let err = parse_nonce("0xzz000000000000ff").unwrap_err();
        assert!(err.message().contains("invalid nonce"));
    }

    #[test]
    fn parse_quantity_rejects_leading_zero() {
        assert_eq!(parse_quantity("rate", "0x1f4").unwrap(), 500);
        let err = parse_quantity("rate", "0x01").unwrap_err();
        assert_eq!(err.code(), INVALID_PARAMS_CODE);
    }

    #[test]
    fn rpc_error_carries_message() {
        let err = rpc_error(SERVER_ERROR_CODE, "sealer stopped");
        assert_eq!(err.code(), SERVER_ERROR_CODE);
        assert_eq!(err.message(), "sealer stopped");
    }
}
