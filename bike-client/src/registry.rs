use serde_json::json;

use crate::error::Result;
use crate::rpc::{decode, CallOptions, ContractRpc};
use crate::utils::U128;
use crate::AccountId;

/// Gas attached to registry change calls. Returning an inspected bike schedules the reward
/// transfer and its callback, which is paid out of this.
pub const REGISTRY_CALL_GAS: u64 = 300_000_000_000_000;

/// Proxy to the bike registry contract.
pub struct BikeRegistry<'a, R> {
    rpc: &'a R,
    contract_id: &'a AccountId,
}

impl<'a, R: ContractRpc> BikeRegistry<'a, R> {
    pub fn new(rpc: &'a R, contract_id: &'a AccountId) -> Self {
        Self { rpc, contract_id }
    }

    pub fn contract_id(&self) -> &AccountId {
        self.contract_id
    }

    async fn view_index<T: serde::de::DeserializeOwned>(&self, method: &str, index: u64) -> Result<T> {
        let value = self
            .rpc
            .view(self.contract_id, method, json!({ "index": index }))
            .await?;
        decode(method, value)
    }

    async fn call_index(&self, method: &str, index: u64) -> Result<()> {
        self.rpc
            .call(
                self.contract_id,
                method,
                json!({ "index": index }),
                CallOptions {
                    gas: REGISTRY_CALL_GAS,
                    deposit: 0,
                },
            )
            .await?;
        Ok(())
    }

    pub async fn num_of_bikes(&self) -> Result<u64> {
        let method = "num_of_bikes";
        let value = self.rpc.view(self.contract_id, method, json!({})).await?;
        decode(method, value)
    }

    pub async fn amount_to_use_bike(&self) -> Result<u128> {
        let method = "amount_to_use_bike";
        let value = self.rpc.view(self.contract_id, method, json!({})).await?;
        decode::<U128>(method, value).map(u128::from)
    }

    pub async fn is_available(&self, index: u64) -> Result<bool> {
        self.view_index("is_available", index).await
    }

    pub async fn who_is_using(&self, index: u64) -> Result<Option<AccountId>> {
        self.view_index("who_is_using", index).await
    }

    pub async fn who_is_inspecting(&self, index: u64) -> Result<Option<AccountId>> {
        self.view_index("who_is_inspecting", index).await
    }

    pub async fn inspect_bike(&self, index: u64) -> Result<()> {
        self.call_index("inspect_bike", index).await
    }

    /// Resolves after the inspection reward, if any, was paid.
    pub async fn return_bike(&self, index: u64) -> Result<()> {
        self.call_index("return_bike", index).await
    }
}
