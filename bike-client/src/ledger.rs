use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::error::Result;
use crate::rpc::{decode, CallOptions, ContractRpc};
use crate::utils::U128;
use crate::AccountId;

/// Deposit that registers an account with the ft contract, in yoctoNEAR.
pub const STORAGE_DEPOSIT: u128 = 1_250_000_000_000_000_000_000;

/// Attached to transfers and unregistration, required by the ft contract.
pub const ONE_YOCTO: u128 = 1;

/// Gas attached to ft change calls.
pub const FT_CALL_GAS: u64 = 300_000_000_000_000;

/// Storage record of a registered account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageBalance {
    pub total: U128,
    pub available: U128,
}

/// Proxy to the ft contract.
pub struct TokenLedger<'a, R> {
    rpc: &'a R,
    contract_id: &'a AccountId,
}

impl<'a, R: ContractRpc> TokenLedger<'a, R> {
    pub fn new(rpc: &'a R, contract_id: &'a AccountId) -> Self {
        Self { rpc, contract_id }
    }

    pub fn contract_id(&self) -> &AccountId {
        self.contract_id
    }

    /// Unregistered accounts report 0 as well, use `storage_balance_of` to tell them apart.
    pub async fn balance_of(&self, account_id: &AccountId) -> Result<u128> {
        let method = "ft_balance_of";
        let value = self
            .rpc
            .view(self.contract_id, method, json!({ "account_id": account_id }))
            .await?;
        decode::<U128>(method, value).map(u128::from)
    }

    /// `None` means the account is not registered.
    pub async fn storage_balance_of(&self, account_id: &AccountId) -> Result<Option<StorageBalance>> {
        let method = "storage_balance_of";
        let value = self
            .rpc
            .view(self.contract_id, method, json!({ "account_id": account_id }))
            .await?;
        decode(method, value)
    }

    pub async fn is_registered(&self, account_id: &AccountId) -> Result<bool> {
        let balance = self.storage_balance_of(account_id).await?;
        log::debug!("storage balance of {}: {:?}", account_id, balance);
        Ok(balance.is_some())
    }

    /// Registers the signer. Fails if the signer is already registered.
    pub async fn storage_deposit(&self) -> Result<()> {
        self.rpc
            .call(
                self.contract_id,
                "storage_deposit",
                json!({}),
                CallOptions {
                    gas: FT_CALL_GAS,
                    deposit: STORAGE_DEPOSIT,
                },
            )
            .await?;
        Ok(())
    }

    /// Unregisters the signer with `force`, so any remaining balance is burned.
    pub async fn storage_unregister(&self) -> Result<bool> {
        let method = "storage_unregister";
        let value = self
            .rpc
            .call(
                self.contract_id,
                method,
                json!({ "force": true }),
                CallOptions {
                    gas: FT_CALL_GAS,
                    deposit: ONE_YOCTO,
                },
            )
            .await?;
        match value {
            Some(value) => decode(method, value),
            None => Ok(false),
        }
    }

    pub async fn transfer(&self, receiver_id: &AccountId, amount: u128) -> Result<()> {
        self.rpc
            .call(
                self.contract_id,
                "ft_transfer",
                json!({ "receiver_id": receiver_id, "amount": U128(amount) }),
                CallOptions {
                    gas: FT_CALL_GAS,
                    deposit: ONE_YOCTO,
                },
            )
            .await?;
        Ok(())
    }

    /// Transfers `amount` to `receiver_id` and has the receiver act on `msg`.
    ///
    /// Resolves when the token contract is done, which says nothing about whether the receiver
    /// kept the tokens; the receiver's own state has to be read back.
    pub async fn transfer_call(&self, receiver_id: &AccountId, amount: u128, msg: &str) -> Result<()> {
        self.rpc
            .call(
                self.contract_id,
                "ft_transfer_call",
                json!({ "receiver_id": receiver_id, "amount": U128(amount), "msg": msg }),
                CallOptions {
                    gas: FT_CALL_GAS,
                    deposit: ONE_YOCTO,
                },
            )
            .await?;
        Ok(())
    }
}
