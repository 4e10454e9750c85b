use async_trait::async_trait;
use serde_json::Value;
use workspaces::{Account, Network, Worker};

use crate::error::{ClientError, Result};
use crate::AccountId;

/// Gas and deposit attached to a change call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallOptions {
    pub gas: u64,
    pub deposit: u128,
}

/// Connection to the chain on behalf of one signed in account.
///
/// View calls are read-only. Change calls are signed by `signer_id` and resolve once the
/// transaction outcome is known; a contract panic comes back as `ClientError::Rejected`.
#[async_trait(?Send)]
pub trait ContractRpc {
    fn signer_id(&self) -> &AccountId;

    async fn view(&self, contract_id: &AccountId, method: &str, args: Value) -> Result<Value>;

    /// Returns the JSON value the method returned, `None` when it returned nothing.
    async fn call(
        &self,
        contract_id: &AccountId,
        method: &str,
        args: Value,
        options: CallOptions,
    ) -> Result<Option<Value>>;
}

/// `ContractRpc` over a `workspaces` worker, for the sandbox as well as testnet.
pub struct WorkspacesRpc<T> {
    worker: Worker<T>,
    account: Account,
}

impl<T: Network> WorkspacesRpc<T> {
    pub fn new(worker: Worker<T>, account: Account) -> Self {
        Self { worker, account }
    }

    pub fn worker(&self) -> &Worker<T> {
        &self.worker
    }

    pub fn account(&self) -> &Account {
        &self.account
    }
}

fn rejected(method: &str, err: impl std::fmt::Display) -> ClientError {
    ClientError::Rejected {
        method: method.to_string(),
        reason: err.to_string(),
    }
}

#[async_trait(?Send)]
impl<T: Network> ContractRpc for WorkspacesRpc<T> {
    fn signer_id(&self) -> &AccountId {
        self.account.id()
    }

    async fn view(&self, contract_id: &AccountId, method: &str, args: Value) -> Result<Value> {
        let args = serde_json::to_vec(&args).map_err(|source| ClientError::Decode {
            method: method.to_string(),
            source,
        })?;
        self.worker
            .view(contract_id, method, args)
            .await
            .map_err(|err| rejected(method, err))?
            .json()
            .map_err(|err| rejected(method, err))
    }

    async fn call(
        &self,
        contract_id: &AccountId,
        method: &str,
        args: Value,
        options: CallOptions,
    ) -> Result<Option<Value>> {
        let outcome = self
            .account
            .call(&self.worker, contract_id, method)
            .args_json(args)
            .map_err(|err| rejected(method, err))?
            .gas(options.gas)
            .deposit(options.deposit)
            .transact()
            .await
            .map_err(|err| rejected(method, err))?;
        // Fails unless the transaction ended in `SuccessValue`.
        let bytes = outcome.raw_bytes().map_err(|err| rejected(method, err))?;
        if bytes.is_empty() {
            return Ok(None);
        }
        serde_json::from_slice(&bytes)
            .map(Some)
            .map_err(|source| ClientError::Decode {
                method: method.to_string(),
                source,
            })
    }
}

pub(crate) fn decode<T: serde::de::DeserializeOwned>(method: &str, value: Value) -> Result<T> {
    serde_json::from_value(value).map_err(|source| ClientError::Decode {
        method: method.to_string(),
        source,
    })
}
