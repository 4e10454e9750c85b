use crate::config::ClientConfig;
use crate::error::{ClientError, Result};
use crate::ledger::TokenLedger;
use crate::registry::BikeRegistry;
use crate::rpc::ContractRpc;
use crate::AccountId;

/// A signed in account together with the two contracts it talks to.
///
/// Both contract proxies borrow the same connection, so every call is signed by the same account.
/// Dropping the session, or calling `sign_out`, forgets the signer.
pub struct Session<R> {
    rpc: R,
    bike_contract_id: AccountId,
    ft_contract_id: AccountId,
}

impl<R: ContractRpc> Session<R> {
    pub fn new(rpc: R, bike_contract_id: AccountId, ft_contract_id: AccountId) -> Self {
        log::info!(
            "{} signed in, bike contract {}, ft contract {}",
            rpc.signer_id(),
            bike_contract_id,
            ft_contract_id
        );
        Self {
            rpc,
            bike_contract_id,
            ft_contract_id,
        }
    }

    /// Takes the contract names from `config`.
    pub fn from_config(rpc: R, config: &ClientConfig) -> Result<Self> {
        let bike_contract_id = parse_account_id(&config.contract_name)?;
        let ft_contract_id = parse_account_id(&config.ft_contract_name)?;
        Ok(Self::new(rpc, bike_contract_id, ft_contract_id))
    }

    pub fn account_id(&self) -> &AccountId {
        self.rpc.signer_id()
    }

    pub fn bike_contract_id(&self) -> &AccountId {
        &self.bike_contract_id
    }

    pub fn ft_contract_id(&self) -> &AccountId {
        &self.ft_contract_id
    }

    pub fn rpc(&self) -> &R {
        &self.rpc
    }

    pub fn ledger(&self) -> TokenLedger<'_, R> {
        TokenLedger::new(&self.rpc, &self.ft_contract_id)
    }

    pub fn registry(&self) -> BikeRegistry<'_, R> {
        BikeRegistry::new(&self.rpc, &self.bike_contract_id)
    }

    pub fn sign_out(self) {
        log::info!("{} signed out", self.rpc.signer_id());
    }
}

pub(crate) fn parse_account_id(account_id: &str) -> Result<AccountId> {
    account_id
        .parse()
        .map_err(|_| ClientError::InvalidAccountId(account_id.to_string()))
}
