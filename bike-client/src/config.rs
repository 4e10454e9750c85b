use serde::{Deserialize, Serialize};

use crate::error::{ClientError, Result};

pub const DEFAULT_CONTRACT_NAME: &str = "bike.testnet";
pub const DEFAULT_FT_CONTRACT_NAME: &str = "ft.testnet";

/// Network endpoints and contract names for one environment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientConfig {
    pub network_id: String,
    pub node_url: String,
    pub wallet_url: Option<String>,
    pub helper_url: Option<String>,
    pub explorer_url: Option<String>,
    /// Account that creates test accounts, only set for shared test networks.
    pub master_account: Option<String>,
    /// Bike registry contract.
    pub contract_name: String,
    pub ft_contract_name: String,
}

impl ClientConfig {
    /// Config for the environment named by `NODE_ENV`, `development` if unset.
    pub fn from_env() -> Result<Self> {
        let env = std::env::var("NODE_ENV").unwrap_or_else(|_| "development".to_string());
        Self::for_env(&env)
    }

    /// Config for `env`. `CONTRACT_NAME` and `FT_CONTRACT_NAME` override the contract names.
    pub fn for_env(env: &str) -> Result<Self> {
        let contract_name =
            std::env::var("CONTRACT_NAME").unwrap_or_else(|_| DEFAULT_CONTRACT_NAME.to_string());
        let ft_contract_name =
            std::env::var("FT_CONTRACT_NAME").unwrap_or_else(|_| DEFAULT_FT_CONTRACT_NAME.to_string());
        Self::with_contracts(env, &contract_name, &ft_contract_name)
    }

    pub fn with_contracts(env: &str, contract_name: &str, ft_contract_name: &str) -> Result<Self> {
        let public = |network: &str, wallet: &str| Self {
            network_id: network.to_string(),
            node_url: format!("https://rpc.{}.near.org", network),
            wallet_url: Some(format!("https://{}.near.org", wallet)),
            helper_url: Some(format!("https://helper.{}.near.org", network)),
            explorer_url: Some(format!("https://explorer.{}.near.org", network)),
            master_account: None,
            contract_name: contract_name.to_string(),
            ft_contract_name: ft_contract_name.to_string(),
        };
        let config = match env {
            "production" | "mainnet" => public("mainnet", "wallet"),
            "development" | "testnet" => public("testnet", "wallet.testnet"),
            "betanet" => public("betanet", "wallet.betanet"),
            "local" => Self {
                network_id: "local".to_string(),
                node_url: "http://localhost:3030".to_string(),
                wallet_url: Some("http://localhost:4000/wallet".to_string()),
                helper_url: None,
                explorer_url: None,
                master_account: None,
                contract_name: contract_name.to_string(),
                ft_contract_name: ft_contract_name.to_string(),
            },
            "test" | "ci" => Self {
                network_id: "shared-test".to_string(),
                node_url: "https://rpc.ci-testnet.near.org".to_string(),
                wallet_url: None,
                helper_url: None,
                explorer_url: None,
                master_account: Some("test.near".to_string()),
                contract_name: contract_name.to_string(),
                ft_contract_name: ft_contract_name.to_string(),
            },
            _ => return Err(ClientError::UnknownEnvironment(env.to_string())),
        };
        Ok(config)
    }

    /// Explorer page of `account_id`, if the network has an explorer.
    pub fn explorer_account_url(&self, account_id: &str) -> Option<String> {
        self.explorer_url
            .as_ref()
            .map(|url| format!("{}/accounts/{}", url, account_id))
    }
}
