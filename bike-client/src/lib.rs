/*!
* Client for the bike sharing contracts
*
* A `Session` holds the signed in account's connection and hands out proxies to the two contracts:
* `TokenLedger` for the ft contract and `BikeRegistry` for the bike registry. The
* `UsageCoordinator` runs the use / inspect / return flows on top of them and keeps a cache of
* the fleet as seen by the signed in account.
*
* All chain access goes through `ContractRpc`; `WorkspacesRpc` implements it with `workspaces`.
*/
pub mod config;
pub mod coordinator;
pub mod error;
pub mod ledger;
pub mod registry;
pub mod rpc;
pub mod screen;
pub mod session;
pub mod utils;

#[cfg(test)]
mod test_utils;

pub use workspaces::AccountId;

pub use crate::config::ClientConfig;
pub use crate::coordinator::{
    ActivationPolicy, ActiveVia, BalanceInfo, BikeInfo, SagaState, UsageCoordinator, UseOutcome,
};
pub use crate::error::{ClientError, Result};
pub use crate::ledger::{StorageBalance, TokenLedger};
pub use crate::registry::BikeRegistry;
pub use crate::rpc::{CallOptions, ContractRpc, WorkspacesRpc};
pub use crate::screen::Screen;
pub use crate::session::Session;
