use thiserror::Error;

use crate::coordinator::SagaState;
use crate::AccountId;

#[derive(Debug, Error)]
pub enum ClientError {
    /// Detected locally, no transaction is sent.
    #[error("{required}ft is required to use the bike, the balance is {available}ft")]
    InsufficientFunds { required: u128, available: u128 },

    #[error("account {account_id} is not registered in the ft contract")]
    NotRegistered { account_id: AccountId },

    #[error("account {account_id} is already registered in the ft contract")]
    AlreadyRegistered { account_id: AccountId },

    #[error("bike {index} is not available")]
    BikeUnavailable { index: u64 },

    #[error("bike {index} is neither used nor inspected by this account")]
    NoActiveSession { index: u64 },

    #[error("bike {index}: cannot go from {from:?} to {to:?}")]
    InvalidTransition { index: u64, from: SagaState, to: SagaState },

    /// The RPC layer or the contract refused the call.
    #[error("{method} was rejected: {reason}")]
    Rejected { method: String, reason: String },

    #[error("failed to decode the response of {method}: {source}")]
    Decode {
        method: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("unknown environment `{0}`")]
    UnknownEnvironment(String),

    #[error("invalid account id `{0}`")]
    InvalidAccountId(String),
}

pub type Result<T, E = ClientError> = std::result::Result<T, E>;
