/*!
* Bike sharing contract
*
* Keeps track of a fixed fleet of bikes. A bike is either available, in use by an account, or
* under inspection by an account.
*
* Using a bike is paid in fungible tokens: the user calls `ft_transfer_call` on the token contract
* with this contract as the receiver and the bike index as the message, see `ft_receiver.rs`.
* Inspecting a bike is free, and returning an inspected bike pays the inspector a reward in the
* same token, see `callbacks.rs`.
*/
use near_sdk::borsh::{self, BorshDeserialize, BorshSerialize};
use near_sdk::collections::Vector;
use near_sdk::json_types::U128;
use near_sdk::{env, log, near_bindgen, AccountId, Balance, PanicOnDefault, PromiseOrValue};

mod callbacks;
mod ft_receiver;
pub mod gas;
mod internal;


/// Amount of tokens that has to be transferred to start using a bike.
pub const AMOUNT_TO_USE_BIKE: Balance = 30;

/// Amount of tokens paid to an account that returns a bike it inspected.
pub const AMOUNT_REWARD_FOR_INSPECTIONS: Balance = 15;

/// Index of a bike in the fleet.
pub type BikeIndex = u64;

/// State of a single bike.
#[derive(BorshDeserialize, BorshSerialize, Debug, PartialEq)]
pub enum Bike {
    Available,
    /// Used by the given account.
    InUse(AccountId),
    /// Inspected by the given account.
    Inspection(AccountId),
}

#[near_bindgen]
#[derive(BorshDeserialize, BorshSerialize, PanicOnDefault)]
pub struct Contract {
    bikes: Vector<Bike>,
    /// The token contract that payments and rewards are made in.
    ft_contract_id: AccountId,
    amount_to_use_bike: Balance,
    inspection_reward: Balance,
}

#[near_bindgen]
impl Contract {
    /// Initializes the fleet with `num_of_bikes` available bikes. Payments are accepted only
    /// from `ft_contract_id`.
    #[init]
    pub fn new(num_of_bikes: u64, ft_contract_id: AccountId) -> Self {
        assert!(!env::state_exists(), "Already initialized");
        log!("initialize Contract with {} bikes", num_of_bikes);
        let mut bikes = Vector::new(b"b".to_vec());
        for _ in 0..num_of_bikes {
            bikes.push(&Bike::Available);
        }
        Self {
            bikes,
            ft_contract_id,
            amount_to_use_bike: AMOUNT_TO_USE_BIKE,
            inspection_reward: AMOUNT_REWARD_FOR_INSPECTIONS,
        }
    }

    pub fn num_of_bikes(&self) -> u64 {
        self.bikes.len()
    }

    pub fn is_available(&self, index: BikeIndex) -> bool {
        matches!(self.internal_get_bike(index), Bike::Available)
    }

    /// Returns the account using the bike, if it is in use.
    pub fn who_is_using(&self, index: BikeIndex) -> Option<AccountId> {
        match self.internal_get_bike(index) {
            Bike::InUse(user_id) => Some(user_id),
            _ => None,
        }
    }

    /// Returns the account inspecting the bike, if it is under inspection.
    pub fn who_is_inspecting(&self, index: BikeIndex) -> Option<AccountId> {
        match self.internal_get_bike(index) {
            Bike::Inspection(inspector_id) => Some(inspector_id),
            _ => None,
        }
    }

    pub fn amount_to_use_bike(&self) -> U128 {
        self.amount_to_use_bike.into()
    }

    pub fn inspection_reward(&self) -> U128 {
        self.inspection_reward.into()
    }

    pub fn ft_contract_id(&self) -> AccountId {
        self.ft_contract_id.clone()
    }

    /// Available -> under inspection by the predecessor.
    pub fn inspect_bike(&mut self, index: BikeIndex) {
        let inspector_id = env::predecessor_account_id();
        log!("{} inspects bike", &inspector_id);

        match self.internal_get_bike(index) {
            Bike::Available => self.internal_set_bike(index, &Bike::Inspection(inspector_id)),
            _ => env::panic_str("Bike is not available"),
        }
    }

    /// In use or under inspection by the predecessor -> available.
    ///
    /// A used bike is available right away. An inspected bike first pays the inspection reward
    /// and becomes available once the token transfer succeeded.
    pub fn return_bike(&mut self, index: BikeIndex) -> PromiseOrValue<()> {
        let account_id = env::predecessor_account_id();
        log!("{} returns bike", &account_id);

        match self.internal_get_bike(index) {
            Bike::Available => env::panic_str("Bike is already available"),
            Bike::InUse(user_id) => {
                assert_eq!(user_id, account_id, "Fail due to wrong account");
                self.internal_set_bike(index, &Bike::Available);
                PromiseOrValue::Value(())
            }
            Bike::Inspection(inspector_id) => {
                assert_eq!(inspector_id, account_id, "Fail due to wrong account");
                self.internal_pay_inspection_reward(index, inspector_id).into()
            }
        }
    }
}
