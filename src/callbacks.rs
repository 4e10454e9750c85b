use crate::*;
use near_sdk::{ext_contract, Promise, PromiseResult};

/// Methods of the token contract called by this contract.
#[ext_contract(ext_ft)]
pub trait FungibleToken {
    fn ft_transfer(&mut self, receiver_id: AccountId, amount: U128, memo: Option<String>);
}

impl Contract {
    /// Pays the inspection reward to `inspector_id` and makes the bike available in the callback.
    pub(crate) fn internal_pay_inspection_reward(
        &self,
        index: BikeIndex,
        inspector_id: AccountId,
    ) -> Promise {
        log!(
            "{} transfer to {}: {} FT",
            env::current_account_id(),
            &inspector_id,
            self.inspection_reward
        );

        ext_ft::ext(self.ft_contract_id.clone())
            .with_attached_deposit(1)
            .with_static_gas(gas::FT_TRANSFER)
            .ft_transfer(inspector_id, self.inspection_reward.into(), None)
            .then(
                Self::ext(env::current_account_id())
                    .with_static_gas(gas::CALLBACK_RETURN_BIKE)
                    .callback_return_bike(index),
            )
    }
}

#[near_bindgen]
impl Contract {
    /// Makes an inspected bike available again if the reward transfer succeeded.
    #[private]
    pub fn callback_return_bike(&mut self, index: BikeIndex) {
        assert_eq!(env::promise_results_count(), 1, "This is a callback method");
        match env::promise_result(0) {
            PromiseResult::NotReady => unreachable!(),
            PromiseResult::Failed => env::panic_str("Fail cross-contract call"),
            PromiseResult::Successful(_) => self.internal_set_bike(index, &Bike::Available),
        }
    }
}
