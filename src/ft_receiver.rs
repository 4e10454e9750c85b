use crate::*;
use near_contract_standards::fungible_token::receiver::FungibleTokenReceiver;

#[near_bindgen]
impl FungibleTokenReceiver for Contract {
    /// Starts using the bike whose index is given in `msg`.
    ///
    /// Only tokens of the configured token contract are accepted and at least
    /// `amount_to_use_bike` has to be sent. The surplus is returned as unused, so the token
    /// contract refunds it to `sender_id`. Any failed check panics and the whole amount is
    /// refunded.
    fn ft_on_transfer(
        &mut self,
        sender_id: AccountId,
        amount: U128,
        msg: String,
    ) -> PromiseOrValue<U128> {
        assert_eq!(
            env::predecessor_account_id(),
            self.ft_contract_id,
            "Only accepts tokens from the configured ft contract"
        );
        let index: BikeIndex = msg
            .trim()
            .parse()
            .unwrap_or_else(|_| env::panic_str("The msg must be a bike index"));
        let amount: Balance = amount.into();
        assert!(
            amount >= self.amount_to_use_bike,
            "{} ft is required to use the bike",
            self.amount_to_use_bike
        );

        log!("{} transferred {} ft to use bike {}", &sender_id, amount, index);
        self.internal_use_bike(index, sender_id);

        PromiseOrValue::Value(U128(amount - self.amount_to_use_bike))
    }
}
