use crate::*;

impl Contract {
    pub(crate) fn internal_get_bike(&self, index: BikeIndex) -> Bike {
        self.bikes
            .get(index)
            .unwrap_or_else(|| env::panic_str("Bike index out of range"))
    }

    pub(crate) fn internal_set_bike(&mut self, index: BikeIndex, bike: &Bike) {
        self.bikes.replace(index, bike);
    }

    /// Available -> in use by `user_id`. Called once the usage fee has been received.
    pub(crate) fn internal_use_bike(&mut self, index: BikeIndex, user_id: AccountId) {
        log!("{} uses bike", &user_id);

        match self.internal_get_bike(index) {
            Bike::Available => self.internal_set_bike(index, &Bike::InUse(user_id)),
            _ => env::panic_str("Bike is not available"),
        }
    }
}
