//! Drives the use / inspect / return flows on behalf of the signed in account.
//!
//! Using a bike is a two-contract transaction: the fee goes out through `ft_transfer_call` on the
//! token contract and the registry marks the bike in use when it accepts the tokens. The token
//! call resolving does not tell whether the registry kept them, so activation is confirmed by
//! reading the bike back, a bounded number of times.
use std::collections::BTreeMap;
use std::time::Duration;

use log::{debug, info, warn};

use crate::error::{ClientError, Result};
use crate::rpc::ContractRpc;
use crate::screen::Screen;
use crate::session::Session;
use crate::AccountId;

/// How a bike became active for the signed in account.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActiveVia {
    Use,
    Inspection,
}

/// Progress of one bike through a flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SagaState {
    Idle,
    /// Fee balance is being checked.
    PendingFunding,
    /// The fee was sent, waiting to see the bike in use.
    Activating,
    Active(ActiveVia),
    Returning,
}

impl SagaState {
    /// Any state may fall back to `Idle`.
    pub fn can_transition_to(self, to: SagaState) -> bool {
        use SagaState::*;
        matches!(
            (self, to),
            (_, Idle)
                | (Idle, PendingFunding)
                | (PendingFunding, Activating)
                | (Activating, Active(ActiveVia::Use))
                | (Idle, Active(ActiveVia::Inspection))
                | (Active(_), Returning)
        )
    }

    /// States owned by a running flow rather than derived from the chain.
    fn is_transient(self) -> bool {
        matches!(
            self,
            SagaState::PendingFunding | SagaState::Activating | SagaState::Returning
        )
    }
}

/// A bike as seen by the signed in account.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BikeInfo {
    pub available: bool,
    /// In use by the signed in account.
    pub in_use: bool,
    /// Under inspection by the signed in account.
    pub inspection: bool,
}

impl BikeInfo {
    pub fn state(&self) -> SagaState {
        if self.in_use {
            SagaState::Active(ActiveVia::Use)
        } else if self.inspection {
            SagaState::Active(ActiveVia::Inspection)
        } else {
            SagaState::Idle
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BalanceInfo {
    pub account_id: AccountId,
    pub balance: u128,
}

/// How long to wait for the registry to show a paid bike in use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActivationPolicy {
    pub attempts: u32,
    pub interval: Duration,
}

impl Default for ActivationPolicy {
    fn default() -> Self {
        Self {
            attempts: 5,
            interval: Duration::from_secs(1),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UseOutcome {
    Confirmed(BikeInfo),
    /// The fee transfer went through but the bike was not seen in use. The registry refunds
    /// tokens it does not keep, so the balance is not lost.
    Unconfirmed,
}

pub struct UsageCoordinator<R> {
    session: Session<R>,
    amount_to_use_bike: u128,
    bikes: Vec<BikeInfo>,
    in_flight: BTreeMap<u64, SagaState>,
    screen: Screen,
    activation: ActivationPolicy,
}

impl<R: ContractRpc> UsageCoordinator<R> {
    /// Loads the fee and the fleet, and routes unregistered accounts to registration.
    pub async fn start(session: Session<R>) -> Result<Self> {
        let amount_to_use_bike = session.registry().amount_to_use_bike().await?;
        let registered = session.ledger().is_registered(session.account_id()).await?;
        let mut coordinator = Self {
            session,
            amount_to_use_bike,
            bikes: Vec::new(),
            in_flight: BTreeMap::new(),
            screen: if registered {
                Screen::Home
            } else {
                Screen::Registration
            },
            activation: ActivationPolicy::default(),
        };
        coordinator.reload().await?;
        Ok(coordinator)
    }

    pub fn with_activation_policy(mut self, activation: ActivationPolicy) -> Self {
        self.activation = activation;
        self
    }

    pub fn session(&self) -> &Session<R> {
        &self.session
    }

    pub fn account_id(&self) -> &AccountId {
        self.session.account_id()
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn amount_to_use_bike(&self) -> u128 {
        self.amount_to_use_bike
    }

    pub fn bikes(&self) -> &[BikeInfo] {
        &self.bikes
    }

    pub fn bike(&self, index: u64) -> Option<&BikeInfo> {
        self.bikes.get(index as usize)
    }

    /// The running flow's state if there is one, otherwise what the cached bike shows.
    pub fn saga_state(&self, index: u64) -> SagaState {
        match self.in_flight.get(&index) {
            Some(state) => *state,
            None => self.bike(index).map(BikeInfo::state).unwrap_or(SagaState::Idle),
        }
    }

    fn transition(&mut self, index: u64, to: SagaState) -> Result<()> {
        let from = self.saga_state(index);
        if !from.can_transition_to(to) {
            return Err(ClientError::InvalidTransition { index, from, to });
        }
        debug!("bike {}: {:?} -> {:?}", index, from, to);
        if to == SagaState::Idle {
            self.in_flight.remove(&index);
        } else {
            self.in_flight.insert(index, to);
        }
        Ok(())
    }

    /// Drops the running flow, re-reads the bike and goes back home.
    async fn abort(&mut self, index: u64) {
        self.in_flight.remove(&index);
        if let Err(err) = self.refresh(index).await {
            warn!("failed to refresh bike {}: {}", index, err);
        }
        self.screen = Screen::Home;
    }

    async fn ensure_registered(&mut self) -> Result<()> {
        let account_id = self.account_id().clone();
        if self.session.ledger().is_registered(&account_id).await? {
            Ok(())
        } else {
            self.screen = Screen::Registration;
            Err(ClientError::NotRegistered { account_id })
        }
    }

    /// Reads the bike with three sequential views.
    async fn read_bike(&self, index: u64) -> Result<BikeInfo> {
        let registry = self.session.registry();
        let account_id = self.account_id();
        let available = registry.is_available(index).await?;
        let in_use = registry.who_is_using(index).await?.as_ref() == Some(account_id);
        let inspection = registry.who_is_inspecting(index).await?.as_ref() == Some(account_id);
        Ok(BikeInfo {
            available,
            in_use,
            inspection,
        })
    }

    fn store(&mut self, index: u64, bike: BikeInfo) {
        let i = index as usize;
        if self.bikes.len() <= i {
            self.bikes.resize(i + 1, BikeInfo::default());
        }
        self.bikes[i] = bike;
        if !self.saga_state(index).is_transient() {
            self.in_flight.remove(&index);
        }
    }

    /// Re-reads one bike.
    pub async fn refresh(&mut self, index: u64) -> Result<BikeInfo> {
        let bike = self.read_bike(index).await?;
        self.store(index, bike.clone());
        Ok(bike)
    }

    /// Re-reads the whole fleet.
    pub async fn reload(&mut self) -> Result<()> {
        let num_of_bikes = self.session.registry().num_of_bikes().await?;
        let mut bikes = Vec::with_capacity(num_of_bikes as usize);
        for index in 0..num_of_bikes {
            bikes.push(self.read_bike(index).await?);
        }
        self.bikes = bikes;
        self.in_flight.retain(|_, state| state.is_transient());
        Ok(())
    }

    /// Pays the fee for bike `index` and waits for the registry to show it in use.
    pub async fn use_bike(&mut self, index: u64) -> Result<UseOutcome> {
        info!("{} wants to use bike {}", self.account_id(), index);
        self.ensure_registered().await?;
        self.transition(index, SagaState::PendingFunding)?;

        let bike_available = match self.session.registry().is_available(index).await {
            Ok(available) => available,
            Err(err) => {
                self.abort(index).await;
                return Err(err);
            }
        };
        if !bike_available {
            self.abort(index).await;
            return Err(ClientError::BikeUnavailable { index });
        }

        let account_id = self.account_id().clone();
        let available = match self.session.ledger().balance_of(&account_id).await {
            Ok(balance) => balance,
            Err(err) => {
                self.abort(index).await;
                return Err(err);
            }
        };
        if available < self.amount_to_use_bike {
            self.transition(index, SagaState::Idle)?;
            return Err(ClientError::InsufficientFunds {
                required: self.amount_to_use_bike,
                available,
            });
        }

        self.transition(index, SagaState::Activating)?;
        self.screen = Screen::Transaction;
        let registry_id = self.session.bike_contract_id().clone();
        let transferred = self
            .session
            .ledger()
            .transfer_call(&registry_id, self.amount_to_use_bike, &index.to_string())
            .await;
        if let Err(err) = transferred {
            self.abort(index).await;
            return Err(err);
        }

        match self.await_activation(index).await {
            Ok(outcome) => {
                self.screen = Screen::Home;
                Ok(outcome)
            }
            Err(err) => {
                self.abort(index).await;
                Err(err)
            }
        }
    }

    async fn await_activation(&mut self, index: u64) -> Result<UseOutcome> {
        let attempts = self.activation.attempts.max(1);
        for attempt in 0..attempts {
            if attempt > 0 {
                tokio::time::sleep(self.activation.interval).await;
            }
            let bike = self.read_bike(index).await?;
            let in_use = bike.in_use;
            self.store(index, bike.clone());
            if in_use {
                self.transition(index, SagaState::Active(ActiveVia::Use))?;
                info!("bike {} is in use by {}", index, self.account_id());
                return Ok(UseOutcome::Confirmed(bike));
            }
        }
        warn!(
            "bike {} was not seen in use after {} reads",
            index, attempts
        );
        self.transition(index, SagaState::Idle)?;
        Ok(UseOutcome::Unconfirmed)
    }

    /// Starts inspecting bike `index`. No payment is involved.
    pub async fn inspect_bike(&mut self, index: u64) -> Result<BikeInfo> {
        info!("{} wants to inspect bike {}", self.account_id(), index);
        let from = self.saga_state(index);
        let to = SagaState::Active(ActiveVia::Inspection);
        if !from.can_transition_to(to) {
            return Err(ClientError::InvalidTransition { index, from, to });
        }

        self.screen = Screen::Transaction;
        let available = match self.session.registry().is_available(index).await {
            Ok(available) => available,
            Err(err) => {
                self.abort(index).await;
                return Err(err);
            }
        };
        if !available {
            self.abort(index).await;
            return Err(ClientError::BikeUnavailable { index });
        }
        if let Err(err) = self.session.registry().inspect_bike(index).await {
            self.abort(index).await;
            return Err(err);
        }

        let refreshed = self.refresh(index).await;
        self.screen = Screen::Home;
        refreshed
    }

    /// Returns bike `index`, collecting the inspection reward if it was inspected.
    pub async fn return_bike(&mut self, index: u64) -> Result<BikeInfo> {
        info!("{} returns bike {}", self.account_id(), index);
        if !matches!(self.saga_state(index), SagaState::Active(_)) {
            return Err(ClientError::NoActiveSession { index });
        }
        self.transition(index, SagaState::Returning)?;

        self.screen = Screen::Transaction;
        if let Err(err) = self.session.registry().return_bike(index).await {
            self.abort(index).await;
            return Err(err);
        }

        self.in_flight.remove(&index);
        let refreshed = self.refresh(index).await;
        self.screen = Screen::Home;
        refreshed
    }

    /// Registers the signed in account with the ft contract.
    pub async fn register(&mut self) -> Result<()> {
        let account_id = self.account_id().clone();
        if self.session.ledger().is_registered(&account_id).await? {
            self.screen = Screen::Home;
            return Err(ClientError::AlreadyRegistered { account_id });
        }
        self.session.ledger().storage_deposit().await?;
        info!("{} registered", account_id);
        self.screen = Screen::Home;
        Ok(())
    }

    /// Unregisters the signed in account. Any remaining balance is burned.
    pub async fn unregister(&mut self) -> Result<bool> {
        warn!(
            "unregistering {}, its remaining balance is burned",
            self.account_id()
        );
        let unregistered = self.session.ledger().storage_unregister().await?;
        if unregistered {
            self.screen = Screen::Registration;
        }
        Ok(unregistered)
    }

    /// Sends `amount` to `receiver_id`, which has to be registered.
    pub async fn transfer(&self, receiver_id: &AccountId, amount: u128) -> Result<()> {
        let ledger = self.session.ledger();
        if !ledger.is_registered(receiver_id).await? {
            return Err(ClientError::NotRegistered {
                account_id: receiver_id.clone(),
            });
        }
        ledger.transfer(receiver_id, amount).await?;
        info!("{} sent {}ft to {}", self.account_id(), amount, receiver_id);
        Ok(())
    }

    pub async fn balance_info(&self, account_id: &AccountId) -> Result<BalanceInfo> {
        let balance = self.session.ledger().balance_of(account_id).await?;
        Ok(BalanceInfo {
            account_id: account_id.clone(),
            balance,
        })
    }

    pub fn sign_out(self) -> Screen {
        self.session.sign_out();
        Screen::SignIn
    }
}
