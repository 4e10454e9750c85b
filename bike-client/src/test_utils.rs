//! In-memory stand-in for the ft contract and the bike registry.
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::error::{ClientError, Result};
use crate::ledger::{ONE_YOCTO, STORAGE_DEPOSIT};
use crate::rpc::{CallOptions, ContractRpc};
use crate::utils::U128;
use crate::AccountId;

#[derive(Clone, PartialEq)]
enum Bike {
    Available,
    InUse(AccountId),
    Inspection(AccountId),
}

struct ChainState {
    accounts: HashMap<AccountId, u128>,
    total_supply: u128,
    bikes: Vec<Bike>,
    hold_activations: bool,
    held: Vec<(u64, AccountId)>,
    calls: Vec<String>,
    reject_next: Option<String>,
}

pub struct FakeChain {
    ft_id: AccountId,
    bike_id: AccountId,
    state: RefCell<ChainState>,
}

pub struct FakeRpc {
    chain: Rc<FakeChain>,
    signer_id: AccountId,
}

fn reject(method: &str, reason: &str) -> ClientError {
    ClientError::Rejected {
        method: method.to_string(),
        reason: reason.to_string(),
    }
}

fn account_arg(method: &str, args: &Value, key: &str) -> Result<AccountId> {
    args[key]
        .as_str()
        .and_then(|s| s.parse().ok())
        .ok_or_else(|| reject(method, &format!("missing {}", key)))
}

fn index_arg(method: &str, args: &Value) -> Result<u64> {
    args["index"]
        .as_u64()
        .ok_or_else(|| reject(method, "missing index"))
}

fn amount_arg(method: &str, args: &Value) -> Result<u128> {
    args["amount"]
        .as_str()
        .and_then(|s| s.parse().ok())
        .ok_or_else(|| reject(method, "missing amount"))
}

impl FakeChain {
    pub const OWNER: &'static str = "owner";
    pub const BIKE: &'static str = "bike";
    pub const FT: &'static str = "ft";
    pub const TOTAL_SUPPLY: u128 = 1_000_000;
    pub const NUM_OF_BIKES: u64 = 5;
    pub const AMOUNT_TO_USE_BIKE: u128 = 30;
    pub const INSPECTION_REWARD: u128 = 15;

    /// The owner holds the whole supply, the registry is registered with no balance.
    pub fn new() -> Rc<Self> {
        let owner_id = Self::id(Self::OWNER);
        let bike_id = Self::id(Self::BIKE);
        let mut accounts = HashMap::new();
        accounts.insert(owner_id, Self::TOTAL_SUPPLY);
        accounts.insert(bike_id.clone(), 0);
        Rc::new(Self {
            ft_id: Self::id(Self::FT),
            bike_id,
            state: RefCell::new(ChainState {
                accounts,
                total_supply: Self::TOTAL_SUPPLY,
                bikes: vec![Bike::Available; Self::NUM_OF_BIKES as usize],
                hold_activations: false,
                held: Vec::new(),
                calls: Vec::new(),
                reject_next: None,
            }),
        })
    }

    fn id(name: &str) -> AccountId {
        format!("{}.test.near", name).parse().unwrap()
    }

    pub fn account(&self, name: &str) -> AccountId {
        Self::id(name)
    }

    pub fn ft_id(&self) -> &AccountId {
        &self.ft_id
    }

    pub fn bike_id(&self) -> &AccountId {
        &self.bike_id
    }

    pub fn rpc(self: &Rc<Self>, name: &str) -> FakeRpc {
        FakeRpc {
            chain: Rc::clone(self),
            signer_id: Self::id(name),
        }
    }

    pub fn register(&self, name: &str) {
        self.state.borrow_mut().accounts.entry(Self::id(name)).or_insert(0);
    }

    pub fn is_registered(&self, name: &str) -> bool {
        self.state.borrow().accounts.contains_key(&Self::id(name))
    }

    /// Sends `amount` from the owner to a registered account.
    pub fn fund(&self, name: &str, amount: u128) {
        let mut state = self.state.borrow_mut();
        let owner_id = Self::id(Self::OWNER);
        state.transfer(&owner_id, &Self::id(name), amount).unwrap();
    }

    pub fn balance_of(&self, name: &str) -> u128 {
        self.state
            .borrow()
            .accounts
            .get(&Self::id(name))
            .copied()
            .unwrap_or(0)
    }

    pub fn total_supply(&self) -> u128 {
        self.state.borrow().total_supply
    }

    /// Change calls made so far, by method name.
    pub fn calls(&self) -> Vec<String> {
        self.state.borrow().calls.clone()
    }

    /// The registry accepts payments but only shows the bike in use after `release_activations`.
    pub fn hold_activations(&self) {
        self.state.borrow_mut().hold_activations = true;
    }

    pub fn release_activations(&self) {
        let mut state = self.state.borrow_mut();
        state.hold_activations = false;
        let held = std::mem::take(&mut state.held);
        for (index, user_id) in held {
            state.bikes[index as usize] = Bike::InUse(user_id);
        }
    }

    /// The next change call to `method` fails without touching the state.
    pub fn reject_next(&self, method: &str) {
        self.state.borrow_mut().reject_next = Some(method.to_string());
    }
}

impl ChainState {
    fn transfer(&mut self, sender_id: &AccountId, receiver_id: &AccountId, amount: u128) -> std::result::Result<(), String> {
        if !self.accounts.contains_key(receiver_id) {
            return Err(format!("The account {} is not registered", receiver_id));
        }
        let balance = self
            .accounts
            .get_mut(sender_id)
            .ok_or_else(|| format!("The account {} is not registered", sender_id))?;
        if *balance < amount {
            return Err("The account doesn't have enough balance".to_string());
        }
        *balance -= amount;
        *self.accounts.entry(receiver_id.clone()).or_insert(0) += amount;
        Ok(())
    }

    fn bike(&self, method: &str, index: u64) -> Result<&Bike> {
        self.bikes
            .get(index as usize)
            .ok_or_else(|| reject(method, "Bike index out of range"))
    }

    /// What the registry does with tokens sent to it, returns the unused amount.
    fn on_transfer(&mut self, sender_id: &AccountId, amount: u128, msg: &str) -> u128 {
        let index = match msg.parse::<u64>() {
            Ok(index) if (index as usize) < self.bikes.len() => index,
            _ => return amount,
        };
        if amount < FakeChain::AMOUNT_TO_USE_BIKE || self.bikes[index as usize] != Bike::Available {
            return amount;
        }
        if self.hold_activations {
            self.held.push((index, sender_id.clone()));
        } else {
            self.bikes[index as usize] = Bike::InUse(sender_id.clone());
        }
        amount - FakeChain::AMOUNT_TO_USE_BIKE
    }
}

#[async_trait(?Send)]
impl ContractRpc for FakeRpc {
    fn signer_id(&self) -> &AccountId {
        &self.signer_id
    }

    async fn view(&self, contract_id: &AccountId, method: &str, args: Value) -> Result<Value> {
        let state = self.chain.state.borrow();
        if contract_id == &self.chain.ft_id {
            let account_id = account_arg(method, &args, "account_id")?;
            match method {
                "ft_balance_of" => Ok(json!(U128(
                    state.accounts.get(&account_id).copied().unwrap_or(0)
                ))),
                "storage_balance_of" => Ok(if state.accounts.contains_key(&account_id) {
                    json!({ "total": U128(STORAGE_DEPOSIT), "available": U128(0) })
                } else {
                    Value::Null
                }),
                _ => Err(reject(method, "MethodNotFound")),
            }
        } else if contract_id == &self.chain.bike_id {
            match method {
                "num_of_bikes" => Ok(json!(state.bikes.len() as u64)),
                "amount_to_use_bike" => Ok(json!(U128(FakeChain::AMOUNT_TO_USE_BIKE))),
                "is_available" => {
                    let bike = state.bike(method, index_arg(method, &args)?)?;
                    Ok(json!(*bike == Bike::Available))
                }
                "who_is_using" => match state.bike(method, index_arg(method, &args)?)? {
                    Bike::InUse(user_id) => Ok(json!(user_id)),
                    _ => Ok(Value::Null),
                },
                "who_is_inspecting" => match state.bike(method, index_arg(method, &args)?)? {
                    Bike::Inspection(inspector_id) => Ok(json!(inspector_id)),
                    _ => Ok(Value::Null),
                },
                _ => Err(reject(method, "MethodNotFound")),
            }
        } else {
            Err(reject(method, "AccountDoesNotExist"))
        }
    }

    async fn call(
        &self,
        contract_id: &AccountId,
        method: &str,
        args: Value,
        options: CallOptions,
    ) -> Result<Option<Value>> {
        let mut state = self.chain.state.borrow_mut();
        state.calls.push(method.to_string());
        if state.reject_next.as_deref() == Some(method) {
            state.reject_next = None;
            return Err(reject(method, "injected failure"));
        }
        let signer_id = self.signer_id.clone();

        if contract_id == &self.chain.ft_id {
            match method {
                "storage_deposit" => {
                    if options.deposit < STORAGE_DEPOSIT {
                        return Err(reject(method, "The attached deposit is less than the minimum storage balance"));
                    }
                    if state.accounts.contains_key(&signer_id) {
                        return Err(reject(method, "The account is already registered"));
                    }
                    state.accounts.insert(signer_id, 0);
                    Ok(Some(json!({ "total": U128(STORAGE_DEPOSIT), "available": U128(0) })))
                }
                "storage_unregister" => {
                    if options.deposit != ONE_YOCTO {
                        return Err(reject(method, "Requires attached deposit of exactly 1 yoctoNEAR"));
                    }
                    let force = args["force"].as_bool().unwrap_or(false);
                    match state.accounts.get(&signer_id).copied() {
                        None => Ok(Some(json!(false))),
                        Some(balance) if balance > 0 && !force => Err(reject(
                            method,
                            "Can't unregister the account with the positive balance without force",
                        )),
                        Some(balance) => {
                            state.accounts.remove(&signer_id);
                            state.total_supply -= balance;
                            Ok(Some(json!(true)))
                        }
                    }
                }
                "ft_transfer" => {
                    if options.deposit != ONE_YOCTO {
                        return Err(reject(method, "Requires attached deposit of exactly 1 yoctoNEAR"));
                    }
                    let receiver_id = account_arg(method, &args, "receiver_id")?;
                    let amount = amount_arg(method, &args)?;
                    state
                        .transfer(&signer_id, &receiver_id, amount)
                        .map_err(|reason| reject(method, &reason))?;
                    Ok(None)
                }
                "ft_transfer_call" => {
                    if options.deposit != ONE_YOCTO {
                        return Err(reject(method, "Requires attached deposit of exactly 1 yoctoNEAR"));
                    }
                    let receiver_id = account_arg(method, &args, "receiver_id")?;
                    let amount = amount_arg(method, &args)?;
                    let msg = args["msg"].as_str().unwrap_or_default().to_string();
                    state
                        .transfer(&signer_id, &receiver_id, amount)
                        .map_err(|reason| reject(method, &reason))?;
                    let unused = if receiver_id == self.chain.bike_id {
                        state.on_transfer(&signer_id, amount, &msg)
                    } else {
                        amount
                    };
                    if unused > 0 {
                        state
                            .transfer(&receiver_id, &signer_id, unused)
                            .map_err(|reason| reject(method, &reason))?;
                    }
                    Ok(Some(json!(U128(amount - unused))))
                }
                _ => Err(reject(method, "MethodNotFound")),
            }
        } else if contract_id == &self.chain.bike_id {
            let index = index_arg(method, &args)?;
            let bike = state.bike(method, index)?.clone();
            match (method, bike) {
                ("inspect_bike", Bike::Available) => {
                    state.bikes[index as usize] = Bike::Inspection(signer_id);
                    Ok(None)
                }
                ("inspect_bike", _) => Err(reject(method, "Bike is not available")),
                ("return_bike", Bike::Available) => Err(reject(method, "Bike is already available")),
                ("return_bike", Bike::InUse(user_id)) if user_id == signer_id => {
                    state.bikes[index as usize] = Bike::Available;
                    Ok(None)
                }
                ("return_bike", Bike::Inspection(inspector_id)) if inspector_id == signer_id => {
                    let bike_id = self.chain.bike_id.clone();
                    state
                        .transfer(&bike_id, &signer_id, FakeChain::INSPECTION_REWARD)
                        .map_err(|_| reject(method, "Fail cross-contract call"))?;
                    state.bikes[index as usize] = Bike::Available;
                    Ok(None)
                }
                ("return_bike", _) => Err(reject(method, "Fail due to wrong account")),
                _ => Err(reject(method, "MethodNotFound")),
            }
        } else {
            Err(reject(method, "AccountDoesNotExist"))
        }
    }
}
