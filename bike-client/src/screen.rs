/// Screen the front-end shows for the current state of the coordinator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    SignIn,
    /// The signed in account still has to register with the ft contract.
    Registration,
    Home,
    /// A transaction is in flight.
    Transaction,
}

impl Screen {
    pub fn as_str(&self) -> &'static str {
        match self {
            Screen::SignIn => "sign_in",
            Screen::Registration => "registration",
            Screen::Home => "home",
            Screen::Transaction => "transaction",
        }
    }
}

impl std::fmt::Display for Screen {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
