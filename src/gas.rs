use near_sdk::Gas;

/// Gas attached to the reward transfer on the token contract.
/// Requires 10e12 for a plain `ft_transfer` between registered accounts, events included.
pub const FT_TRANSFER: Gas = Gas(10_000_000_000_000);

/// Gas attached to the callback that makes an inspected bike available again.
/// Requires 5e12 for the local update.
pub const CALLBACK_RETURN_BIKE: Gas = Gas(5_000_000_000_000);
