// 9.0 ledger.rs: in-process fungible token ledger. one instance each for the
// collateral asset, the long token and the short token.
// balances, allowances, and an owner capability gating mint/burn.
// no real chain; every change is appended to the ledger's own log.

use crate::types::{AccountId, Amount, TOKEN_DECIMALS};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum LedgerEvent {
    /// Mints come from `AccountId::ZERO`, burns go to it.
    Transfer {
        from: AccountId,
        to: AccountId,
        value: Amount,
    },
    Approval {
        owner: AccountId,
        spender: AccountId,
        value: Amount,
    },
    OwnershipTransferred {
        previous_owner: AccountId,
        new_owner: AccountId,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LedgerError {
    #[error("Insufficient balance for {account}: requested {requested}, available {available}")]
    InsufficientBalance {
        account: AccountId,
        requested: Amount,
        available: Amount,
    },

    #[error("Insufficient allowance from {owner} to {spender}: requested {requested}, available {available}")]
    InsufficientAllowance {
        owner: AccountId,
        spender: AccountId,
        requested: Amount,
        available: Amount,
    },

    #[error("{caller} is not the owner of {symbol} (owner is {owner})")]
    Unauthorized {
        caller: AccountId,
        owner: AccountId,
        symbol: String,
    },

    #[error("Supply overflow")]
    Overflow,
}

/// What a ledger held for a few accounts at one point, enough to undo any
/// changes made to just those accounts since.
#[derive(Debug, Clone)]
pub struct LedgerCheckpoint {
    owner: AccountId,
    total_supply: Amount,
    balances: Vec<(AccountId, Amount)>,
    allowances: Vec<((AccountId, AccountId), Amount)>,
    events_len: usize,
}

#[derive(Debug, Clone)]
pub struct TokenLedger {
    symbol: String,
    name: String,
    is_short: bool,
    owner: AccountId,
    total_supply: Amount,
    balances: HashMap<AccountId, Amount>,
    allowances: HashMap<(AccountId, AccountId), Amount>,
    events: Vec<LedgerEvent>,
}

impl TokenLedger {
    /// Creates a ledger owned by `creator`, who also receives `initial_supply`.
    pub fn new(
        creator: AccountId,
        initial_supply: Amount,
        symbol: impl Into<String>,
        name: impl Into<String>,
        is_short: bool,
    ) -> Self {
        let mut ledger = Self {
            symbol: symbol.into(),
            name: name.into(),
            is_short,
            owner: creator,
            total_supply: Amount::zero(),
            balances: HashMap::new(),
            allowances: HashMap::new(),
            events: Vec::new(),
        };
        if !initial_supply.is_zero() {
            ledger.total_supply = initial_supply;
            ledger.balances.insert(creator, initial_supply);
            ledger.events.push(LedgerEvent::Transfer {
                from: AccountId::ZERO,
                to: creator,
                value: initial_supply,
            });
        }
        ledger
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_short(&self) -> bool {
        self.is_short
    }

    pub fn decimals(&self) -> u32 {
        TOKEN_DECIMALS
    }

    pub fn owner(&self) -> AccountId {
        self.owner
    }

    pub fn total_supply(&self) -> Amount {
        self.total_supply
    }

    pub fn balance_of(&self, account: AccountId) -> Amount {
        self.balances.get(&account).copied().unwrap_or_default()
    }

    pub fn allowance(&self, owner: AccountId, spender: AccountId) -> Amount {
        self.allowances
            .get(&(owner, spender))
            .copied()
            .unwrap_or_default()
    }

    pub fn events(&self) -> &[LedgerEvent] {
        &self.events
    }

    pub fn holders(&self) -> impl Iterator<Item = (&AccountId, &Amount)> {
        self.balances.iter().filter(|(_, balance)| !balance.is_zero())
    }

    pub fn transfer(&mut self, caller: AccountId, to: AccountId, amount: Amount) -> Result<(), LedgerError> {
        self.move_balance(caller, to, amount)
    }

    /// Spends `caller`'s allowance on `from`.
    pub fn transfer_from(
        &mut self,
        caller: AccountId,
        from: AccountId,
        to: AccountId,
        amount: Amount,
    ) -> Result<(), LedgerError> {
        let allowance = self.allowance(from, caller);
        let remaining = allowance
            .checked_sub(amount)
            .ok_or(LedgerError::InsufficientAllowance {
                owner: from,
                spender: caller,
                requested: amount,
                available: allowance,
            })?;

        self.move_balance(from, to, amount)?;
        self.allowances.insert((from, caller), remaining);
        Ok(())
    }

    /// Overwrites any previous allowance.
    pub fn approve(&mut self, caller: AccountId, spender: AccountId, amount: Amount) {
        self.allowances.insert((caller, spender), amount);
        self.events.push(LedgerEvent::Approval {
            owner: caller,
            spender,
            value: amount,
        });
    }

    pub fn mint(&mut self, caller: AccountId, to: AccountId, amount: Amount) -> Result<(), LedgerError> {
        self.require_owner(caller)?;

        let supply = self
            .total_supply
            .checked_add(amount)
            .ok_or(LedgerError::Overflow)?;
        let balance = self
            .balance_of(to)
            .checked_add(amount)
            .ok_or(LedgerError::Overflow)?;

        self.total_supply = supply;
        self.balances.insert(to, balance);
        self.events.push(LedgerEvent::Transfer {
            from: AccountId::ZERO,
            to,
            value: amount,
        });
        Ok(())
    }

    pub fn burn(&mut self, caller: AccountId, from: AccountId, amount: Amount) -> Result<(), LedgerError> {
        self.require_owner(caller)?;

        let available = self.balance_of(from);
        let balance = available
            .checked_sub(amount)
            .ok_or(LedgerError::InsufficientBalance {
                account: from,
                requested: amount,
                available,
            })?;

        self.total_supply = self.total_supply.saturating_sub(amount);
        self.balances.insert(from, balance);
        self.events.push(LedgerEvent::Transfer {
            from,
            to: AccountId::ZERO,
            value: amount,
        });
        Ok(())
    }

    pub fn transfer_ownership(&mut self, caller: AccountId, new_owner: AccountId) -> Result<(), LedgerError> {
        self.require_owner(caller)?;
        let previous_owner = self.owner;
        self.owner = new_owner;
        self.events.push(LedgerEvent::OwnershipTransferred {
            previous_owner,
            new_owner,
        });
        Ok(())
    }

    /// Records the entries of `accounts` and every allowance among them.
    /// Valid until the log is trimmed.
    pub fn checkpoint(&self, accounts: &[AccountId]) -> LedgerCheckpoint {
        let balances = accounts
            .iter()
            .map(|&account| (account, self.balance_of(account)))
            .collect();
        let allowances = accounts
            .iter()
            .flat_map(|&owner| accounts.iter().map(move |&spender| (owner, spender)))
            .map(|pair| (pair, self.allowance(pair.0, pair.1)))
            .collect();

        LedgerCheckpoint {
            owner: self.owner,
            total_supply: self.total_supply,
            balances,
            allowances,
            events_len: self.events.len(),
        }
    }

    /// Undoes everything since `checkpoint`, provided only its accounts were
    /// touched.
    pub fn restore(&mut self, checkpoint: LedgerCheckpoint) {
        self.owner = checkpoint.owner;
        self.total_supply = checkpoint.total_supply;
        for (account, balance) in checkpoint.balances {
            if balance.is_zero() {
                self.balances.remove(&account);
            } else {
                self.balances.insert(account, balance);
            }
        }
        for (pair, allowance) in checkpoint.allowances {
            if allowance.is_zero() {
                self.allowances.remove(&pair);
            } else {
                self.allowances.insert(pair, allowance);
            }
        }
        self.events.truncate(checkpoint.events_len);
    }

    /// Drops all but the newest `keep` log entries.
    pub fn retain_recent_events(&mut self, keep: usize) {
        if self.events.len() > keep {
            let drain_count = self.events.len() - keep;
            self.events.drain(0..drain_count);
        }
    }

    fn require_owner(&self, caller: AccountId) -> Result<(), LedgerError> {
        if caller != self.owner {
            return Err(LedgerError::Unauthorized {
                caller,
                owner: self.owner,
                symbol: self.symbol.clone(),
            });
        }
        Ok(())
    }

    fn move_balance(&mut self, from: AccountId, to: AccountId, amount: Amount) -> Result<(), LedgerError> {
        let available = self.balance_of(from);
        let debited = available
            .checked_sub(amount)
            .ok_or(LedgerError::InsufficientBalance {
                account: from,
                requested: amount,
                available,
            })?;
        self.balances.insert(from, debited);

        let credited = self
            .balance_of(to)
            .checked_add(amount)
            .ok_or(LedgerError::Overflow)?;
        self.balances.insert(to, credited);

        self.events.push(LedgerEvent::Transfer {
            from,
            to,
            value: amount,
        });
        Ok(())
    }
}
