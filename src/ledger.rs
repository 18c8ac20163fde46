use std::collections::BTreeMap;

use cosmwasm_std::{coins, Addr, BankMsg, Uint128};

use crate::error::ContractError;

/// Token ledger the name service moves funds through. Debits may fail,
/// credits never do.
pub trait Ledger {
    fn debit(&mut self, account: &Addr, amount: Uint128) -> Result<(), ContractError>;
    fn credit(&mut self, account: &Addr, amount: Uint128);
    /// Takes back an earlier credit while undoing work. The credited funds
    /// are still there, so this never fails.
    fn reverse_credit(&mut self, account: &Addr, amount: Uint128);
}

/// Journals ledger calls for one unit of work. Debits go through to the
/// inner ledger immediately so failures surface at the call site; credits
/// are held back until [`StagedLedger::commit`]. [`StagedLedger::rollback`]
/// returns every debit and drops the held credits.
pub struct StagedLedger<'a> {
    inner: &'a mut dyn Ledger,
    debited: Vec<(Addr, Uint128)>,
    credits: Vec<(Addr, Uint128)>,
}

impl<'a> StagedLedger<'a> {
    pub fn new(inner: &'a mut dyn Ledger) -> Self {
        StagedLedger {
            inner,
            debited: vec![],
            credits: vec![],
        }
    }

    pub fn commit(self) {
        for (account, amount) in self.credits {
            self.inner.credit(&account, amount);
        }
    }

    pub fn rollback(self) {
        for (account, amount) in self.debited.into_iter().rev() {
            self.inner.credit(&account, amount);
        }
    }
}

impl Ledger for StagedLedger<'_> {
    fn debit(&mut self, account: &Addr, amount: Uint128) -> Result<(), ContractError> {
        self.inner.debit(account, amount)?;
        self.debited.push((account.clone(), amount));
        Ok(())
    }

    fn credit(&mut self, account: &Addr, amount: Uint128) {
        self.credits.push((account.clone(), amount));
    }

    fn reverse_credit(&mut self, account: &Addr, amount: Uint128) {
        let mut rest = amount;
        for (held, held_amount) in self.credits.iter_mut().rev() {
            if rest.is_zero() {
                break;
            }
            if held == account {
                let take = rest.min(*held_amount);
                *held_amount -= take;
                rest -= take;
            }
        }
        if !rest.is_zero() {
            self.inner.reverse_credit(account, rest);
            self.debited.push((account.clone(), rest));
        }
    }
}

enum Entry {
    Debit(Addr, Uint128),
    Credit(Addr, Uint128),
}

/// Journals ledger calls for a block of transactions. Unlike
/// [`StagedLedger`], credits reach the inner ledger immediately, so a later
/// transaction can spend what an earlier one was paid.
/// [`JournaledLedger::rollback`] undoes every call, newest first.
pub struct JournaledLedger<'a> {
    inner: &'a mut dyn Ledger,
    journal: Vec<Entry>,
}

impl<'a> JournaledLedger<'a> {
    pub fn new(inner: &'a mut dyn Ledger) -> Self {
        JournaledLedger {
            inner,
            journal: vec![],
        }
    }

    pub fn rollback(self) {
        for entry in self.journal.into_iter().rev() {
            match entry {
                Entry::Debit(account, amount) => self.inner.credit(&account, amount),
                Entry::Credit(account, amount) => self.inner.reverse_credit(&account, amount),
            }
        }
    }
}

impl Ledger for JournaledLedger<'_> {
    fn debit(&mut self, account: &Addr, amount: Uint128) -> Result<(), ContractError> {
        self.inner.debit(account, amount)?;
        self.journal.push(Entry::Debit(account.clone(), amount));
        Ok(())
    }

    fn credit(&mut self, account: &Addr, amount: Uint128) {
        self.inner.credit(account, amount);
        self.journal.push(Entry::Credit(account.clone(), amount));
    }

    fn reverse_credit(&mut self, account: &Addr, amount: Uint128) {
        self.inner.reverse_credit(account, amount);
        self.journal.push(Entry::Debit(account.clone(), amount));
    }
}

/// Bank-module ledger for a single contract call. The caller can only be
/// debited out of the native funds attached to the message; credits become
/// `BankMsg::Send`s paid out of the contract balance.
pub struct FundsLedger {
    payer: Addr,
    denom: String,
    available: Uint128,
    payouts: BTreeMap<Addr, Uint128>,
}

impl FundsLedger {
    pub fn new(payer: Addr, denom: impl Into<String>, attached: Uint128) -> Self {
        FundsLedger {
            payer,
            denom: denom.into(),
            available: attached,
            payouts: BTreeMap::new(),
        }
    }

    /// Payouts sorted by recipient, with unspent attached funds returned to the payer.
    pub fn into_bank_msgs(mut self) -> Vec<BankMsg> {
        if !self.available.is_zero() {
            let payer = self.payer.clone();
            let unspent = self.available;
            self.credit(&payer, unspent);
        }
        let denom = self.denom;
        self.payouts
            .into_iter()
            .filter(|(_, amount)| !amount.is_zero())
            .map(|(to, amount)| BankMsg::Send {
                to_address: to.into_string(),
                amount: coins(amount.u128(), denom.clone()),
            })
            .collect()
    }
}

impl Ledger for FundsLedger {
    fn debit(&mut self, account: &Addr, amount: Uint128) -> Result<(), ContractError> {
        let available = if *account == self.payer {
            self.available
        } else {
            Uint128::zero()
        };
        if available < amount {
            return Err(ContractError::InsufficientFunds {
                needed: amount,
                available,
            });
        }
        self.available = available - amount;
        Ok(())
    }

    fn credit(&mut self, account: &Addr, amount: Uint128) {
        *self.payouts.entry(account.clone()).or_default() += amount;
    }

    fn reverse_credit(&mut self, account: &Addr, amount: Uint128) {
        if let Some(paid) = self.payouts.get_mut(account) {
            *paid = paid.saturating_sub(amount);
        }
    }
}

/// Balance book kept in memory, for running the state machine off-chain.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MemoryLedger {
    balances: BTreeMap<Addr, Uint128>,
}

impl MemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_balances(balances: &[(&str, u128)]) -> Self {
        MemoryLedger {
            balances: balances
                .iter()
                .map(|(addr, amount)| (Addr::unchecked(*addr), Uint128::new(*amount)))
                .collect(),
        }
    }

    pub fn balance(&self, account: &Addr) -> Uint128 {
        self.balances.get(account).copied().unwrap_or_default()
    }
}

impl Ledger for MemoryLedger {
    fn debit(&mut self, account: &Addr, amount: Uint128) -> Result<(), ContractError> {
        let available = self.balance(account);
        if available < amount {
            return Err(ContractError::InsufficientFunds {
                needed: amount,
                available,
            });
        }
        self.balances.insert(account.clone(), available - amount);
        Ok(())
    }

    fn credit(&mut self, account: &Addr, amount: Uint128) {
        *self.balances.entry(account.clone()).or_default() += amount;
    }

    fn reverse_credit(&mut self, account: &Addr, amount: Uint128) {
        let balance = self.balance(account).saturating_sub(amount);
        self.balances.insert(account.clone(), balance);
    }
}
