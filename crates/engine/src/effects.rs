//! Balance effects of transactions.
//!
//! A [`BalanceEffect`] is the set of signed wallet deltas a transaction
//! causes. A [`BalanceSheet`] stages those deltas over wallet balances read
//! inside the current database transaction; callers persist the staged
//! balances only once every step succeeded.
//!
//! Sign convention:
//! - `Income`: +amount on the primary wallet
//! - `Expense`: -amount on the primary wallet
//! - `Transfer`: -amount on the primary wallet, +amount on the internal wallet
//!   when the counterparty is one

use std::collections::HashMap;

use uuid::Uuid;

use crate::{Counterparty, EngineError, Money, ResultEngine, Transaction, TransactionKind};

pub(crate) const NOT_ENOUGH_BALANCE: &str = "Not enough balance";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BalanceEffect {
    primary: (Uuid, Money),
    internal: Option<(Uuid, Money)>,
    debit: bool,
}

impl BalanceEffect {
    pub fn of(
        wallet_id: Uuid,
        kind: TransactionKind,
        amount: Money,
        counterparty: Counterparty,
    ) -> Self {
        let primary_delta = if kind.is_debit() { -amount } else { amount };
        Self {
            primary: (wallet_id, primary_delta),
            internal: counterparty
                .internal_wallet()
                .map(|internal_id| (internal_id, -primary_delta)),
            debit: kind.is_debit(),
        }
    }

    pub fn from_transaction(tx: &Transaction) -> Self {
        Self::of(tx.wallet_id, tx.kind, tx.amount, tx.counterparty)
    }

    /// The effect that undoes this one.
    #[must_use]
    pub fn inverse(self) -> Self {
        Self {
            primary: (self.primary.0, -self.primary.1),
            internal: self.internal.map(|(id, delta)| (id, -delta)),
            debit: !self.debit,
        }
    }

    /// Whether the primary wallet goes down.
    pub fn debits_primary(&self) -> bool {
        self.debit
    }

    pub fn primary_wallet(&self) -> Uuid {
        self.primary.0
    }

    pub fn deltas(&self) -> impl Iterator<Item = (Uuid, Money)> + '_ {
        std::iter::once(self.primary).chain(self.internal)
    }

    pub fn wallet_ids(&self) -> impl Iterator<Item = Uuid> + '_ {
        self.deltas().map(|(id, _)| id)
    }
}

/// Staged wallet balances for one atomic unit.
#[derive(Clone, Debug, Default)]
pub struct BalanceSheet {
    balances: HashMap<Uuid, Money>,
}

impl BalanceSheet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the current balance of a wallet. Already staged wallets keep
    /// their staged value.
    pub fn load(&mut self, wallet_id: Uuid, balance: Money) {
        self.balances.entry(wallet_id).or_insert(balance);
    }

    pub fn contains(&self, wallet_id: Uuid) -> bool {
        self.balances.contains_key(&wallet_id)
    }

    pub fn balance(&self, wallet_id: Uuid) -> Option<Money> {
        self.balances.get(&wallet_id).copied()
    }

    /// Stages `effect` after checking the debit precondition against the
    /// staged primary balance.
    pub fn apply(&mut self, effect: &BalanceEffect) -> ResultEngine<()> {
        let (primary_id, delta) = effect.primary;
        let current = self.require(primary_id)?;
        if effect.debits_primary() && -delta > current {
            return Err(EngineError::InsufficientFunds(
                NOT_ENOUGH_BALANCE.to_string(),
            ));
        }
        self.stage(effect)
    }

    /// Stages the inverse of `effect`. Never checks sufficiency.
    pub fn reverse(&mut self, effect: &BalanceEffect) -> ResultEngine<()> {
        self.stage(&effect.inverse())
    }

    pub fn iter(&self) -> impl Iterator<Item = (Uuid, Money)> + '_ {
        self.balances.iter().map(|(id, balance)| (*id, *balance))
    }

    fn require(&self, wallet_id: Uuid) -> ResultEngine<Money> {
        self.balance(wallet_id)
            .ok_or_else(|| EngineError::KeyNotFound("wallet not exists".to_string()))
    }

    fn stage(&mut self, effect: &BalanceEffect) -> ResultEngine<()> {
        let mut next = Vec::with_capacity(2);
        for (wallet_id, delta) in effect.deltas() {
            let current = self.require(wallet_id)?;
            let updated = current
                .checked_add(delta)
                .ok_or_else(|| EngineError::Validation("balance overflow".to_string()))?;
            next.push((wallet_id, updated));
        }
        self.balances.extend(next);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    fn money(value: rust_decimal::Decimal) -> Money {
        Money::new(value)
    }

    fn sheet(entries: &[(Uuid, Money)]) -> BalanceSheet {
        let mut sheet = BalanceSheet::new();
        for (id, balance) in entries {
            sheet.load(*id, *balance);
        }
        sheet
    }

    #[test]
    fn sign_convention() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let amount = money(dec!(10));

        let income = BalanceEffect::of(a, TransactionKind::Income, amount, Counterparty::None);
        assert_eq!(income.deltas().collect::<Vec<_>>(), vec![(a, amount)]);
        assert!(!income.debits_primary());

        let expense = BalanceEffect::of(
            a,
            TransactionKind::Expense,
            amount,
            Counterparty::Recipient(b),
        );
        assert_eq!(expense.deltas().collect::<Vec<_>>(), vec![(a, -amount)]);

        let transfer =
            BalanceEffect::of(a, TransactionKind::Transfer, amount, Counterparty::Wallet(b));
        assert_eq!(
            transfer.deltas().collect::<Vec<_>>(),
            vec![(a, -amount), (b, amount)]
        );
        assert!(transfer.debits_primary());
    }

    #[test]
    fn internal_transfer_conserves_total() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let mut sheet = sheet(&[(a, money(dec!(50000))), (b, money(dec!(50000)))]);
        let effect = BalanceEffect::of(
            a,
            TransactionKind::Transfer,
            money(dec!(5000)),
            Counterparty::Wallet(b),
        );

        sheet.apply(&effect).unwrap();
        assert_eq!(sheet.balance(a), Some(money(dec!(45000))));
        assert_eq!(sheet.balance(b), Some(money(dec!(55000))));

        sheet.reverse(&effect).unwrap();
        assert_eq!(sheet.balance(a), Some(money(dec!(50000))));
        assert_eq!(sheet.balance(b), Some(money(dec!(50000))));
    }

    #[test]
    fn debit_may_drain_to_zero_but_not_below() {
        let a = Uuid::new_v4();
        let mut sheet = sheet(&[(a, money(dec!(100.50)))]);

        let too_much = BalanceEffect::of(
            a,
            TransactionKind::Expense,
            money(dec!(100.51)),
            Counterparty::None,
        );
        assert_eq!(
            sheet.apply(&too_much),
            Err(EngineError::InsufficientFunds(
                NOT_ENOUGH_BALANCE.to_string()
            ))
        );
        assert_eq!(sheet.balance(a), Some(money(dec!(100.50))));

        let exact = BalanceEffect::of(
            a,
            TransactionKind::Expense,
            money(dec!(100.50)),
            Counterparty::None,
        );
        sheet.apply(&exact).unwrap();
        assert_eq!(sheet.balance(a), Some(Money::ZERO));
    }

    #[test]
    fn reverse_never_checks_balance() {
        let a = Uuid::new_v4();
        let mut sheet = sheet(&[(a, money(dec!(5)))]);
        let income = BalanceEffect::of(
            a,
            TransactionKind::Income,
            money(dec!(20)),
            Counterparty::None,
        );

        sheet.reverse(&income).unwrap();
        assert_eq!(sheet.balance(a), Some(money(dec!(-15))));
    }

    #[test]
    fn reverse_then_apply_sees_released_funds() {
        let a = Uuid::new_v4();
        let mut sheet = sheet(&[(a, money(dec!(0)))]);
        let stored = BalanceEffect::of(
            a,
            TransactionKind::Expense,
            money(dec!(30)),
            Counterparty::None,
        );
        let edited = BalanceEffect::of(
            a,
            TransactionKind::Expense,
            money(dec!(25)),
            Counterparty::None,
        );

        sheet.reverse(&stored).unwrap();
        sheet.apply(&edited).unwrap();
        assert_eq!(sheet.balance(a), Some(money(dec!(5))));
    }

    #[test]
    fn unknown_wallet_is_not_found() {
        let mut sheet = BalanceSheet::new();
        let effect = BalanceEffect::of(
            Uuid::new_v4(),
            TransactionKind::Income,
            money(dec!(1)),
            Counterparty::None,
        );
        assert!(matches!(
            sheet.apply(&effect),
            Err(EngineError::KeyNotFound(_))
        ));
    }
}
