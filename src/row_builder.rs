use log::{trace, warn};
use rand::distributions::{Distribution, WeightedIndex};
use rand::seq::index;
use rand::Rng;
use serde::Serialize;
use std::fmt;
use crate::error::GeneratorError;
use crate::reference_data::{
    Account, AccountStatus, ReferenceData, TransactionLimit, TransactionType, CURRENCY,
    UNKNOWN_ACCOUNT_MAX, UNKNOWN_ACCOUNT_MIN, UNKNOWN_ACCOUNT_NAME,
};

/// One output record. Field order matches the CSV header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransactionRow {
    pub reference_id: String,
    pub source_account: String,
    pub source_account_name: String,
    pub source_bank_code: String,
    pub beneficiary_account: String,
    pub beneficiary_account_name: String,
    pub beneficiary_bank_code: String,
    pub currency: String,
    pub amount: u64,
    pub transaction_type: TransactionType,
    pub note: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RowKind {
    Valid,
    InvalidBankCode,
    InactiveAccount,
    BlockedAccount,
    UnknownAccount,
    BelowMinimumAmount,
}

impl fmt::Display for RowKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RowKind::Valid => write!(f, "valid"),
            RowKind::InvalidBankCode => write!(f, "invalid_bank_code"),
            RowKind::InactiveAccount => write!(f, "inactive_account"),
            RowKind::BlockedAccount => write!(f, "blocked_account"),
            RowKind::UnknownAccount => write!(f, "unknown_account"),
            RowKind::BelowMinimumAmount => write!(f, "below_minimum_amount"),
        }
    }
}

/// Invalid categories and their share of the invalid rows. Weights sum to 1.0.
pub const INVALID_CATEGORIES: [(RowKind, f64); 5] = [
    (RowKind::InvalidBankCode, 0.30),
    (RowKind::InactiveAccount, 0.25),
    (RowKind::BlockedAccount, 0.15),
    (RowKind::UnknownAccount, 0.20),
    (RowKind::BelowMinimumAmount, 0.10),
];

pub fn reference_id(index: u64) -> String {
    format!("TRX-{:07}", index)
}

/// Uniform amount within the limit, bounds inclusive.
pub fn valid_amount<R: Rng>(rng: &mut R, limit: &TransactionLimit) -> u64 {
    rng.gen_range(limit.min_amount..=limit.max_amount)
}

/// Uniform amount in `[1, min - 1]`. A minimum of 0 or 1 leaves no such
/// amount, in which case 0 is returned.
pub fn below_minimum_amount<R: Rng>(rng: &mut R, limit: &TransactionLimit) -> u64 {
    if limit.min_amount <= 1 {
        return 0;
    }
    rng.gen_range(1..limit.min_amount)
}

/// A 10-digit account number that is not in the seeded set.
pub fn unknown_account_number<R: Rng>(rng: &mut R, reference: &ReferenceData) -> String {
    loop {
        let number = rng.gen_range(UNKNOWN_ACCOUNT_MIN..=UNKNOWN_ACCOUNT_MAX).to_string();
        if !reference.is_seeded_account(&number) {
            return number;
        }
    }
}

// Every table handed out by ReferenceData is non-empty.
fn pick<'a, T, R: Rng>(rng: &mut R, items: &'a [T]) -> &'a T {
    &items[rng.gen_range(0..items.len())]
}

fn pick_distinct_pair<'a, R: Rng>(rng: &mut R, accounts: &'a [Account]) -> (&'a Account, &'a Account) {
    let picked = index::sample(rng, accounts.len(), 2);
    (&accounts[picked.index(0)], &accounts[picked.index(1)])
}

struct Party<'a> {
    number: &'a str,
    name: &'a str,
    bank_code: &'a str,
}

impl<'a> From<&'a Account> for Party<'a> {
    fn from(account: &'a Account) -> Self {
        Party {
            number: &account.number,
            name: &account.name,
            bank_code: &account.bank_code,
        }
    }
}

fn assemble<R: Rng>(
    rng: &mut R,
    reference: &ReferenceData,
    index: u64,
    source: Party<'_>,
    beneficiary: Party<'_>,
    limit: &TransactionLimit,
    amount: u64,
) -> TransactionRow {
    TransactionRow {
        reference_id: reference_id(index),
        source_account: source.number.to_string(),
        source_account_name: source.name.to_string(),
        source_bank_code: source.bank_code.to_string(),
        beneficiary_account: beneficiary.number.to_string(),
        beneficiary_account_name: beneficiary.name.to_string(),
        beneficiary_bank_code: beneficiary.bank_code.to_string(),
        currency: CURRENCY.to_string(),
        amount,
        transaction_type: limit.kind,
        note: pick(rng, reference.notes()).clone(),
    }
}

/// Orders a bad and a good party into (source, beneficiary), bad side chosen uniformly.
fn place<'a, R: Rng>(rng: &mut R, bad: Party<'a>, good: Party<'a>) -> (Party<'a>, Party<'a>) {
    if rng.gen_bool(0.5) { (bad, good) } else { (good, bad) }
}

pub fn build_row<R: Rng>(rng: &mut R, reference: &ReferenceData, kind: RowKind, index: u64) -> TransactionRow {
    match kind {
        RowKind::Valid => build_valid_row(rng, reference, index),
        RowKind::InvalidBankCode => build_invalid_bank_code_row(rng, reference, index),
        RowKind::InactiveAccount => build_status_row(rng, reference, AccountStatus::Inactive, index),
        RowKind::BlockedAccount => build_status_row(rng, reference, AccountStatus::Blocked, index),
        RowKind::UnknownAccount => build_unknown_account_row(rng, reference, index),
        RowKind::BelowMinimumAmount => build_below_minimum_amount_row(rng, reference, index),
    }
}

fn build_valid_row<R: Rng>(rng: &mut R, reference: &ReferenceData, index: u64) -> TransactionRow {
    let limit = pick(rng, reference.limits());
    let (source, beneficiary) = pick_distinct_pair(rng, reference.accounts_with_status(AccountStatus::Active));
    let amount = valid_amount(rng, limit);
    assemble(rng, reference, index, source.into(), beneficiary.into(), limit, amount)
}

fn build_invalid_bank_code_row<R: Rng>(rng: &mut R, reference: &ReferenceData, index: u64) -> TransactionRow {
    let limit = pick(rng, reference.limits());
    let active = reference.accounts_with_status(AccountStatus::Active);
    let source_account = pick(rng, active);
    let beneficiary_account = pick(rng, active);
    let amount = valid_amount(rng, limit);

    let mut source = Party::from(source_account);
    let mut beneficiary = Party::from(beneficiary_account);
    // 0: source only, 1: beneficiary only, 2: both
    let corrupted = rng.gen_range(0..3);
    if corrupted != 1 {
        source.bank_code = pick(rng, reference.invalid_bank_codes()).as_str();
    }
    if corrupted != 0 {
        beneficiary.bank_code = pick(rng, reference.invalid_bank_codes()).as_str();
    }
    assemble(rng, reference, index, source, beneficiary, limit, amount)
}

fn build_status_row<R: Rng>(
    rng: &mut R,
    reference: &ReferenceData,
    status: AccountStatus,
    index: u64,
) -> TransactionRow {
    let limit = pick(rng, reference.limits());
    let amount = valid_amount(rng, limit);
    let bad = pick(rng, reference.accounts_with_status(status));
    let good = pick(rng, reference.accounts_with_status(AccountStatus::Active));
    let (source, beneficiary) = place(rng, bad.into(), good.into());
    assemble(rng, reference, index, source, beneficiary, limit, amount)
}

fn build_unknown_account_row<R: Rng>(rng: &mut R, reference: &ReferenceData, index: u64) -> TransactionRow {
    let limit = pick(rng, reference.limits());
    let amount = valid_amount(rng, limit);
    let good = pick(rng, reference.accounts_with_status(AccountStatus::Active));
    let unknown_number = unknown_account_number(rng, reference);
    let unknown = Party {
        number: &unknown_number,
        name: UNKNOWN_ACCOUNT_NAME,
        bank_code: pick(rng, reference.valid_bank_codes()).as_str(),
    };
    let (source, beneficiary) = place(rng, unknown, good.into());
    assemble(rng, reference, index, source, beneficiary, limit, amount)
}

fn build_below_minimum_amount_row<R: Rng>(rng: &mut R, reference: &ReferenceData, index: u64) -> TransactionRow {
    let limit = pick(rng, reference.limits());
    let (source, beneficiary) = pick_distinct_pair(rng, reference.accounts_with_status(AccountStatus::Active));
    let amount = below_minimum_amount(rng, limit);
    assemble(rng, reference, index, source.into(), beneficiary.into(), limit, amount)
}

/// Clamps the invalid rate into `[0, 1]`; NaN counts as 0.
pub fn clamp_rate(rate: f64) -> f64 {
    if rate.is_nan() {
        return 0.0;
    }
    rate.clamp(0.0, 1.0)
}

/// Decides, per row, between the valid builder and one of the invalid categories.
#[derive(Debug, Clone)]
pub struct RowSelector {
    invalid_rate: f64,
    categories: WeightedIndex<f64>,
}

impl RowSelector {
    pub fn new(invalid_rate: f64) -> Result<Self, GeneratorError> {
        let clamped = clamp_rate(invalid_rate);
        if clamped != invalid_rate {
            warn!("Invalid rate {} is outside [0, 1], using {}", invalid_rate, clamped);
        }
        let categories = WeightedIndex::new(INVALID_CATEGORIES.iter().map(|(_, weight)| *weight))?;
        Ok(RowSelector { invalid_rate: clamped, categories })
    }

    pub fn invalid_rate(&self) -> f64 {
        self.invalid_rate
    }

    pub fn select<R: Rng>(&self, rng: &mut R) -> RowKind {
        let draw: f64 = rng.gen_range(0.0..1.0);
        let kind = if draw < self.invalid_rate {
            INVALID_CATEGORIES[self.categories.sample(rng)].0
        } else {
            RowKind::Valid
        };
        trace!("Selected {} row (draw {:.4})", kind, draw);
        kind
    }
}
