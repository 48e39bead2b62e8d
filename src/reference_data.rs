use serde::Serialize;
use std::collections::HashSet;
use std::fmt;
use crate::error::GeneratorError;

pub const CURRENCY: &str = "IDR";
pub const UNKNOWN_ACCOUNT_NAME: &str = "Unknown Person";

/// Synthesized account numbers are drawn from this range, which keeps them 10 digits wide.
pub const UNKNOWN_ACCOUNT_MIN: u64 = 5_000_000_000;
pub const UNKNOWN_ACCOUNT_MAX: u64 = 9_999_999_999;

const ACCOUNT_NUMBER_WIDTH: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TransactionType {
    Transfer,
    Payment,
    Topup,
    Withdrawal,
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransactionType::Transfer => write!(f, "TRANSFER"),
            TransactionType::Payment => write!(f, "PAYMENT"),
            TransactionType::Topup => write!(f, "TOPUP"),
            TransactionType::Withdrawal => write!(f, "WITHDRAWAL"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransactionLimit {
    pub kind: TransactionType,
    pub min_amount: u64,
    pub max_amount: u64,
}

impl TransactionLimit {
    pub const fn new(kind: TransactionType, min_amount: u64, max_amount: u64) -> Self {
        TransactionLimit { kind, min_amount, max_amount }
    }

    #[cfg(test)]
    pub fn contains(&self, amount: u64) -> bool {
        self.min_amount <= amount && amount <= self.max_amount
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountStatus {
    Active,
    Inactive,
    Blocked,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    pub number: String,
    pub name: String,
    pub bank_code: String,
    pub status: AccountStatus,
}

impl Account {
    pub fn new(number: &str, name: &str, bank_code: &str, status: AccountStatus) -> Self {
        Account {
            number: number.to_string(),
            name: name.to_string(),
            bank_code: bank_code.to_string(),
            status,
        }
    }
}

/// Immutable tables mirroring what the downstream validator is assumed to hold:
/// bank codes, per-type amount limits and the seeded accounts.
///
/// Built once and handed to the row builders by reference. Construction checks
/// every property the builders depend on, so a `ReferenceData` value can always
/// produce each row kind.
#[derive(Debug, Clone)]
pub struct ReferenceData {
    valid_bank_codes: Vec<String>,
    invalid_bank_codes: Vec<String>,
    limits: Vec<TransactionLimit>,
    notes: Vec<String>,
    active: Vec<Account>,
    inactive: Vec<Account>,
    blocked: Vec<Account>,
    seeded_numbers: HashSet<String>,
}

impl ReferenceData {
    pub fn new(
        valid_bank_codes: Vec<String>,
        invalid_bank_codes: Vec<String>,
        limits: Vec<TransactionLimit>,
        accounts: Vec<Account>,
        notes: Vec<String>,
    ) -> Result<Self, GeneratorError> {
        if valid_bank_codes.is_empty() {
            return Err(GeneratorError::reference_data("no valid bank codes"));
        }
        if invalid_bank_codes.is_empty() {
            return Err(GeneratorError::reference_data("no invalid bank codes"));
        }
        if let Some(code) = invalid_bank_codes.iter().find(|code| valid_bank_codes.contains(*code)) {
            return Err(GeneratorError::reference_data(format!(
                "bank code {} is listed as both valid and invalid",
                code
            )));
        }

        if limits.is_empty() {
            return Err(GeneratorError::reference_data("no transaction limits"));
        }
        let mut kinds = HashSet::new();
        for limit in &limits {
            if limit.min_amount > limit.max_amount {
                return Err(GeneratorError::reference_data(format!(
                    "{} limit has minimum {} above maximum {}",
                    limit.kind, limit.min_amount, limit.max_amount
                )));
            }
            if !kinds.insert(limit.kind) {
                return Err(GeneratorError::reference_data(format!("duplicate limit for {}", limit.kind)));
            }
        }

        if notes.is_empty() {
            return Err(GeneratorError::reference_data("no notes"));
        }

        let mut seeded_numbers = HashSet::with_capacity(accounts.len());
        for account in &accounts {
            let well_formed = account.number.len() == ACCOUNT_NUMBER_WIDTH
                && account.number.bytes().all(|b| b.is_ascii_digit());
            if !well_formed {
                return Err(GeneratorError::reference_data(format!(
                    "account number {:?} is not {} digits",
                    account.number, ACCOUNT_NUMBER_WIDTH
                )));
            }
            if !seeded_numbers.insert(account.number.clone()) {
                return Err(GeneratorError::reference_data(format!(
                    "duplicate account number {}",
                    account.number
                )));
            }
        }

        let by_status = |status: AccountStatus| -> Vec<Account> {
            accounts.iter().filter(|a| a.status == status).cloned().collect()
        };
        let active = by_status(AccountStatus::Active);
        let inactive = by_status(AccountStatus::Inactive);
        let blocked = by_status(AccountStatus::Blocked);

        // Valid rows need two distinct active accounts.
        if active.len() < 2 {
            return Err(GeneratorError::reference_data("at least two ACTIVE accounts are required"));
        }
        if inactive.is_empty() {
            return Err(GeneratorError::reference_data("at least one INACTIVE account is required"));
        }
        if blocked.is_empty() {
            return Err(GeneratorError::reference_data("at least one BLOCKED account is required"));
        }

        Ok(ReferenceData {
            valid_bank_codes,
            invalid_bank_codes,
            limits,
            notes,
            active,
            inactive,
            blocked,
            seeded_numbers,
        })
    }

    /// The mirrored copy of the validator's mock configuration and seeded accounts.
    pub fn seeded() -> Result<Self, GeneratorError> {
        let valid_bank_codes = [
            "BCA", "BNI", "BRI", "MANDIRI", "CIMB", "DANAMON", "PERMATA", "BTN", "BSI", "OCBC",
        ];
        let invalid_bank_codes = ["XENDIT", "GOPAY", "OVO", "DANA", "FAKE_BANK"];

        let limits = vec![
            TransactionLimit::new(TransactionType::Transfer, 10_000, 1_000_000_000),
            TransactionLimit::new(TransactionType::Payment, 1_000, 500_000_000),
            TransactionLimit::new(TransactionType::Topup, 10_000, 50_000_000),
            TransactionLimit::new(TransactionType::Withdrawal, 50_000, 20_000_000),
        ];

        use AccountStatus::*;
        let accounts = vec![
            Account::new("1234567890", "Budi Santoso", "BCA", Active),
            Account::new("0987654321", "Siti Rahayu", "BNI", Active),
            Account::new("1122334455", "Ahmad Fauzi", "BRI", Active),
            Account::new("5544332211", "Dewi Lestari", "MANDIRI", Active),
            Account::new("6677889900", "Rudi Hermawan", "CIMB", Inactive),
            Account::new("9900112233", "Rina Kusuma", "DANAMON", Active),
            Account::new("3344556677", "Hendra Gunawan", "PERMATA", Blocked),
            Account::new("7788990011", "Yuni Astuti", "BTN", Active),
            Account::new("2233445566", "Fajar Nugroho", "BSI", Active),
            Account::new("4455667788", "Indah Permata", "OCBC", Active),
            Account::new("1357924680", "Wahyu Prasetyo", "BCA", Active),
            Account::new("2468013579", "Maya Sari", "BRI", Active),
            Account::new("1111222233", "Doni Kurniawan", "MANDIRI", Active),
            Account::new("4444555566", "Lina Marlina", "BNI", Inactive),
            Account::new("7777888899", "Agus Salim", "BSI", Active),
        ];

        // Empty entries weight the pool towards rows without a note.
        let notes = [
            "Monthly salary",
            "Invoice #4521",
            "Gift transfer",
            "Loan repayment",
            "School fees",
            "Business payment",
            "Online purchase",
            "Utility bill",
            "Insurance premium",
            "Subscription renewal",
            "",
            "",
            "",
        ];

        ReferenceData::new(
            valid_bank_codes.iter().map(|s| s.to_string()).collect(),
            invalid_bank_codes.iter().map(|s| s.to_string()).collect(),
            limits,
            accounts,
            notes.iter().map(|s| s.to_string()).collect(),
        )
    }

    pub fn valid_bank_codes(&self) -> &[String] {
        &self.valid_bank_codes
    }

    pub fn invalid_bank_codes(&self) -> &[String] {
        &self.invalid_bank_codes
    }

    pub fn limits(&self) -> &[TransactionLimit] {
        &self.limits
    }

    pub fn notes(&self) -> &[String] {
        &self.notes
    }

    pub fn accounts_with_status(&self, status: AccountStatus) -> &[Account] {
        match status {
            AccountStatus::Active => &self.active,
            AccountStatus::Inactive => &self.inactive,
            AccountStatus::Blocked => &self.blocked,
        }
    }

    pub fn is_seeded_account(&self, number: &str) -> bool {
        self.seeded_numbers.contains(number)
    }

    #[cfg(test)]
    pub fn account(&self, number: &str) -> Option<&Account> {
        self.active
            .iter()
            .chain(&self.inactive)
            .chain(&self.blocked)
            .find(|a| a.number == number)
    }

    #[cfg(test)]
    pub fn limit(&self, kind: TransactionType) -> Option<&TransactionLimit> {
        self.limits.iter().find(|l| l.kind == kind)
    }
}
