//! End-to-end ledger properties over the in-memory and journal stores

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use snapbank_core::{AccountRef, Amount};
use snapbank_ledger::{
    reconstruct_history, Account, AccountBook, Directory, ErrorKind, Namespace, TransferPolicy,
    TransferRequest,
};
use snapbank_store::{
    CommitReceipt, HistoryIter, JournalStore, MemoryStore, RecordStore, StoreError, WriteBatch,
};
use tempfile::TempDir;

/// Every person exists
struct OpenDirectory;

impl Directory for OpenDirectory {
    fn lookup(&self, _namespace: Namespace, _id: &str) -> Result<Vec<u8>, String> {
        Ok(b"{}".to_vec())
    }
}

fn open_book<S: RecordStore>(store: S, accounts: &[(&str, Decimal)]) -> AccountBook<S> {
    let mut book = AccountBook::new(store, TransferPolicy::default());
    for (id, balance) in accounts {
        book.create(&Account::new(*id, "owner", *balance), &OpenDirectory)
            .unwrap();
    }
    book
}

fn transfer(from: &str, to: &str, amount: Decimal) -> TransferRequest {
    TransferRequest::new(
        AccountRef::real(from),
        AccountRef::real(to),
        Amount::new(amount).unwrap(),
    )
}

fn deltas<S: RecordStore>(book: &AccountBook<S>, id: &str) -> Vec<Decimal> {
    book.history(id)
        .unwrap()
        .collect_all()
        .unwrap()
        .into_iter()
        .map(|e| e.delta)
        .collect()
}

#[test]
fn test_issue_transfer_and_history_scenario() {
    let mut book = open_book(MemoryStore::new(), &[("X", dec!(100)), ("Y", dec!(0))]);

    book.transfer(&transfer("X", "Y", dec!(30))).unwrap();
    book.transfer(&transfer("0", "X", dec!(10))).unwrap();

    assert_eq!(book.balance("X").unwrap(), dec!(80));
    assert_eq!(book.balance("Y").unwrap(), dec!(30));
    assert_eq!(deltas(&book, "X"), vec![dec!(100), dec!(-30), dec!(10)]);
    assert_eq!(deltas(&book, "Y"), vec![dec!(0), dec!(30)]);
}

#[test]
fn test_conservation_between_real_accounts() {
    let mut book = open_book(
        MemoryStore::new(),
        &[("A", dec!(500)), ("B", dec!(20)), ("C", dec!(0))],
    );
    let total = |b: &AccountBook<MemoryStore>| -> Decimal {
        ["A", "B", "C"].iter().map(|id| b.balance(id).unwrap()).sum()
    };
    let before = total(&book);

    book.transfer(&transfer("A", "B", dec!(120.25))).unwrap();
    book.transfer(&transfer("B", "C", dec!(140.25))).unwrap();
    book.transfer(&transfer("C", "A", dec!(0.01))).unwrap();

    assert_eq!(total(&book), before);
}

#[test]
fn test_issuance_source_skips_funds_check() {
    let mut book = open_book(MemoryStore::new(), &[("A", dec!(0))]);
    let receipt = book.transfer(&transfer("0", "A", dec!(1000000))).unwrap();
    assert_eq!(receipt.from_balance, None);
    assert_eq!(book.balance("A").unwrap(), dec!(1000000));
    assert!(book.store().get("0").unwrap().is_none());
}

#[test]
fn test_insufficient_funds_changes_nothing() {
    let mut book = open_book(MemoryStore::new(), &[("A", dec!(10)), ("B", dec!(3))]);

    let err = book.transfer(&transfer("A", "B", dec!(10.01))).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InsufficientFunds);
    assert!(err.to_string().contains("A"));

    assert_eq!(book.balance("A").unwrap(), dec!(10));
    assert_eq!(book.balance("B").unwrap(), dec!(3));
    assert_eq!(book.history("A").unwrap().count(), 1);
    assert_eq!(book.history("B").unwrap().count(), 1);
}

#[test]
fn test_unknown_account_is_not_found() {
    let mut book = open_book(MemoryStore::new(), &[("A", dec!(10))]);
    let err = book.transfer(&transfer("ghost", "A", dec!(1))).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert_eq!(book.history("A").unwrap().count(), 1);
}

#[test]
fn test_self_transfer_adds_zero_delta() {
    let mut book = open_book(MemoryStore::new(), &[("A", dec!(40))]);
    book.transfer(&transfer("A", "A", dec!(15))).unwrap();
    assert_eq!(book.balance("A").unwrap(), dec!(40));
    assert_eq!(deltas(&book, "A"), vec![dec!(40), dec!(0)]);
}

#[test]
fn test_self_transfer_still_checks_funds() {
    let mut book = open_book(MemoryStore::new(), &[("A", dec!(5))]);
    let err = book.transfer(&transfer("A", "A", dec!(6))).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InsufficientFunds);
}

#[test]
fn test_zero_transfer_rejected_by_strict_policy() {
    let mut book = AccountBook::new(
        MemoryStore::new(),
        TransferPolicy {
            allow_zero_amount: false,
        },
    );
    book.create(&Account::new("A", "o", dec!(1)), &OpenDirectory)
        .unwrap();
    book.create(&Account::new("B", "o", dec!(1)), &OpenDirectory)
        .unwrap();

    let err = book.transfer(&transfer("A", "B", dec!(0))).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    assert_eq!(book.history("A").unwrap().count(), 1);
}

#[test]
fn test_history_length_matches_snapshots() {
    let mut book = open_book(MemoryStore::new(), &[("A", dec!(50)), ("B", dec!(0))]);
    for _ in 0..4 {
        book.transfer(&transfer("A", "B", dec!(5))).unwrap();
    }
    assert_eq!(book.history("A").unwrap().count(), 5);
    assert_eq!(book.history("B").unwrap().count(), 5);
}

#[test]
fn test_duplicate_create_keeps_first_snapshot() {
    let mut book = open_book(MemoryStore::new(), &[("A", dec!(50))]);
    let err = book
        .create(&Account::new("A", "other", dec!(999)), &OpenDirectory)
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::AlreadyExists);
    assert_eq!(book.read("A").unwrap().owner_id, "owner");
    assert_eq!(book.balance("A").unwrap(), dec!(50));
}

#[test]
fn test_delete_then_recreate_keeps_history() {
    let mut book = open_book(MemoryStore::new(), &[("A", dec!(50))]);
    book.delete("A").unwrap();
    assert_eq!(book.read("A").unwrap_err().kind(), ErrorKind::NotFound);
    assert_eq!(book.delete("A").unwrap_err().kind(), ErrorKind::NotFound);

    book.create(&Account::new("A", "owner", dec!(20)), &OpenDirectory)
        .unwrap();
    assert_eq!(deltas(&book, "A"), vec![dec!(50), dec!(-30)]);
}

#[test]
fn test_corrupt_snapshot_in_history() {
    let mut store = MemoryStore::new();
    store
        .put("A", br#"{"account_number":"A","person_id":"o","balance":"1"}"#.to_vec())
        .unwrap();
    store.put("A", br#"{"balance":"not a number"}"#.to_vec()).unwrap();

    let err = reconstruct_history(&store, "A")
        .unwrap()
        .collect_all()
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::CorruptHistory);
}

/// Store whose history iterator fails after the first modification
struct FlakyStore {
    inner: MemoryStore,
}

impl RecordStore for FlakyStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        self.inner.get(key)
    }

    fn commit(&mut self, batch: WriteBatch) -> Result<CommitReceipt, StoreError> {
        self.inner.commit(batch)
    }

    fn history(&self, key: &str) -> Result<HistoryIter<'_>, StoreError> {
        let iter = self.inner.history(key)?;
        Ok(Box::new(iter.take(1).chain(std::iter::once(Err(
            StoreError::Unavailable("cursor closed".to_string()),
        )))))
    }
}

#[test]
fn test_iteration_error_aborts_history() {
    let mut book = open_book(
        FlakyStore {
            inner: MemoryStore::new(),
        },
        &[("A", dec!(9)), ("B", dec!(0))],
    );
    book.transfer(&transfer("A", "B", dec!(4))).unwrap();

    let mut history = book.history("A").unwrap();
    assert_eq!(history.next().unwrap().unwrap().delta, dec!(9));
    let err = history.next().unwrap().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::StoreIteration);
    assert!(history.next().is_none());

    let err = book.history("A").unwrap().collect_all().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::StoreIteration);
}

#[test]
fn test_journal_backed_book_survives_reopen() {
    let dir = TempDir::new().unwrap();
    {
        let store = JournalStore::open(dir.path()).unwrap();
        let mut book = open_book(store, &[("X", dec!(100)), ("Y", dec!(0))]);
        book.transfer(&transfer("X", "Y", dec!(30))).unwrap();
        book.transfer(&transfer("0", "X", dec!(10))).unwrap();
    }

    let store = JournalStore::open(dir.path()).unwrap();
    let book = AccountBook::new(store, TransferPolicy::default());
    assert_eq!(book.balance("X").unwrap(), dec!(80));
    assert_eq!(deltas(&book, "X"), vec![dec!(100), dec!(-30), dec!(10)]);
    assert_eq!(deltas(&book, "Y"), vec![dec!(0), dec!(30)]);
}
