//! SnapBank Registry - persons and cards
//!
//! Record managers that sit next to the account book. Cards reference both a
//! person and an account, which are checked through a `Directory` when the
//! card is issued.

pub mod card;
pub mod person;

pub use card::{Card, CardBook, CardDetails};
pub use person::{Person, PersonBook};
