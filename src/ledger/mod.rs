pub mod account;
pub mod kind;
pub mod transaction;

// Using named types doesn't provide any compiler help, but it helps a lot with
// readability.
// Consider the following, for a customer's list of accounts:
// (1) owned_account_ids: IndexedList<String>
// (2) owned_account_ids: IndexedList<AccountId>
// Implementation (2) says what the strings are without a comment.
pub type AccountId = String;
pub type Username = String;
