pub mod ledger;

pub use ledger::NotificationLedger;
