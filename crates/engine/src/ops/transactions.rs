mod list;
mod write;

pub(crate) use list::validate_list_filter;
pub use list::{TransactionListFilter, TransactionRow, TransactionsPage};
