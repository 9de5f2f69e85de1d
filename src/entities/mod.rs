// Entity Models
//
// Expense is a plain data holder; Category is the fixed menu it is filed under.

pub mod category;
pub mod expense;

pub use category::Category;
pub use expense::Expense;
