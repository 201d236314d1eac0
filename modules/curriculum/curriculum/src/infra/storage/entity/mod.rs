pub mod credit_transaction;
pub mod group;
pub mod permission;
pub mod question;
pub mod taxonomy;
pub mod test_question;
pub mod user;
pub mod user_credit;
pub mod user_group;
pub mod user_permission;
