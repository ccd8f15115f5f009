pub mod checkout;
pub mod redirect;
