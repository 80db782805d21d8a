pub mod call;
pub mod company;
pub mod contact;
