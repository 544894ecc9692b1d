pub mod amortize;
pub mod coach;
pub mod grade;
pub mod loan;
pub mod ownership;
pub mod portfolio;
