pub mod borrowers;

pub use borrowers::BorrowersRepo;
