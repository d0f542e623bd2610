pub mod feedback;
pub mod quote;
pub mod session;
pub mod storage;
