pub mod catalog;
pub mod dispatch;
pub mod network;
pub mod storage;
pub mod util;
