pub mod ask;
pub mod chat;
pub mod dispatch;
pub mod rca;
pub mod schema;
pub mod shared;
