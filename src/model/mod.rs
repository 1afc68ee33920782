pub mod agent;
pub mod history;
pub mod queues;
pub mod role;
