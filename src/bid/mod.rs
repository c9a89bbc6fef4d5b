pub mod history;
pub mod history_pg;
pub mod queue;
pub mod queue_redis;
pub mod repository;
pub mod repository_pg;
pub mod worker;
