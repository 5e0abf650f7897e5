//! Command handlers organized by value kind.
//!
//! | Module | Verbs |
//! |--------|-------|
//! | `strings` | GET, SET, RENAME, DEL |
//! | `lists` | LPUSH, LPOP, RPUSH, RPOP, LLEN, LRANGE |
//! | `zsets` | ZADD, ZREM, ZSCORE, ZCARD, ZCOUNT, Z*RANGE*, Z*RANK, ZREMRANGEBYSCORE, ZINTERSTORE, ZUNIONSTORE |
//! | `server` | KEYS, FLUSHALL, INFO_DATASET_MEMORY, SAVE, START |
//!
//! Each handler validates arity, coerces arguments, calls the dataset and
//! shapes the reply. Handlers never touch the queue or the lifecycle;
//! SHUTDOWN is the worker's business.

pub(crate) mod lists;
pub(crate) mod server;
pub(crate) mod strings;
pub(crate) mod zsets;
