//! Shared rate-limit counters
//!
//! `INCR` and `TTL` run in one `MULTI`/`EXEC` transaction so every instance
//! observes a consistent count and expiry for a key.

use super::pool::{RedisPool, is_transport_error};
use crate::core::rate_limiter::{CounterReply, SharedCounterStore};
use crate::utils::error::{GatewayError, Result};
use async_trait::async_trait;
use redis::{Value, from_redis_value};

/// Interpret the `[INCR, TTL]` transaction reply
pub fn parse_counter_reply(values: &[Value]) -> CounterReply {
    let [count, ttl] = values else {
        return CounterReply::Malformed(format!("expected 2 replies, got {}", values.len()));
    };

    let count = match from_redis_value::<i64>(count) {
        Ok(count) => count,
        Err(e) => return CounterReply::Malformed(format!("INCR reply: {}", e)),
    };
    let ttl_secs = match from_redis_value::<i64>(ttl) {
        Ok(ttl) => ttl,
        Err(e) => return CounterReply::Malformed(format!("TTL reply: {}", e)),
    };

    CounterReply::Counted { count, ttl_secs }
}

#[async_trait]
impl SharedCounterStore for RedisPool {
    async fn increment_with_ttl(&self, key: &str) -> Result<CounterReply> {
        let mut pipe = redis::pipe();
        pipe.atomic().incr(key, 1).ttl(key);

        match self.query_pipeline::<Vec<Value>>(&pipe).await {
            Ok(values) => Ok(parse_counter_reply(&values)),
            // The server answered, but not with counters (e.g. WRONGTYPE).
            Err(GatewayError::Redis(e)) if !is_transport_error(&e) => {
                Ok(CounterReply::Malformed(e.to_string()))
            }
            Err(e) => Err(e),
        }
    }

    async fn expire(&self, key: &str, seconds: u64) -> Result<()> {
        let mut cmd = redis::cmd("EXPIRE");
        cmd.arg(key).arg(seconds);
        let _: i64 = self.query_cmd(&cmd).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RedisConfig;
    use crate::core::rate_limiter::{AvailabilityMonitor, CacheState};
    use std::sync::Arc;

    #[test]
    fn test_parse_counted_reply() {
        assert_eq!(
            parse_counter_reply(&[Value::Int(3), Value::Int(57)]),
            CounterReply::Counted { count: 3, ttl_secs: 57 }
        );
        assert_eq!(
            parse_counter_reply(&[Value::Int(1), Value::Int(-1)]),
            CounterReply::Counted { count: 1, ttl_secs: -1 }
        );
    }

    #[test]
    fn test_parse_wrong_arity_is_malformed() {
        assert!(matches!(
            parse_counter_reply(&[Value::Int(1)]),
            CounterReply::Malformed(_)
        ));
        assert!(matches!(parse_counter_reply(&[]), CounterReply::Malformed(_)));
        assert!(matches!(
            parse_counter_reply(&[Value::Int(1), Value::Int(2), Value::Int(3)]),
            CounterReply::Malformed(_)
        ));
    }

    #[test]
    fn test_parse_non_integer_is_malformed() {
        assert!(matches!(
            parse_counter_reply(&[Value::Nil, Value::Int(10)]),
            CounterReply::Malformed(_)
        ));
        assert!(matches!(
            parse_counter_reply(&[Value::Int(1), Value::Array(vec![])]),
            CounterReply::Malformed(_)
        ));
    }

    #[test]
    fn test_no_url_means_no_pool() {
        let monitor = Arc::new(AvailabilityMonitor::disabled());
        let pool = RedisPool::new(&RedisConfig::default(), monitor).unwrap();
        assert!(pool.is_none());
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_marks_unavailable() {
        let config = RedisConfig {
            url: Some("redis://127.0.0.1:1".to_string()),
            connection_timeout_ms: 300,
            ..RedisConfig::default()
        };
        let monitor = Arc::new(AvailabilityMonitor::new(true, config.reconnect_cooldown()));
        let pool = RedisPool::new(&config, monitor.clone()).unwrap().unwrap();
        assert_eq!(monitor.state(), CacheState::Pending);

        assert!(pool.increment_with_ttl("rate_limit:user_x").await.is_err());
        assert_eq!(monitor.state(), CacheState::Unavailable);
        assert!(!monitor.is_available());

        assert!(pool.expire("rate_limit:user_x", 60).await.is_err());
    }
}
