//! Redis-based key-value store implementation.

use ::redis::{Client, Connection, IntoConnectionInfo, RedisError};
use parking_lot::Mutex;
use tracing::{debug, trace};

use crate::{KVError, KVResult, KVStore};

/// Number of keys requested per SCAN round trip.
const SCAN_COUNT: usize = 500;

/// A key-value store backed by a single Redis connection.
///
/// The connection is shared by every caller holding this store; commands
/// are serialized through a mutex.
pub struct RedisStore {
    conn: Mutex<Connection>,
}

impl RedisStore {
    /// Connect using a URL (`redis://[:password@]host:port/db`) or any
    /// other connection info the redis client understands.
    pub fn open<T: IntoConnectionInfo>(info: T) -> KVResult<Self> {
        let client = Client::open(info)?;
        Self::from_client(&client)
    }

    /// Open a new connection from an existing client.
    pub fn from_client(client: &Client) -> KVResult<Self> {
        let info = client.get_connection_info();
        debug!("Connecting to redis at {} (db={})", info.addr, info.redis.db);
        let conn = client.get_connection()?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Round-trip a PING to check the connection is alive.
    pub fn ping(&self) -> KVResult<()> {
        let mut conn = self.conn.lock();
        let _: String = ::redis::cmd("PING").query(&mut *conn)?;
        Ok(())
    }
}

impl KVStore for RedisStore {
    fn get(&self, key: &str) -> KVResult<Option<Vec<u8>>> {
        let mut conn = self.conn.lock();
        let value: Option<Vec<u8>> = ::redis::cmd("GET").arg(key).query(&mut *conn)?;
        Ok(value)
    }

    fn set(&self, key: &str, value: &[u8]) -> KVResult<()> {
        let mut conn = self.conn.lock();
        let _: () = ::redis::cmd("SET").arg(key).arg(value).query(&mut *conn)?;
        Ok(())
    }

    fn delete(&self, key: &str) -> KVResult<bool> {
        let mut conn = self.conn.lock();
        let removed: i64 = ::redis::cmd("DEL").arg(key).query(&mut *conn)?;
        Ok(removed > 0)
    }

    fn keys(&self, prefix: &str) -> KVResult<Vec<String>> {
        let pattern = prefix_pattern(prefix);
        let mut conn = self.conn.lock();

        let mut keys = Vec::new();
        let mut cursor: u64 = 0;
        loop {
            let (next, batch): (u64, Vec<Vec<u8>>) = ::redis::cmd("SCAN")
                .arg(cursor)
                .arg("MATCH")
                .arg(&pattern)
                .arg("COUNT")
                .arg(SCAN_COUNT)
                .query(&mut *conn)?;

            keys.extend(decode_keys(batch));

            if next == 0 {
                break;
            }
            cursor = next;
        }

        trace!("SCAN {} returned {} keys", pattern, keys.len());
        Ok(keys)
    }
}

impl From<RedisError> for KVError {
    fn from(e: RedisError) -> Self {
        if e.is_io_error() || e.is_connection_refusal() || e.is_connection_dropped() || e.is_timeout()
        {
            KVError::Connection(e.to_string())
        } else {
            KVError::Storage(e.to_string())
        }
    }
}

/// Decode a SCAN batch, dropping keys that are not valid UTF-8.
///
/// A lossy conversion would hand back a key that names a different entry
/// than the one stored, so such keys are skipped instead.
fn decode_keys(batch: Vec<Vec<u8>>) -> impl Iterator<Item = String> {
    batch.into_iter().filter_map(|raw| match String::from_utf8(raw) {
        Ok(key) => Some(key),
        Err(err) => {
            trace!("Skipping non-UTF-8 key: {:?}", err.as_bytes());
            None
        }
    })
}

/// Build a glob pattern matching every key that starts with `prefix`.
///
/// Glob metacharacters in the prefix are escaped so a namespace such as
/// `a*` only matches itself.
pub fn prefix_pattern(prefix: &str) -> String {
    let mut pattern = String::with_capacity(prefix.len() + 1);
    for c in prefix.chars() {
        if matches!(c, '*' | '?' | '[' | ']' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('*');
    pattern
}
