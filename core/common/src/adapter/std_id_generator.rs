//! RecordId を生成する IdGenerator の標準実装（Clock + シーケンス + ソルト）
//!
//! 形式: base62(0-9,A-Z,a-z) 13文字 = 時刻部 9文字 + ソルト 4文字。
//! 時刻部 = (ms since 2020-01-01)<<8 | seq(0..255)。同じジェネレータ内では辞書順＝生成順。
//! ソルトはプロセスごとに乱数で決めるので、同じファイルへ追記する別の run と ID が重ならない。

use crate::domain::RecordId;
use crate::ports::outbound::{Clock, IdGenerator};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

const EPOCH_MS: u64 = 1577836800000; // 2020-01-01 00:00:00 UTC
const SEQ_BITS: u64 = 8;
const BASE: u64 = 62;
const TIME_WIDTH: usize = 9;
const SALT_WIDTH: usize = 4;
const SALT_SPACE: u64 = BASE * BASE * BASE * BASE;

/// 0-9, A-Z, a-z の順で辞書順＝数値順になるbase62
const ALPHABET: &[u8; 62] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz";

/// Clock + シーケンス + ソルトで RecordId を生成する標準実装
pub struct StdIdGenerator {
    clock: Arc<dyn Clock>,
    last: AtomicU64,
    salt: String,
}

impl StdIdGenerator {
    /// ソルトを乱数で決める
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self::with_salt(clock, rand::random::<u64>())
    }

    /// ソルトを固定する（同じ時計とソルトなら同じ ID 列になる）
    pub fn with_salt(clock: Arc<dyn Clock>, salt: u64) -> Self {
        Self {
            clock,
            last: AtomicU64::new(0),
            salt: to_base62(salt % SALT_SPACE, SALT_WIDTH),
        }
    }
}

impl IdGenerator for StdIdGenerator {
    fn next_id(&self) -> RecordId {
        let ms_rel = self.clock.now_ms().saturating_sub(EPOCH_MS);
        let base = ms_rel << SEQ_BITS;

        loop {
            let prev = self.last.load(Ordering::SeqCst);
            // 同一 ms で seq が尽きたら ms 部を繰り上げて単調増加を保つ
            let next = if (prev >> SEQ_BITS) < ms_rel { base } else { prev + 1 };
            if self
                .last
                .compare_exchange(prev, next, Ordering::SeqCst, Ordering::SeqCst)
                .is_ok()
            {
                let mut id = to_base62(next, TIME_WIDTH);
                id.push_str(&self.salt);
                return RecordId::new(id);
            }
        }
    }
}

fn to_base62(mut n: u64, width: usize) -> String {
    let mut buf = vec![b'0'; width];
    for slot in buf.iter_mut().rev() {
        *slot = ALPHABET[(n % BASE) as usize];
        n /= BASE;
    }
    buf.into_iter().map(char::from).collect()
}
