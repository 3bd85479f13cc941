//! Unified-timing mode for a producer thread and a consumer thread.
//!
//! Both halves share one [`Fifo`] behind a mutex held only for the duration of
//! a single operation, so status is never derived from a half-updated pointer
//! pair. Every operation commits fully before the lock is released; a poisoned
//! lock therefore still guards a consistent buffer and is recovered.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::{error::FifoError, fifo::Fifo, status::Status};

pub fn split(fifo: Fifo) -> (Writer, Reader) {
    let inner = Arc::new(Mutex::new(fifo));

    let writer = Writer {
        inner: Arc::clone(&inner),
    };
    let reader = Reader { inner };

    (writer, reader)
}

#[inline]
fn lock(inner: &Mutex<Fifo>) -> MutexGuard<'_, Fifo> {
    inner.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Producer half. Not cloneable: there is exactly one producer.
#[derive(Debug)]
pub struct Writer {
    inner: Arc<Mutex<Fifo>>,
}

impl Writer {
    pub fn try_admit(&self, word: u64) -> Result<(), FifoError> {
        lock(&self.inner).try_admit(word)
    }

    pub fn status(&self) -> Status {
        lock(&self.inner).status()
    }

    pub fn acknowledge_overflow(&self) {
        lock(&self.inner).acknowledge_overflow()
    }

    pub fn capacity(&self) -> usize {
        lock(&self.inner).capacity()
    }

    pub fn reset(&self) {
        lock(&self.inner).reset()
    }
}

/// Consumer half. Not cloneable: there is exactly one consumer.
#[derive(Debug)]
pub struct Reader {
    inner: Arc<Mutex<Fifo>>,
}

impl Reader {
    pub fn try_remove(&self) -> Result<u64, FifoError> {
        lock(&self.inner).try_remove()
    }

    pub fn status(&self) -> Status {
        lock(&self.inner).status()
    }

    pub fn data_out(&self) -> u64 {
        lock(&self.inner).data_out()
    }

    pub fn acknowledge_underflow(&self) {
        lock(&self.inner).acknowledge_underflow()
    }

    pub fn capacity(&self) -> usize {
        lock(&self.inner).capacity()
    }

    pub fn reset(&self) {
        lock(&self.inner).reset()
    }
}

#[cfg(test)]
mod tests {
    use std::thread;

    use crate::config::FifoConfig;
    use crate::error::FifoError;
    use crate::fifo::Fifo;

    const WORDS: u64 = 50_000;

    #[test]
    fn halves_see_the_same_buffer() -> anyhow::Result<()> {
        let (writer, reader) = Fifo::new(&FifoConfig::for_capacity(2)?)?.split();

        writer.try_admit(1)?;
        writer.try_admit(2)?;
        assert_eq!(writer.try_admit(3), Err(FifoError::Overflow(3)));
        assert_eq!(reader.status().overflow, Some(true));
        assert_eq!(reader.status().full, Some(true));

        assert_eq!(reader.try_remove()?, 1);
        assert_eq!(writer.status().occupied, 1);

        writer.acknowledge_overflow();
        assert_eq!(reader.status().overflow, Some(false));

        reader.reset();
        assert_eq!(writer.status().empty, Some(true));
        assert_eq!(writer.capacity(), reader.capacity());

        Ok(())
    }

    #[test]
    fn concurrent_producer_and_consumer_preserve_order() -> anyhow::Result<()> {
        let config = FifoConfig::for_capacity(8)?.with_data_width(32);
        let (writer, reader) = Fifo::new(&config)?.split();

        let producer = thread::spawn(move || {
            let mut next = 0;
            while next < WORDS {
                match writer.try_admit(next) {
                    Ok(()) => next += 1,
                    Err(FifoError::Overflow(_)) => thread::yield_now(),
                    Err(e) => panic!("unexpected {e}"),
                }
                let occupied = writer.status().occupied;
                assert!(occupied <= 8);
            }
        });

        let consumer = thread::spawn(move || {
            let mut expected = 0;
            while expected < WORDS {
                match reader.try_remove() {
                    Ok(word) => {
                        assert_eq!(word, expected);
                        expected += 1;
                    }
                    Err(FifoError::Underflow) => thread::yield_now(),
                    Err(e) => panic!("unexpected {e}"),
                }
                let s = reader.status();
                assert!(s.occupied <= 8);
                assert!(!(s.empty == Some(true) && s.full == Some(true)));
            }
            reader
        });

        producer.join().expect("producer panicked");
        let reader = consumer.join().expect("consumer panicked");

        assert_eq!(reader.status().empty, Some(true));
        Ok(())
    }
}
