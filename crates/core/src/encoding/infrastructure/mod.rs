pub mod sequential_normalize_executor;
pub mod threaded_normalize_executor;

use crate::encoding::normalize_executor::NormalizeExecutor;

use self::sequential_normalize_executor::SequentialNormalizeExecutor;
use self::threaded_normalize_executor::ThreadedNormalizeExecutor;

/// Picks an executor for the requested worker count.
pub fn create_executor(workers: usize, channel_capacity: usize) -> Box<dyn NormalizeExecutor> {
    if workers <= 1 {
        log::debug!("Normalizing frames on the encoding thread");
        Box::new(SequentialNormalizeExecutor)
    } else {
        log::debug!("Normalizing frames on {workers} worker threads");
        Box::new(ThreadedNormalizeExecutor::new(workers, channel_capacity))
    }
}
