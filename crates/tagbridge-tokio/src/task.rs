use std::{future::Future, time::Duration};

use tokio::task::JoinHandle;

/// Spawn onto the runtime the caller is running in
pub fn spawn<T>(fut: T) -> JoinHandle<T::Output>
where
    T: Future + Send + 'static,
    T::Output: Send + 'static,
{
    tokio::runtime::Handle::current().spawn(fut)
}

/// Sleep for `millis`, returns immediately for zero
pub async fn sleep_ms(millis: u64) {
    if millis == 0 {
        return;
    }

    tokio::time::sleep(Duration::from_millis(millis)).await
}
