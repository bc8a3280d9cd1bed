use std::{cell::Cell, fmt, future::Future, rc::Rc};

/// Handle of a running subscription or repeating task.
///
/// The teardown runs exactly once, either through [`Subscription::unsubscribe`]
/// or when the handle is dropped.
pub struct Subscription {
    teardown: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    pub fn new(teardown: impl FnOnce() + 'static) -> Self {
        Self {
            teardown: Some(Box::new(teardown)),
        }
    }

    pub fn unsubscribe(mut self) {
        self.run_teardown();
    }

    fn run_teardown(&mut self) {
        if let Some(teardown) = self.teardown.take() {
            teardown();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.run_teardown();
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.teardown.is_some())
            .finish()
    }
}

/// Shared flag telling in-flight work that its owner went away.
#[derive(Clone, Default, Debug)]
pub struct Cancellation(Rc<Cell<bool>>);

impl Cancellation {
    pub fn cancel(&self) {
        self.0.set(true);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.get()
    }

    /// Subscription that cancels this flag before running `teardown`.
    pub fn guard(&self, teardown: impl FnOnce() + 'static) -> Subscription {
        let cancellation = self.clone();
        Subscription::new(move || {
            cancellation.cancel();
            teardown();
        })
    }

    /// Awaits `work` and hands its output to `deliver`, unless the flag was
    /// cancelled in the meantime. Returns whether it was delivered.
    pub async fn complete<T>(
        &self,
        work: impl Future<Output = T>,
        deliver: impl FnOnce(T),
    ) -> bool {
        let output = work.await;
        if self.is_cancelled() {
            return false;
        }
        deliver(output);
        true
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use futures::executor::block_on;

    #[test]
    pub fn drop_runs_teardown_once() {
        let count = Rc::new(Cell::new(0));
        let counter = count.clone();
        {
            let _subscription = Subscription::new(move || counter.set(counter.get() + 1));
        }
        assert_eq!(count.get(), 1);
    }

    #[test]
    pub fn explicit_unsubscribe_runs_teardown_once() {
        let count = Rc::new(Cell::new(0));
        let counter = count.clone();
        let subscription = Subscription::new(move || counter.set(counter.get() + 1));
        subscription.unsubscribe();
        assert_eq!(count.get(), 1);
    }

    #[test]
    pub fn guard_cancels_in_flight_work() {
        let cancellation = Cancellation::default();
        let in_flight = cancellation.clone();
        let subscription = cancellation.guard(|| ());

        assert!(!in_flight.is_cancelled());
        drop(subscription);
        assert!(in_flight.is_cancelled());
    }

    #[test]
    pub fn completed_work_is_delivered() {
        let cancellation = Cancellation::default();
        let delivered = Cell::new(None);

        let done = block_on(cancellation.complete(async { 0.27 }, |ear| {
            delivered.set(Some(ear))
        }));

        assert!(done);
        assert_eq!(delivered.get(), Some(0.27));
    }

    #[test]
    pub fn work_finishing_after_teardown_is_dropped() {
        let cancellation = Cancellation::default();
        let subscription = cancellation.guard(|| ());
        let delivered = Cell::new(false);

        let work = async move {
            // owner unmounts while the request is outstanding
            drop(subscription);
            true
        };
        let done = block_on(cancellation.complete(work, |value| delivered.set(value)));

        assert!(!done);
        assert!(!delivered.get());
    }
}
