//! Dispatcher - validate, resolve, invoke.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::domain::{ArgumentError, DispatchError, ExecutionRequest, Family, StrategyKey};
use crate::ports::StrategyResolver;
use crate::typed::{Strategy, StrategyRegistry};

type DispatchResult<F> =
    Result<<F as Family>::Output, DispatchError<<F as Family>::Error>>;

/// Dispatcher executes the strategy registered under a key.
///
/// Every call runs the same three steps and stops at the first failure:
/// 1. validate the key (and input presence) -> `InvalidArgument`
/// 2. resolve within the family -> `StrategyNotFound`
/// 3. await the strategy -> its output, or its error as `Implementation`
///
/// Calls are independent of each other; the dispatcher holds no per-call
/// state and can be cloned freely across tasks.
pub struct Dispatcher<R = StrategyRegistry> {
    resolver: Arc<R>,
}

impl<R> Clone for Dispatcher<R> {
    fn clone(&self) -> Self {
        Self {
            resolver: Arc::clone(&self.resolver),
        }
    }
}

impl<R: StrategyResolver> Dispatcher<R> {
    pub fn new(resolver: Arc<R>) -> Self {
        Self { resolver }
    }

    pub fn resolver(&self) -> &R {
        &self.resolver
    }

    /// Run the strategy registered under `key` in family `F` with `input`.
    ///
    /// # Example
    /// ```ignore
    /// let sum = dispatcher.execute::<Arithmetic>("Add", Operands { a: 6, b: 2 }).await?;
    /// assert_eq!(sum, 8);
    /// ```
    pub async fn execute<F: Family>(&self, key: &str, input: F::Input) -> DispatchResult<F> {
        let key = Self::validate_key::<F>(key)?;
        let strategy = self.lookup::<F>(&key)?;
        Self::invoke::<F>(&key, strategy.as_ref(), input).await
    }

    /// Run a request whose input may be absent.
    ///
    /// Both the key and the presence of input are checked before any lookup.
    pub async fn dispatch<F: Family>(&self, request: ExecutionRequest<F::Input>) -> DispatchResult<F> {
        let key = Self::validate_key::<F>(&request.key)?;
        let Some(input) = request.input else {
            tracing::debug!(family = F::NAME, %key, "rejected request without input");
            return Err(ArgumentError::MissingInput.into());
        };
        let strategy = self.lookup::<F>(&key)?;
        Self::invoke::<F>(&key, strategy.as_ref(), input).await
    }

    /// Like [`execute`](Self::execute), but gives up when `cancel` fires.
    ///
    /// Cancelling drops the strategy's future, which is how cancellation
    /// reaches the implementation. The call then returns `Cancelled`.
    pub async fn execute_cancellable<F: Family>(
        &self,
        key: &str,
        input: F::Input,
        cancel: &CancellationToken,
    ) -> DispatchResult<F> {
        let key = Self::validate_key::<F>(key)?;
        let strategy = self.lookup::<F>(&key)?;

        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                tracing::debug!(family = F::NAME, %key, "dispatch cancelled");
                Err(DispatchError::Cancelled {
                    family: F::NAME,
                    key: key.to_string(),
                })
            }
            result = Self::invoke::<F>(&key, strategy.as_ref(), input) => result,
        }
    }

    fn validate_key<F: Family>(key: &str) -> Result<StrategyKey, DispatchError<F::Error>> {
        StrategyKey::parse(key).map_err(|err| {
            tracing::debug!(family = F::NAME, key, error = %err, "rejected strategy key");
            DispatchError::from(err)
        })
    }

    fn lookup<F: Family>(
        &self,
        key: &StrategyKey,
    ) -> Result<Arc<dyn Strategy<F>>, DispatchError<F::Error>> {
        self.resolver.resolve::<F>(key).ok_or_else(|| {
            tracing::debug!(family = F::NAME, %key, "strategy not found");
            DispatchError::StrategyNotFound {
                family: F::NAME,
                key: key.to_string(),
            }
        })
    }

    async fn invoke<F: Family>(
        key: &StrategyKey,
        strategy: &dyn Strategy<F>,
        input: F::Input,
    ) -> DispatchResult<F> {
        let output = strategy
            .execute(input)
            .await
            .map_err(DispatchError::Implementation)?;
        tracing::trace!(family = F::NAME, %key, "strategy completed");
        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ErrorKind, KeyError};
    use crate::test_support::{Add, Arithmetic, ArithmeticError, Comparison, Max, Operands, Sub};
    use crate::typed::strategy_fn;
    use rstest::rstest;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::time::Duration;

    /// Counts lookups so tests can prove resolution never happened.
    struct SpyResolver {
        inner: StrategyRegistry,
        calls: AtomicUsize,
    }

    impl SpyResolver {
        fn new(inner: StrategyRegistry) -> Self {
            Self {
                inner,
                calls: AtomicUsize::new(0),
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl StrategyResolver for SpyResolver {
        fn resolve<F: Family>(&self, key: &StrategyKey) -> Option<Arc<dyn Strategy<F>>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.inner.resolve::<F>(key.as_str())
        }
    }

    fn registry() -> StrategyRegistry {
        let mut registry = StrategyRegistry::new();
        registry.register::<Arithmetic, _>("Add", Add).unwrap();
        registry.register::<Arithmetic, _>("Sub", Sub).unwrap();
        registry
    }

    fn dispatcher() -> Dispatcher {
        Dispatcher::new(Arc::new(registry()))
    }

    #[rstest]
    #[case::add("Add", 8)]
    #[case::sub("Sub", 4)]
    #[tokio::test]
    async fn executes_registered_strategy(#[case] key: &str, #[case] expected: i64) {
        let out = dispatcher()
            .execute::<Arithmetic>(key, Operands::new(6, 2))
            .await
            .unwrap();
        assert_eq!(out, expected);
    }

    #[tokio::test]
    async fn result_matches_direct_invocation() {
        let dispatcher = dispatcher();
        for (a, b) in [(0, 0), (-5, 3), (i64::MAX, -1), (17, 17)] {
            let input = Operands::new(a, b);
            let direct = Sub.execute(input).await;
            let dispatched = dispatcher.execute::<Arithmetic>("Sub", input).await;
            assert_eq!(
                dispatched.map_err(|e| e.kind()),
                direct.map_err(|_| ErrorKind::ImplementationFailure)
            );
        }
    }

    #[rstest]
    #[case::unknown("Mul")]
    #[case::wrong_case("ADD")]
    #[case::trailing_space("Add ")]
    #[tokio::test]
    async fn unregistered_key_is_not_found(#[case] key: &str) {
        let err = dispatcher()
            .execute::<Arithmetic>(key, Operands::new(6, 2))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            DispatchError::StrategyNotFound { family: "arithmetic", key: ref missing } if missing == key
        ));
    }

    #[rstest]
    #[case::empty("", KeyError::Empty)]
    #[case::space(" ", KeyError::Blank)]
    #[case::mixed_whitespace(" \t\n", KeyError::Blank)]
    #[tokio::test]
    async fn blank_key_is_invalid_before_lookup(#[case] key: &str, #[case] expected: KeyError) {
        // A permissive resolver that would happily answer any key.
        let spy = Arc::new(SpyResolver::new(registry()));
        let dispatcher = Dispatcher::new(spy.clone());

        let err = dispatcher
            .execute::<Arithmetic>(key, Operands::new(6, 2))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            DispatchError::InvalidArgument(ArgumentError::Key(got)) if got == expected
        ));
        assert_eq!(spy.calls(), 0);
    }

    #[tokio::test]
    async fn missing_input_is_invalid_before_lookup() {
        let spy = Arc::new(SpyResolver::new(registry()));
        let dispatcher = Dispatcher::new(spy.clone());

        let err = dispatcher
            .dispatch::<Arithmetic>(ExecutionRequest::without_input("Add"))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            DispatchError::InvalidArgument(ArgumentError::MissingInput)
        ));
        assert_eq!(spy.calls(), 0);
    }

    #[tokio::test]
    async fn dispatch_runs_complete_request() {
        let spy = Arc::new(SpyResolver::new(registry()));
        let dispatcher = Dispatcher::new(spy.clone());

        let out = dispatcher
            .dispatch::<Arithmetic>(ExecutionRequest::new("Add", Operands::new(6, 2)))
            .await
            .unwrap();

        assert_eq!(out, 8);
        assert_eq!(spy.calls(), 1);
    }

    #[tokio::test]
    async fn implementation_error_propagates_unchanged() {
        let err = dispatcher()
            .execute::<Arithmetic>("Add", Operands::new(i64::MAX, 1))
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::ImplementationFailure);
        assert_eq!(err.to_string(), ArithmeticError::Overflow.to_string());
        assert_eq!(err.into_implementation(), Some(ArithmeticError::Overflow));
    }

    #[tokio::test]
    async fn same_key_in_two_families_stays_isolated() {
        let mut registry = registry();
        registry.register::<Comparison, _>("Add", Max).unwrap();
        let dispatcher = Dispatcher::new(Arc::new(registry));

        let sum = dispatcher
            .execute::<Arithmetic>("Add", Operands::new(6, 2))
            .await
            .unwrap();
        let max = dispatcher
            .execute::<Comparison>("Add", Operands::new(6, 2))
            .await
            .unwrap();
        let err = dispatcher
            .execute::<Comparison>("Sub", Operands::new(6, 2))
            .await
            .unwrap_err();

        assert_eq!(sum, 8);
        assert_eq!(max, 6);
        assert!(matches!(err, DispatchError::StrategyNotFound { family: "comparison", .. }));
    }

    #[tokio::test]
    async fn cancellation_surfaces_as_cancelled() {
        let mut registry = registry();
        registry
            .register::<Arithmetic, _>(
                "Slow",
                strategy_fn::<Arithmetic, _, _>(|ops: Operands| async move {
                    tokio::time::sleep(Duration::from_secs(3600)).await;
                    Ok(ops.a)
                }),
            )
            .unwrap();
        let dispatcher = Dispatcher::new(Arc::new(registry));
        let cancel = CancellationToken::new();

        let call = {
            let dispatcher = dispatcher.clone();
            let cancel = cancel.clone();
            tokio::spawn(async move {
                dispatcher
                    .execute_cancellable::<Arithmetic>("Slow", Operands::new(1, 1), &cancel)
                    .await
            })
        };
        cancel.cancel();

        let err = call.await.unwrap().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Cancelled);
    }

    /// Sets its flag when the future owning it is dropped.
    struct DropFlag(Arc<AtomicBool>);

    impl Drop for DropFlag {
        fn drop(&mut self) {
            self.0.store(true, Ordering::SeqCst);
        }
    }

    #[tokio::test]
    async fn cancellation_drops_running_strategy() {
        let dropped = Arc::new(AtomicBool::new(false));
        let started = Arc::new(tokio::sync::Notify::new());

        let mut registry = registry();
        {
            let dropped = dropped.clone();
            let started = started.clone();
            registry
                .register::<Arithmetic, _>(
                    "Slow",
                    strategy_fn::<Arithmetic, _, _>(move |ops: Operands| {
                        let guard = DropFlag(dropped.clone());
                        let started = started.clone();
                        async move {
                            let _guard = guard;
                            started.notify_one();
                            tokio::time::sleep(Duration::from_secs(3600)).await;
                            Ok(ops.a)
                        }
                    }),
                )
                .unwrap();
        }
        let dispatcher = Dispatcher::new(Arc::new(registry));
        let cancel = CancellationToken::new();

        let call = {
            let dispatcher = dispatcher.clone();
            let cancel = cancel.clone();
            tokio::spawn(async move {
                dispatcher
                    .execute_cancellable::<Arithmetic>("Slow", Operands::new(1, 1), &cancel)
                    .await
            })
        };

        started.notified().await;
        assert!(!dropped.load(Ordering::SeqCst));
        cancel.cancel();

        let err = call.await.unwrap().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Cancelled);
        assert!(dropped.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn cancellable_call_completes_when_not_cancelled() {
        let cancel = CancellationToken::new();
        let out = dispatcher()
            .execute_cancellable::<Arithmetic>("Sub", Operands::new(6, 2), &cancel)
            .await
            .unwrap();
        assert_eq!(out, 4);
    }

    #[tokio::test]
    async fn cancellation_does_not_mask_lookup_failures() {
        let cancel = CancellationToken::new();
        cancel.cancel();

        let err = dispatcher()
            .execute_cancellable::<Arithmetic>("Mul", Operands::new(6, 2), &cancel)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::StrategyNotFound);
    }

    #[tokio::test]
    async fn concurrent_calls_are_independent() {
        let dispatcher = dispatcher();
        let handles: Vec<_> = (0..32i64)
            .map(|i| {
                let dispatcher = dispatcher.clone();
                let key = if i % 2 == 0 { "Add" } else { "Sub" };
                tokio::spawn(async move {
                    dispatcher
                        .execute::<Arithmetic>(key, Operands::new(i, 1))
                        .await
                        .map(|out| (i, out))
                })
            })
            .collect();

        for handle in handles {
            let (i, out) = handle.await.unwrap().unwrap();
            let expected = if i % 2 == 0 { i + 1 } else { i - 1 };
            assert_eq!(out, expected);
        }
    }
}
