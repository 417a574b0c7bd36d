//! Strategy trait - one interchangeable implementation of a family.
//!
//! `Strategy<F>` is object-safe, so the registry can store every
//! implementation of a family as `Arc<dyn Strategy<F>>` regardless of its
//! concrete type.

use std::future::Future;
use std::marker::PhantomData;

use async_trait::async_trait;

use crate::domain::Family;

/// Strategy executes a family's input and produces its output.
///
/// # Example
/// ```ignore
/// struct Add;
///
/// #[async_trait]
/// impl Strategy<Arithmetic> for Add {
///     async fn execute(&self, input: Operands) -> Result<i64, ArithmeticError> {
///         input.a.checked_add(input.b).ok_or(ArithmeticError::Overflow)
///     }
/// }
/// ```
///
/// Implementations receive everything they need through `input`; a registry
/// shares one instance across all concurrent calls.
#[async_trait]
pub trait Strategy<F: Family>: Send + Sync {
    async fn execute(&self, input: F::Input) -> Result<F::Output, F::Error>;
}

/// FnStrategy adapts an async closure into a [`Strategy`].
pub struct FnStrategy<F, Func> {
    func: Func,
    _family: PhantomData<fn() -> F>,
}

/// Wrap `func` as a strategy of family `F`.
///
/// ```ignore
/// let sub = strategy_fn::<Arithmetic, _, _>(|ops: Operands| async move { Ok(ops.a - ops.b) });
/// ```
pub fn strategy_fn<F, Func, Fut>(func: Func) -> FnStrategy<F, Func>
where
    F: Family,
    Func: Fn(F::Input) -> Fut + Send + Sync,
    Fut: Future<Output = Result<F::Output, F::Error>> + Send,
{
    FnStrategy {
        func,
        _family: PhantomData,
    }
}

#[async_trait]
impl<F, Func, Fut> Strategy<F> for FnStrategy<F, Func>
where
    F: Family,
    Func: Fn(F::Input) -> Fut + Send + Sync,
    Fut: Future<Output = Result<F::Output, F::Error>> + Send,
{
    async fn execute(&self, input: F::Input) -> Result<F::Output, F::Error> {
        (self.func)(input).await
    }
}
