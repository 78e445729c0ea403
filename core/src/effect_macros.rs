//! Declarative macros for building effects without the boxing noise

/// Create an `Effect::Future` from an async block
///
/// # Example
///
/// ```
/// use todoboard_core::{async_effect, effect::Effect};
///
/// let effect: Effect<u32> = async_effect! {
///     Some(42)
/// };
/// assert!(matches!(effect, Effect::Future(_)));
/// ```
#[macro_export]
macro_rules! async_effect {
    ($($body:tt)*) => {
        $crate::effect::Effect::Future(
            ::std::boxed::Box::pin(async move { $($body)* })
        )
    };
}
