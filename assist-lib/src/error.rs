/// declares a `Context` trait for the given error type so that each crate
/// can attach context to `Result`/`Option` values with its own error
#[macro_export]
macro_rules! context_trait {
    ($e:path) => {
        pub trait Context<T, E> {
            fn context<C>(self, cxt: C) -> std::result::Result<T, $e>
            where
                C: Into<String>;
        }
    };
}
