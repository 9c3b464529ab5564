/// Use this to define a unique type which will be used as a key to retrieve
/// an independent rng stream from `RngStreams`.
///
/// ```
/// use outbreak::define_rng;
/// use outbreak::random::RngStreams;
///
/// define_rng!(CoinRng);
///
/// let mut streams = RngStreams::new(42);
/// let flip: bool = streams.sample(CoinRng, |rng| outbreak::rand::Rng::random_bool(rng, 0.5));
/// # let _ = flip;
/// ```
#[macro_export]
macro_rules! define_rng {
    ($vis:vis $random_id:ident) => {
        #[derive(Copy, Clone, Debug)]
        $vis struct $random_id;

        impl $crate::random::RngId for $random_id {
            type RngType = $crate::rand::rngs::SmallRng;

            fn get_name() -> &'static str {
                stringify!($random_id)
            }
        }
    };
}
pub use define_rng;
