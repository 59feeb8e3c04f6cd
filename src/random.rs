/// Uniform integer source used to pick round targets.
pub trait RandomSource {
    /// Uniform draw from the inclusive range `[min, max]`. Requires `min <= max`.
    fn between(&mut self, min: i64, max: i64) -> i64;
}

#[cfg(target_arch = "wasm32")]
#[derive(Debug, Default, Clone, Copy)]
pub struct MathRandom;

#[cfg(target_arch = "wasm32")]
impl RandomSource for MathRandom {
    fn between(&mut self, min: i64, max: i64) -> i64 {
        debug_assert!(min <= max);
        let span = (max - min + 1) as f64;
        min + (js_sys::Math::random() * span).floor() as i64
    }
}

#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadRandom;

#[cfg(not(target_arch = "wasm32"))]
impl RandomSource for ThreadRandom {
    fn between(&mut self, min: i64, max: i64) -> i64 {
        use rand::Rng;

        debug_assert!(min <= max);
        rand::rng().random_range(min..=max)
    }
}

pub fn platform_random() -> Box<dyn RandomSource> {
    #[cfg(target_arch = "wasm32")]
    {
        Box::new(MathRandom)
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        Box::new(ThreadRandom)
    }
}
