/// A macro to measure the evaluation time of an expression. Wraps an
/// expression, logs how long it took at the given level (`Debug` by default),
/// and evaluates to the value of the expression.
#[macro_export]
macro_rules! timed {
    ($label:expr, $ex:expr) => {
        $crate::timed!($label, log::Level::Debug, $ex)
    };
    ($label:expr, $log_level:expr, $ex:expr) => {{
        let now = std::time::Instant::now();
        let value = $ex;
        let elapsed = now.elapsed();
        log::log!($log_level, "{} took {} ms", $label, elapsed.as_millis());
        value
    }};
}

/// Round up to the next power of two. Texture dimensions on the host surface
/// have to be powers of two, so every atlas extent goes through this.
pub fn npo2(n: u32) -> u32 {
    n.max(1).next_power_of_two()
}

/// Wrap an angle into `[0, 2π]`. Angles already in range are untouched.
pub fn wrap_angle(theta: f32) -> f32 {
    let full = std::f32::consts::TAU;
    if (0.0..=full).contains(&theta) {
        theta
    } else {
        theta.rem_euclid(full)
    }
}
