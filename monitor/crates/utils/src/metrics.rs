use opentelemetry::metrics::{Counter, Gauge, Meter};

pub trait Metrics {
    fn register() -> Self;
}

/// Declares a lazily registered metrics struct, e.g.
/// `register_metric!(MONITOR_METRICS, MonitorMetrics);`
#[macro_export]
macro_rules! register_metric {
    ($name:ident, $type:ty) => {
        pub static $name: $crate::metrics::Lazy<$type> =
            $crate::metrics::Lazy::new(<$type as $crate::metrics::Metrics>::register);
    };
}

pub use once_cell::sync::Lazy;

pub fn register_counter(meter: &Meter, name: &'static str, desc: &'static str, unit: &'static str) -> Counter<u64> {
    meter.u64_counter(name).with_description(desc).with_unit(unit).build()
}

pub fn register_gauge(meter: &Meter, name: &'static str, desc: &'static str, unit: &'static str) -> Gauge<f64> {
    meter.f64_gauge(name).with_description(desc).with_unit(unit).build()
}
