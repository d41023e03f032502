use lazy_static::lazy_static;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::collections::HashMap;

/// Fractional digits advertised on the wire. Values are truncated toward
/// zero, never rounded up, so a provider can not over-advertise.
pub const PRICE_SCALE: u32 = 8;

/// Credits accrued per token served before device/model weighting.
const BASE_CREDIT_RATE: Decimal = dec!(0.005);

const HIGH_UTILIZATION_THRESHOLD: f64 = 90.0;
const MID_UTILIZATION_THRESHOLD: f64 = 70.0;

lazy_static! {
    static ref GPU_TYPE_MULTIPLIERS: HashMap<&'static str, Decimal> = HashMap::from([
        ("h100", dec!(2.0)),
        ("a100", dec!(1.5)),
        ("a10g", dec!(1.2)),
        ("t4", dec!(0.8)),
    ]);
    static ref MODEL_MULTIPLIERS: HashMap<&'static str, Decimal> = HashMap::from([
        ("gpt4", dec!(2.0)),
        ("llama70b", dec!(1.5)),
        ("mixtral", dec!(1.2)),
    ]);
}

/// Scale an ask price with current device utilization. Busy devices charge
/// more; the thresholds are inclusive below and strict above, so exactly
/// 70.0 still yields the base price and exactly 90.0 the mid multiplier.
pub fn adjust_price(base_price: Decimal, utilization: f64) -> Decimal {
    let multiplier = if utilization > HIGH_UTILIZATION_THRESHOLD {
        dec!(2.0)
    } else if utilization > MID_UTILIZATION_THRESHOLD {
        dec!(1.5)
    } else {
        Decimal::ONE
    };
    quantize(base_price * multiplier)
}

/// Credit rate for a device/model pair. Unknown names fall back to a 1.0
/// multiplier rather than failing, so a new GPU generation or model can be
/// advertised before the tables catch up.
pub fn credit_rate(gpu_type: &str, model: &str) -> Decimal {
    let gpu_multiplier = GPU_TYPE_MULTIPLIERS
        .get(gpu_type)
        .copied()
        .unwrap_or(Decimal::ONE);
    let model_multiplier = MODEL_MULTIPLIERS
        .get(model)
        .copied()
        .unwrap_or(Decimal::ONE);
    quantize(BASE_CREDIT_RATE * gpu_multiplier * model_multiplier)
}

/// Truncate toward zero to [`PRICE_SCALE`] digits, then pad so the wire
/// representation always carries exactly that many fractional digits.
pub fn quantize(value: Decimal) -> Decimal {
    let mut quantized = value.trunc_with_scale(PRICE_SCALE);
    quantized.rescale(PRICE_SCALE);
    quantized
}
