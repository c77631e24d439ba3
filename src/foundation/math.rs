pub(crate) fn mul_div255_u16(x: u16, y: u16) -> u16 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u16
}

/// Composite a straight-alpha source channel over an opaque destination channel.
pub(crate) fn blend_channel(dst: u8, src: u8, alpha: u8) -> u8 {
    let a = u16::from(alpha);
    let inv = 255 - a;
    (mul_div255_u16(u16::from(src), a) + mul_div255_u16(u16::from(dst), inv)).min(255) as u8
}

/// Composite a premultiplied source channel over an opaque destination channel.
pub(crate) fn blend_premul_channel(dst: u8, src_premul: u8, alpha: u8) -> u8 {
    let inv = 255 - u16::from(alpha);
    (u16::from(src_premul) + mul_div255_u16(u16::from(dst), inv)).min(255) as u8
}

/// `n` evenly spaced values from `start` to `end` inclusive.
pub(crate) fn linspace(start: f64, end: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            // Weighted form never computes `end - start`, which overflows for ranges near f64::MAX.
            let last = (n - 1) as f64;
            (0..n)
                .map(|i| {
                    let f = i as f64 / last;
                    start * (1.0 - f) + end * f
                })
                .collect()
        }
    }
}

/// Compact label for an axis or colorbar tick.
pub(crate) fn format_tick(v: f64) -> String {
    let a = v.abs();
    if a != 0.0 && !(1e-3..1e4).contains(&a) {
        format!("{v:.1e}")
    } else if a >= 100.0 {
        format!("{v:.0}")
    } else {
        // Avoid "-0.00" for values that round to zero.
        let s = format!("{v:.2}");
        if s == "-0.00" { "0.00".to_owned() } else { s }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/math.rs"]
mod tests;
