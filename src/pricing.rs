/// Apply a percentage discount, rounding half up to the nearest minor unit.
pub fn discounted_price(price: i64, discount: Option<i32>) -> i64 {
    match discount {
        Some(d) if d > 0 => {
            let keep = i64::from(100 - d.min(100));
            (price * keep + 50) / 100
        }
        _ => price,
    }
}

/// A variation's own discount takes precedence over the product-wide one.
pub fn effective_discount(product: Option<i32>, variation: Option<i32>) -> Option<i32> {
    variation
        .or(product)
        .filter(|d| *d > 0)
        .map(|d| d.min(100))
}

pub fn line_total(unit_price: i64, discount: Option<i32>, quantity: u32) -> i64 {
    discounted_price(unit_price, discount) * i64::from(quantity)
}

pub fn format_price(amount: i64, currency: &str) -> String {
    let sign = if amount < 0 { "-" } else { "" };
    let abs = amount.unsigned_abs();
    format!("{sign}{}.{:02} {currency}", abs / 100, abs % 100)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn discount_rounds_half_up() {
        assert_eq!(discounted_price(999, Some(10)), 899);
        assert_eq!(discounted_price(1005, Some(50)), 503);
        assert_eq!(discounted_price(1000, None), 1000);
        assert_eq!(discounted_price(1000, Some(0)), 1000);
    }

    #[test]
    fn discount_is_clamped_to_the_price() {
        assert_eq!(discounted_price(1000, Some(150)), 0);
        assert_eq!(discounted_price(1000, Some(-5)), 1000);
    }

    #[test]
    fn variation_discount_overrides_product_discount() {
        assert_eq!(effective_discount(Some(10), Some(25)), Some(25));
        assert_eq!(effective_discount(Some(10), None), Some(10));
        assert_eq!(effective_discount(None, Some(0)), None);
    }

    #[test]
    fn line_total_uses_discounted_unit_price() {
        assert_eq!(line_total(2500, Some(20), 3), 6000);
    }

    #[test]
    fn formats_minor_units() {
        assert_eq!(format_price(12_345, "CZK"), "123.45 CZK");
        assert_eq!(format_price(5, "EUR"), "0.05 EUR");
        assert_eq!(format_price(-150, "EUR"), "-1.50 EUR");
    }
}
